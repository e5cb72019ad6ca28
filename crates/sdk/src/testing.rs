//! Fixtures for tests against a mocked node.

use {
    crate::{AddressTableVersion, Addresses, Deployment, Sdk, provider},
    alloy::{
        primitives::{Address, address},
        providers::{Provider, ProviderBuilder, mock::Asserter},
        rpc::{client::ClientBuilder, json_rpc::RequestPacket},
        signers::local::PrivateKeySigner,
        transports::mock::MockTransport,
    },
    std::{
        sync::{Arc, Mutex},
        task::{Context, Poll},
    },
    tower::{Layer, Service},
};

pub const EXCHANGE: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const WETH: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
pub const TRANSFER_MANAGER_ERC721: Address = address!("9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0");
pub const ORDER_VALIDATOR: Address = address!("Cf7Ed3AccA5a467e9e704C703E8D87F634fB0Fc9");
pub const STRATEGY_STANDARD_SALE: Address = address!("Dc64a140Aa3E981100a9becA4E685f962f0cF6C9");
pub const STRATEGY_COLLECTION_SALE: Address =
    address!("5FC8d32690cc91D4c39d9d3abcBD16989F875707");
pub const ROYALTY_FEE_MANAGER: Address = address!("0165878A594ca255338adfa4d48449f69242Eb8F");
pub const COLLECTION: Address = address!("a513E6E4b8f2a923D98304ec87F64353C4D5C853");
pub const USDC: Address = address!("2279B7A0a67DB372996a5FaB50D91eAA73d2eBe6");

pub fn addresses() -> Addresses {
    Addresses {
        version: AddressTableVersion::GuMarketplace,
        exchange: EXCHANGE,
        weth: WETH,
        transfer_manager_erc721: TRANSFER_MANAGER_ERC721,
        order_validator: ORDER_VALIDATOR,
        strategy_standard_sale: STRATEGY_STANDARD_SALE,
        strategy_collection_sale: STRATEGY_COLLECTION_SALE,
        strategy_standard_bid: None,
        strategy_private_sale: None,
        strategy_dutch_auction: None,
        transfer_manager_erc1155: None,
        transfer_selector_nft: None,
        royalty_fee_manager: Some(ROYALTY_FEE_MANAGER),
        royalty_fee_registry: None,
        royalty_fee_setter: None,
        execution_manager: None,
        currency_manager: None,
        extra: Default::default(),
    }
}

pub fn deployment() -> Deployment {
    Deployment::new(31337, addresses())
}

/// Read-only SDK on a hardhat chain whose node answers from the returned
/// asserter.
pub fn sdk() -> (Sdk, Asserter) {
    observe::tracing::initialize_reentrant("marketplace_sdk=debug");
    let asserter = Asserter::new();
    let sdk = Sdk::new(provider::mocked(asserter.clone()), deployment());
    (sdk, asserter)
}

pub fn sdk_with_wallet() -> (Sdk, Asserter) {
    let (sdk, asserter) = sdk();
    (sdk.with_wallet(PrivateKeySigner::random()), asserter)
}

/// Serialized JSON-RPC requests in the order they reached the node.
#[derive(Clone, Default)]
pub struct Requests(Arc<Mutex<Vec<String>>>);

impl Requests {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl<S> Layer<S> for Requests {
    type Service = Recording<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Recording {
            inner,
            requests: self.clone(),
        }
    }
}

#[derive(Clone)]
pub struct Recording<S> {
    inner: S,
    requests: Requests,
}

impl<S> Service<RequestPacket> for Recording<S>
where
    S: Service<RequestPacket>,
{
    type Error = S::Error;
    type Future = S::Future;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, packet: RequestPacket) -> Self::Future {
        self.requests.0.lock().unwrap().extend(
            packet
                .requests()
                .iter()
                .map(|request| request.serialized().get().to_owned()),
        );
        self.inner.call(packet)
    }
}

/// Like [`sdk`] but also records every request sent to the node.
pub fn recording_sdk() -> (Sdk, Asserter, Requests) {
    observe::tracing::initialize_reentrant("marketplace_sdk=debug");
    let asserter = Asserter::new();
    let requests = Requests::default();
    let client = ClientBuilder::default()
        .layer(requests.clone())
        .transport(MockTransport::new(asserter.clone()), true);
    let provider = ProviderBuilder::new().connect_client(client).erased();
    (Sdk::new(provider, deployment()), asserter, requests)
}
