//! Client SDK for the LooksRare V1 style NFT marketplace exchange.
//!
//! The [`Sdk`] builds maker and taker orders, signs maker orders with
//! EIP-712, asks the order validator whether orders are executable and
//! prepares the exchange, token and cancellation calls. Matching, fees,
//! royalties and nonce bookkeeping all happen in the contracts.

mod batching;
pub mod builder;
pub mod call;
pub mod config;
mod conversions;
pub mod error;
pub mod exchange;
pub mod fees;
pub mod provider;
pub mod signer;
pub mod tokens;
pub mod validator;

#[cfg(test)]
mod testing;

pub use {
    builder::{CollectionOfferInput, MakerOrderInput, TakerOrderInput, create_taker},
    call::{ContractCall, Overrides},
    config::{AddressBook, AddressTableVersion, Addresses, Deployment, Protocol},
    error::{Error, Result},
    exchange::EntryPoint,
    model,
};
use {
    alloy::{
        contract::{CallBuilder, CallDecoder},
        eips::BlockId,
        network::{EthereumWallet, TxSigner},
        primitives::{Address, Signature},
        providers::{DynProvider, Provider, ProviderBuilder},
        signers::Signer,
        sol_types::SolCall,
    },
    std::sync::Arc,
};

/// Entry point of the SDK, bound to one deployment of the exchange.
///
/// Cloning is cheap. An SDK without a wallet can read chain state and
/// compute typed data but every signing or state changing operation fails
/// with [`Error::SignerNotConfigured`].
#[derive(Clone)]
pub struct Sdk {
    provider: DynProvider,
    deployment: Arc<Deployment>,
    wallet: Option<Wallet>,
    block: Option<BlockId>,
}

/// The signing capability of an [`Sdk`].
#[derive(Clone)]
pub struct Wallet {
    signer: Arc<dyn Signer + Send + Sync>,
    provider: DynProvider,
}

impl Wallet {
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn signer(&self) -> &(dyn Signer + Send + Sync) {
        self.signer.as_ref()
    }

    /// Provider that signs and submits transactions from [`Self::address`].
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

impl Sdk {
    pub fn new(provider: DynProvider, deployment: Deployment) -> Self {
        Self {
            provider,
            deployment: Arc::new(deployment),
            wallet: None,
            block: None,
        }
    }

    /// Creates an SDK for whatever chain the provider is connected to.
    pub async fn connect(provider: DynProvider, address_book: &AddressBook) -> Result<Self> {
        let chain_id = provider.get_chain_id().await?;
        let deployment = address_book.deployment(chain_id)?;
        tracing::debug!(chain_id, protocol = ?deployment.protocol, "connected to exchange");
        Ok(Self::new(provider, deployment))
    }

    /// Binds a signing credential to the SDK.
    pub fn with_wallet<S>(mut self, signer: S) -> Self
    where
        S: Signer + TxSigner<Signature> + Clone + Send + Sync + 'static,
    {
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer.clone()))
            .connect_provider(self.provider.clone())
            .erased();
        self.wallet = Some(Wallet {
            signer: Arc::new(signer),
            provider,
        });
        self
    }

    /// An SDK whose contract reads see the chain at `block` instead of the
    /// latest block. Transactions, simulations and gas estimates are not
    /// affected.
    pub fn at_block(mut self, block: BlockId) -> Self {
        self.block = Some(block);
        self
    }

    pub fn block(&self) -> Option<BlockId> {
        self.block
    }

    /// The bound signing credential.
    pub fn wallet(&self) -> Result<&Wallet> {
        self.wallet.as_ref().ok_or(Error::SignerNotConfigured)
    }

    pub fn signer_address(&self) -> Result<Address> {
        self.wallet().map(Wallet::address)
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn addresses(&self) -> &Addresses {
        &self.deployment.addresses
    }

    pub fn chain_id(&self) -> u64 {
        self.deployment.chain_id
    }

    fn contract_call<C>(
        &self,
        to: Address,
        call: C,
        overrides: Overrides,
    ) -> Result<ContractCall<C::Return>>
    where
        C: SolCall,
    {
        let wallet = self.wallet().inspect_err(|_| {
            tracing::warn!(method = C::SIGNATURE, "state changing call without a signer");
        })?;
        Ok(ContractCall::new(wallet, &self.provider, to, call, overrides))
    }
}

/// Pins a contract read to a block when one is given.
trait AtBlock {
    fn at(self, block: Option<BlockId>) -> Self;
}

impl<P, D> AtBlock for CallBuilder<P, D>
where
    P: Provider,
    D: CallDecoder,
{
    fn at(self, block: Option<BlockId>) -> Self {
        match block {
            Some(block) => self.block(block),
            None => self,
        }
    }
}
