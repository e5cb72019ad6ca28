//! Contract address tables and deployments.
//!
//! Address tables are never baked into the SDK. They are supplied by the
//! application, usually from a TOML file keyed by chain id:
//!
//! ```toml
//! [31337]
//! version = "gu-marketplace"
//! exchange = "0x..."
//! weth = "0x..."
//! ```

use {
    crate::error::{Error, Result},
    alloy::primitives::Address,
    anyhow::Context,
    serde::{Deserialize, Serialize},
    serde_with::{DisplayFromStr, serde_as},
    std::{collections::BTreeMap, path::Path},
};

/// The generations of the address table. Deployments of the G.U. fork carry
/// entries the original LooksRare table does not have and the other way
/// around.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressTableVersion {
    #[default]
    LooksRareV1,
    GuMarketplace,
}

impl AddressTableVersion {
    pub fn protocol(&self) -> Protocol {
        match self {
            Self::LooksRareV1 => Protocol::LooksRare,
            Self::GuMarketplace => Protocol::GuMarketplace,
        }
    }
}

/// Contract addresses of one deployment of the exchange.
///
/// The addresses every SDK operation needs are required. Everything else is
/// optional and deployment specific entries go into `extra`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Addresses {
    #[serde(default)]
    pub version: AddressTableVersion,
    pub exchange: Address,
    pub weth: Address,
    pub transfer_manager_erc721: Address,
    pub order_validator: Address,
    pub strategy_standard_sale: Address,
    pub strategy_collection_sale: Address,
    /// Default strategy for bids. Tables without a dedicated bid strategy use
    /// the standard sale strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_standard_bid: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_private_sale: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_dutch_auction: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_manager_erc1155: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_selector_nft: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty_fee_manager: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty_fee_registry: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub royalty_fee_setter: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_manager: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_manager: Option<Address>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Address>,
}

impl Addresses {
    pub fn standard_bid_strategy(&self) -> Address {
        self.strategy_standard_bid
            .unwrap_or(self.strategy_standard_sale)
    }

    pub fn royalty_fee_manager(&self) -> Result<Address> {
        self.royalty_fee_manager
            .ok_or(Error::MissingAddress("royalty-fee-manager"))
    }

    /// Looks up a deployment specific entry.
    pub fn extra(&self, name: &'static str) -> Result<Address> {
        self.extra
            .get(name)
            .copied()
            .ok_or(Error::MissingAddress(name))
    }
}

/// Address tables of all known deployments keyed by chain id.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AddressBook(#[serde_as(as = "BTreeMap<DisplayFromStr, _>")] BTreeMap<u64, Addresses>);

impl AddressBook {
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        toml::from_str(toml).context("invalid address book")
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("I/O error while reading {path:?}"))?;
        Self::from_toml_str(&data).with_context(|| format!("while reading {path:?}"))
    }

    pub fn get(&self, chain_id: u64) -> Option<&Addresses> {
        self.0.get(&chain_id)
    }

    /// Overrides or adds the table of one chain.
    pub fn insert(&mut self, chain_id: u64, addresses: Addresses) {
        self.0.insert(chain_id, addresses);
    }

    pub fn deployment(&self, chain_id: u64) -> Result<Deployment> {
        let addresses = self
            .get(chain_id)
            .ok_or(Error::UnsupportedChain(chain_id))?;
        Ok(Deployment::new(chain_id, addresses.clone()))
    }
}

impl FromIterator<(u64, Addresses)> for AddressBook {
    fn from_iter<T: IntoIterator<Item = (u64, Addresses)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The flavour of the exchange, which determines its EIP-712 domain name.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    #[default]
    LooksRare,
    GuMarketplace,
}

impl Protocol {
    pub fn domain_name(&self) -> &'static str {
        match self {
            Self::LooksRare => "LooksRareExchange",
            Self::GuMarketplace => "GUNftMarketplaceExchange",
        }
    }
}

/// Everything the SDK needs to know about the exchange it talks to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deployment {
    pub chain_id: u64,
    pub protocol: Protocol,
    pub addresses: Addresses,
}

impl Deployment {
    /// Creates a deployment whose protocol follows the address table version.
    pub fn new(chain_id: u64, addresses: Addresses) -> Self {
        Self {
            chain_id,
            protocol: addresses.version.protocol(),
            addresses,
        }
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn network(&self) -> Option<network::Network> {
        network::Network::try_from(self.chain_id).ok()
    }
}
