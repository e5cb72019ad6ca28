//! Chains the marketplace is deployed on.

use {
    alloy::primitives::U256,
    serde::{Deserialize, Deserializer, de},
    thiserror::Error,
};

/// Represents each network the marketplace is deployed on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u64)]
pub enum Network {
    Mainnet = 1,
    Goerli = 5,
    Hardhat = 31337,
    GuSandbox = 99999,
}

/// Static information about a network, for display and for wiring up
/// clients.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChainInfo {
    pub label: &'static str,
    pub explorer: &'static str,
    pub rpc_url: Option<&'static str>,
    pub app_url: Option<&'static str>,
    pub base_api_url: Option<&'static str>,
}

impl ChainInfo {
    /// GraphQL endpoint of the marketplace API.
    pub fn api_url(&self) -> Option<String> {
        self.base_api_url.map(|base| format!("{base}/graphql"))
    }
}

impl Network {
    pub const ALL: [Self; 4] = [Self::Mainnet, Self::Goerli, Self::Hardhat, Self::GuSandbox];

    /// Returns the network's chain ID
    pub fn chain_id(&self) -> u64 {
        *self as u64
    }

    /// Returns the canonical name of the network.
    pub fn name(&self) -> &'static str {
        self.info().label
    }

    pub fn info(&self) -> ChainInfo {
        match self {
            Self::Mainnet => ChainInfo {
                label: "Ethereum / Mainnet",
                explorer: "https://etherscan.io",
                rpc_url: None,
                app_url: None,
                base_api_url: None,
            },
            Self::Goerli => ChainInfo {
                label: "Ethereum / Goerli",
                explorer: "https://goerli.etherscan.io",
                rpc_url: None,
                app_url: None,
                base_api_url: None,
            },
            Self::Hardhat => ChainInfo {
                label: "Hardhat",
                explorer: "https://etherscan.io",
                rpc_url: Some("http://127.0.0.1:8545"),
                app_url: Some("http://localhost:3000"),
                base_api_url: None,
            },
            Self::GuSandbox => ChainInfo {
                label: "G.U.Sandbox",
                explorer: "https://sandbox1.japanopenchain.org",
                rpc_url: Some("https://sandbox1.japanopenchain.org:8545"),
                app_url: Some("https://test.nft-marketplace.gu.net"),
                base_api_url: Some("https://test.api.nft-marketplace.gu.net"),
            },
        }
    }
}

impl TryFrom<u64> for Network {
    type Error = Error;

    /// Initializes `Network` from a chain ID, returns error if the chain id is
    /// not supported
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|network| network.chain_id() == value)
            .ok_or(Error::ChainIdNotSupported(value))
    }
}

impl TryFrom<U256> for Network {
    type Error = Error;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        u64::try_from(value)
            .map_err(|_| Error::ChainIdNotSupported(u64::MAX))?
            .try_into()
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NetworkVisitor;

        impl de::Visitor<'_> for NetworkVisitor {
            type Value = Network;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a u64 or a string")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Network::try_from(value).map_err(de::Error::custom)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Network::try_from(value.parse::<u64>().map_err(de::Error::custom)?)
                    .map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(NetworkVisitor)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("chain id {0} not supported")]
    ChainIdNotSupported(u64),
}
