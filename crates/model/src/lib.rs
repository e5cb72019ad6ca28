//! Order model of the marketplace exchange: maker and taker orders, their
//! EIP-712 hashing, signatures and the validator's result codes.

pub mod order;
pub mod params;
pub mod signature;
pub mod u256_decimal;
pub mod validity;

use {
    alloy::primitives::{Address, keccak256},
    std::{fmt, sync::LazyLock},
};

/// The EIP-712 domain version shared by every deployment of the exchange.
pub const EIP712_VERSION: &str = "1";

/// Recommended `min_percentage_to_ask` (basis points) for orders executed by
/// the current strategies.
pub const MIN_NET_PRICE_RATIO: u64 = 9800;

/// Recommended `min_percentage_to_ask` for the deprecated strategies which
/// charge a higher protocol fee.
pub const MIN_NET_PRICE_RATIO_DEPRECATED: u64 = 9750;

#[derive(Copy, Clone, Default, Eq, Hash, PartialEq)]
pub struct DomainSeparator(pub [u8; 32]);

impl fmt::Debug for DomainSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&const_hex::encode(self.0))
    }
}

impl DomainSeparator {
    /// Computes the separator of the exchange deployed at
    /// `verifying_contract` whose EIP-712 domain is called `name`.
    pub fn new(name: &str, chain_id: u64, verifying_contract: Address) -> Self {
        /// The EIP-712 domain version used for computing the domain separator.
        static DOMAIN_VERSION: LazyLock<[u8; 32]> =
            LazyLock::new(|| keccak256(EIP712_VERSION).0);

        /// The EIP-712 domain type used computing the domain separator.
        static DOMAIN_TYPE_HASH: LazyLock<[u8; 32]> = LazyLock::new(|| {
            keccak256(
                b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
            )
            .0
        });

        let mut encoded = [0u8; 160];
        encoded[0..32].copy_from_slice(&*DOMAIN_TYPE_HASH);
        encoded[32..64].copy_from_slice(keccak256(name).as_slice());
        encoded[64..96].copy_from_slice(&*DOMAIN_VERSION);
        encoded[120..128].copy_from_slice(&chain_id.to_be_bytes());
        encoded[140..160].copy_from_slice(verifying_contract.as_slice());

        Self(keccak256(encoded).0)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address, hex_literal::hex};

    #[test]
    fn domain_separator_mainnet() {
        let exchange = address!("59728544B08AB483533076417FbBB2fD0B17CE3a");
        assert_eq!(
            DomainSeparator::new("LooksRareExchange", 1, exchange),
            DomainSeparator(hex!(
                "ad4d53a9c11a3edbe96e78e969291ab5248faeb3b8d4552c21e6bc72edb8cab3"
            ))
        );
    }

    #[test]
    fn domain_separator_depends_on_name_and_chain() {
        let exchange = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let separator = DomainSeparator::new("GUNftMarketplaceExchange", 31337, exchange);
        assert_eq!(
            separator,
            DomainSeparator(hex!(
                "23e65d6a54108f4a35c48537fe5571aa12d0c60d4ce866b5a8187ad1d6357d0e"
            ))
        );
        assert_ne!(
            separator,
            DomainSeparator::new("LooksRareExchange", 31337, exchange)
        );
        assert_ne!(
            separator,
            DomainSeparator::new("GUNftMarketplaceExchange", 1, exchange)
        );
    }
}
