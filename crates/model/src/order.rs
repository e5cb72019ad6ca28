//! Maker and taker orders as understood by the exchange contract.

use {
    crate::{
        DomainSeparator,
        params::{Param, encode_order_params},
        signature::hashed_eip712_message,
        u256_decimal::DecimalU256,
    },
    alloy::primitives::{Address, Bytes, U256, keccak256},
    hex_literal::hex,
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
};

/// The extra strategy arguments of an order.
///
/// Orders start out with a raw parameter list that gets ABI encoded exactly
/// once. Everything that hashes or submits an order works on the encoded
/// bytes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrderParams {
    Raw(Vec<Param>),
    Encoded(Bytes),
}

impl Default for OrderParams {
    fn default() -> Self {
        Self::Encoded(Bytes::new())
    }
}

impl OrderParams {
    /// The canonical bytes of the params.
    pub fn encoded(&self) -> Bytes {
        match self {
            Self::Raw(params) => encode_order_params(params).encoded,
            Self::Encoded(bytes) => bytes.clone(),
        }
    }

    /// Replaces a raw parameter list with its encoding.
    pub fn into_encoded(self) -> Self {
        match self {
            Self::Raw(params) => Self::Encoded(encode_order_params(&params).encoded),
            encoded => encoded,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Raw(params) => params.is_empty(),
            Self::Encoded(bytes) => bytes.is_empty(),
        }
    }
}

impl From<Vec<Param>> for OrderParams {
    fn from(params: Vec<Param>) -> Self {
        Self::Raw(params)
    }
}

impl From<Bytes> for OrderParams {
    fn from(bytes: Bytes) -> Self {
        Self::Encoded(bytes)
    }
}

/// A signed, resting offer to sell (ask) or buy (bid) an item.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MakerOrder {
    pub is_order_ask: bool,
    pub signer: Address,
    pub collection: Address,
    #[serde_as(as = "DecimalU256")]
    pub price: U256,
    #[serde_as(as = "DecimalU256")]
    pub token_id: U256,
    #[serde_as(as = "DecimalU256")]
    pub amount: U256,
    pub strategy: Address,
    pub currency: Address,
    #[serde_as(as = "DecimalU256")]
    pub nonce: U256,
    #[serde_as(as = "DecimalU256")]
    pub start_time: U256,
    #[serde_as(as = "DecimalU256")]
    pub end_time: U256,
    #[serde_as(as = "DecimalU256")]
    pub min_percentage_to_ask: U256,
    #[serde(default)]
    pub params: OrderParams,
}

impl MakerOrder {
    /// `keccak256("MakerOrder(bool isOrderAsk,address signer,address collection,uint256 price,
    /// uint256 tokenId,uint256 amount,address strategy,address currency,uint256 nonce,
    /// uint256 startTime,uint256 endTime,uint256 minPercentageToAsk,bytes params)")`
    pub const TYPE_HASH: [u8; 32] =
        hex!("40261ade532fa1d2c7293df30aaadb9b3c616fae525a0b56d3d411c841a85028");

    /// Returns the value of hashStruct() over the order as defined by EIP-712.
    ///
    /// https://eips.ethereum.org/EIPS/eip-712#definition-of-hashstruct
    pub fn hash_struct(&self) -> [u8; 32] {
        let mut hash_data = [0u8; 448];
        hash_data[0..32].copy_from_slice(&Self::TYPE_HASH);
        // Some slots are not assigned (stay 0) because all values are extended to 256 bits.
        hash_data[63] = self.is_order_ask.into();
        hash_data[76..96].copy_from_slice(self.signer.as_slice());
        hash_data[108..128].copy_from_slice(self.collection.as_slice());
        hash_data[128..160].copy_from_slice(&self.price.to_be_bytes::<32>());
        hash_data[160..192].copy_from_slice(&self.token_id.to_be_bytes::<32>());
        hash_data[192..224].copy_from_slice(&self.amount.to_be_bytes::<32>());
        hash_data[236..256].copy_from_slice(self.strategy.as_slice());
        hash_data[268..288].copy_from_slice(self.currency.as_slice());
        hash_data[288..320].copy_from_slice(&self.nonce.to_be_bytes::<32>());
        hash_data[320..352].copy_from_slice(&self.start_time.to_be_bytes::<32>());
        hash_data[352..384].copy_from_slice(&self.end_time.to_be_bytes::<32>());
        hash_data[384..416].copy_from_slice(&self.min_percentage_to_ask.to_be_bytes::<32>());
        hash_data[416..448].copy_from_slice(keccak256(self.params.encoded()).as_slice());
        keccak256(hash_data).0
    }

    /// The digest a maker signs for this order on the given exchange.
    pub fn signing_hash(&self, domain: &DomainSeparator) -> [u8; 32] {
        hashed_eip712_message(domain, &self.hash_struct())
    }

    /// Checks that start and end time are plausible Unix timestamps in
    /// seconds.
    pub fn validate_timestamps(&self) -> Result<(), InvalidTimestamp> {
        for timestamp in [self.start_time, self.end_time] {
            if !is_timestamp_in_seconds(timestamp) {
                return Err(InvalidTimestamp(timestamp));
            }
        }
        Ok(())
    }

    pub fn with_encoded_params(mut self) -> Self {
        self.params = self.params.into_encoded();
        self
    }
}

/// Timestamps in seconds have at most 10 decimal digits until the year 2286.
/// Millisecond timestamps have 13.
pub fn is_timestamp_in_seconds(timestamp: U256) -> bool {
    timestamp < U256::from(10_000_000_000u64)
}

#[derive(Debug, thiserror::Error)]
#[error("timestamp {0} has more than 10 digits, expected seconds since the Unix epoch")]
pub struct InvalidTimestamp(pub U256);

/// The unsigned counter order that fills a maker order.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakerOrder {
    pub is_order_ask: bool,
    pub taker: Address,
    #[serde_as(as = "DecimalU256")]
    pub price: U256,
    #[serde_as(as = "DecimalU256")]
    pub token_id: U256,
    #[serde_as(as = "DecimalU256")]
    pub min_percentage_to_ask: U256,
    #[serde(default)]
    pub params: Bytes,
}
