//! [`U256`] as a decimal string, the form the marketplace API and browser
//! wallets use for big numbers.
//!
//! Reading also accepts `0x` prefixed hex strings and plain JSON integers.

use {
    alloy::primitives::{U256, ruint::ParseError},
    serde::{Deserialize, Deserializer, Serializer, de::Error as _},
    serde_with::{DeserializeAs, SerializeAs},
};

/// `serde_with` adapter, e.g. `#[serde_as(as = "DecimalU256")]`.
pub struct DecimalU256;

impl SerializeAs<U256> for DecimalU256 {
    fn serialize_as<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(value, serializer)
    }
}

impl<'de> DeserializeAs<'de, U256> for DecimalU256 {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        deserialize(deserializer)
    }
}

/// The shapes a number can arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Integer(u64),
    Text(String),
}

pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    match Number::deserialize(deserializer)? {
        Number::Integer(value) => Ok(U256::from(value)),
        Number::Text(text) => parse(&text)
            .map_err(|err| D::Error::custom(format!("{text:?} is not a u256: {err}"))),
    }
}

/// Parses a decimal or `0x` prefixed hex string.
pub fn parse(s: &str) -> Result<U256, ParseError> {
    let s = s.trim();
    match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(s, 10),
    }
}
