//! Encoding of the free-form `params` field of maker and taker orders.
//!
//! Strategies read extra arguments from `params` with `abi.decode`, so the
//! values are ABI encoded as a parameter sequence, exactly like
//! `abi.encode(v1, v2, ...)` would do on chain. An empty parameter list is
//! encoded as the empty byte string, which strategies interpret as "no extra
//! parameters".

use {
    alloy::{
        dyn_abi::{DynSolType, DynSolValue},
        primitives::{Address, B256, Bytes, U256},
    },
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

/// The primitive Solidity types an order parameter can have.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParamKind {
    Bool,
    Address,
    Uint256,
    Bytes,
    Bytes32,
    Bytes32Array,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Address => "address",
            Self::Uint256 => "uint256",
            Self::Bytes => "bytes",
            Self::Bytes32 => "bytes32",
            Self::Bytes32Array => "bytes32[]",
        }
    }

    fn sol_type(&self) -> DynSolType {
        match self {
            Self::Bool => DynSolType::Bool,
            Self::Address => DynSolType::Address,
            Self::Uint256 => DynSolType::Uint(256),
            Self::Bytes => DynSolType::Bytes,
            Self::Bytes32 => DynSolType::FixedBytes(32),
            Self::Bytes32Array => DynSolType::Array(Box::new(DynSolType::FixedBytes(32))),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bool" => Self::Bool,
            "address" => Self::Address,
            "uint256" => Self::Uint256,
            "bytes" => Self::Bytes,
            "bytes32" => Self::Bytes32,
            "bytes32[]" => Self::Bytes32Array,
            other => return Err(Error::UnsupportedKind(other.to_string())),
        })
    }
}

/// A single typed order parameter.
///
/// Serialized as `{ "type": "<solidity type>", "value": <value> }`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Param {
    #[serde(rename = "bool")]
    Bool(bool),
    #[serde(rename = "address")]
    Address(Address),
    #[serde(rename = "uint256")]
    Uint256(#[serde(with = "crate::u256_decimal")] U256),
    #[serde(rename = "bytes")]
    Bytes(Bytes),
    #[serde(rename = "bytes32")]
    Bytes32(B256),
    #[serde(rename = "bytes32[]")]
    Bytes32Array(Vec<B256>),
}

impl Param {
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Bool(_) => ParamKind::Bool,
            Self::Address(_) => ParamKind::Address,
            Self::Uint256(_) => ParamKind::Uint256,
            Self::Bytes(_) => ParamKind::Bytes,
            Self::Bytes32(_) => ParamKind::Bytes32,
            Self::Bytes32Array(_) => ParamKind::Bytes32Array,
        }
    }

    /// Builds a parameter from its Solidity type tag and a textual value.
    ///
    /// Booleans are `true`/`false`, integers decimal or `0x` hex, byte
    /// values `0x` hex, and `bytes32[]` a comma separated list of words.
    pub fn parse(kind: &str, value: &str) -> Result<Self, Error> {
        let kind = kind.parse::<ParamKind>()?;
        let invalid = || Error::InvalidValue {
            kind,
            value: value.to_string(),
        };
        let value = value.trim();
        Ok(match kind {
            ParamKind::Bool => Self::Bool(value.parse().map_err(|_| invalid())?),
            ParamKind::Address => Self::Address(value.parse().map_err(|_| invalid())?),
            ParamKind::Uint256 => {
                Self::Uint256(crate::u256_decimal::parse(value).map_err(|_| invalid())?)
            }
            ParamKind::Bytes => Self::Bytes(value.parse().map_err(|_| invalid())?),
            ParamKind::Bytes32 => Self::Bytes32(value.parse().map_err(|_| invalid())?),
            ParamKind::Bytes32Array => Self::Bytes32Array(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|word| !word.is_empty())
                    .map(|word| word.parse::<B256>().map_err(|_| invalid()))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    fn to_sol_value(&self) -> DynSolValue {
        match self {
            Self::Bool(value) => DynSolValue::Bool(*value),
            Self::Address(value) => DynSolValue::Address(*value),
            Self::Uint256(value) => DynSolValue::Uint(*value, 256),
            Self::Bytes(value) => DynSolValue::Bytes(value.to_vec()),
            Self::Bytes32(value) => DynSolValue::FixedBytes(*value, 32),
            Self::Bytes32Array(values) => DynSolValue::Array(
                values
                    .iter()
                    .map(|word| DynSolValue::FixedBytes(*word, 32))
                    .collect(),
            ),
        }
    }

    fn from_sol_value(kind: ParamKind, value: DynSolValue) -> Result<Self, Error> {
        let param = match (kind, value) {
            (ParamKind::Bool, DynSolValue::Bool(value)) => Self::Bool(value),
            (ParamKind::Address, DynSolValue::Address(value)) => Self::Address(value),
            (ParamKind::Uint256, DynSolValue::Uint(value, 256)) => Self::Uint256(value),
            (ParamKind::Bytes, DynSolValue::Bytes(value)) => Self::Bytes(value.into()),
            (ParamKind::Bytes32, DynSolValue::FixedBytes(value, 32)) => Self::Bytes32(value),
            (ParamKind::Bytes32Array, DynSolValue::Array(values)) => Self::Bytes32Array(
                values
                    .into_iter()
                    .map(|value| match value {
                        DynSolValue::FixedBytes(word, 32) => Ok(word),
                        _ => Err(Error::KindMismatch(kind)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            _ => return Err(Error::KindMismatch(kind)),
        };
        Ok(param)
    }
}

/// Result of encoding a parameter list: the kinds in order and the bytes
/// that go into the order's `params` field.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EncodedParams {
    pub types: Vec<ParamKind>,
    pub encoded: Bytes,
}

pub fn encode_order_params(params: &[Param]) -> EncodedParams {
    let types = params.iter().map(Param::kind).collect();
    if params.is_empty() {
        return EncodedParams {
            types,
            encoded: Bytes::new(),
        };
    }
    let encoded = DynSolValue::Tuple(params.iter().map(Param::to_sol_value).collect())
        .abi_encode_params();
    EncodedParams {
        types,
        encoded: encoded.into(),
    }
}

/// Inverse of [`encode_order_params`] given the kinds the params were
/// encoded with.
pub fn decode_order_params(types: &[ParamKind], encoded: &[u8]) -> Result<Vec<Param>, Error> {
    if types.is_empty() {
        return match encoded.is_empty() {
            true => Ok(Vec::new()),
            false => Err(Error::TrailingBytes(encoded.len())),
        };
    }
    let tuple = DynSolType::Tuple(types.iter().map(ParamKind::sol_type).collect());
    let DynSolValue::Tuple(values) = tuple.abi_decode_params(encoded)? else {
        unreachable!("decoding a tuple type always yields a tuple value");
    };
    let params = types
        .iter()
        .zip(values)
        .map(|(kind, value)| Param::from_sol_value(*kind, value))
        .collect::<Result<Vec<_>, _>>()?;
    // The ABI decoder tolerates dirty padding, oversized bools and trailing
    // data. Only the canonical encoding round trips.
    if encode_order_params(&params).encoded.as_ref() != encoded {
        return Err(Error::NonCanonical);
    }
    Ok(params)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported order parameter type {0:?}")]
    UnsupportedKind(String),
    #[error("invalid value {value:?} for order parameter of type {kind}")]
    InvalidValue { kind: ParamKind, value: String },
    #[error("decoded value does not match order parameter type {0}")]
    KindMismatch(ParamKind),
    #[error("expected no encoded params but got {0} bytes")]
    TrailingBytes(usize),
    #[error("encoded params are not in canonical form")]
    NonCanonical,
    #[error(transparent)]
    Abi(#[from] alloy::dyn_abi::Error),
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{address, b256, bytes},
        serde_json::json,
    };

    #[test]
    fn empty_params_encode_to_empty_bytes() {
        let encoded = encode_order_params(&[]);
        assert!(encoded.types.is_empty());
        assert!(encoded.encoded.is_empty());
        assert_eq!(decode_order_params(&[], &encoded.encoded).unwrap(), vec![]);
    }

    #[test]
    fn encodes_static_params_as_words() {
        let encoded = encode_order_params(&[
            Param::Uint256(U256::from(1)),
            Param::Address(Address::repeat_byte(0x11)),
            Param::Bool(true),
        ]);
        assert_eq!(
            encoded.types,
            vec![ParamKind::Uint256, ParamKind::Address, ParamKind::Bool]
        );
        assert_eq!(
            encoded.encoded,
            bytes!(
                "0000000000000000000000000000000000000000000000000000000000000001\
                 0000000000000000000000001111111111111111111111111111111111111111\
                 0000000000000000000000000000000000000000000000000000000000000001"
            )
        );
    }

    #[test]
    fn encodes_dynamic_bytes_with_offset() {
        let encoded = encode_order_params(&[Param::Bytes(bytes!("deadbeef"))]);
        assert_eq!(
            encoded.encoded,
            bytes!(
                "0000000000000000000000000000000000000000000000000000000000000020\
                 0000000000000000000000000000000000000000000000000000000000000004\
                 deadbeef00000000000000000000000000000000000000000000000000000000"
            )
        );
    }

    #[test]
    fn decode_inverts_encode() {
        let params = vec![
            Param::Bool(false),
            Param::Address(address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")),
            Param::Uint256(U256::MAX),
            Param::Bytes(bytes!("0102030405")),
            Param::Bytes32(b256!(
                "4242424242424242424242424242424242424242424242424242424242424242"
            )),
            Param::Bytes32Array(vec![B256::repeat_byte(1), B256::repeat_byte(2)]),
        ];
        let encoded = encode_order_params(&params);
        assert_eq!(
            decode_order_params(&encoded.types, &encoded.encoded).unwrap(),
            params
        );
        // Encoding is a pure function of its input.
        assert_eq!(encode_order_params(&params), encoded);
    }

    #[test]
    fn decode_rejects_bytes_without_types() {
        assert!(matches!(
            decode_order_params(&[], &[0u8; 32]),
            Err(Error::TrailingBytes(32))
        ));
    }

    #[test]
    fn decode_rejects_non_canonical_encodings() {
        let one = U256::from(1).to_be_bytes::<32>();
        let two = U256::from(2).to_be_bytes::<32>();

        assert!(matches!(
            decode_order_params(&[ParamKind::Bool], &two),
            Err(Error::NonCanonical)
        ));
        assert!(matches!(
            decode_order_params(&[ParamKind::Uint256], &[one, two].concat()),
            Err(Error::NonCanonical)
        ));

        let mut dirty_address = [0u8; 32];
        dirty_address[0] = 1;
        dirty_address[12..].copy_from_slice(Address::repeat_byte(0x11).as_slice());
        assert!(decode_order_params(&[ParamKind::Address], &dirty_address).is_err());

        assert_eq!(
            decode_order_params(&[ParamKind::Bool], &one).unwrap(),
            vec![Param::Bool(true)]
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        for tag in ["uint8", "string", "address[]", ""] {
            assert!(matches!(
                tag.parse::<ParamKind>(),
                Err(Error::UnsupportedKind(kind)) if kind == tag
            ));
        }
        assert!(matches!(
            Param::parse("int256", "1"),
            Err(Error::UnsupportedKind(_))
        ));
    }

    #[test]
    fn parses_textual_values() {
        assert_eq!(Param::parse("bool", "true").unwrap(), Param::Bool(true));
        assert_eq!(
            Param::parse("uint256", "0x10").unwrap(),
            Param::Uint256(U256::from(16))
        );
        assert_eq!(
            Param::parse(
                "bytes32[]",
                "0x0101010101010101010101010101010101010101010101010101010101010101, \
                 0x0202020202020202020202020202020202020202020202020202020202020202"
            )
            .unwrap(),
            Param::Bytes32Array(vec![B256::repeat_byte(1), B256::repeat_byte(2)])
        );
        assert!(matches!(
            Param::parse("bool", "yes"),
            Err(Error::InvalidValue {
                kind: ParamKind::Bool,
                ..
            })
        ));
    }

    #[test]
    fn json_representation() {
        let param = Param::Uint256(U256::from(9800));
        let value = json!({ "type": "uint256", "value": "9800" });
        assert_eq!(json!(param), value);
        assert_eq!(serde_json::from_value::<Param>(value).unwrap(), param);

        assert!(serde_json::from_value::<Param>(json!({ "type": "uint8", "value": 1 })).is_err());
    }
}
