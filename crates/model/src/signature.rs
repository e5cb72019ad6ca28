use {
    crate::DomainSeparator,
    alloy::{
        primitives::{Address, B256, SignatureError, keccak256},
        signers::Signer,
    },
    serde::{Deserialize, Serialize, de},
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
};

/// Returns the EIP-712 digest of a struct hash under the given domain, i.e.
/// `keccak256("\x19\x01" ‖ domainSeparator ‖ hashStruct(message))`.
pub fn hashed_eip712_message(
    domain_separator: &DomainSeparator,
    struct_hash: &[u8; 32],
) -> [u8; 32] {
    let mut message = [0u8; 66];
    message[0..2].copy_from_slice(&[0x19, 0x01]);
    message[2..34].copy_from_slice(&domain_separator.0);
    message[34..66].copy_from_slice(struct_hash);
    keccak256(message).0
}

/// An ECDSA signature split into the components the exchange expects
/// inlined into its order struct.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Default, Hash)]
pub struct EcdsaSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl EcdsaSignature {
    /// r + s + v
    pub fn to_bytes(self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }

    /// Splits a 65 byte r + s + v signature. A `v` of 0 or 1, as some
    /// hardware wallets produce, becomes 27 or 28 since the exchange only
    /// accepts the latter.
    pub fn from_bytes(bytes: &[u8; 65]) -> Result<Self, InvalidSignature> {
        let v = match bytes[64] {
            v @ (0 | 1) => v + 27,
            v @ (27 | 28) => v,
            v => return Err(InvalidSignature::RecoveryId(v)),
        };
        Ok(EcdsaSignature {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v,
        })
    }

    /// Splits a 64 byte EIP-2098 compact signature, r followed by s with the
    /// y parity in its highest bit.
    pub fn from_compact(bytes: &[u8; 64]) -> Self {
        let mut s = B256::from_slice(&bytes[32..]);
        let y_parity = s[0] >> 7;
        s[0] &= 0x7f;
        EcdsaSignature {
            r: B256::from_slice(&bytes[..32]),
            s,
            v: 27 + y_parity,
        }
    }

    /// Recovers the address that signed `hash`.
    pub fn recover(&self, hash: &[u8; 32]) -> Result<Address, InvalidSignature> {
        let signature = alloy::primitives::Signature::from_raw_array(&self.to_bytes())?;
        Ok(signature.recover_address_from_prehash(&B256::from(*hash))?)
    }

    /// Signs a prehashed message. `v` of the result is 27 or 28.
    pub async fn sign(
        hash: &[u8; 32],
        signer: &(dyn Signer + Send + Sync),
    ) -> Result<Self, alloy::signers::Error> {
        let signature = signer.sign_hash(&B256::from(*hash)).await?;
        Self::from_bytes(&signature.as_bytes())
            .map_err(|err| alloy::signers::Error::other(err.to_string()))
    }
}

impl Display for EcdsaSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&const_hex::encode_prefixed(self.to_bytes()))
    }
}

impl FromStr for EcdsaSignature {
    type Err = InvalidSignature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| InvalidSignature::Encoding(format!("{s:?} is missing the 0x prefix")))?;
        let bytes = const_hex::decode(hex)
            .map_err(|err| InvalidSignature::Encoding(format!("{s:?}: {err}")))?;
        if let Ok(bytes) = <&[u8; 65]>::try_from(bytes.as_slice()) {
            Self::from_bytes(bytes)
        } else if let Ok(bytes) = <&[u8; 64]>::try_from(bytes.as_slice()) {
            Ok(Self::from_compact(bytes))
        } else {
            Err(InvalidSignature::Encoding(format!(
                "expected 64 or 65 bytes but got {}",
                bytes.len()
            )))
        }
    }
}

impl Serialize for EcdsaSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EcdsaSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor {}
        impl de::Visitor<'_> for Visitor {
            type Value = EcdsaSignature;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a 0x prefixed hex string of a 65 byte r, s, v or a 64 byte compact \
                     ecdsa signature"
                )
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                s.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor {})
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidSignature {
    #[error("invalid signature encoding: {0}")]
    Encoding(String),
    #[error("invalid signature v {0}, expected 0, 1, 27 or 28")]
    RecoveryId(u8),
    #[error(transparent)]
    Recovery(#[from] SignatureError),
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::signers::local::PrivateKeySigner, serde_json::json};

    #[tokio::test]
    async fn signature_recovers_signer() {
        let signer = PrivateKeySigner::random();
        let hash = keccak256(b"maker order").0;

        let signature = EcdsaSignature::sign(&hash, &signer).await.unwrap();
        assert!(signature.v == 27 || signature.v == 28);
        assert_eq!(signature.recover(&hash).unwrap(), signer.address());

        let other = keccak256(b"tampered maker order").0;
        assert_ne!(signature.recover(&other).ok(), Some(signer.address()));
    }

    #[test]
    fn bytes_are_ordered_r_s_v() {
        let signature = EcdsaSignature {
            r: B256::repeat_byte(1),
            s: B256::repeat_byte(2),
            v: 28,
        };
        let bytes = signature.to_bytes();
        assert_eq!(bytes[..32], [1; 32]);
        assert_eq!(bytes[32..64], [2; 32]);
        assert_eq!(bytes[64], 28);
        assert_eq!(EcdsaSignature::from_bytes(&bytes).unwrap(), signature);
    }

    #[test]
    fn parses_hex_strings() {
        let text = format!("0x{}{}1b", "01".repeat(32), "02".repeat(32));
        let signature: EcdsaSignature = text.parse().unwrap();
        assert_eq!(
            signature,
            EcdsaSignature {
                r: B256::repeat_byte(1),
                s: B256::repeat_byte(2),
                v: 27,
            }
        );
        assert_eq!(signature.to_string(), text);
        assert_eq!(json!(signature), json!(text));
        assert_eq!(
            serde_json::from_value::<EcdsaSignature>(json!(text)).unwrap(),
            signature
        );

        assert!(matches!(
            text[2..].parse::<EcdsaSignature>(),
            Err(InvalidSignature::Encoding(_))
        ));
        assert!(matches!(
            text[..text.len() - 4].parse::<EcdsaSignature>(),
            Err(InvalidSignature::Encoding(_))
        ));
    }

    #[tokio::test]
    async fn normalizes_zero_based_v() {
        let signer = PrivateKeySigner::random();
        let hash = keccak256(b"maker order").0;
        let signed = EcdsaSignature::sign(&hash, &signer).await.unwrap();

        let mut bytes = signed.to_bytes();
        bytes[64] -= 27;
        let parsed: EcdsaSignature = const_hex::encode_prefixed(bytes).parse().unwrap();
        assert_eq!(parsed, signed);
        assert!(parsed.v == 27 || parsed.v == 28);
        assert_eq!(parsed.recover(&hash).unwrap(), signer.address());
    }

    #[test]
    fn rejects_unknown_v() {
        for v in [2u8, 26, 29, 0xff] {
            let text = format!("0x{}{}{v:02x}", "01".repeat(32), "02".repeat(32));
            assert!(matches!(
                text.parse::<EcdsaSignature>(),
                Err(InvalidSignature::RecoveryId(value)) if value == v
            ));
        }
    }

    #[tokio::test]
    async fn parses_compact_signatures() {
        let signer = PrivateKeySigner::random();
        let hash = keccak256(b"maker order").0;
        let signed = EcdsaSignature::sign(&hash, &signer).await.unwrap();

        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(signed.r.as_slice());
        compact[32..].copy_from_slice(signed.s.as_slice());
        compact[32] |= (signed.v - 27) << 7;

        let parsed: EcdsaSignature = const_hex::encode_prefixed(compact).parse().unwrap();
        assert_eq!(parsed, signed);
        assert_eq!(parsed.recover(&hash).unwrap(), signer.address());
    }
}
