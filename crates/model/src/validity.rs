//! Result codes of the order validator contract.
//!
//! The validator runs every rule group on an order and reports one code per
//! group, so a report for an order with several problems lists all of them.

use {
    alloy::primitives::U256,
    serde::{Deserialize, Serialize},
    std::fmt,
};

macro_rules! validity_codes {
    ($($name:ident = $code:literal,)*) => {
        /// Outcome of a single validator rule group.
        #[derive(
            Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, strum::IntoStaticStr,
        )]
        #[serde(from = "u64", into = "u64")]
        pub enum ValidityCode {
            $($name,)*
            /// A code this version of the SDK does not know about.
            Unknown(u64),
        }

        impl ValidityCode {
            pub fn code(self) -> u64 {
                match self {
                    $(Self::$name => $code,)*
                    Self::Unknown(code) => code,
                }
            }

            pub fn from_code(code: u64) -> Self {
                match code {
                    $($code => Self::$name,)*
                    code => Self::Unknown(code),
                }
            }
        }
    };
}

validity_codes! {
    OrderExpectedToBeValid = 0,
    NonceExecutedOrCancelled = 101,
    NonceBelowMinOrderNonce = 102,
    OrderAmountCannotBeZero = 201,
    MakerSignerIsNullSigner = 301,
    InvalidSParameterEoa = 302,
    InvalidVParameterEoa = 303,
    NullSignerEoa = 304,
    WrongSignerEoa = 305,
    SignatureInvalidEip1271 = 311,
    MissingIsValidSignatureFunctionEip1271 = 312,
    CurrencyNotWhitelisted = 401,
    StrategyNotWhitelisted = 402,
    MinNetRatioAboveProtocolFee = 501,
    MinNetRatioAboveRoyaltyFeeRegistryAndProtocolFee = 502,
    MinNetRatioAboveRoyaltyFeeErc2981AndProtocolFee = 503,
    MissingRoyaltyInfoFunctionErc2981 = 504,
    TooEarlyToExecuteOrder = 601,
    TooLateToExecuteOrder = 602,
    NoTransferManagerAvailableForCollection = 701,
    CustomTransferManager = 702,
    Erc20BalanceInferiorToPrice = 711,
    Erc20ApprovalInferiorToPrice = 712,
    Erc721TokenIdDoesNotExist = 721,
    Erc721TokenIdNotInBalance = 722,
    Erc721NoApprovalForAllOrTokenId = 723,
    Erc1155BalanceOfDoesNotExist = 731,
    Erc1155BalanceOfTokenIdInferiorToAmount = 732,
    Erc1155IsApprovedForAllDoesNotExist = 733,
    Erc1155NoApprovalForAll = 734,
}

impl ValidityCode {
    pub fn is_valid(self) -> bool {
        self == Self::OrderExpectedToBeValid
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl From<u64> for ValidityCode {
    fn from(code: u64) -> Self {
        Self::from_code(code)
    }
}

impl From<ValidityCode> for u64 {
    fn from(code: ValidityCode) -> Self {
        code.code()
    }
}

impl From<U256> for ValidityCode {
    fn from(code: U256) -> Self {
        // Codes wider than 64 bits are not produced by any validator.
        Self::from_code(u64::try_from(code).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for ValidityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// All codes the validator returned for one order, in rule group order.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidityReport(pub Vec<ValidityCode>);

impl ValidityReport {
    /// An order is currently executable when no rule group reported a
    /// problem.
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|code| code.is_valid())
    }

    pub fn errors(&self) -> impl Iterator<Item = ValidityCode> + '_ {
        self.0.iter().copied().filter(|code| !code.is_valid())
    }

    pub fn codes(&self) -> &[ValidityCode] {
        &self.0
    }
}

impl FromIterator<ValidityCode> for ValidityReport {
    fn from_iter<T: IntoIterator<Item = ValidityCode>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<U256>> for ValidityReport {
    fn from(codes: Vec<U256>) -> Self {
        codes.into_iter().map(ValidityCode::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn codes_convert_both_ways() {
        for code in [0, 101, 305, 502, 602, 723, 734] {
            let validity = ValidityCode::from_code(code);
            assert!(!matches!(validity, ValidityCode::Unknown(_)));
            assert_eq!(validity.code(), code);
        }
        assert_eq!(
            ValidityCode::from_code(723),
            ValidityCode::Erc721NoApprovalForAllOrTokenId
        );
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let code = ValidityCode::from_code(999);
        assert_eq!(code, ValidityCode::Unknown(999));
        assert_eq!(code.code(), 999);
        assert!(!code.is_valid());
        assert_eq!(
            ValidityCode::from(U256::MAX),
            ValidityCode::Unknown(u64::MAX)
        );
    }

    #[test]
    fn report_validity() {
        let valid = ValidityReport::from(vec![U256::ZERO; 7]);
        assert!(valid.is_valid());
        assert_eq!(valid.errors().count(), 0);

        let unapproved = ValidityReport::from(vec![
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            U256::from(723),
        ]);
        assert!(!unapproved.is_valid());
        assert_eq!(
            unapproved.errors().collect::<Vec<_>>(),
            vec![ValidityCode::Erc721NoApprovalForAllOrTokenId]
        );

        assert!(ValidityReport::default().is_valid());
    }

    #[test]
    fn display_and_json() {
        assert_eq!(
            ValidityCode::TooLateToExecuteOrder.to_string(),
            "TooLateToExecuteOrder (602)"
        );
        let report = ValidityReport(vec![
            ValidityCode::OrderExpectedToBeValid,
            ValidityCode::Unknown(42),
        ]);
        assert_eq!(json!(report), json!([0, 42]));
        assert_eq!(
            serde_json::from_value::<ValidityReport>(json!([0, 42])).unwrap(),
            report
        );
    }
}
