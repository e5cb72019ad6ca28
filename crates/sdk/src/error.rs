use {
    alloy::{contract::Error as ContractError, transports::RpcError},
    model::{order::InvalidTimestamp, params, signature::InvalidSignature},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The operation needs a signing credential but the SDK was built
    /// read-only.
    #[error("signer is undefined")]
    SignerNotConfigured,
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(#[from] InvalidTimestamp),
    #[error("invalid order params: {0}")]
    Params(#[from] params::Error),
    #[error("got {orders} orders but {signatures} signatures")]
    BatchLengthMismatch { orders: usize, signatures: usize },
    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] InvalidSignature),
    #[error("address table has no {0} address")]
    MissingAddress(&'static str),
    #[error("chain {0} is not supported")]
    UnsupportedChain(u64),
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    Transport(#[from] alloy::transports::TransportError),
    #[error(transparent)]
    Abi(#[from] alloy::sol_types::Error),
    #[error(transparent)]
    Signer(#[from] alloy::signers::Error),
}

impl Error {
    /// Whether the error was raised locally before anything was sent to the
    /// node.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            Self::Contract(_) | Self::Transport(_) | Self::Abi(_) | Self::Signer(_)
        )
    }

    /// Whether the node rejected or failed the request without the contract
    /// reverting.
    pub fn is_node_error(&self) -> bool {
        match self {
            // Reverts come back as error responses carrying revert data.
            Self::Contract(ContractError::TransportError(RpcError::ErrorResp(err)))
            | Self::Transport(RpcError::ErrorResp(err)) => err.as_revert_data().is_none(),
            Self::Contract(ContractError::TransportError(_)) | Self::Transport(_) => true,
            _ => false,
        }
    }

    /// Whether the error is an unsupported order parameter type.
    pub fn is_unsupported_param_kind(&self) -> bool {
        matches!(self, Self::Params(params::Error::UnsupportedKind(_)))
    }
}
