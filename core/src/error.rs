//! Domain error type for bridge operations.

use thiserror::Error;

/// Typed error enum for bridge operations, allowing callers to match on
/// specific failure modes instead of inspecting opaque `anyhow::Error` messages.
///
/// Every variant is local to the operation that produced it; none of them
/// leave the session in a broken state.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Bad address, amount or network. Raised before any network call.
    #[error("{0}")]
    InvalidRequest(String),

    /// Name lookup failed. The recipient simply stays unresolved.
    #[error("{0}")]
    Resolution(String),

    /// The allowance transaction was rejected or reverted.
    #[error("{0}")]
    Approval(String),

    /// The bridge transaction was rejected or reverted.
    #[error("{0}")]
    Submission(String),

    /// A previous submission from the same origin has not settled yet.
    #[error("A bridge transaction is already in progress.")]
    AlreadyInProgress,

    /// The selected chain has no registered bridge contract.
    #[error("No bridge contract is registered for chain {0}.")]
    UnsupportedNetwork(u64),

    /// RPC communication failure outside of a submission.
    #[error("{0}")]
    Network(String),

    /// Invalid or unreadable configuration / registry file.
    #[error("{0}")]
    Config(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BridgeError {
    /// Whether repeating the same action may succeed without changing any input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BridgeError::Approval(_)
                | BridgeError::Submission(_)
                | BridgeError::Network(_)
                | BridgeError::AlreadyInProgress
        )
    }
}

/// Alias for `std::result::Result<T, BridgeError>`.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_variants() {
        assert!(BridgeError::Submission("rejected".into()).is_retryable());
        assert!(BridgeError::Approval("reverted".into()).is_retryable());
        assert!(BridgeError::AlreadyInProgress.is_retryable());
        assert!(!BridgeError::InvalidRequest("bad amount".into()).is_retryable());
        assert!(!BridgeError::UnsupportedNetwork(5).is_retryable());
    }

    #[test]
    fn unsupported_network_message_names_chain() {
        let err = BridgeError::UnsupportedNetwork(61116);
        assert!(err.to_string().contains("61116"));
    }
}
