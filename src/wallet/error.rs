use alloy_primitives::TxHash;
use std::time::Duration;
use thiserror::Error;

/// JSON-RPC error code a wallet returns when the user declines a request (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

/// Failures at the wallet and contract boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaveError {
    #[error("no wallet available")]
    MissingProvider,

    #[error("no account authorized")]
    NoAuthorizedAccount,

    #[error("wallet request rejected: {0}")]
    RequestRejected(String),

    #[error("wallet RPC error: {0}")]
    Rpc(String),

    #[error("contract call failed: {0}")]
    ContractCall(String),

    #[error("transaction {0} reverted")]
    TransactionReverted(TxHash),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("{operation} timed out after {}s", after.as_secs())]
    Timeout { operation: &'static str, after: Duration },

    #[error("not connected to a wallet account")]
    NotConnected,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for WaveError {
    fn from(e: std::io::Error) -> Self {
        WaveError::Storage(e.to_string())
    }
}

impl WaveError {
    /// Whether the user declined the wallet prompt
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WaveError::RequestRejected(_))
    }

    /// Text shown to the user in the notification banner
    pub fn user_message(&self) -> String {
        match self {
            WaveError::MissingProvider => {
                "Get a wallet! No Ethereum wallet endpoint was found.".to_string()
            }
            WaveError::NoAuthorizedAccount => {
                "The wallet did not authorize any account.".to_string()
            }
            WaveError::RequestRejected(_) => "Wallet request was rejected.".to_string(),
            WaveError::Rpc(_) => "Could not reach the wallet. Please try again.".to_string(),
            WaveError::ContractCall(_) => "Contract call failed. Please try again.".to_string(),
            WaveError::TransactionReverted(hash) => format!("Transaction {hash} reverted."),
            WaveError::InvalidResponse(_) => {
                "The contract returned data this client cannot read.".to_string()
            }
            WaveError::Timeout { operation, .. } => format!("Timed out while waiting: {operation}."),
            WaveError::NotConnected => "Connect your wallet first.".to_string(),
            WaveError::Storage(_) => "Could not save your preferences.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_distinguished() {
        assert!(WaveError::RequestRejected("User denied".into()).is_user_rejection());
        assert!(!WaveError::Rpc("connection refused".into()).is_user_rejection());
        assert!(!WaveError::MissingProvider.is_user_rejection());
    }

    #[test]
    fn test_missing_provider_differs_from_no_account() {
        assert_ne!(
            WaveError::MissingProvider.user_message(),
            WaveError::NoAuthorizedAccount.user_message()
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = WaveError::Timeout {
            operation: "transaction confirmation",
            after: Duration::from_secs(600),
        };
        assert_eq!(err.to_string(), "transaction confirmation timed out after 600s");
    }
}
