//! ============================================================================
//! Error Taxonomy for the Sui Agent
//! ============================================================================
//! Client input errors map to 400-class responses; collaborator failures
//! map to 500-class responses. Domain-rule outcomes (insufficient stake,
//! missing address book, duplicate creation) are NOT errors — they are
//! ordinary ChatResponse values with ready_to_execute=false.
//! ============================================================================

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("User address required for {0}")]
    MissingAddress(&'static str),

    #[error("Invalid transaction data: {0}")]
    InvalidPayload(String),

    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("Wallet error: {0}")]
    WalletKey(String),

    #[error("Intent classification failed: {0}")]
    Classifier(String),

    #[error("Blockchain RPC error: {0}")]
    Gateway(String),

    #[error("Blob storage error: {0}")]
    Storage(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Transaction execution failed: {0}")]
    Execution(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// Whether this error was caused by bad client input, as opposed to a
    /// collaborator or internal failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AgentError::MissingAddress(_)
                | AgentError::InvalidPayload(_)
                | AgentError::UnsupportedAction(_)
                | AgentError::WalletKey(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(AgentError::MissingAddress("transfers").is_client_error());
        assert!(AgentError::InvalidPayload("missing amount".into()).is_client_error());
        assert!(AgentError::WalletKey("bad key".into()).is_client_error());
        assert!(!AgentError::Gateway("rpc down".into()).is_client_error());
        assert!(!AgentError::Execution("dry run failed".into()).is_client_error());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = AgentError::Gateway("connection refused".into());
        assert_eq!(
            err.to_string(),
            "Blockchain RPC error: connection refused"
        );
    }
}
