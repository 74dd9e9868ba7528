//! ============================================================================
//! AGENT-CORE: Intent-to-Transaction Orchestration for Sui
//! ============================================================================
//! This crate handles all backend logic for the Sui Agent:
//! - Intent classification via an OpenAI-compatible API
//! - Action dispatch with dry-run previews and risk gating
//! - Dual-path transaction execution (server-signed or client-signed)
//! - Encrypted off-chain contact vault (Seal + Walrus)
//! ============================================================================

pub mod amount;
pub mod clients;
pub mod config;
pub mod dispatch;
pub mod dry_run;
pub mod error;
pub mod executor;
pub mod types;
pub mod vault;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use clients::{
    BlobStore, BlockchainGateway, ContactCipher, IntentClassifier, OpenAiClassifier, SealCipher,
    SuiRpcGateway, WalrusStore,
};
pub use config::Settings;
pub use dispatch::ActionDispatcher;
pub use dry_run::DryRunBuilder;
pub use error::AgentError;
pub use executor::TransactionExecutor;
pub use types::*;
pub use vault::{ContactVault, InMemoryVaultIndex, VaultIndex};
pub use wallet::WalletSigner;
