//! ============================================================================
//! Clients Module - External Collaborators
//! ============================================================================
//! One client per external system the agent depends on:
//! - OpenAiClassifier: natural-language intent parsing + dry-run summaries
//! - SuiRpcGateway: chain reads, transaction building, submission
//! - WalrusStore: content-addressed blob storage
//! - SealCipher: contact payload encryption
//! Each client sits behind a trait so the orchestration core can be tested
//! against deterministic fakes.
//! ============================================================================

mod classifier;
mod seal;
mod sui;
mod walrus;

pub use classifier::{mist_to_sui, IntentClassifier, OpenAiClassifier};
pub use seal::{ContactCipher, SealCipher};
pub use sui::{BlockchainGateway, SuiRpcGateway};
pub use walrus::{BlobStore, WalrusStore};
