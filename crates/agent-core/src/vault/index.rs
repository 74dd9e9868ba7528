//! ============================================================================
//! Vault Index - User to Blob-Id Mapping
//! ============================================================================
//! Tracks the single most-recent contact blob per user. The in-memory
//! implementation is the only one shipped: entries vanish on process
//! restart, which is an accepted limitation of the off-chain contact MVP.
//! ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AgentError;

/// Key-value mapping from user address to the id of their latest contact
/// blob. Swapped wholesale on each save, never appended to.
#[async_trait]
pub trait VaultIndex: Send + Sync {
    async fn get(&self, user_address: &str) -> Result<Option<String>, AgentError>;

    async fn put(&self, user_address: &str, blob_id: String) -> Result<(), AgentError>;
}

/// Process-local index. NOT persistent: a restart forgets every mapping.
#[derive(Default)]
pub struct InMemoryVaultIndex {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryVaultIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VaultIndex for InMemoryVaultIndex {
    async fn get(&self, user_address: &str) -> Result<Option<String>, AgentError> {
        Ok(self.entries.read().await.get(user_address).cloned())
    }

    async fn put(&self, user_address: &str, blob_id: String) -> Result<(), AgentError> {
        self.entries
            .write()
            .await
            .insert(user_address.to_string(), blob_id);
        Ok(())
    }
}
