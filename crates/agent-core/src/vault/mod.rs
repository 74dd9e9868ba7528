//! ============================================================================
//! Contact Vault - Encrypted Off-Chain Contact Book
//! ============================================================================
//! Maps each user to their single most-recent encrypted contact blob.
//! Saving merges the new record into the full existing set and rewrites
//! the blob wholesale; the index then swaps to the new blob id and the old
//! blob is left unreferenced. Saves are serialized per user so concurrent
//! writers cannot lose each other's records.
//! ============================================================================

mod index;

pub use index::{InMemoryVaultIndex, VaultIndex};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::clients::{BlobStore, ContactCipher};
use crate::error::AgentError;
use crate::types::ContactRecord;

pub struct ContactVault {
    cipher: Arc<dyn ContactCipher>,
    store: Arc<dyn BlobStore>,
    index: Arc<dyn VaultIndex>,
    /// One lock per user, held across the download-merge-upload sequence.
    save_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ContactVault {
    pub fn new(
        cipher: Arc<dyn ContactCipher>,
        store: Arc<dyn BlobStore>,
        index: Arc<dyn VaultIndex>,
    ) -> Self {
        Self {
            cipher,
            store,
            index,
            save_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, user_address: &str) -> Arc<Mutex<()>> {
        let mut locks = self.save_locks.lock().await;
        locks
            .entry(user_address.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Append one record to the user's contact set. The resulting blob
    /// holds the union of everything previously saved plus the new record;
    /// saving the same contact twice produces two records.
    pub async fn save(
        &self,
        user_address: &str,
        record: ContactRecord,
    ) -> Result<String, AgentError> {
        let user_lock = self.lock_for(user_address).await;
        let _guard = user_lock.lock().await;

        let mut contacts = match self.index.get(user_address).await? {
            Some(blob_id) => {
                debug!("Merging into existing contact blob {}", blob_id);
                let encrypted = self.store.download(&blob_id).await?;
                self.cipher
                    .decrypt_contacts(user_address, &encrypted)
                    .await?
            }
            None => Vec::new(),
        };
        contacts.push(record);

        let encrypted = self
            .cipher
            .encrypt_contacts(user_address, &contacts)
            .await?;
        let blob_id = self.store.upload(encrypted).await?;

        self.index.put(user_address, blob_id.clone()).await?;
        info!(
            "Saved contact set for {} ({} records) as blob {}",
            user_address,
            contacts.len(),
            blob_id
        );
        Ok(blob_id)
    }

    /// All saved records for the user; an empty collection when nothing
    /// has been saved, never an error.
    pub async fn list(&self, user_address: &str) -> Result<Vec<ContactRecord>, AgentError> {
        let blob_id = match self.index.get(user_address).await? {
            Some(blob_id) => blob_id,
            None => return Ok(Vec::new()),
        };

        let encrypted = self.store.download(&blob_id).await?;
        self.cipher.decrypt_contacts(user_address, &encrypted).await
    }
}
