//! ============================================================================
//! Walrus Client - Content-Addressed Blob Storage
//! ============================================================================
//! Uploads go to the publisher, downloads come from the aggregator. Blobs
//! are opaque bytes; the returned blob id is the content address.
//! ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AgentError;

/// Number of storage epochs requested for each uploaded blob.
const STORE_EPOCHS: u32 = 5;

/// Content-addressed storage for opaque byte blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload bytes, returning the blob id.
    async fn upload(&self, bytes: Vec<u8>) -> Result<String, AgentError>;

    /// Download a blob by id.
    async fn download(&self, blob_id: &str) -> Result<Vec<u8>, AgentError>;
}

/// Production store backed by a Walrus publisher/aggregator pair.
pub struct WalrusStore {
    client: reqwest::Client,
    publisher_url: String,
    aggregator_url: String,
}

impl WalrusStore {
    pub fn new(publisher_url: String, aggregator_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            publisher_url,
            aggregator_url,
        }
    }
}

#[async_trait]
impl BlobStore for WalrusStore {
    async fn upload(&self, bytes: Vec<u8>) -> Result<String, AgentError> {
        let url = format!("{}/v1/blobs?epochs={}", self.publisher_url, STORE_EPOCHS);
        debug!("Uploading {} bytes to Walrus", bytes.len());

        let response = self
            .client
            .put(&url)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AgentError::Storage(format!("upload failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Storage(format!(
                "publisher error {status}: {body}"
            )));
        }

        let stored: StoreResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Storage(format!("malformed publisher response: {e}")))?;

        let blob_id = stored
            .blob_id()
            .ok_or_else(|| AgentError::Storage("publisher response missing blob id".into()))?;
        info!("Blob stored: {}", blob_id);
        Ok(blob_id)
    }

    async fn download(&self, blob_id: &str) -> Result<Vec<u8>, AgentError> {
        let url = format!("{}/v1/blobs/{}", self.aggregator_url, blob_id);
        debug!("Downloading blob {}", blob_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AgentError::Storage(format!("download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AgentError::Storage(format!(
                "aggregator error {} for blob {}",
                response.status(),
                blob_id
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AgentError::Storage(format!("download body error: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// The publisher reports either a newly created blob or one that was
/// already certified in a previous epoch.
#[derive(Deserialize)]
struct StoreResponse {
    #[serde(rename = "newlyCreated")]
    newly_created: Option<NewlyCreated>,
    #[serde(rename = "alreadyCertified")]
    already_certified: Option<AlreadyCertified>,
}

impl StoreResponse {
    fn blob_id(self) -> Option<String> {
        if let Some(created) = self.newly_created {
            return Some(created.blob_object.blob_id);
        }
        self.already_certified.map(|c| c.blob_id)
    }
}

#[derive(Deserialize)]
struct NewlyCreated {
    #[serde(rename = "blobObject")]
    blob_object: BlobObject,
}

#[derive(Deserialize)]
struct BlobObject {
    #[serde(rename = "blobId")]
    blob_id: String,
}

#[derive(Deserialize)]
struct AlreadyCertified {
    #[serde(rename = "blobId")]
    blob_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_response_newly_created() {
        let response: StoreResponse = serde_json::from_str(
            r#"{"newlyCreated":{"blobObject":{"blobId":"abc123","size":42}}}"#,
        )
        .unwrap();
        assert_eq!(response.blob_id().unwrap(), "abc123");
    }

    #[test]
    fn test_store_response_already_certified() {
        let response: StoreResponse = serde_json::from_str(
            r#"{"alreadyCertified":{"blobId":"xyz789","eventOrObject":"Event"}}"#,
        )
        .unwrap();
        assert_eq!(response.blob_id().unwrap(), "xyz789");
    }

    #[test]
    fn test_store_response_empty() {
        let response: StoreResponse = serde_json::from_str("{}").unwrap();
        assert!(response.blob_id().is_none());
    }
}
