//! ============================================================================
//! Seal Client - Contact Payload Encryption
//! ============================================================================
//! Contacts are encrypted per user before they leave the process. The
//! actual scheme lives in an external Seal key server; this client only
//! moves ciphertext back and forth over its HTTP API.
//! ============================================================================

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AgentError;
use crate::types::ContactRecord;

/// Encrypts and decrypts a user's contact set.
#[async_trait]
pub trait ContactCipher: Send + Sync {
    async fn encrypt_contacts(
        &self,
        user_address: &str,
        contacts: &[ContactRecord],
    ) -> Result<Vec<u8>, AgentError>;

    async fn decrypt_contacts(
        &self,
        user_address: &str,
        ciphertext: &[u8],
    ) -> Result<Vec<ContactRecord>, AgentError>;
}

/// Production cipher delegating to a Seal key server.
pub struct SealCipher {
    client: reqwest::Client,
    service_url: String,
}

impl SealCipher {
    pub fn new(service_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            service_url,
        }
    }

    async fn round_trip(
        &self,
        endpoint: &str,
        user_address: &str,
        payload: &[u8],
    ) -> Result<Vec<u8>, AgentError> {
        let url = format!("{}/v1/{}", self.service_url, endpoint);
        debug!("Seal {} for {} ({} bytes)", endpoint, user_address, payload.len());

        let request = SealRequest {
            identity: user_address.to_string(),
            payload: BASE64.encode(payload),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Encryption(format!("{endpoint} request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Encryption(format!(
                "{endpoint} error {status}: {body}"
            )));
        }

        let sealed: SealResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Encryption(format!("malformed {endpoint} response: {e}")))?;

        BASE64
            .decode(sealed.payload.as_bytes())
            .map_err(|e| AgentError::Encryption(format!("invalid {endpoint} payload: {e}")))
    }
}

#[async_trait]
impl ContactCipher for SealCipher {
    async fn encrypt_contacts(
        &self,
        user_address: &str,
        contacts: &[ContactRecord],
    ) -> Result<Vec<u8>, AgentError> {
        let plaintext = serde_json::to_vec(contacts)
            .map_err(|e| AgentError::Encryption(format!("serialize contacts: {e}")))?;
        self.round_trip("encrypt", user_address, &plaintext).await
    }

    async fn decrypt_contacts(
        &self,
        user_address: &str,
        ciphertext: &[u8],
    ) -> Result<Vec<ContactRecord>, AgentError> {
        let plaintext = self.round_trip("decrypt", user_address, ciphertext).await?;
        serde_json::from_slice(&plaintext)
            .map_err(|e| AgentError::Encryption(format!("decrypted payload not contacts: {e}")))
    }
}

#[derive(Serialize)]
struct SealRequest {
    identity: String,
    payload: String,
}

#[derive(Deserialize)]
struct SealResponse {
    payload: String,
}
