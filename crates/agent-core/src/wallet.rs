//! ============================================================================
//! Wallet Signer - Server-Side Transaction Signing
//! ============================================================================
//! Builds an ed25519 signer from a caller-supplied private key, derives the
//! matching Sui address, and produces Sui-serialized signatures over
//! transaction bytes. Only used on the server-signed execution path; the
//! default flow returns unsigned bytes for client-side wallets.
//! ============================================================================

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{Signer, SigningKey};

use crate::error::AgentError;

type Blake2b256 = Blake2b<U32>;

/// Signature scheme flag for ed25519 in Sui's serialized signature format.
const ED25519_FLAG: u8 = 0x00;

/// Intent prefix for user transaction data (scope, version, app id).
const TX_INTENT_PREFIX: [u8; 3] = [0, 0, 0];

/// Holds a private key for the duration of one /execute request.
pub struct WalletSigner {
    signing_key: SigningKey,
    address: String,
}

impl WalletSigner {
    /// Construct a signer from a hex or base64 encoded 32-byte ed25519
    /// seed. Base64 keys may carry a leading scheme flag byte, as exported
    /// by Sui wallets.
    pub fn from_private_key(private_key: &str) -> Result<Self, AgentError> {
        let key = private_key.trim();
        let bytes = decode_key_material(key)?;

        let mut seed = [0u8; 32];
        match bytes.len() {
            32 => seed.copy_from_slice(&bytes),
            33 if bytes[0] == ED25519_FLAG => seed.copy_from_slice(&bytes[1..]),
            other => {
                return Err(AgentError::WalletKey(format!(
                    "expected a 32-byte ed25519 key, got {other} bytes"
                )))
            }
        }

        let signing_key = SigningKey::from_bytes(&seed);
        let address = derive_address(&signing_key);

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// The Sui address derived from this key.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sign transaction bytes, returning the serialized signature
    /// (flag || signature || public key) in base64 as the RPC expects.
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
        let mut message = Vec::with_capacity(TX_INTENT_PREFIX.len() + tx_bytes.len());
        message.extend_from_slice(&TX_INTENT_PREFIX);
        message.extend_from_slice(tx_bytes);

        let digest = Blake2b256::digest(&message);
        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(self.signing_key.verifying_key().as_bytes());
        BASE64.encode(serialized)
    }
}

/// Sui address: 0x-prefixed Blake2b-256 of (scheme flag || public key).
fn derive_address(signing_key: &SigningKey) -> String {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(signing_key.verifying_key().as_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

fn decode_key_material(key: &str) -> Result<Vec<u8>, AgentError> {
    let hex_candidate = key.strip_prefix("0x").unwrap_or(key);
    if hex_candidate.len() == 64 && hex_candidate.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(hex_candidate)
            .map_err(|e| AgentError::WalletKey(format!("invalid hex key: {e}")));
    }

    BASE64
        .decode(key.as_bytes())
        .map_err(|_| AgentError::WalletKey("key is neither valid hex nor base64".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED_HEX: &str =
        "0101010101010101010101010101010101010101010101010101010101010101";

    #[test]
    fn test_from_hex_key() {
        let signer = WalletSigner::from_private_key(TEST_SEED_HEX).unwrap();
        assert!(signer.address().starts_with("0x"));
        // 0x prefix + 32 bytes of hex
        assert_eq!(signer.address().len(), 2 + 64);
    }

    #[test]
    fn test_hex_prefix_accepted() {
        let plain = WalletSigner::from_private_key(TEST_SEED_HEX).unwrap();
        let prefixed =
            WalletSigner::from_private_key(&format!("0x{TEST_SEED_HEX}")).unwrap();
        assert_eq!(plain.address(), prefixed.address());
    }

    #[test]
    fn test_base64_key_with_flag_byte() {
        let mut flagged = vec![ED25519_FLAG];
        flagged.extend_from_slice(&[1u8; 32]);
        let encoded = BASE64.encode(&flagged);

        let from_b64 = WalletSigner::from_private_key(&encoded).unwrap();
        let from_hex = WalletSigner::from_private_key(TEST_SEED_HEX).unwrap();
        assert_eq!(from_b64.address(), from_hex.address());
    }

    #[test]
    fn test_malformed_key_rejected() {
        assert!(WalletSigner::from_private_key("not-a-key").is_err());
        assert!(WalletSigner::from_private_key("0x1234").is_err());
        // Valid base64 of the wrong length
        assert!(WalletSigner::from_private_key(&BASE64.encode([1u8; 16])).is_err());
    }

    #[test]
    fn test_signature_format() {
        let signer = WalletSigner::from_private_key(TEST_SEED_HEX).unwrap();
        let signature = signer.sign_transaction(b"tx-bytes");
        let decoded = BASE64.decode(signature.as_bytes()).unwrap();
        // flag + 64-byte signature + 32-byte public key
        assert_eq!(decoded.len(), 97);
        assert_eq!(decoded[0], ED25519_FLAG);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = WalletSigner::from_private_key(TEST_SEED_HEX).unwrap();
        assert_eq!(
            signer.sign_transaction(b"tx-bytes"),
            signer.sign_transaction(b"tx-bytes")
        );
        assert_ne!(
            signer.sign_transaction(b"tx-bytes"),
            signer.sign_transaction(b"other-bytes")
        );
    }
}
