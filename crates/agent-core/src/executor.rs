//! ============================================================================
//! Transaction Executor - Dual-Path Execution
//! ============================================================================
//! Consumes a transaction payload from a prior dispatch and either:
//! - server-signed path: a private key arrived with the request, so build,
//!   sign and submit on behalf of the caller, or
//! - client-signing path: no key, so build the transaction and hand back
//!   hex-encoded bytes for an external wallet to sign.
//! Payload fields are validated before the gateway is contacted.
//! ============================================================================

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::amount::parse_base_units;
use crate::clients::BlockchainGateway;
use crate::error::AgentError;
use crate::types::{TokenType, TransactionData, TransactionResult};
use crate::wallet::WalletSigner;

/// Executes (or builds for client signing) previously dispatched
/// transaction payloads.
pub struct TransactionExecutor {
    gateway: Arc<dyn BlockchainGateway>,
}

impl TransactionExecutor {
    pub fn new(gateway: Arc<dyn BlockchainGateway>) -> Self {
        Self { gateway }
    }

    /// Execute the raw `transaction_data` value from an /execute request.
    /// The payload may carry a `private_key` alongside the action fields;
    /// its presence selects the server-signed path.
    pub async fn execute(
        &self,
        user_address: &str,
        transaction_data: &Value,
    ) -> Result<TransactionResult, AgentError> {
        let private_key = transaction_data
            .get("private_key")
            .and_then(Value::as_str)
            .map(str::to_string);
        info!(
            "Execute request: private key provided: {}",
            if private_key.is_some() { "yes" } else { "no" }
        );

        let payload = parse_payload(transaction_data)?;

        match payload {
            TransactionData::StakeToken { amount, token } => {
                let amount = required_amount(&amount)?;
                self.run(user_address, private_key, BuildRequest::Stake { amount, token })
                    .await
            }
            TransactionData::UnstakeToken { amount, token } => {
                let amount = required_amount(&amount)?;
                self.run(
                    user_address,
                    private_key,
                    BuildRequest::Unstake { amount, token },
                )
                .await
            }
            TransactionData::TransferToken {
                recipient,
                amount,
                token,
            } => {
                if recipient.trim().is_empty() {
                    return Err(AgentError::InvalidPayload(
                        "Missing recipient address in transaction data".into(),
                    ));
                }
                let amount = required_amount(&amount)?;
                self.run(
                    user_address,
                    private_key,
                    BuildRequest::Transfer {
                        recipient,
                        amount,
                        token,
                    },
                )
                .await
            }
            // Address-book payloads are signed client-side by design.
            TransactionData::CreateAddressBook { .. } => {
                Err(AgentError::UnsupportedAction("create_address_book".into()))
            }
            TransactionData::SaveContact { .. } => {
                Err(AgentError::UnsupportedAction("save_contact".into()))
            }
        }
    }

    async fn run(
        &self,
        user_address: &str,
        private_key: Option<String>,
        request: BuildRequest,
    ) -> Result<TransactionResult, AgentError> {
        match private_key {
            Some(key) => self.execute_signed(&key, request).await,
            None => self.build_for_client(user_address, request).await,
        }
    }

    /// Server-signed path: sign with the supplied key and submit.
    async fn execute_signed(
        &self,
        private_key: &str,
        request: BuildRequest,
    ) -> Result<TransactionResult, AgentError> {
        let signer = WalletSigner::from_private_key(private_key)?;
        info!("Executing {} as {}", request.label(), signer.address());

        let tx_bytes = self.build(signer.address(), &request).await?;
        let signature = signer.sign_transaction(&tx_bytes);

        let result = self.gateway.submit(&tx_bytes, &signature).await?;
        if result.success {
            info!(
                "{} succeeded, digest: {:?}",
                request.label(),
                result.transaction_digest
            );
            Ok(result)
        } else {
            let detail = result.error.unwrap_or_else(|| "unknown failure".into());
            warn!("{} failed: {}", request.label(), detail);
            Err(AgentError::Execution(detail))
        }
    }

    /// Client-signing path: build only, return hex bytes for an external
    /// wallet. Success here means construction succeeded, nothing more.
    async fn build_for_client(
        &self,
        user_address: &str,
        request: BuildRequest,
    ) -> Result<TransactionResult, AgentError> {
        info!(
            "No private key, building {} for client-side signing",
            request.label()
        );
        let tx_bytes = self.build(user_address, &request).await?;

        Ok(TransactionResult {
            success: true,
            transaction_digest: None,
            effects: Some(json!({
                "status": "ready_for_signing",
                "transaction_bytes": hex::encode(&tx_bytes),
                "message": format!(
                    "{} transaction built. Sign with your wallet to execute.",
                    request.label()
                ),
            })),
            error: None,
        })
    }

    async fn build(&self, sender: &str, request: &BuildRequest) -> Result<Vec<u8>, AgentError> {
        match request {
            BuildRequest::Stake { amount, token } => {
                self.gateway.build_stake_tx(sender, *amount, *token).await
            }
            BuildRequest::Unstake { amount, token } => {
                self.gateway.build_unstake_tx(sender, *amount, *token).await
            }
            BuildRequest::Transfer {
                recipient,
                amount,
                token,
            } => {
                self.gateway
                    .build_transfer_tx(sender, recipient, *amount, *token)
                    .await
            }
        }
    }
}

/// The three executable transaction shapes after validation.
enum BuildRequest {
    Stake {
        amount: u128,
        token: TokenType,
    },
    Unstake {
        amount: u128,
        token: TokenType,
    },
    Transfer {
        recipient: String,
        amount: u128,
        token: TokenType,
    },
}

impl BuildRequest {
    fn label(&self) -> &'static str {
        match self {
            BuildRequest::Stake { .. } => "Stake",
            BuildRequest::Unstake { .. } => "Unstake",
            BuildRequest::Transfer { .. } => "Transfer",
        }
    }
}

fn parse_payload(transaction_data: &Value) -> Result<TransactionData, AgentError> {
    let action = transaction_data
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::InvalidPayload("missing action".into()))?;

    serde_json::from_value(transaction_data.clone()).map_err(|e| {
        // Distinguish an unknown action from a known action with bad fields.
        if KNOWN_ACTIONS.contains(&action) {
            AgentError::InvalidPayload(e.to_string())
        } else {
            AgentError::UnsupportedAction(action.to_string())
        }
    })
}

const KNOWN_ACTIONS: &[&str] = &[
    "create_address_book",
    "save_contact",
    "stake_token",
    "unstake_token",
    "transfer_token",
];

fn required_amount(amount: &str) -> Result<u128, AgentError> {
    if amount.trim().is_empty() {
        return Err(AgentError::InvalidPayload(
            "Missing amount in transaction data".into(),
        ));
    }
    parse_base_units(amount)
}
