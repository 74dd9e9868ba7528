//! ============================================================================
//! Sui Gateway - JSON-RPC Blockchain Access
//! ============================================================================
//! All chain reads and transaction construction go through the fullnode
//! JSON-RPC API:
//! - Balance / stake queries
//! - Gas estimation from the reference gas price
//! - Address-book object lookups
//! - Transaction building (unsafe_* endpoints return BCS tx bytes)
//! - Signed transaction submission
//! ============================================================================

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::amount::format_base_units;
use crate::config::Settings;
use crate::error::AgentError;
use crate::types::{
    AddressBook, BalanceInfo, MoveCall, StakeInfo, TokenType, TransactionResult,
};

/// Gas budget attached to built transactions, in MIST.
const DEFAULT_GAS_BUDGET: u64 = 10_000_000;

/// Gas units assumed when estimating a fee from the reference gas price.
const ESTIMATE_GAS_UNITS: u64 = 5_000;

/// Read and build operations against the chain.
#[async_trait]
pub trait BlockchainGateway: Send + Sync {
    async fn get_balance(&self, address: &str, token: TokenType)
        -> Result<BalanceInfo, AgentError>;

    async fn get_stake(&self, address: &str, token: TokenType) -> Result<StakeInfo, AgentError>;

    /// Estimated gas fee for a typical agent transaction, in MIST.
    async fn estimate_gas_fee(&self) -> Result<u64, AgentError>;

    /// The user's address-book object, if one has been created.
    async fn get_address_book(&self, owner: &str) -> Result<Option<AddressBook>, AgentError>;

    /// Move-call metadata for creating an address book (client-signed).
    fn create_address_book_call(&self) -> MoveCall;

    /// Move-call metadata for adding an encrypted contact (client-signed).
    fn add_contact_call(
        &self,
        address_book_id: &str,
        contact_key: &str,
        encrypted_data: &[u8],
        nonce: &[u8],
        timestamp: i64,
    ) -> MoveCall;

    async fn build_transfer_tx(
        &self,
        sender: &str,
        recipient: &str,
        amount: u128,
        token: TokenType,
    ) -> Result<Vec<u8>, AgentError>;

    async fn build_stake_tx(
        &self,
        sender: &str,
        amount: u128,
        token: TokenType,
    ) -> Result<Vec<u8>, AgentError>;

    async fn build_unstake_tx(
        &self,
        sender: &str,
        amount: u128,
        token: TokenType,
    ) -> Result<Vec<u8>, AgentError>;

    /// Submit signed transaction bytes and wait for local execution.
    async fn submit(&self, tx_bytes: &[u8], signature: &str)
        -> Result<TransactionResult, AgentError>;
}

/// Production gateway talking to a Sui fullnode.
pub struct SuiRpcGateway {
    client: reqwest::Client,
    rpc_url: String,
    settings: Settings,
}

impl SuiRpcGateway {
    pub fn new(settings: Settings) -> Self {
        info!(
            "Initializing Sui gateway for {} at {}",
            settings.sui_network, settings.sui_rpc_url
        );
        Self {
            client: reqwest::Client::new(),
            rpc_url: settings.sui_rpc_url.clone(),
            settings,
        }
    }

    /// Issue one JSON-RPC 2.0 call and deserialize its `result`.
    async fn rpc_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, AgentError> {
        debug!("RPC {} {}", method, params);

        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Gateway(format!("{method}: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AgentError::Gateway(format!("{method}: HTTP {status}: {text}")));
        }

        let envelope: RpcEnvelope<T> = response
            .json()
            .await
            .map_err(|e| AgentError::Gateway(format!("{method}: malformed response: {e}")))?;

        if let Some(err) = envelope.error {
            return Err(AgentError::Gateway(format!(
                "{method}: RPC error {}: {}",
                err.code, err.message
            )));
        }

        envelope
            .result
            .ok_or_else(|| AgentError::Gateway(format!("{method}: empty result")))
    }

    /// Select coin object ids for the sender covering at least `amount`.
    async fn select_coins(
        &self,
        owner: &str,
        token: TokenType,
        amount: u128,
    ) -> Result<Vec<String>, AgentError> {
        let page: CoinPage = self
            .rpc_call(
                "suix_getCoins",
                json!([owner, token.coin_type(), null, 50]),
            )
            .await?;

        let mut selected = Vec::new();
        let mut covered: u128 = 0;
        for coin in page.data {
            let balance: u128 = coin.balance.parse().unwrap_or(0);
            covered += balance;
            selected.push(coin.coin_object_id);
            if covered >= amount {
                return Ok(selected);
            }
        }

        Err(AgentError::Gateway(format!(
            "insufficient {} coins: need {}, have {}",
            token.symbol(),
            amount,
            covered
        )))
    }

    /// Decode the base64 `txBytes` returned by the unsafe_* builders.
    fn decode_tx_bytes(built: TransactionBlockBytes) -> Result<Vec<u8>, AgentError> {
        BASE64
            .decode(built.tx_bytes.as_bytes())
            .map_err(|e| AgentError::Gateway(format!("invalid txBytes encoding: {e}")))
    }
}

#[async_trait]
impl BlockchainGateway for SuiRpcGateway {
    async fn get_balance(
        &self,
        address: &str,
        token: TokenType,
    ) -> Result<BalanceInfo, AgentError> {
        let raw: RawBalance = self
            .rpc_call("suix_getBalance", json!([address, token.coin_type()]))
            .await?;

        let balance: u128 = raw
            .total_balance
            .parse()
            .map_err(|_| AgentError::Gateway("non-numeric totalBalance".into()))?;

        Ok(BalanceInfo {
            token,
            balance,
            balance_formatted: format_base_units(balance, token.decimals()),
        })
    }

    async fn get_stake(&self, address: &str, token: TokenType) -> Result<StakeInfo, AgentError> {
        // The staking pool keeps per-user positions in a dynamic field
        // table keyed by address; a missing field means nothing staked.
        let result: Result<DynamicFieldObject, AgentError> = self
            .rpc_call(
                "suix_getDynamicFieldObject",
                json!([
                    self.settings.stake_pool_object_id.clone(),
                    { "type": "address", "value": address }
                ]),
            )
            .await;

        let staked_amount = match result {
            Ok(field) => field
                .data
                .and_then(|d| d.content)
                .and_then(|c| c.fields.get("value").cloned())
                .and_then(|v| match v {
                    Value::String(s) => s.parse::<u128>().ok(),
                    Value::Number(n) => n.as_u64().map(u128::from),
                    _ => None,
                })
                .unwrap_or(0),
            Err(e) => {
                debug!("No stake position found for {}: {}", address, e);
                0
            }
        };

        Ok(StakeInfo {
            token,
            staked_amount,
            staked_amount_formatted: format_base_units(staked_amount, token.decimals()),
        })
    }

    async fn estimate_gas_fee(&self) -> Result<u64, AgentError> {
        let price: Value = self
            .rpc_call("suix_getReferenceGasPrice", json!([]))
            .await?;

        let price = match price {
            Value::String(s) => s.parse::<u64>().unwrap_or(1_000),
            Value::Number(n) => n.as_u64().unwrap_or(1_000),
            _ => 1_000,
        };

        Ok(price.saturating_mul(ESTIMATE_GAS_UNITS))
    }

    async fn get_address_book(&self, owner: &str) -> Result<Option<AddressBook>, AgentError> {
        let page: OwnedObjectPage = self
            .rpc_call(
                "suix_getOwnedObjects",
                json!([
                    owner,
                    {
                        "filter": { "StructType": self.settings.address_book_struct_type() },
                        "options": { "showType": true }
                    },
                    null,
                    1
                ]),
            )
            .await?;

        Ok(page
            .data
            .into_iter()
            .filter_map(|o| o.data)
            .next()
            .map(|d| AddressBook {
                object_id: d.object_id,
            }))
    }

    fn create_address_book_call(&self) -> MoveCall {
        MoveCall {
            transaction_type: "moveCall".to_string(),
            target: self.settings.address_book_create_target(),
            arguments: vec![],
            type_arguments: vec![],
        }
    }

    fn add_contact_call(
        &self,
        address_book_id: &str,
        contact_key: &str,
        encrypted_data: &[u8],
        nonce: &[u8],
        timestamp: i64,
    ) -> MoveCall {
        MoveCall {
            transaction_type: "moveCall".to_string(),
            target: self.settings.address_book_add_contact_target(),
            arguments: vec![
                json!(address_book_id),
                json!(contact_key),
                json!(BASE64.encode(encrypted_data)),
                json!(BASE64.encode(nonce)),
                json!(timestamp),
            ],
            type_arguments: vec![],
        }
    }

    async fn build_transfer_tx(
        &self,
        sender: &str,
        recipient: &str,
        amount: u128,
        token: TokenType,
    ) -> Result<Vec<u8>, AgentError> {
        let coins = self.select_coins(sender, token, amount).await?;

        let built: TransactionBlockBytes = match token {
            TokenType::Sui => {
                self.rpc_call(
                    "unsafe_paySui",
                    json!([
                        sender,
                        coins,
                        [recipient],
                        [amount.to_string()],
                        DEFAULT_GAS_BUDGET.to_string()
                    ]),
                )
                .await?
            }
            TokenType::Usdc => {
                self.rpc_call(
                    "unsafe_pay",
                    json!([
                        sender,
                        coins,
                        [recipient],
                        [amount.to_string()],
                        null,
                        DEFAULT_GAS_BUDGET.to_string()
                    ]),
                )
                .await?
            }
        };

        Self::decode_tx_bytes(built)
    }

    async fn build_stake_tx(
        &self,
        sender: &str,
        amount: u128,
        token: TokenType,
    ) -> Result<Vec<u8>, AgentError> {
        let coins = self.select_coins(sender, token, amount).await?;
        let coin = coins
            .first()
            .ok_or_else(|| AgentError::Gateway("no coin available to stake".into()))?;

        let built: TransactionBlockBytes = self
            .rpc_call(
                "unsafe_moveCall",
                json!([
                    sender,
                    self.settings.stake_package_id.clone(),
                    self.settings.stake_module.clone(),
                    "stake",
                    [token.coin_type()],
                    [
                        self.settings.stake_pool_object_id.clone(),
                        coin.clone(),
                        amount.to_string()
                    ],
                    null,
                    DEFAULT_GAS_BUDGET.to_string()
                ]),
            )
            .await?;

        Self::decode_tx_bytes(built)
    }

    async fn build_unstake_tx(
        &self,
        sender: &str,
        amount: u128,
        token: TokenType,
    ) -> Result<Vec<u8>, AgentError> {
        let built: TransactionBlockBytes = self
            .rpc_call(
                "unsafe_moveCall",
                json!([
                    sender,
                    self.settings.stake_package_id.clone(),
                    self.settings.stake_module.clone(),
                    "unstake",
                    [token.coin_type()],
                    [
                        self.settings.stake_pool_object_id.clone(),
                        amount.to_string()
                    ],
                    null,
                    DEFAULT_GAS_BUDGET.to_string()
                ]),
            )
            .await?;

        Self::decode_tx_bytes(built)
    }

    async fn submit(
        &self,
        tx_bytes: &[u8],
        signature: &str,
    ) -> Result<TransactionResult, AgentError> {
        let response: ExecutionResponse = self
            .rpc_call(
                "sui_executeTransactionBlock",
                json!([
                    BASE64.encode(tx_bytes),
                    [signature],
                    { "showEffects": true },
                    "WaitForLocalExecution"
                ]),
            )
            .await?;

        let status = response
            .effects
            .as_ref()
            .and_then(|e| e.get("status"))
            .and_then(|s| s.get("status"))
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        if status == "success" {
            info!("Transaction executed: {}", response.digest);
            Ok(TransactionResult {
                success: true,
                transaction_digest: Some(response.digest),
                effects: response.effects,
                error: None,
            })
        } else {
            let error = response
                .effects
                .as_ref()
                .and_then(|e| e.get("status"))
                .and_then(|s| s.get("error"))
                .and_then(|s| s.as_str())
                .unwrap_or("execution failed on-chain")
                .to_string();
            warn!("Transaction {} failed: {}", response.digest, error);
            Ok(TransactionResult {
                success: false,
                transaction_digest: Some(response.digest),
                effects: response.effects,
                error: Some(error),
            })
        }
    }
}

// ============================================================================
// Wire types for the fullnode JSON-RPC API
// ============================================================================

#[derive(Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RawBalance {
    #[serde(rename = "totalBalance")]
    total_balance: String,
}

#[derive(Deserialize)]
struct CoinPage {
    data: Vec<CoinObject>,
}

#[derive(Deserialize)]
struct CoinObject {
    #[serde(rename = "coinObjectId")]
    coin_object_id: String,
    balance: String,
}

#[derive(Deserialize)]
struct OwnedObjectPage {
    data: Vec<OwnedObject>,
}

#[derive(Deserialize)]
struct OwnedObject {
    data: Option<ObjectData>,
}

#[derive(Deserialize)]
struct ObjectData {
    #[serde(rename = "objectId")]
    object_id: String,
}

#[derive(Deserialize)]
struct DynamicFieldObject {
    data: Option<DynamicFieldData>,
}

#[derive(Deserialize)]
struct DynamicFieldData {
    content: Option<MoveContent>,
}

#[derive(Deserialize)]
struct MoveContent {
    #[serde(default)]
    fields: serde_json::Map<String, Value>,
}

#[derive(Deserialize)]
struct TransactionBlockBytes {
    #[serde(rename = "txBytes")]
    tx_bytes: String,
}

#[derive(Deserialize)]
struct ExecutionResponse {
    digest: String,
    #[serde(default)]
    effects: Option<Value>,
}
