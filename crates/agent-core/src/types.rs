//! ============================================================================
//! Core Types for the Sui Agent
//! ============================================================================
//! Defines all data structures for classified intents, dry-run previews,
//! transaction payloads, and contact records. These types are serialized to
//! JSON across the HTTP API.
//! ============================================================================

use serde::{Deserialize, Serialize};

/// Intent parsed from a natural-language message by the classifier.
/// Example: "Send 100 SUI to 0xabc"
/// -> { action: "transfer_token", parsed_data: { recipient: "0xabc", amount: "100", token: "SUI" } }
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub action: IntentAction,
    #[serde(default)]
    pub parsed_data: serde_json::Value,
    /// Classifier confidence in [0, 1]
    pub confidence: f32,
    /// Question to ask the user when the action is ambiguous
    #[serde(default)]
    pub clarification_question: Option<String>,
}

/// Supported intent actions.
/// The classifier emits upper-case action names; the API uses snake_case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentAction {
    #[serde(alias = "AMBIGUOUS")]
    Ambiguous,
    #[serde(alias = "GET_BALANCE")]
    GetBalance,
    #[serde(alias = "GET_STAKE_INFO")]
    GetStakeInfo,
    #[serde(alias = "STAKE_TOKEN")]
    StakeToken,
    #[serde(alias = "UNSTAKE_TOKEN")]
    UnstakeToken,
    #[serde(alias = "TRANSFER_TOKEN")]
    TransferToken,
    #[serde(alias = "CREATE_ADDRESS_BOOK")]
    CreateAddressBook,
    #[serde(alias = "SAVE_CONTACT")]
    SaveContact,
    #[serde(alias = "LIST_CONTACTS")]
    ListContacts,
    #[serde(alias = "UNKNOWN")]
    Unknown,
}

impl IntentAction {
    /// Parse an action name from the classifier, mapping anything
    /// unrecognized to `Unknown` rather than failing the request.
    pub fn parse_lenient(s: &str) -> Self {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .unwrap_or(IntentAction::Unknown)
    }
}

/// Tokens the agent can move, with their on-chain decimal exponents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TokenType {
    #[serde(rename = "SUI")]
    Sui,
    #[serde(rename = "USDC")]
    Usdc,
}

impl TokenType {
    /// Decimal exponent used when converting display amounts to base units.
    /// SUI amounts are in MIST (10^9), USDC in its 10^6 smallest unit.
    pub fn decimals(&self) -> u32 {
        match self {
            TokenType::Sui => 9,
            TokenType::Usdc => 6,
        }
    }

    /// Fully-qualified on-chain coin type tag.
    pub fn coin_type(&self) -> &'static str {
        match self {
            TokenType::Sui => "0x2::sui::SUI",
            TokenType::Usdc => {
                "0x5d4b302506645c37ff133b98c4b50a5ae14841659738d6d733d59d0d217a93bf::coin::COIN"
            }
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TokenType::Sui => "SUI",
            TokenType::Usdc => "USDC",
        }
    }

    /// Parse a token symbol, defaulting to SUI for anything unrecognized.
    pub fn parse_or_default(s: Option<&str>) -> Self {
        match s.map(|v| v.to_ascii_uppercase()) {
            Some(ref v) if v == "USDC" => TokenType::Usdc,
            _ => TokenType::Sui,
        }
    }
}

/// Three-tier risk classification for a prospective transaction.
/// Only `High` blocks unattended execution of transfers and stakes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Non-committal preview of a prospective transaction.
/// Derived per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DryRunSummary {
    pub action_description: String,
    pub risk_level: RiskLevel,
    /// Estimated gas fee in SUI
    pub estimated_gas_fee: f64,
}

/// Response to a /chat request.
/// `transaction_data` is present exactly when the action requires a
/// follow-up on-chain call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub intent: Intent,
    #[serde(default)]
    pub dry_run: Option<DryRunSummary>,
    pub ready_to_execute: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_data: Option<TransactionData>,
}

impl ChatResponse {
    /// Informational response with no transaction attached.
    pub fn info(intent: Intent, message: impl Into<String>) -> Self {
        Self {
            intent,
            dry_run: None,
            ready_to_execute: false,
            message: message.into(),
            transaction_data: None,
        }
    }
}

/// Typed transaction payload handed back to the client and later submitted
/// to /execute. Discriminated by the `action` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TransactionData {
    CreateAddressBook {
        transaction_type: String,
        target: String,
        arguments: Vec<serde_json::Value>,
        type_arguments: Vec<String>,
    },
    SaveContact {
        transaction_type: String,
        target: String,
        arguments: Vec<serde_json::Value>,
        type_arguments: Vec<String>,
        contact_key: String,
        contact_name: String,
    },
    StakeToken {
        /// Amount in base units, as a decimal string
        amount: String,
        token: TokenType,
    },
    UnstakeToken {
        amount: String,
        token: TokenType,
    },
    TransferToken {
        recipient: String,
        amount: String,
        token: TokenType,
    },
}

/// Result of executing (or building) a transaction.
/// When signing is deferred to the client, `success=true` reflects
/// successful construction, not on-chain finality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Move-call metadata produced by the gateway for client-signed calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveCall {
    pub transaction_type: String,
    pub target: String,
    pub arguments: Vec<serde_json::Value>,
    pub type_arguments: Vec<String>,
}

/// A user's on-chain address book object. Existence is queried per
/// request, never cached locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressBook {
    pub object_id: String,
}

/// Logical contact unit; stored encrypted off-chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactRecord {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub notes: String,
}

/// Balance snapshot for one token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceInfo {
    pub token: TokenType,
    /// Balance in base units
    pub balance: u128,
    pub balance_formatted: String,
}

/// Staked-amount snapshot for one token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeInfo {
    pub token: TokenType,
    /// Staked amount in base units
    pub staked_amount: u128,
    pub staked_amount_formatted: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_snake_case_round_trip() {
        let json = serde_json::to_string(&IntentAction::TransferToken).unwrap();
        assert_eq!(json, "\"transfer_token\"");
        let back: IntentAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, IntentAction::TransferToken);
    }

    #[test]
    fn test_action_accepts_classifier_uppercase() {
        let action: IntentAction = serde_json::from_str("\"TRANSFER_TOKEN\"").unwrap();
        assert_eq!(action, IntentAction::TransferToken);
        let action: IntentAction = serde_json::from_str("\"GET_BALANCE\"").unwrap();
        assert_eq!(action, IntentAction::GetBalance);
    }

    #[test]
    fn test_unrecognized_action_maps_to_unknown() {
        assert_eq!(
            IntentAction::parse_lenient("launch_rocket"),
            IntentAction::Unknown
        );
        assert_eq!(
            IntentAction::parse_lenient("STAKE_TOKEN"),
            IntentAction::StakeToken
        );
    }

    #[test]
    fn test_token_defaults_to_sui() {
        assert_eq!(TokenType::parse_or_default(None), TokenType::Sui);
        assert_eq!(TokenType::parse_or_default(Some("usdc")), TokenType::Usdc);
        assert_eq!(TokenType::parse_or_default(Some("DOGE")), TokenType::Sui);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_transaction_data_tagged_by_action() {
        let data = TransactionData::TransferToken {
            recipient: "0xabc".into(),
            amount: "100000000000".into(),
            token: TokenType::Sui,
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["action"], "transfer_token");
        assert_eq!(value["recipient"], "0xabc");
        assert_eq!(value["token"], "SUI");

        let back: TransactionData = serde_json::from_value(value).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_transaction_data_ignores_extra_fields() {
        // /execute payloads may carry a private_key alongside the action fields
        let raw = serde_json::json!({
            "action": "stake_token",
            "amount": "1000000000",
            "token": "SUI",
            "private_key": "deadbeef"
        });
        let data: TransactionData = serde_json::from_value(raw).unwrap();
        assert_eq!(
            data,
            TransactionData::StakeToken {
                amount: "1000000000".into(),
                token: TokenType::Sui,
            }
        );
    }
}
