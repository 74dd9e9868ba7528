//! ============================================================================
//! Intent Classifier - Natural Language Parsing via Chat-Completions API
//! ============================================================================
//! Turns a user message into a structured Intent, and composes dry-run
//! summaries for prospective transactions. The model is instructed to
//! respond with strict JSON; anything it cannot classify comes back as an
//! Unknown intent rather than an error.
//! ============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::types::{DryRunSummary, Intent, IntentAction, RiskLevel};

const INTENT_SYSTEM_PROMPT: &str = r#"You are an intent parser for a Sui blockchain wallet agent.
Classify the user's message into exactly one action:
AMBIGUOUS, GET_BALANCE, GET_STAKE_INFO, STAKE_TOKEN, UNSTAKE_TOKEN,
TRANSFER_TOKEN, CREATE_ADDRESS_BOOK, SAVE_CONTACT, LIST_CONTACTS, UNKNOWN.

Respond with ONLY a JSON object, no prose:
{"action": "...", "parsed_data": {...}, "confidence": 0.0-1.0, "clarification_question": null}

parsed_data fields per action:
- TRANSFER_TOKEN: recipient, amount, token (SUI or USDC), is_contact_name (bool)
- STAKE_TOKEN / UNSTAKE_TOKEN: amount, token
- GET_BALANCE / GET_STAKE_INFO: token
- SAVE_CONTACT: contact_key, contact_name, contact_address, notes
- AMBIGUOUS: set clarification_question to what you need to know"#;

const DRY_RUN_SYSTEM_PROMPT: &str = r#"You summarize prospective Sui blockchain transactions.
Given the action and its fields, respond with ONLY a JSON object:
{"action_description": "<one short sentence, e.g. 'send 100 SUI to 0xabc'>",
 "risk_level": "low" | "medium" | "high"}
Consider the amount relative to the sender's balance and whether the
recipient looks novel when choosing the risk level."#;

/// Classifies natural-language messages into structured intents.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Parse one message into an Intent. Called once per /chat request;
    /// the returned Intent is immutable afterward.
    async fn classify(
        &self,
        message: &str,
        user_address: Option<&str>,
    ) -> Result<Intent, AgentError>;

    /// Compose a dry-run preview for a prospective transaction. The model
    /// supplies the description and risk level; the gas estimate is
    /// passed through in MIST and reported in SUI.
    async fn dry_run_summary(
        &self,
        action: &str,
        fields: &serde_json::Value,
        sender_balance: u128,
        estimated_gas_mist: u64,
    ) -> Result<DryRunSummary, AgentError>;
}

/// Production classifier speaking the OpenAI chat-completions protocol.
pub struct OpenAiClassifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    /// Call the chat-completions API and return the raw message content.
    async fn call_api(&self, system: &str, user: &str) -> Result<String, AgentError> {
        debug!("Calling classifier API with {} chars", user.len());

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(0.0),
            max_tokens: Some(512),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Classifier(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Classifier(format!(
                "API error {status}: {body}"
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Classifier(format!("malformed response: {e}")))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| AgentError::Classifier("empty completion".into()))
    }
}

#[async_trait]
impl IntentClassifier for OpenAiClassifier {
    async fn classify(
        &self,
        message: &str,
        user_address: Option<&str>,
    ) -> Result<Intent, AgentError> {
        let user = match user_address {
            Some(addr) => format!("User address: {addr}\nMessage: {message}"),
            None => format!("Message: {message}"),
        };

        let content = self.call_api(INTENT_SYSTEM_PROMPT, &user).await?;
        let json = extract_json(&content);

        let raw: RawIntent = match serde_json::from_str(json) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Classifier returned non-JSON intent: {}", e);
                return Ok(Intent {
                    action: IntentAction::Unknown,
                    parsed_data: serde_json::json!({}),
                    confidence: 0.0,
                    clarification_question: None,
                });
            }
        };

        let intent = Intent {
            action: IntentAction::parse_lenient(&raw.action),
            parsed_data: raw.parsed_data,
            confidence: raw.confidence,
            clarification_question: raw.clarification_question,
        };
        info!(
            "Intent parsed: action={:?}, confidence={}",
            intent.action, intent.confidence
        );
        Ok(intent)
    }

    async fn dry_run_summary(
        &self,
        action: &str,
        fields: &serde_json::Value,
        sender_balance: u128,
        estimated_gas_mist: u64,
    ) -> Result<DryRunSummary, AgentError> {
        let user = format!(
            "Action: {action}\nFields: {fields}\nSender balance (base units): {sender_balance}"
        );

        let content = self.call_api(DRY_RUN_SYSTEM_PROMPT, &user).await?;
        let raw: RawDryRun = serde_json::from_str(extract_json(&content))
            .map_err(|e| AgentError::Classifier(format!("malformed dry-run summary: {e}")))?;

        Ok(DryRunSummary {
            action_description: raw.action_description,
            risk_level: raw.risk_level,
            estimated_gas_fee: mist_to_sui(estimated_gas_mist),
        })
    }
}

/// Estimated gas arrives in MIST; the preview reports SUI.
pub fn mist_to_sui(mist: u64) -> f64 {
    mist as f64 / 1_000_000_000.0
}

/// Strip a markdown code fence if the model wrapped its JSON in one.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some(start) = trimmed.find("```") {
        let after_start = &trimmed[start + 3..];
        let body_start = after_start.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_start[body_start..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }
    trimmed
}

// ============================================================================
// Wire types for the chat-completions protocol
// ============================================================================

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct RawIntent {
    action: String,
    #[serde(default)]
    parsed_data: serde_json::Value,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    clarification_question: Option<String>,
}

#[derive(Deserialize)]
struct RawDryRun {
    action_description: String,
    risk_level: RiskLevel,
}
