//! ============================================================================
//! API Routes - /chat, /execute, /contacts, /health
//! ============================================================================
//! Thin handlers over the core orchestration components. Each handler
//! validates its inputs, delegates, and maps domain errors to HTTP
//! statuses via ApiError.
//! ============================================================================

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use agent_core::{ChatResponse, ContactRecord, TransactionResult};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_address: Option<String>,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub user_address: String,
    pub transaction_data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SaveContactRequest {
    pub user_address: String,
    pub contact_name: String,
    pub contact_address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct SaveContactResponse {
    pub message: String,
    pub blob_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListContactsQuery {
    pub user_address: String,
}

#[derive(Serialize)]
pub struct ContactListResponse {
    pub contacts: Vec<ContactRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Parse a natural-language message and prepare a transaction preview.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(%request_id, "=== Chat Request Received ===");
    info!(%request_id, "Message: {}", request.message);
    debug!(
        %request_id,
        "User address: {:?}, context: {:?}",
        request.user_address,
        request.context
    );

    let intent = state
        .classifier
        .classify(&request.message, request.user_address.as_deref())
        .await?;

    let response = state
        .dispatcher
        .dispatch(intent, request.user_address.as_deref())
        .await?;
    Ok(Json(response))
}

/// Execute a previously dispatched transaction payload.
pub async fn execute(
    State(state): State<AppState>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<TransactionResult>, ApiError> {
    info!("=== Execute Transaction Request ===");
    info!("User address: {}", request.user_address);

    let result = state
        .executor
        .execute(&request.user_address, &request.transaction_data)
        .await?;
    Ok(Json(result))
}

/// Save an encrypted contact to the off-chain vault.
pub async fn save_contact(
    State(state): State<AppState>,
    Json(request): Json<SaveContactRequest>,
) -> Result<Json<SaveContactResponse>, ApiError> {
    if request.contact_name.is_empty() || request.contact_address.is_empty() {
        return Err(ApiError::bad_request(
            "Contact name and address are required",
        ));
    }

    let record = ContactRecord {
        name: request.contact_name,
        address: request.contact_address,
        notes: request.notes.unwrap_or_default(),
    };
    let blob_id = state.vault.save(&request.user_address, record).await?;

    Ok(Json(SaveContactResponse {
        message: "Contact saved successfully".to_string(),
        blob_id,
    }))
}

/// List all decrypted contacts for a user. Empty list when none saved.
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ListContactsQuery>,
) -> Result<Json<ContactListResponse>, ApiError> {
    let contacts = state.vault.list(&query.user_address).await?;
    Ok(Json(ContactListResponse { contacts }))
}

/// Liveness probe. No side effects.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "Sui Blockchain AI Agent",
        version: env!("CARGO_PKG_VERSION"),
    })
}
