//! HTTP error mapping.
//!
//! Client input errors become 400 with a human-readable detail string;
//! collaborator and internal failures become 500 carrying the error text.
//! This is deliberately coarse: clients branch on the response body of
//! successful requests, not on structured error codes.

use agent_core::AgentError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            error!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        let err = ApiError::from(AgentError::MissingAddress("transfers"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.detail.contains("transfers"));

        let err = ApiError::from(AgentError::WalletKey("bad seed".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_collaborator_errors_map_to_500() {
        let err = ApiError::from(AgentError::Gateway("rpc unreachable".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail.contains("rpc unreachable"));

        let err = ApiError::from(AgentError::Execution("abort".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
