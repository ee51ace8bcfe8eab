//! Error handling for the API gateway
//!
//! Responses carry a short plain-text body. Details stay in the logs, keyed
//! by a per-error request ID.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::Error;
use uuid::Uuid;

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Common error: {0}")]
    Common(#[from] Error),
}

impl ApiError {
    /// True when the underlying failure came from the database
    pub fn is_storage(&self) -> bool {
        matches!(self, ApiError::Common(e) if e.is_storage())
    }

    /// Status code and client-facing body
    fn status_and_body(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Common(e) => match e {
                Error::DuplicateIdentifier(_) => (StatusCode::CONFLICT, "User already exists".to_string()),
                Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid login".to_string()),
                Error::Unauthenticated => (StatusCode::UNAUTHORIZED, "Login required".to_string()),
                Error::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
                Error::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                Error::ConfigurationError(_)
                | Error::Internal(_)
                | Error::Database(_)
                | Error::Migration(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Generate a request ID for tracking errors
        let request_id = Uuid::new_v4().to_string();
        let (status, body) = self.status_and_body();

        if self.is_storage() {
            tracing::error!("Storage failure [{}]: {:?}", request_id, &self);
        } else if status.is_server_error() {
            tracing::error!("API Error [{}]: {:?}", request_id, &self);
        } else {
            tracing::debug!("API Error [{}]: {}", request_id, &self);
        }

        (status, body).into_response()
    }
}
