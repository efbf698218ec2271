//! # Gateway Errors
//!
//! Error taxonomy for the gateway, mapped onto HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::database::DatabaseError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    // ==================
    // Configuration Errors (5xx)
    // ==================
    /// No database capability configured
    #[error("No database binding found")]
    NoDatabase,

    // ==================
    // Auth Errors
    // ==================
    /// Authorization header missing or mismatched
    #[error("Unauthorized")]
    Unauthorized,

    // ==================
    // Client Errors (4xx)
    // ==================
    /// HTTP method with no mapped operation
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Update addressed to a collection instead of a record
    #[error("ID required for update")]
    UpdateIdRequired,

    /// Delete addressed to a collection instead of a record
    #[error("ID required for delete")]
    DeleteIdRequired,

    /// Array-shaped insert body
    #[error("Batch insert not supported")]
    BatchInsert,

    /// Raw query request without query text
    #[error("No query provided")]
    NoQuery,

    /// Invalid request body
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Execution failure, message taken verbatim from the engine
    #[error("{0}")]
    Execution(String),
}

impl GatewayError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NoDatabase => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            // 400 Bad Request
            GatewayError::UpdateIdRequired
            | GatewayError::DeleteIdRequired
            | GatewayError::BatchInsert
            | GatewayError::NoQuery
            | GatewayError::InvalidBody(_)
            | GatewayError::InvalidQueryParam(_)
            | GatewayError::Execution(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<DatabaseError> for GatewayError {
    fn from(err: DatabaseError) -> Self {
        GatewayError::Execution(err.0)
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<GatewayError> for ErrorResponse {
    fn from(err: GatewayError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
