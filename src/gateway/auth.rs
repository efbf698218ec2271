//! # Authorization Gate
//!
//! Shared-secret gate applied to every route the gateway exposes. The
//! `Authorization` header must equal the configured secret exactly; a
//! mismatch short-circuits the request before any handler or database call.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use super::errors::GatewayError;
use super::server::GatewayState;

/// Exact-equality secret check, constant-time over the byte contents.
pub fn verify_secret(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Middleware enforcing the shared-secret gate.
pub async fn require_secret(
    State(state): State<Arc<GatewayState>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(header) if verify_secret(header, &state.config.secret) => next.run(request).await,
        _ => GatewayError::Unauthorized.into_response(),
    }
}
