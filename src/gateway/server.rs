//! # Gateway HTTP Server
//!
//! Axum router for the two endpoint families: `/rest/{table}[/{id}]` with
//! per-method dispatch, and `POST /query` for raw statements. The selector
//! and auth middleware wrap both.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Extension, Path, Query};
use axum::http::{Method, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};

use crate::database::{Database, PreparedStatement};

use super::auth;
use super::builder::{bind_value, build_delete, build_insert, build_select, build_update};
use super::config::GatewayConfig;
use super::errors::{GatewayError, GatewayResult};
use super::params::RestQuery;
use super::selector::{self, DatabaseBindings};

/// Shared, read-only per-process state.
pub struct GatewayState {
    pub config: GatewayConfig,
    pub bindings: DatabaseBindings,
}

/// Gateway HTTP server
pub struct GatewayServer {
    config: GatewayConfig,
    router: Router,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, bindings: DatabaseBindings) -> Self {
        let router = Self::build_router(config.clone(), bindings);
        Self { config, router }
    }

    /// Build the router with selector, auth, and CORS layers.
    fn build_router(config: GatewayConfig, bindings: DatabaseBindings) -> Router {
        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin)
        };

        let state = Arc::new(GatewayState { config, bindings });

        // Layers run outermost-last: CORS, then database selection, then the
        // auth gate, so a missing binding fails before authorization does.
        Router::new()
            .route("/rest/{table}", any(rest_collection))
            .route("/rest/{table}/{id}", any(rest_record))
            .route("/query", post(raw_query))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_secret,
            ))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                selector::select_database,
            ))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .expect("Invalid socket address");

        tracing::info!(%addr, "starting gateway");
        tracing::info!("REST surface at http://{}/rest/{{table}}", addr);
        tracing::info!("raw query endpoint at http://{}/query", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

/// `ANY /rest/{table}`
async fn rest_collection(
    Path(table): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
    Extension(db): Extension<Arc<dyn Database>>,
    method: Method,
    body: Bytes,
) -> Response {
    dispatch_rest(db.as_ref(), &method, &table, None, &pairs, &body)
        .unwrap_or_else(|err| err.into_response())
}

/// `ANY /rest/{table}/{id}`
async fn rest_record(
    Path((table, id)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
    Extension(db): Extension<Arc<dyn Database>>,
    method: Method,
    body: Bytes,
) -> Response {
    dispatch_rest(db.as_ref(), &method, &table, Some(&id), &pairs, &body)
        .unwrap_or_else(|err| err.into_response())
}

/// Method dispatcher: GET→select, POST→insert, PUT|PATCH→update,
/// DELETE→delete, anything else → 405.
fn dispatch_rest(
    db: &dyn Database,
    method: &Method,
    table: &str,
    id: Option<&str>,
    pairs: &[(String, String)],
    body: &Bytes,
) -> GatewayResult<Response> {
    match method.as_str() {
        "GET" => {
            let query = RestQuery::parse(pairs)?;
            let stmt = build_select(table, id, &query);
            tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "select");
            let rows = db.query_all(&stmt)?;
            Ok(Json(rows).into_response())
        }
        "POST" => {
            let stmt = build_insert(table, &parse_body(body)?)?;
            tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "insert");
            let outcome = db.execute(&stmt)?;
            Ok((StatusCode::CREATED, Json(outcome)).into_response())
        }
        "PUT" | "PATCH" => {
            let stmt = build_update(table, id, &parse_body(body)?)?;
            tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "update");
            let outcome = db.execute(&stmt)?;
            Ok(Json(outcome).into_response())
        }
        "DELETE" => {
            let stmt = build_delete(table, id)?;
            tracing::debug!(sql = %stmt.sql, "delete");
            let outcome = db.execute(&stmt)?;
            Ok(Json(outcome).into_response())
        }
        _ => Err(GatewayError::MethodNotAllowed),
    }
}

/// Parse a JSON request body, mapping failures to a 400.
fn parse_body(body: &Bytes) -> GatewayResult<Value> {
    serde_json::from_slice(body).map_err(|e| GatewayError::InvalidBody(e.to_string()))
}

/// Raw query request body
#[derive(Debug, Deserialize)]
struct RawQueryRequest {
    query: Option<String>,
    #[serde(default)]
    params: Vec<Value>,
}

/// `POST /query` — executes the given SQL verbatim with params bound in
/// array order. Full trust is delegated to the caller; the auth gate is the
/// only defense upstream.
async fn raw_query(Extension(db): Extension<Arc<dyn Database>>, body: Bytes) -> Response {
    run_raw_query(db.as_ref(), &body).unwrap_or_else(|err| err.into_response())
}

fn run_raw_query(db: &dyn Database, body: &Bytes) -> GatewayResult<Response> {
    let request: RawQueryRequest =
        serde_json::from_slice(body).map_err(|e| GatewayError::InvalidBody(e.to_string()))?;

    let query = request
        .query
        .filter(|q| !q.is_empty())
        .ok_or(GatewayError::NoQuery)?;

    let mut stmt = PreparedStatement::new(query);
    for value in &request.params {
        stmt.bind(bind_value(value)?);
    }

    tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "raw query");
    let rows = db.query_all(&stmt)?;
    Ok(Json(rows).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds() {
        let server = GatewayServer::new(GatewayConfig::new("s3cret"), DatabaseBindings::new());
        let _router = server.router();
        // If we get here, router construction succeeded
    }

    #[test]
    fn test_socket_addr_from_config() {
        let server = GatewayServer::new(
            GatewayConfig::with_port("s3cret", 8080),
            DatabaseBindings::new(),
        );
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_cors_from_configured_origins() {
        let mut config = GatewayConfig::new("s3cret");
        config.cors_origins = vec!["http://localhost:5173".to_string()];
        let server = GatewayServer::new(config, DatabaseBindings::new());
        let _router = server.router();
    }
}
