//! # Database Selector
//!
//! Per-request choice between the configured database bindings: prefer the
//! verified binding when present, else fall back to the default. Neither
//! configured fails the request before routing or authorization.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::database::Database;

use super::errors::{GatewayError, GatewayResult};
use super::server::GatewayState;

/// The optionally-present named database bindings.
#[derive(Clone, Default)]
pub struct DatabaseBindings {
    verified: Option<Arc<dyn Database>>,
    default: Option<Arc<dyn Database>>,
}

impl DatabaseBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preferred "verified" binding.
    pub fn with_verified(mut self, db: Arc<dyn Database>) -> Self {
        self.verified = Some(db);
        self
    }

    /// Set the fallback binding.
    pub fn with_default(mut self, db: Arc<dyn Database>) -> Self {
        self.default = Some(db);
        self
    }

    /// Pick the binding for this request: verified first, else default.
    pub fn select(&self) -> GatewayResult<Arc<dyn Database>> {
        self.verified
            .clone()
            .or_else(|| self.default.clone())
            .ok_or(GatewayError::NoDatabase)
    }
}

/// Middleware resolving the database binding for each request and stashing
/// it in request extensions for the handlers downstream.
pub async fn select_database(
    State(state): State<Arc<GatewayState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.bindings.select() {
        Ok(db) => {
            request.extensions_mut().insert(db);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{
        DbResult, MutationMeta, MutationOutcome, PreparedStatement, RowSet,
    };

    struct StubDatabase(&'static str);

    impl Database for StubDatabase {
        fn query_all(&self, _stmt: &PreparedStatement) -> DbResult<RowSet> {
            Ok(RowSet::new(vec![serde_json::json!({"binding": self.0})]))
        }

        fn execute(&self, _stmt: &PreparedStatement) -> DbResult<MutationOutcome> {
            Ok(MutationOutcome {
                success: true,
                meta: MutationMeta {
                    last_row_id: 0,
                    changes: 0,
                },
            })
        }
    }

    fn binding_name(db: &Arc<dyn Database>) -> String {
        let rows = db.query_all(&PreparedStatement::new("SELECT 1")).unwrap();
        rows.results[0]["binding"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_prefers_verified() {
        let bindings = DatabaseBindings::new()
            .with_verified(Arc::new(StubDatabase("verified")))
            .with_default(Arc::new(StubDatabase("default")));

        assert_eq!(binding_name(&bindings.select().unwrap()), "verified");
    }

    #[test]
    fn test_falls_back_to_default() {
        let bindings = DatabaseBindings::new().with_default(Arc::new(StubDatabase("default")));
        assert_eq!(binding_name(&bindings.select().unwrap()), "default");
    }

    #[test]
    fn test_no_binding_is_an_error() {
        assert!(matches!(
            DatabaseBindings::new().select(),
            Err(GatewayError::NoDatabase)
        ));
    }
}
