//! # Database Capability
//!
//! The opaque execution seam of the gateway: prepare SQL text, bind ordered
//! parameters, execute, return rows or mutation metadata. The gateway issues
//! at most one statement per request and never manages transactions.

pub mod sqlite;

pub use sqlite::SqliteDatabase;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Result type for database operations
pub type DbResult<T> = Result<T, DatabaseError>;

/// Execution failure reported by the underlying engine.
///
/// The message is surfaced to the caller verbatim (HTTP 400), so it should
/// carry whatever the engine said, untouched.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DatabaseError(pub String);

/// A value bound to a `?` placeholder.
///
/// Only flat scalars can be bound; nested JSON is rejected upstream before
/// a statement is ever built.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
    Bool(bool),
    Null,
}

/// SQL text plus its ordered parameter list.
///
/// Invariant: `params.len()` equals the number of `?` placeholders in `sql`.
/// Consumed exactly once by a [`Database`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl PreparedStatement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(&mut self, value: SqlValue) {
        self.params.push(value);
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Row-set result of a select-all execution
#[derive(Debug, Clone, Serialize)]
pub struct RowSet {
    pub results: Vec<Value>,
    pub success: bool,
    pub meta: RowMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowMeta {
    pub rows_read: usize,
}

impl RowSet {
    pub fn new(results: Vec<Value>) -> Self {
        let rows_read = results.len();
        Self {
            results,
            success: true,
            meta: RowMeta { rows_read },
        }
    }
}

/// Result of a mutation execution
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub success: bool,
    pub meta: MutationMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct MutationMeta {
    pub last_row_id: i64,
    pub changes: usize,
}

/// Opaque database capability: prepare, bind, execute.
///
/// Implementations must be safe to share across requests; the gateway holds
/// them behind `Arc` and re-selects per request.
pub trait Database: Send + Sync {
    /// Execute a statement with select-all semantics, returning every row.
    fn query_all(&self, stmt: &PreparedStatement) -> DbResult<RowSet>;

    /// Execute a mutation, returning engine-assigned metadata.
    fn execute(&self, stmt: &PreparedStatement) -> DbResult<MutationOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_count() {
        let mut stmt = PreparedStatement::new("SELECT * FROM `t` WHERE a = ? AND b = ?");
        stmt.bind(SqlValue::Text("1".to_string()));
        stmt.bind(SqlValue::Integer(2));
        assert_eq!(stmt.placeholder_count(), 2);
        assert_eq!(stmt.params.len(), stmt.placeholder_count());
    }

    #[test]
    fn test_rowset_counts_rows() {
        let rows = RowSet::new(vec![serde_json::json!({"id": 1}), serde_json::json!({"id": 2})]);
        assert!(rows.success);
        assert_eq!(rows.meta.rows_read, 2);
    }
}
