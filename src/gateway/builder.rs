//! # Query Builder
//!
//! Translates REST inputs into parameterized SQL. Every value travels as a
//! bound parameter; identifiers are sanitized before textual inclusion;
//! limit/offset are validated integers interpolated as literals.

use serde_json::Value;

use crate::database::{PreparedStatement, SqlValue};

use super::errors::{GatewayError, GatewayResult};
use super::params::RestQuery;
use super::sanitize::sanitize_identifier;

/// Convert a JSON scalar into a bindable value.
///
/// Nested arrays/objects cannot be bound and are a client error.
pub fn bind_value(value: &Value) -> GatewayResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlValue::Real(f))
            } else {
                Err(GatewayError::InvalidBody(format!(
                    "number out of range: {}",
                    n
                )))
            }
        }
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(GatewayError::InvalidBody(
            "nested values cannot be bound as parameters".to_string(),
        )),
    }
}

/// Build a select statement.
///
/// An id lookup short-circuits filtering: when an id is present the filters
/// are ignored entirely and none of their values are bound, keeping the
/// parameter list in lockstep with the placeholder count.
pub fn build_select(table: &str, id: Option<&str>, query: &RestQuery) -> PreparedStatement {
    let table = sanitize_identifier(table);
    let mut stmt = PreparedStatement::new(format!("SELECT * FROM `{}`", table));

    if let Some(id) = id {
        stmt.sql.push_str(" WHERE id = ?");
        stmt.bind(SqlValue::Text(id.to_string()));
    } else if !query.filters.is_empty() {
        let clauses: Vec<String> = query
            .filters
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect();
        stmt.sql.push_str(" WHERE ");
        stmt.sql.push_str(&clauses.join(" AND "));
        for (_, value) in &query.filters {
            stmt.bind(SqlValue::Text(value.clone()));
        }
    }

    if let Some(sort) = &query.sort {
        stmt.sql
            .push_str(&format!(" ORDER BY {} {}", sort.column, sort.direction.as_sql()));
    }
    if let Some(limit) = query.page.limit {
        stmt.sql.push_str(&format!(" LIMIT {}", limit));
    }
    if let Some(offset) = query.page.offset {
        stmt.sql.push_str(&format!(" OFFSET {}", offset));
    }

    stmt
}

/// Build an insert statement from a flat JSON object body.
///
/// Columns are enumerated in body key order and values bound in that same
/// order. Array bodies are rejected (no batch insert).
pub fn build_insert(table: &str, body: &Value) -> GatewayResult<PreparedStatement> {
    if body.is_array() {
        return Err(GatewayError::BatchInsert);
    }
    let record = body.as_object().ok_or_else(|| {
        GatewayError::InvalidBody("request body must be a JSON object".to_string())
    })?;

    let table = sanitize_identifier(table);
    let mut columns = Vec::with_capacity(record.len());
    let mut params = Vec::with_capacity(record.len());
    for (key, value) in record {
        columns.push(sanitize_identifier(key));
        params.push(bind_value(value)?);
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(PreparedStatement {
        sql: format!(
            "INSERT INTO `{}` ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        ),
        params,
    })
}

/// Build an update statement; the id is a hard precondition and is bound
/// last, after the assignment values.
pub fn build_update(table: &str, id: Option<&str>, body: &Value) -> GatewayResult<PreparedStatement> {
    let id = id.ok_or(GatewayError::UpdateIdRequired)?;
    let record = body.as_object().ok_or_else(|| {
        GatewayError::InvalidBody("request body must be a JSON object".to_string())
    })?;

    let table = sanitize_identifier(table);
    let mut assignments = Vec::with_capacity(record.len());
    let mut params = Vec::with_capacity(record.len() + 1);
    for (key, value) in record {
        assignments.push(format!("{} = ?", sanitize_identifier(key)));
        params.push(bind_value(value)?);
    }
    params.push(SqlValue::Text(id.to_string()));

    Ok(PreparedStatement {
        sql: format!(
            "UPDATE `{}` SET {} WHERE id = ?",
            table,
            assignments.join(", ")
        ),
        params,
    })
}

/// Build a delete statement; the id is a hard precondition.
pub fn build_delete(table: &str, id: Option<&str>) -> GatewayResult<PreparedStatement> {
    let id = id.ok_or(GatewayError::DeleteIdRequired)?;
    let table = sanitize_identifier(table);

    Ok(PreparedStatement {
        sql: format!("DELETE FROM `{}` WHERE id = ?", table),
        params: vec![SqlValue::Text(id.to_string())],
    })
}
