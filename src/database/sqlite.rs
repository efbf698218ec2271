//! # SQLite Database Capability
//!
//! rusqlite-backed implementation of the [`Database`] trait. Rows are decoded
//! dynamically by column name into JSON objects, since the gateway knows
//! nothing about table schemas.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection};
use serde_json::{Map, Number, Value};

use super::{Database, DatabaseError, DbResult, MutationMeta, MutationOutcome, PreparedStatement, RowSet, SqlValue};

/// SQLite-backed database capability.
///
/// The connection sits behind a mutex: the gateway issues one statement per
/// request and never needs concurrent access to a single binding.
pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DatabaseError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DatabaseError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> DbResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DatabaseError("connection lock poisoned".to_string()))
    }
}

impl Database for SqliteDatabase {
    fn query_all(&self, stmt: &PreparedStatement) -> DbResult<RowSet> {
        let conn = self.lock()?;
        let mut prepared = conn
            .prepare(&stmt.sql)
            .map_err(|e| DatabaseError(e.to_string()))?;

        let columns: Vec<String> = prepared
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = prepared
            .query(params_from_iter(stmt.params.iter().map(to_sqlite)))
            .map_err(|e| DatabaseError(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().map_err(|e| DatabaseError(e.to_string()))? {
            let mut object = Map::with_capacity(columns.len());
            for (idx, name) in columns.iter().enumerate() {
                let value = row
                    .get_ref(idx)
                    .map_err(|e| DatabaseError(e.to_string()))?;
                object.insert(name.clone(), column_to_json(value));
            }
            results.push(Value::Object(object));
        }

        Ok(RowSet::new(results))
    }

    fn execute(&self, stmt: &PreparedStatement) -> DbResult<MutationOutcome> {
        let conn = self.lock()?;
        let changes = conn
            .execute(&stmt.sql, params_from_iter(stmt.params.iter().map(to_sqlite)))
            .map_err(|e| DatabaseError(e.to_string()))?;

        Ok(MutationOutcome {
            success: true,
            meta: MutationMeta {
                last_row_id: conn.last_insert_rowid(),
                changes,
            },
        })
    }
}

/// Map a bound value onto rusqlite's owned value type.
fn to_sqlite(value: &SqlValue) -> rusqlite::types::Value {
    match value {
        SqlValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
        SqlValue::Integer(i) => rusqlite::types::Value::Integer(*i),
        SqlValue::Real(f) => rusqlite::types::Value::Real(*f),
        SqlValue::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        SqlValue::Null => rusqlite::types::Value::Null,
    }
}

/// Decode a column value into JSON without schema knowledge.
fn column_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Array(b.iter().map(|byte| Value::Number((*byte).into())).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db() -> SqliteDatabase {
        let db = SqliteDatabase::open_in_memory().unwrap();
        db.execute(&PreparedStatement::new(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)",
        ))
        .unwrap();
        db
    }

    #[test]
    fn test_insert_and_query() {
        let db = seeded_db();

        let mut insert = PreparedStatement::new("INSERT INTO users (name, age) VALUES (?, ?)");
        insert.bind(SqlValue::Text("Alice".to_string()));
        insert.bind(SqlValue::Integer(30));

        let outcome = db.execute(&insert).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.meta.changes, 1);
        assert_eq!(outcome.meta.last_row_id, 1);

        let rows = db
            .query_all(&PreparedStatement::new("SELECT * FROM users"))
            .unwrap();
        assert_eq!(rows.meta.rows_read, 1);
        assert_eq!(rows.results[0]["name"], "Alice");
        assert_eq!(rows.results[0]["age"], 30);
    }

    #[test]
    fn test_bound_parameters() {
        let db = seeded_db();
        for (name, age) in [("a", 1), ("b", 2)] {
            let mut stmt = PreparedStatement::new("INSERT INTO users (name, age) VALUES (?, ?)");
            stmt.bind(SqlValue::Text(name.to_string()));
            stmt.bind(SqlValue::Integer(age));
            db.execute(&stmt).unwrap();
        }

        let mut select = PreparedStatement::new("SELECT * FROM users WHERE name = ?");
        select.bind(SqlValue::Text("b".to_string()));
        let rows = db.query_all(&select).unwrap();
        assert_eq!(rows.results.len(), 1);
        assert_eq!(rows.results[0]["age"], 2);
    }

    #[test]
    fn test_engine_error_surfaces_message() {
        let db = seeded_db();
        let err = db
            .query_all(&PreparedStatement::new("SELECT * FROM missing"))
            .unwrap_err();
        assert!(err.0.contains("missing"));
    }

    #[test]
    fn test_null_and_bool_binding() {
        let db = seeded_db();
        let mut stmt = PreparedStatement::new("INSERT INTO users (name, age) VALUES (?, ?)");
        stmt.bind(SqlValue::Null);
        stmt.bind(SqlValue::Bool(true));
        db.execute(&stmt).unwrap();

        let rows = db
            .query_all(&PreparedStatement::new("SELECT name, age FROM users"))
            .unwrap();
        assert_eq!(rows.results[0]["name"], Value::Null);
        assert_eq!(rows.results[0]["age"], 1);
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.db");
        let db = SqliteDatabase::open(&path).unwrap();
        db.execute(&PreparedStatement::new("CREATE TABLE t (id INTEGER)"))
            .unwrap();
        assert!(path.exists());
    }
}
