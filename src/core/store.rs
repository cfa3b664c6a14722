//! SQLite-backed query/persistence gateway
//!
//! The gateway exposes three primitives, `fetch_all`, `fetch_one` and `execute`.
//! Called on a [`Store`] each primitive runs in its own transaction. Multi-step
//! operations call [`Store::transaction`] and use the same primitives on the
//! [`Tx`] handle, so that every step commits together or not at all.
//!
//! The connection is held behind a mutex and acquired per operation; the guard
//! is released on every exit path, including errors.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::{FromSql, Value, ValueRef};
use rusqlite::{Connection, ErrorCode, ToSql};
use thiserror::Error;

use crate::core::schema;

/// Errors raised by the persistence gateway
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("cannot create database directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("column '{0}' not present in result row")]
    MissingColumn(String),

    #[error("cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },

    #[error("database was written by a newer schema (version {found}, supported {supported})")]
    SchemaTooNew { found: i64, supported: i64 },

    #[error("store connection is poisoned")]
    Poisoned,
}

impl StoreError {
    /// Raw message for constraint failures (e.g. "UNIQUE constraint failed: products.sku")
    pub fn constraint_message(&self) -> Option<&str> {
        match self {
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(err, Some(msg)))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Some(msg.as_str())
            }
            _ => None,
        }
    }
}

/// A result row: column names with their raw SQLite values
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    fn value(&self, column: &str) -> Result<&Value, StoreError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
            .ok_or_else(|| StoreError::MissingColumn(column.to_string()))
    }

    /// Decode a column into a typed value
    pub fn get<T: FromSql>(&self, column: &str) -> Result<T, StoreError> {
        let value = self.value(column)?;
        T::column_result(ValueRef::from(value)).map_err(|e| StoreError::Decode {
            column: column.to_string(),
            message: e.to_string(),
        })
    }

    /// Render a column as text, NULL becomes the empty string
    pub fn text(&self, column: &str) -> Result<String, StoreError> {
        self.value(column).map(render_value)
    }

    /// Render every value as text, in column order
    pub fn to_strings(&self) -> Vec<String> {
        self.values.iter().map(render_value).collect()
    }
}

/// Text rendering used for export and tabular output
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(_) => "<blob>".to_string(),
    }
}

/// Outcome of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Written {
    /// Row id of the last inserted row on this connection
    pub id: i64,
    /// Number of rows changed by the statement
    pub changes: usize,
}

/// The three gateway primitives
pub trait Gateway {
    fn fetch_all(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>, StoreError>;

    fn fetch_one(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Option<Row>, StoreError>;

    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Written, StoreError>;
}

/// Handle for the statements of one transaction
pub struct Tx<'a> {
    conn: &'a Connection,
}

impl Gateway for Tx<'_> {
    fn fetch_all(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>, StoreError> {
        query_rows(self.conn, sql, params, None)
    }

    fn fetch_one(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Option<Row>, StoreError> {
        Ok(query_rows(self.conn, sql, params, Some(1))?.into_iter().next())
    }

    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Written, StoreError> {
        let changes = self.conn.execute(sql, params)?;
        Ok(Written {
            id: self.conn.last_insert_rowid(),
            changes,
        })
    }
}

fn query_rows(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
    limit: Option<usize>,
) -> Result<Vec<Row>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let mut rows = stmt.query(params)?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = (0..columns.len())
            .map(|i| row.get::<_, Value>(i))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        out.push(Row {
            columns: columns.clone(),
            values,
        });
        if limit.is_some_and(|l| out.len() >= l) {
            break;
        }
    }
    Ok(out)
}

/// The relational store
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create a database file and bring its schema up to date
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database (tests, dry runs)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        schema::ensure_schema(&conn)?;

        let location = path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        tracing::debug!(
            target: "nova",
            event = "store_open",
            path = %location,
            schema_version = schema::SCHEMA_VERSION
        );

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file location, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Run work inside one transaction. Commits on success, rolls back on error.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&Tx<'_>) -> Result<T, E>,
    {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction().map_err(StoreError::from)?;

        let outcome = f(&Tx { conn: &*tx });
        match outcome {
            Ok(value) => {
                tx.commit().map_err(StoreError::from)?;
                tracing::trace!(target: "nova", event = "db_tx_commit");
                Ok(value)
            }
            Err(err) => {
                if let Err(rb) = tx.rollback() {
                    tracing::error!(target: "nova", event = "db_tx_rollback_failed", error = %rb);
                } else {
                    tracing::debug!(target: "nova", event = "db_tx_rollback");
                }
                Err(err)
            }
        }
    }
}

impl Gateway for Store {
    fn fetch_all(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>, StoreError> {
        self.transaction(|tx| tx.fetch_all(sql, params))
    }

    fn fetch_one(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Option<Row>, StoreError> {
        self.transaction(|tx| tx.fetch_one(sql, params))
    }

    fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Written, StoreError> {
        self.transaction(|tx| tx.execute(sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_file_and_parent_dirs() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/dir/invoicing.db");
        let store = Store::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn test_execute_returns_identity() {
        let store = Store::open_in_memory().unwrap();
        let first = store
            .execute(
                "INSERT INTO partners (name, tax_id, email, phone, address) VALUES (?1, ?2, ?3, ?4, ?5)",
                params!["Acme", "T-1", None::<String>, "555", "Main St"],
            )
            .unwrap();
        let second = store
            .execute(
                "INSERT INTO partners (name, tax_id, email, phone, address) VALUES (?1, ?2, ?3, ?4, ?5)",
                params!["Globex", "T-2", None::<String>, "556", "Side St"],
            )
            .unwrap();
        assert_eq!(first.changes, 1);
        assert!(second.id > first.id);
    }

    #[test]
    fn test_fetch_rows_decode_by_column_name() {
        let store = Store::open_in_memory().unwrap();
        store
            .execute(
                "INSERT INTO products (sku, name, description, price, stock) VALUES ('A-1', 'Bolt', 'M6', 0.25, 100)",
                params![],
            )
            .unwrap();

        let rows = store
            .fetch_all("SELECT sku, price, stock FROM products", params![])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get::<String>("sku").unwrap(), "A-1");
        assert_eq!(rows[0].get::<f64>("price").unwrap(), 0.25);
        assert_eq!(rows[0].text("stock").unwrap(), "100");
        assert!(matches!(
            rows[0].get::<i64>("missing"),
            Err(StoreError::MissingColumn(_))
        ));

        let none = store
            .fetch_one("SELECT * FROM products WHERE sku = ?1", params!["nope"])
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_transaction_rolls_back_every_step_on_error() {
        let store = Store::open_in_memory().unwrap();

        let result: Result<(), StoreError> = store.transaction(|tx| {
            tx.execute(
                "INSERT INTO products (sku, name, description, price, stock) VALUES ('A-1', 'Bolt', 'M6', 1.0, 1)",
                params![],
            )?;
            // Violates CHECK(price >= 0)
            tx.execute(
                "INSERT INTO products (sku, name, description, price, stock) VALUES ('A-2', 'Nut', 'M6', -1.0, 1)",
                params![],
            )?;
            Ok(())
        });
        let err = result.unwrap_err();
        assert!(err.constraint_message().is_some());

        let rows = store.fetch_all("SELECT id FROM products", params![]).unwrap();
        assert!(rows.is_empty(), "first insert must not survive the rollback");
    }

    #[test]
    fn test_render_value_formats() {
        assert_eq!(render_value(&Value::Null), "");
        assert_eq!(render_value(&Value::Integer(7)), "7");
        assert_eq!(render_value(&Value::Real(9.99)), "9.99");
        assert_eq!(render_value(&Value::Text("x".into())), "x");
    }
}
