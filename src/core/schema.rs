//! Relational schema and referential-integrity policy
//!
//! Four tables with these delete rules:
//! - `invoice_items.invoice_id` → `invoices`: ON DELETE CASCADE (an invoice owns its items)
//! - `invoice_items.product_id` → `products`: ON DELETE RESTRICT (referenced products cannot be deleted)
//! - `invoices.partner_id` → `partners`: ON DELETE SET NULL (invoices outlive their partner)
//!
//! `AUTOINCREMENT` keeps identities monotonic and never reused.

use rusqlite::{params, Connection, OptionalExtension};

use crate::core::store::StoreError;

/// Current schema version
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS partners (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    tax_id TEXT NOT NULL,
    email TEXT,
    phone TEXT NOT NULL,
    address TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sku TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    price REAL NOT NULL CHECK (price >= 0),
    stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0)
);

CREATE TABLE IF NOT EXISTS invoices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    partner_id INTEGER REFERENCES partners(id) ON DELETE SET NULL,
    invoice_date TEXT NOT NULL,
    due_date TEXT,
    status TEXT NOT NULL DEFAULT 'Draft',
    total_amount REAL NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_invoices_partner ON invoices(partner_id);

CREATE TABLE IF NOT EXISTS invoice_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_id INTEGER NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    unit_price REAL NOT NULL CHECK (unit_price >= 0),
    line_total REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_items_invoice ON invoice_items(invoice_id);
CREATE INDEX IF NOT EXISTS idx_items_product ON invoice_items(product_id);
"#;

/// Create every table and index that is missing and stamp the version
///
/// Safe to run on every open.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA)?;

    let current: Option<i64> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
        .optional()?
        .flatten();

    match current {
        None => {
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;
            tracing::info!(target: "nova", event = "schema_created", version = SCHEMA_VERSION);
        }
        Some(found) if found > SCHEMA_VERSION => {
            return Err(StoreError::SchemaTooNew {
                found,
                supported: SCHEMA_VERSION,
            });
        }
        Some(_) => {}
    }

    Ok(())
}

/// Stored schema version
pub fn schema_version(conn: &Connection) -> Result<i64, StoreError> {
    let version: Option<i64> = conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        conn
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = memory();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let stamps: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stamps, 1);
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_is_refused() {
        let conn = memory();
        ensure_schema(&conn).unwrap();
        conn.execute("UPDATE schema_version SET version = 99", [])
            .unwrap();

        let err = ensure_schema(&conn).unwrap_err();
        assert!(matches!(err, StoreError::SchemaTooNew { found: 99, .. }));
    }

    #[test]
    fn test_partner_delete_nullifies_invoice_reference() {
        let conn = memory();
        ensure_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO partners (name, tax_id, phone, address) VALUES ('Acme', 'T', '1', 'A');
            INSERT INTO invoices (partner_id, invoice_date, status) VALUES (1, '2024-01-01', 'Draft');
            DELETE FROM partners WHERE id = 1;
            "#,
        )
        .unwrap();

        let partner: Option<i64> = conn
            .query_row("SELECT partner_id FROM invoices WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(partner, None);
    }

    #[test]
    fn test_invoice_delete_cascades_and_product_delete_restricts() {
        let conn = memory();
        ensure_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO products (sku, name, description, price, stock) VALUES ('S', 'N', 'D', 2.0, 0);
            INSERT INTO invoices (invoice_date, status) VALUES ('2024-01-01', 'Draft');
            INSERT INTO invoice_items (invoice_id, product_id, quantity, unit_price, line_total)
                VALUES (1, 1, 2, 2.0, 4.0);
            "#,
        )
        .unwrap();

        assert!(conn.execute("DELETE FROM products WHERE id = 1", []).is_err());

        conn.execute("DELETE FROM invoices WHERE id = 1", []).unwrap();
        let items: i64 = conn
            .query_row("SELECT COUNT(*) FROM invoice_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(items, 0);
    }

    #[test]
    fn test_identities_are_not_reused() {
        let conn = memory();
        ensure_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO partners (name, tax_id, phone, address) VALUES ('A', 'T', '1', 'A');
            DELETE FROM partners;
            INSERT INTO partners (name, tax_id, phone, address) VALUES ('B', 'T', '1', 'A');
            "#,
        )
        .unwrap();
        let id: i64 = conn
            .query_row("SELECT id FROM partners", [], |row| row.get(0))
            .unwrap();
        assert_eq!(id, 2);
    }
}
