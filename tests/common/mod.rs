//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use nova::core::{FieldMap, Ledger};
use nova::entities::{Invoice, NewInvoiceItem, Partner, Product};
use tempfile::TempDir;

/// A temp directory holding the database used by one test
pub struct TestDb {
    pub dir: TempDir,
}

impl TestDb {
    pub fn path(&self) -> std::path::PathBuf {
        self.dir.path().join("invoicing.db")
    }

    /// A nova command bound to this database, isolated from user config
    pub fn nova(&self) -> Command {
        let mut cmd = nova();
        cmd.current_dir(self.dir.path())
            .env("NOVA_CONFIG", self.dir.path().join("config.yaml"))
            .env_remove("NOVA_DB")
            .env_remove("NOVA_LOG")
            .env_remove("RUST_LOG")
            .arg("--db")
            .arg(self.path());
        cmd
    }

    /// Run a command with `--format id` and return the printed identity
    pub fn create(&self, args: &[&str]) -> i64 {
        let output = self
            .nova()
            .args(args)
            .args(["--format", "id"])
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .unwrap()
    }

    pub fn create_partner(&self, name: &str) -> i64 {
        self.create(&[
            "partner", "new", "--name", name, "--tax-id", "TX-1", "--phone", "555-0100",
            "--address", "1 Main St",
        ])
    }

    pub fn create_product(&self, sku: &str, price: &str) -> i64 {
        self.create(&[
            "product",
            "new",
            "--sku",
            sku,
            "--name",
            "Widget",
            "--description",
            "A widget",
            "--price",
            price,
            "--stock",
            "10",
        ])
    }

    pub fn create_invoice(&self, partner_id: i64) -> i64 {
        self.create(&[
            "invoice",
            "new",
            "--partner",
            &partner_id.to_string(),
            "--date",
            "2024-03-01",
        ])
    }
}

/// Helper to get a nova command
pub fn nova() -> Command {
    Command::new(cargo::cargo_bin!("nova"))
}

/// Helper to create an initialized database in a temp directory
pub fn setup_test_db() -> TestDb {
    let db = TestDb {
        dir: TempDir::new().unwrap(),
    };
    db.nova().arg("init").assert().success();
    db
}

/// A fresh in-memory ledger
pub fn ledger() -> Ledger {
    Ledger::open_in_memory().unwrap()
}

pub fn partner_fields(name: &str) -> FieldMap {
    FieldMap::new()
        .with("name", name)
        .with("tax_id", "TX-1")
        .with("email", "")
        .with("phone", "555-0100")
        .with("address", "1 Main St")
}

pub fn product_fields(sku: &str, price: f64) -> FieldMap {
    FieldMap::new()
        .with("sku", sku)
        .with("name", "Widget")
        .with("description", "A widget")
        .with("price", price)
        .with("stock", 10)
}

pub fn add_partner(ledger: &Ledger, name: &str) -> Partner {
    ledger.create_partner(&partner_fields(name)).unwrap()
}

pub fn add_product(ledger: &Ledger, sku: &str, price: f64) -> Product {
    ledger.create_product(&product_fields(sku, price)).unwrap()
}

pub fn add_invoice(ledger: &Ledger, partner_id: i64) -> Invoice {
    ledger
        .create_invoice(
            &FieldMap::new()
                .with("partner_id", partner_id)
                .with("invoice_date", "2024-03-01")
                .with("due_date", "2024-03-31")
                .with("status", "Draft"),
        )
        .unwrap()
}

pub fn item(invoice_id: i64, product_id: i64, quantity: i64, unit_price: Option<f64>) -> FieldMap {
    NewInvoiceItem::new(invoice_id, product_id, quantity, unit_price).to_fields()
}
