//! CLI and basic command tests

mod common;

use common::{nova, setup_test_db};
use predicates::prelude::*;
use std::fs;

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    nova()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("invoices"));
}

#[test]
fn test_version_displays() {
    nova()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nova"));
}

#[test]
fn test_unknown_command_fails() {
    nova()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_generate_script() {
    nova()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nova"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_database() {
    let db = setup_test_db();
    assert!(db.path().exists());

    db.nova()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));
}

// ============================================================================
// Partner Command Tests
// ============================================================================

#[test]
fn test_partner_new_and_list() {
    let db = setup_test_db();
    let id = db.create_partner("Acme Corp");
    assert_eq!(id, 1);

    db.nova()
        .args(["partner", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Corp"));

    db.nova()
        .args(["partner", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("555-0100"));
}

#[test]
fn test_partner_new_reports_all_validation_errors() {
    let db = setup_test_db();
    db.nova()
        .args(["partner", "new", "--tax-id", "T1", "--email", "bad", "--phone", "1"])
        .args(["--address", "Main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name is required"))
        .stderr(predicate::str::contains("email format is invalid"));

    db.nova()
        .args(["partner", "list", "--format", "id"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_partner_edit_keeps_unchanged_fields() {
    let db = setup_test_db();
    let id = db.create_partner("Acme");

    db.nova()
        .args(["partner", "edit", &id.to_string(), "--email", "billing@acme.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated partner"));

    let output = db
        .nova()
        .args(["partner", "show", &id.to_string(), "--format", "json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "Acme");
    assert_eq!(json["email"], "billing@acme.test");
    assert_eq!(json["address"], "1 Main St");
}

#[test]
fn test_partner_delete_detaches_invoices() {
    let db = setup_test_db();
    let partner = db.create_partner("Acme");
    let invoice = db.create_invoice(partner);

    db.nova()
        .args(["partner", "delete", &partner.to_string(), "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted partner"));

    let output = db
        .nova()
        .args(["invoice", "list", "--format", "json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["id"], invoice);
    assert!(json[0]["partner_id"].is_null());
}

#[test]
fn test_partner_delete_id_format_prints_only_the_id() {
    let db = setup_test_db();
    let partner = db.create_partner("Acme");
    db.create_invoice(partner);

    db.nova()
        .args(["partner", "delete", &partner.to_string(), "--yes", "--format", "id"])
        .assert()
        .success()
        .stdout(format!("{}\n", partner));
}

#[test]
fn test_show_missing_partner_fails() {
    let db = setup_test_db();
    db.nova()
        .args(["partner", "show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// Product Command Tests
// ============================================================================

#[test]
fn test_duplicate_sku_rejected() {
    let db = setup_test_db();
    db.create_product("SKU-1", "2.50");

    db.nova()
        .args(["product", "new", "--sku", "SKU-1", "--name", "Other", "--description", "x"])
        .args(["--price", "1", "--stock", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_product_delete_rejected_while_in_use() {
    let db = setup_test_db();
    let partner = db.create_partner("Acme");
    let product = db.create_product("SKU-1", "2.50");
    let invoice = db.create_invoice(partner);
    db.create(&[
        "item",
        "add",
        "--invoice",
        &invoice.to_string(),
        "--product",
        &product.to_string(),
        "--quantity",
        "2",
    ]);

    db.nova()
        .args(["product", "delete", &product.to_string(), "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("referenced"));
}

// ============================================================================
// Invoice and Item Command Tests
// ============================================================================

#[test]
fn test_items_drive_invoice_total() {
    let db = setup_test_db();
    let partner = db.create_partner("Acme");
    let product = db.create_product("SKU-1", "2.50");
    let invoice = db.create_invoice(partner);
    let (inv, prod) = (invoice.to_string(), product.to_string());

    let first = db.create(&["item", "add", "--invoice", &inv, "--product", &prod, "-q", "4"]);
    db.create(&["item", "add", "--invoice", &inv, "-p", &prod, "-q", "1", "--price", "7"]);

    let total = |db: &common::TestDb| -> f64 {
        let output = db
            .nova()
            .args(["invoice", "show", &inv, "--format", "json"])
            .output()
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["invoice"]["total_amount"].as_f64().unwrap()
    };
    assert_eq!(total(&db), 17.0);

    db.nova()
        .args(["item", "edit", &first.to_string(), "-q", "2"])
        .assert()
        .success();
    assert_eq!(total(&db), 12.0);

    db.nova()
        .args(["item", "delete", &first.to_string(), "--yes"])
        .assert()
        .success();
    assert_eq!(total(&db), 7.0);

    db.nova()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("match"));
}

#[test]
fn test_item_with_zero_quantity_rejected() {
    let db = setup_test_db();
    let partner = db.create_partner("Acme");
    let product = db.create_product("SKU-1", "1");
    let invoice = db.create_invoice(partner);

    db.nova()
        .args(["item", "add", "--invoice", &invoice.to_string()])
        .args(["--product", &product.to_string(), "--quantity", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quantity must be a positive integer"));
}

#[test]
fn test_invoice_for_missing_partner_rejected() {
    let db = setup_test_db();
    db.nova()
        .args(["invoice", "new", "--partner", "9", "--date", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_invoice_bad_date_rejected() {
    let db = setup_test_db();
    let partner = db.create_partner("Acme");
    db.nova()
        .args(["invoice", "new", "--partner", &partner.to_string(), "--date", "01/02/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_invoice_delete_removes_items() {
    let db = setup_test_db();
    let partner = db.create_partner("Acme");
    let product = db.create_product("SKU-1", "1");
    let invoice = db.create_invoice(partner);
    db.create(&[
        "item",
        "add",
        "--invoice",
        &invoice.to_string(),
        "--product",
        &product.to_string(),
        "--quantity",
        "3",
    ]);

    db.nova()
        .args(["invoice", "delete", &invoice.to_string(), "--yes"])
        .assert()
        .success();

    db.nova()
        .args(["export", "item"])
        .assert()
        .success()
        .stdout("id,invoice_id,product_id,quantity,unit_price,line_total\n");

    db.nova()
        .args(["product", "delete", &product.to_string(), "--yes"])
        .assert()
        .success();
}

// ============================================================================
// Import / Export Command Tests
// ============================================================================

#[test]
fn test_import_reports_rejected_rows() {
    let db = setup_test_db();
    let csv = db.dir.path().join("partners.csv");
    fs::write(
        &csv,
        "name,tax_id,email,phone,address\n\
         Acme,T1,,555,Main\n\
         Globex,T2,,556,Elm\n\
         ,T3,,557,Oak\n",
    )
    .unwrap();

    db.nova()
        .arg("import")
        .arg("partner")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 partner record(s)"))
        .stdout(predicate::str::contains("row 3: name is required"));
}

#[test]
fn test_import_with_wrong_header_fails() {
    let db = setup_test_db();
    let csv = db.dir.path().join("products.csv");
    fs::write(&csv, "sku,price\nA,1\n").unwrap();

    db.nova()
        .arg("import")
        .arg("product")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("columns must be"));
}

#[test]
fn test_import_invoices_not_supported() {
    let db = setup_test_db();
    let csv = db.dir.path().join("invoices.csv");
    fs::write(&csv, "partner_id,invoice_date,due_date,status,total_amount\n").unwrap();

    db.nova()
        .arg("import")
        .arg("invoice")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("only supported"));
}

#[test]
fn test_export_to_file() {
    let db = setup_test_db();
    db.create_product("SKU-1", "2.5");
    let out = db.dir.path().join("out.csv");

    db.nova()
        .arg("export")
        .arg("product")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Exported 1 product record(s)"));

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(
        text,
        "id,sku,name,description,price,stock\n1,SKU-1,Widget,A widget,2.5,10\n"
    );
}

// ============================================================================
// Report Command Tests
// ============================================================================

#[test]
fn test_reports_rank_sales() {
    let db = setup_test_db();
    let partner = db.create_partner("Acme");
    let bolt = db.create_product("BOLT", "0.5");
    let nut = db.create_product("NUT", "0.1");
    let invoice = db.create_invoice(partner);
    let inv = invoice.to_string();
    db.create(&["item", "add", "--invoice", &inv, "-p", &bolt.to_string(), "-q", "2"]);
    db.create(&["item", "add", "--invoice", &inv, "-p", &nut.to_string(), "-q", "9"]);

    let output = db
        .nova()
        .args(["report", "best", "--format", "json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["sku"], "NUT");
    assert_eq!(json[1]["sku"], "BOLT");

    db.nova()
        .args(["report", "top-invoices", "--format", "id"])
        .assert()
        .success()
        .stdout(format!("{}\n", invoice));
}
