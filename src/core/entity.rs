//! Entity kinds and the common record trait
//!
//! Every table the ledger manages is named by an [`EntityKind`]. The kind carries
//! the static shape of the table (name, natural fields in declaration order) so
//! that validation, import and export dispatch on the tag rather than on table
//! name strings.

use serde::{Deserialize, Serialize};

use crate::core::store::{Row, StoreError};

/// Identity column shared by all tables
pub const ID_COLUMN: &str = "id";

/// The four record kinds kept by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Partner,
    Product,
    Invoice,
    #[value(name = "item")]
    InvoiceItem,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Partner => "partner",
            EntityKind::Product => "product",
            EntityKind::Invoice => "invoice",
            EntityKind::InvoiceItem => "invoice_item",
        }
    }

    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Partner => "partners",
            EntityKind::Product => "products",
            EntityKind::Invoice => "invoices",
            EntityKind::InvoiceItem => "invoice_items",
        }
    }

    /// Natural fields in declaration order (identity excluded)
    ///
    /// This is both the validation order and the import column contract.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Partner => &["name", "tax_id", "email", "phone", "address"],
            EntityKind::Product => &["sku", "name", "description", "price", "stock"],
            EntityKind::Invoice => &[
                "partner_id",
                "invoice_date",
                "due_date",
                "status",
                "total_amount",
            ],
            EntityKind::InvoiceItem => &[
                "invoice_id",
                "product_id",
                "quantity",
                "unit_price",
                "line_total",
            ],
        }
    }

    /// Fields a caller may supply; derived fields are excluded
    pub fn input_fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Invoice => &["partner_id", "invoice_date", "due_date", "status"],
            EntityKind::InvoiceItem => &["invoice_id", "product_id", "quantity", "unit_price"],
            other => other.fields(),
        }
    }

    /// Whether bulk import is defined for this kind
    pub fn importable(&self) -> bool {
        matches!(self, EntityKind::Partner | EntityKind::Product)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::InvoiceItem => write!(f, "invoice item"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "partner" | "partners" => Ok(EntityKind::Partner),
            "product" | "products" => Ok(EntityKind::Product),
            "invoice" | "invoices" => Ok(EntityKind::Invoice),
            "item" | "items" | "invoice_item" | "invoice_items" => Ok(EntityKind::InvoiceItem),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

/// Common trait for persisted records
pub trait Entity: Sized {
    const KIND: EntityKind;

    /// Surrogate identity assigned by the store
    fn id(&self) -> i64;

    /// Decode a record from a gateway row
    fn from_row(row: &Row) -> Result<Self, StoreError>;
}

/// Invoice status values offered by the presentation layer
///
/// The ledger stores the status as free text and only requires it to be
/// non-empty; this enum is the canonical vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Cancelled,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Draft => write!(f, "Draft"),
            InvoiceStatus::Sent => write!(f, "Sent"),
            InvoiceStatus::Paid => write!(f, "Paid"),
            InvoiceStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}
