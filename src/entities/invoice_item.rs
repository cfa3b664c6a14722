//! Invoice item entity type - One priced quantity of a product on an invoice

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, EntityKind};
use crate::core::store::{Row, StoreError};
use crate::core::validation::{Checker, FieldMap, Validate, ValidationErrors};

/// A persisted invoice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,

    /// `quantity * unit_price` as of the last write
    pub line_total: f64,
}

impl Entity for InvoiceItem {
    const KIND: EntityKind = EntityKind::InvoiceItem;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            invoice_id: row.get("invoice_id")?,
            product_id: row.get("product_id")?,
            quantity: row.get("quantity")?,
            unit_price: row.get("unit_price")?,
            line_total: row.get("line_total")?,
        })
    }
}

/// Validated line fields; a missing unit price is resolved from the product
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoiceItem {
    pub invoice_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Option<f64>,
}

impl NewInvoiceItem {
    pub fn new(invoice_id: i64, product_id: i64, quantity: i64, unit_price: Option<f64>) -> Self {
        Self {
            invoice_id,
            product_id,
            quantity,
            unit_price,
        }
    }

    /// Raw form of this draft, for callers that hold typed values
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new()
            .with("invoice_id", self.invoice_id)
            .with("product_id", self.product_id)
            .with("quantity", self.quantity);
        if let Some(price) = self.unit_price {
            fields.insert("unit_price", price);
        }
        fields
    }
}

impl Validate for NewInvoiceItem {
    const KIND: EntityKind = EntityKind::InvoiceItem;

    fn from_fields(fields: &FieldMap) -> Result<Self, ValidationErrors> {
        let mut check = Checker::new(fields);
        check.require(&["invoice_id", "product_id", "quantity"]);
        let invoice_id = check.strict_integer("invoice_id");
        let product_id = check.strict_integer("product_id");
        let quantity = check.positive("quantity");
        let unit_price = check.optional_amount("unit_price");
        check.finish()?;

        Ok(Self {
            invoice_id: invoice_id.unwrap_or_default(),
            product_id: product_id.unwrap_or_default(),
            quantity: quantity.unwrap_or_default(),
            unit_price,
        })
    }
}

/// Line total for a quantity at a unit price
pub fn line_total(quantity: i64, unit_price: f64) -> f64 {
    quantity as f64 * unit_price
}
