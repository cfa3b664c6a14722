//! Product entity type - Catalog items referenced by invoice lines

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, EntityKind};
use crate::core::store::{Row, StoreError};
use crate::core::validation::{Checker, FieldMap, Validate, ValidationErrors};

/// A persisted product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,

    /// Stock keeping unit, unique across all products
    pub sku: String,

    pub name: String,

    pub description: String,

    /// Current list price, used when an invoice line gives no unit price
    pub price: f64,

    /// Units on hand
    pub stock: i64,
}

impl Product {
    pub fn to_fields(&self) -> FieldMap {
        FieldMap::new()
            .with("sku", self.sku.as_str())
            .with("name", self.name.as_str())
            .with("description", self.description.as_str())
            .with("price", self.price)
            .with("stock", self.stock)
    }
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            sku: row.get("sku")?,
            name: row.get("name")?,
            description: row.get("description")?,
            price: row.get("price")?,
            stock: row.get("stock")?,
        })
    }
}

/// Validated product fields
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
}

impl Validate for NewProduct {
    const KIND: EntityKind = EntityKind::Product;

    fn from_fields(fields: &FieldMap) -> Result<Self, ValidationErrors> {
        let mut check = Checker::new(fields);
        check.require(&["sku", "name", "description", "price", "stock"]);
        let sku = check.text("sku");
        let name = check.text("name");
        let description = check.text("description");
        let price = check.amount("price");
        let stock = check.count("stock");
        check.finish()?;

        Ok(Self {
            sku: sku.unwrap_or_default(),
            name: name.unwrap_or_default(),
            description: description.unwrap_or_default(),
            price: price.unwrap_or_default(),
            stock: stock.unwrap_or_default(),
        })
    }
}
