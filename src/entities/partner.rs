//! Partner entity type - Customers and counterparties billed by invoices

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, EntityKind};
use crate::core::store::{Row, StoreError};
use crate::core::validation::{Checker, FieldMap, Validate, ValidationErrors};

/// A persisted partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,

    pub name: String,

    /// Tax identifier, free text
    pub tax_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub phone: String,

    pub address: String,
}

impl Partner {
    /// Current values as a raw field map, for overlaying partial edits
    pub fn to_fields(&self) -> FieldMap {
        FieldMap::new()
            .with("name", self.name.as_str())
            .with("tax_id", self.tax_id.as_str())
            .with("email", self.email.clone().unwrap_or_default())
            .with("phone", self.phone.as_str())
            .with("address", self.address.as_str())
    }
}

impl Entity for Partner {
    const KIND: EntityKind = EntityKind::Partner;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            tax_id: row.get("tax_id")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            address: row.get("address")?,
        })
    }
}

/// Validated partner fields, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewPartner {
    pub name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
}

impl Validate for NewPartner {
    const KIND: EntityKind = EntityKind::Partner;

    fn from_fields(fields: &FieldMap) -> Result<Self, ValidationErrors> {
        let mut check = Checker::new(fields);
        check.require(&["name", "tax_id", "phone", "address"]);
        let name = check.text("name");
        let tax_id = check.text("tax_id");
        let email = check.email("email");
        let phone = check.text("phone");
        let address = check.text("address");
        check.finish()?;

        // Required fields are present once the checker passes
        Ok(Self {
            name: name.unwrap_or_default(),
            tax_id: tax_id.unwrap_or_default(),
            email,
            phone: phone.unwrap_or_default(),
            address: address.unwrap_or_default(),
        })
    }
}
