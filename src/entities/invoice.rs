//! Invoice entity type - Billing documents owning their line items

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, EntityKind};
use crate::core::store::{Row, StoreError};
use crate::core::validation::{Checker, FieldMap, Validate, ValidationErrors, DATE_FORMAT};

/// A persisted invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,

    /// Billed partner; cleared when the partner is deleted
    pub partner_id: Option<i64>,

    pub invoice_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Free text, conventionally one of Draft, Sent, Paid, Cancelled
    pub status: String,

    /// Sum of the line totals of all items, maintained by the ledger
    pub total_amount: f64,
}

impl Invoice {
    /// Caller-editable fields; the total is derived and left out
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new()
            .with("invoice_date", self.invoice_date.format(DATE_FORMAT).to_string())
            .with(
                "due_date",
                self.due_date
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
            )
            .with("status", self.status.as_str());
        if let Some(partner_id) = self.partner_id {
            fields.insert("partner_id", partner_id);
        }
        fields
    }
}

impl Entity for Invoice {
    const KIND: EntityKind = EntityKind::Invoice;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get("id")?,
            partner_id: row.get("partner_id")?,
            invoice_date: row.get("invoice_date")?,
            due_date: row.get("due_date")?,
            status: row.get("status")?,
            total_amount: row.get("total_amount")?,
        })
    }
}

/// Validated invoice header fields
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub partner_id: i64,
    pub invoice_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: String,
}

impl Validate for NewInvoice {
    const KIND: EntityKind = EntityKind::Invoice;

    fn from_fields(fields: &FieldMap) -> Result<Self, ValidationErrors> {
        let mut check = Checker::new(fields);
        check.require(&["partner_id", "invoice_date", "status"]);
        let partner_id = check.integer("partner_id");
        let invoice_date = check.date("invoice_date");
        let due_date = check.date("due_date");
        let status = check.text("status");
        check.finish()?;

        Ok(Self {
            partner_id: partner_id.unwrap_or_default(),
            invoice_date: invoice_date.unwrap_or_default(),
            due_date,
            status: status.unwrap_or_default(),
        })
    }
}
