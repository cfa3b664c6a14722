//! Read-only sales reports

use rusqlite::params;
use serde::Serialize;

use crate::core::error::DomainError;
use crate::core::ledger::Ledger;
use crate::core::store::{Gateway, Row, StoreError};

/// Number of rows in the best sellers report
pub const BEST_SELLERS_LIMIT: usize = 10;

/// Number of rows in the top invoices report
pub const TOP_INVOICES_LIMIT: usize = 15;

/// Quantity sold and revenue for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

impl ProductSales {
    fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            product_id: row.get("product_id")?,
            sku: row.get("sku")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            revenue: row.get("revenue")?,
        })
    }
}

/// An invoice ranked by total, with its partner name when still linked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRank {
    pub invoice_id: i64,
    pub invoice_date: String,
    pub partner: Option<String>,
    pub status: String,
    pub total_amount: f64,
}

const SALES_SQL: &str = r#"
    SELECT p.id AS product_id,
           p.sku AS sku,
           p.name AS name,
           SUM(it.quantity) AS quantity,
           SUM(it.line_total) AS revenue
    FROM invoice_items it
    JOIN products p ON p.id = it.product_id
    GROUP BY p.id
    ORDER BY quantity DESC, revenue DESC, p.id
"#;

/// Every product that appears on an invoice, by quantity sold
pub fn product_sales(ledger: &Ledger) -> Result<Vec<ProductSales>, DomainError> {
    sales(ledger, None)
}

/// The best selling products by quantity
pub fn best_sellers(ledger: &Ledger) -> Result<Vec<ProductSales>, DomainError> {
    sales(ledger, Some(BEST_SELLERS_LIMIT))
}

fn sales(ledger: &Ledger, limit: Option<usize>) -> Result<Vec<ProductSales>, DomainError> {
    let rows = ledger.store().fetch_all(SALES_SQL, params![])?;
    let take = limit.unwrap_or(rows.len());
    Ok(rows
        .iter()
        .take(take)
        .map(ProductSales::from_row)
        .collect::<Result<_, _>>()?)
}

/// The highest invoices by total
pub fn top_invoices(ledger: &Ledger) -> Result<Vec<InvoiceRank>, DomainError> {
    let rows = ledger.store().fetch_all(
        r#"
        SELECT i.id AS invoice_id,
               i.invoice_date AS invoice_date,
               pa.name AS partner,
               i.status AS status,
               i.total_amount AS total_amount
        FROM invoices i
        LEFT JOIN partners pa ON pa.id = i.partner_id
        ORDER BY i.total_amount DESC, i.id
        LIMIT ?1
        "#,
        params![TOP_INVOICES_LIMIT as i64],
    )?;

    let ranks = rows
        .iter()
        .map(|row| -> Result<InvoiceRank, StoreError> {
            Ok(InvoiceRank {
                invoice_id: row.get("invoice_id")?,
                invoice_date: row.get("invoice_date")?,
                partner: row.get("partner")?,
                status: row.get("status")?,
                total_amount: row.get("total_amount")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ranks)
}
