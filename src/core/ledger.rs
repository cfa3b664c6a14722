//! Consistency engine
//!
//! Every write is validated, reference-checked and committed in a single
//! transaction together with the derived values it affects. Item writes always
//! recompute the owning invoice's `total_amount` from the stored line totals
//! before the transaction commits, so a failure at any step leaves the invoice
//! exactly as it was.

use std::path::Path;

use rusqlite::params;
use serde::Serialize;

use crate::core::entity::{Entity, EntityKind};
use crate::core::error::{classify_delete, classify_product_write, classify_reference, DomainError};
use crate::core::store::{Gateway, Store, StoreError};
use crate::core::validation::{FieldError, FieldErrorKind, FieldMap, Validate, ValidationErrors};
use crate::entities::invoice_item::line_total;
use crate::entities::{
    Invoice, InvoiceItem, NewInvoice, NewInvoiceItem, NewPartner, NewProduct, Partner, Product,
};

/// An invoice whose stored total disagrees with its items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalMismatch {
    pub invoice_id: i64,
    pub stored: f64,
    pub computed: f64,
}

/// Record-keeping operations over one store
pub struct Ledger {
    store: Store,
}

impl Ledger {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn open(path: &Path) -> Result<Self, DomainError> {
        Ok(Self::new(Store::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DomainError> {
        Ok(Self::new(Store::open_in_memory()?))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ------------------------------------------------------------------
    // Partners
    // ------------------------------------------------------------------

    pub fn create_partner(&self, fields: &FieldMap) -> Result<Partner, DomainError> {
        let draft = coerce::<NewPartner>(fields)?;
        let partner = self.store.transaction(|tx| {
            let written = tx.execute(
                "INSERT INTO partners (name, tax_id, email, phone, address) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![draft.name, draft.tax_id, draft.email, draft.phone, draft.address],
            )?;
            require::<Partner, _>(tx, written.id)
        })?;
        tracing::info!(target: "nova", event = "partner_created", id = partner.id);
        Ok(partner)
    }

    pub fn update_partner(&self, id: i64, fields: &FieldMap) -> Result<Partner, DomainError> {
        let draft = coerce::<NewPartner>(fields)?;
        let partner = self.store.transaction(|tx| {
            require::<Partner, _>(tx, id)?;
            tx.execute(
                "UPDATE partners SET name = ?1, tax_id = ?2, email = ?3, phone = ?4, address = ?5 WHERE id = ?6",
                params![draft.name, draft.tax_id, draft.email, draft.phone, draft.address, id],
            )?;
            require::<Partner, _>(tx, id)
        })?;
        tracing::info!(target: "nova", event = "partner_updated", id);
        Ok(partner)
    }

    /// Delete a partner; referencing invoices keep their rows with the partner cleared
    ///
    /// Returns the number of invoices that were detached.
    pub fn delete_partner(&self, id: i64) -> Result<i64, DomainError> {
        let detached = self.store.transaction(|tx| {
            require::<Partner, _>(tx, id)?;
            let detached = count(tx, "SELECT COUNT(*) AS n FROM invoices WHERE partner_id = ?1", id)?;
            tx.execute("DELETE FROM partners WHERE id = ?1", params![id])
                .map_err(|e| classify_delete(e, EntityKind::Partner, id))?;
            Ok::<_, DomainError>(detached)
        })?;
        tracing::info!(target: "nova", event = "partner_deleted", id, detached_invoices = detached);
        Ok(detached)
    }

    pub fn partner(&self, id: i64) -> Result<Partner, DomainError> {
        require(&self.store, id)
    }

    pub fn partners(&self) -> Result<Vec<Partner>, DomainError> {
        Ok(list_where(&self.store, "", params![])?)
    }

    pub fn invoices_for_partner(&self, partner_id: i64) -> Result<Vec<Invoice>, DomainError> {
        Ok(list_where(&self.store, "WHERE partner_id = ?1", params![partner_id])?)
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub fn create_product(&self, fields: &FieldMap) -> Result<Product, DomainError> {
        let draft = coerce::<NewProduct>(fields)?;
        let product = self.store.transaction(|tx| {
            ensure_sku_free(tx, &draft.sku, None)?;
            let written = tx
                .execute(
                    "INSERT INTO products (sku, name, description, price, stock) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![draft.sku, draft.name, draft.description, draft.price, draft.stock],
                )
                .map_err(|e| classify_product_write(e, &draft.sku))?;
            require::<Product, _>(tx, written.id)
        })?;
        tracing::info!(target: "nova", event = "product_created", id = product.id, sku = %product.sku);
        Ok(product)
    }

    /// Update a product; the sku must stay unique among the other products
    pub fn update_product(&self, id: i64, fields: &FieldMap) -> Result<Product, DomainError> {
        let draft = coerce::<NewProduct>(fields)?;
        let product = self.store.transaction(|tx| {
            require::<Product, _>(tx, id)?;
            ensure_sku_free(tx, &draft.sku, Some(id))?;
            tx.execute(
                "UPDATE products SET sku = ?1, name = ?2, description = ?3, price = ?4, stock = ?5 WHERE id = ?6",
                params![draft.sku, draft.name, draft.description, draft.price, draft.stock, id],
            )
            .map_err(|e| classify_product_write(e, &draft.sku))?;
            require::<Product, _>(tx, id)
        })?;
        tracing::info!(target: "nova", event = "product_updated", id);
        Ok(product)
    }

    /// Delete a product that no invoice item references
    pub fn delete_product(&self, id: i64) -> Result<(), DomainError> {
        self.store.transaction(|tx| {
            require::<Product, _>(tx, id)?;
            let dependents =
                count(tx, "SELECT COUNT(*) AS n FROM invoice_items WHERE product_id = ?1", id)?;
            if dependents > 0 {
                return Err(DomainError::InUse {
                    kind: EntityKind::Product,
                    id,
                    dependents,
                });
            }
            tx.execute("DELETE FROM products WHERE id = ?1", params![id])
                .map_err(|e| classify_delete(e, EntityKind::Product, id))?;
            Ok::<_, DomainError>(())
        })?;
        tracing::info!(target: "nova", event = "product_deleted", id);
        Ok(())
    }

    pub fn product(&self, id: i64) -> Result<Product, DomainError> {
        require(&self.store, id)
    }

    pub fn products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(list_where(&self.store, "", params![])?)
    }

    pub fn items_for_product(&self, product_id: i64) -> Result<Vec<InvoiceItem>, DomainError> {
        Ok(list_where(&self.store, "WHERE product_id = ?1", params![product_id])?)
    }

    // ------------------------------------------------------------------
    // Invoices
    // ------------------------------------------------------------------

    /// Create an invoice header with a zero total
    pub fn create_invoice(&self, fields: &FieldMap) -> Result<Invoice, DomainError> {
        let draft = coerce::<NewInvoice>(fields)?;
        let invoice = self.store.transaction(|tx| {
            ensure_exists(tx, EntityKind::Partner, draft.partner_id)?;
            let written = tx
                .execute(
                    "INSERT INTO invoices (partner_id, invoice_date, due_date, status, total_amount) VALUES (?1, ?2, ?3, ?4, 0.0)",
                    params![draft.partner_id, draft.invoice_date, draft.due_date, draft.status],
                )
                .map_err(|e| classify_reference(e, EntityKind::Partner, draft.partner_id))?;
            require::<Invoice, _>(tx, written.id)
        })?;
        tracing::info!(target: "nova", event = "invoice_created", id = invoice.id, partner_id = draft.partner_id);
        Ok(invoice)
    }

    /// Update the invoice header; the total is never touched here
    pub fn update_invoice(&self, id: i64, fields: &FieldMap) -> Result<Invoice, DomainError> {
        let draft = coerce::<NewInvoice>(fields)?;
        let invoice = self.store.transaction(|tx| {
            require::<Invoice, _>(tx, id)?;
            ensure_exists(tx, EntityKind::Partner, draft.partner_id)?;
            tx.execute(
                "UPDATE invoices SET partner_id = ?1, invoice_date = ?2, due_date = ?3, status = ?4 WHERE id = ?5",
                params![draft.partner_id, draft.invoice_date, draft.due_date, draft.status, id],
            )
            .map_err(|e| classify_reference(e, EntityKind::Partner, draft.partner_id))?;
            require::<Invoice, _>(tx, id)
        })?;
        tracing::info!(target: "nova", event = "invoice_updated", id);
        Ok(invoice)
    }

    /// Delete an invoice and all of its items; returns the number of items removed
    pub fn delete_invoice(&self, id: i64) -> Result<i64, DomainError> {
        let removed = self.store.transaction(|tx| {
            require::<Invoice, _>(tx, id)?;
            let removed =
                count(tx, "SELECT COUNT(*) AS n FROM invoice_items WHERE invoice_id = ?1", id)?;
            tx.execute("DELETE FROM invoices WHERE id = ?1", params![id])?;
            Ok::<_, DomainError>(removed)
        })?;
        tracing::info!(target: "nova", event = "invoice_deleted", id, items_removed = removed);
        Ok(removed)
    }

    pub fn invoice(&self, id: i64) -> Result<Invoice, DomainError> {
        require(&self.store, id)
    }

    pub fn invoices(&self) -> Result<Vec<Invoice>, DomainError> {
        Ok(list_where(&self.store, "", params![])?)
    }

    // ------------------------------------------------------------------
    // Invoice items
    // ------------------------------------------------------------------

    /// Add a line to an invoice and refresh the invoice total
    ///
    /// An absent or non-numeric `unit_price` resolves to the product's current price.
    pub fn add_item(&self, fields: &FieldMap) -> Result<InvoiceItem, DomainError> {
        let draft = coerce::<NewInvoiceItem>(fields)?;
        let (item, total) = self.store.transaction(|tx| {
            ensure_exists(tx, EntityKind::Invoice, draft.invoice_id)?;
            let product = find::<Product, _>(tx, draft.product_id)?.ok_or(DomainError::Reference {
                kind: EntityKind::Product,
                id: draft.product_id,
            })?;
            let unit_price = draft.unit_price.unwrap_or(product.price);
            let written = tx
                .execute(
                    "INSERT INTO invoice_items (invoice_id, product_id, quantity, unit_price, line_total) VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        draft.invoice_id,
                        draft.product_id,
                        draft.quantity,
                        unit_price,
                        line_total(draft.quantity, unit_price)
                    ],
                )
                .map_err(|e| classify_reference(e, EntityKind::Invoice, draft.invoice_id))?;
            let total = refresh_total(tx, draft.invoice_id)?;
            Ok::<_, DomainError>((require::<InvoiceItem, _>(tx, written.id)?, total))
        })?;
        tracing::info!(
            target: "nova",
            event = "item_added",
            id = item.id,
            invoice_id = item.invoice_id,
            line_total = item.line_total,
            invoice_total = total
        );
        Ok(item)
    }

    /// Change quantity and optionally unit price; an absent price keeps the stored one
    pub fn update_item(
        &self,
        item_id: i64,
        quantity: i64,
        unit_price: Option<f64>,
    ) -> Result<InvoiceItem, DomainError> {
        let mut errors = Vec::new();
        if quantity <= 0 {
            errors.push(FieldError {
                field: "quantity",
                kind: FieldErrorKind::NotPositive,
            });
        }
        match unit_price {
            Some(p) if !p.is_finite() => errors.push(FieldError {
                field: "unit_price",
                kind: FieldErrorKind::NotANumber,
            }),
            Some(p) if p < 0.0 => errors.push(FieldError {
                field: "unit_price",
                kind: FieldErrorKind::Negative,
            }),
            _ => {}
        }
        if !errors.is_empty() {
            return Err(DomainError::validation(
                EntityKind::InvoiceItem,
                ValidationErrors(errors),
            ));
        }

        let (item, total) = self.store.transaction(|tx| {
            let current = require::<InvoiceItem, _>(tx, item_id)?;
            let price = unit_price.unwrap_or(current.unit_price);
            tx.execute(
                "UPDATE invoice_items SET quantity = ?1, unit_price = ?2, line_total = ?3 WHERE id = ?4",
                params![quantity, price, line_total(quantity, price), item_id],
            )?;
            let total = refresh_total(tx, current.invoice_id)?;
            Ok::<_, DomainError>((require::<InvoiceItem, _>(tx, item_id)?, total))
        })?;
        tracing::info!(
            target: "nova",
            event = "item_updated",
            id = item_id,
            invoice_id = item.invoice_id,
            invoice_total = total
        );
        Ok(item)
    }

    /// Remove a line and refresh the invoice total; returns the new total
    pub fn delete_item(&self, item_id: i64) -> Result<f64, DomainError> {
        let (invoice_id, total) = self.store.transaction(|tx| {
            let current = require::<InvoiceItem, _>(tx, item_id)?;
            tx.execute("DELETE FROM invoice_items WHERE id = ?1", params![item_id])?;
            let total = refresh_total(tx, current.invoice_id)?;
            Ok::<_, DomainError>((current.invoice_id, total))
        })?;
        tracing::info!(target: "nova", event = "item_deleted", id = item_id, invoice_id, invoice_total = total);
        Ok(total)
    }

    pub fn item(&self, id: i64) -> Result<InvoiceItem, DomainError> {
        require(&self.store, id)
    }

    pub fn items(&self) -> Result<Vec<InvoiceItem>, DomainError> {
        Ok(list_where(&self.store, "", params![])?)
    }

    pub fn items_for_invoice(&self, invoice_id: i64) -> Result<Vec<InvoiceItem>, DomainError> {
        Ok(list_where(&self.store, "WHERE invoice_id = ?1", params![invoice_id])?)
    }

    // ------------------------------------------------------------------
    // Audit
    // ------------------------------------------------------------------

    /// Invoices whose stored total differs from the sum of their line totals
    pub fn check_totals(&self) -> Result<Vec<TotalMismatch>, DomainError> {
        let rows = self.store.fetch_all(
            r#"
            SELECT i.id AS invoice_id,
                   i.total_amount AS stored,
                   COALESCE(SUM(it.line_total), 0.0) AS computed
            FROM invoices i
            LEFT JOIN invoice_items it ON it.invoice_id = i.id
            GROUP BY i.id
            HAVING ABS(stored - computed) > 1e-9
            ORDER BY i.id
            "#,
            params![],
        )?;

        let mismatches = rows
            .iter()
            .map(|row| -> Result<TotalMismatch, StoreError> {
                Ok(TotalMismatch {
                    invoice_id: row.get("invoice_id")?,
                    stored: row.get("stored")?,
                    computed: row.get("computed")?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        if !mismatches.is_empty() {
            tracing::warn!(target: "nova", event = "total_mismatch", invoices = mismatches.len());
        }
        Ok(mismatches)
    }
}

fn coerce<T: Validate>(fields: &FieldMap) -> Result<T, DomainError> {
    T::from_fields(fields).map_err(|errors| {
        tracing::debug!(target: "nova", event = "validation_failed", kind = %T::KIND, errors = %errors);
        DomainError::validation(T::KIND, errors)
    })
}

fn find<T: Entity, G: Gateway + ?Sized>(gateway: &G, id: i64) -> Result<Option<T>, StoreError> {
    let sql = format!("SELECT * FROM {} WHERE id = ?1", T::KIND.table());
    gateway
        .fetch_one(&sql, params![id])?
        .map(|row| T::from_row(&row))
        .transpose()
}

fn require<T: Entity, G: Gateway + ?Sized>(gateway: &G, id: i64) -> Result<T, DomainError> {
    find(gateway, id)?.ok_or(DomainError::NotFound { kind: T::KIND, id })
}

fn list_where<T: Entity, G: Gateway + ?Sized>(
    gateway: &G,
    clause: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<T>, StoreError> {
    let sql = format!("SELECT * FROM {} {} ORDER BY id", T::KIND.table(), clause);
    gateway
        .fetch_all(&sql, params)?
        .iter()
        .map(T::from_row)
        .collect()
}

fn ensure_exists<G: Gateway + ?Sized>(gateway: &G, kind: EntityKind, id: i64) -> Result<(), DomainError> {
    let sql = format!("SELECT id FROM {} WHERE id = ?1", kind.table());
    match gateway.fetch_one(&sql, params![id])? {
        Some(_) => Ok(()),
        None => Err(DomainError::Reference { kind, id }),
    }
}

fn ensure_sku_free<G: Gateway + ?Sized>(
    gateway: &G,
    sku: &str,
    except: Option<i64>,
) -> Result<(), DomainError> {
    let taken = gateway.fetch_one(
        "SELECT id FROM products WHERE sku = ?1 AND (?2 IS NULL OR id <> ?2)",
        params![sku, except],
    )?;
    match taken {
        Some(_) => Err(DomainError::Uniqueness {
            sku: sku.to_string(),
        }),
        None => Ok(()),
    }
}

fn count<G: Gateway + ?Sized>(gateway: &G, sql: &str, id: i64) -> Result<i64, StoreError> {
    match gateway.fetch_one(sql, params![id])? {
        Some(row) => row.get("n"),
        None => Ok(0),
    }
}

/// Recompute and persist an invoice total from its stored line totals
fn refresh_total<G: Gateway + ?Sized>(gateway: &G, invoice_id: i64) -> Result<f64, StoreError> {
    gateway.execute(
        r#"
        UPDATE invoices
        SET total_amount = (
            SELECT COALESCE(SUM(line_total), 0.0) FROM invoice_items WHERE invoice_id = ?1
        )
        WHERE id = ?1
        "#,
        params![invoice_id],
    )?;
    let total = match gateway.fetch_one(
        "SELECT total_amount FROM invoices WHERE id = ?1",
        params![invoice_id],
    )? {
        Some(row) => row.get("total_amount")?,
        None => 0.0,
    };
    tracing::debug!(target: "nova", event = "total_recomputed", invoice_id, total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        Ledger::open_in_memory().unwrap()
    }

    fn partner(ledger: &Ledger, name: &str) -> Partner {
        ledger
            .create_partner(
                &FieldMap::new()
                    .with("name", name)
                    .with("tax_id", "TX")
                    .with("phone", "555")
                    .with("address", "Main St"),
            )
            .unwrap()
    }

    fn product(ledger: &Ledger, sku: &str, price: f64) -> Product {
        ledger
            .create_product(
                &FieldMap::new()
                    .with("sku", sku)
                    .with("name", "Widget")
                    .with("description", "A widget")
                    .with("price", price)
                    .with("stock", 10),
            )
            .unwrap()
    }

    fn invoice(ledger: &Ledger, partner_id: i64) -> Invoice {
        ledger
            .create_invoice(
                &FieldMap::new()
                    .with("partner_id", partner_id)
                    .with("invoice_date", "2024-03-01")
                    .with("status", "Draft"),
            )
            .unwrap()
    }

    #[test]
    fn test_new_invoice_starts_at_zero() {
        let ledger = ledger();
        let p = partner(&ledger, "Acme");
        let inv = invoice(&ledger, p.id);
        assert_eq!(inv.total_amount, 0.0);
        assert_eq!(inv.partner_id, Some(p.id));
    }

    #[test]
    fn test_create_invoice_for_missing_partner_is_reference_error() {
        let ledger = ledger();
        let err = ledger
            .create_invoice(
                &FieldMap::new()
                    .with("partner_id", 42)
                    .with("invoice_date", "2024-03-01")
                    .with("status", "Draft"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Reference {
                kind: EntityKind::Partner,
                id: 42
            }
        ));
        assert!(ledger.invoices().unwrap().is_empty());
    }

    #[test]
    fn test_add_item_with_missing_product_leaves_total_untouched() {
        let ledger = ledger();
        let p = partner(&ledger, "Acme");
        let inv = invoice(&ledger, p.id);
        let err = ledger
            .add_item(&NewInvoiceItem::new(inv.id, 99, 1, None).to_fields())
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Reference {
                kind: EntityKind::Product,
                ..
            }
        ));
        assert!(ledger.items_for_invoice(inv.id).unwrap().is_empty());
        assert_eq!(ledger.invoice(inv.id).unwrap().total_amount, 0.0);
    }

    #[test]
    fn test_update_item_keeps_price_when_absent() {
        let ledger = ledger();
        let p = partner(&ledger, "Acme");
        let prod = product(&ledger, "W-1", 4.0);
        let inv = invoice(&ledger, p.id);
        let item = ledger
            .add_item(&NewInvoiceItem::new(inv.id, prod.id, 2, Some(3.0)).to_fields())
            .unwrap();

        let item = ledger.update_item(item.id, 5, None).unwrap();
        assert_eq!(item.unit_price, 3.0);
        assert_eq!(item.line_total, 15.0);
        assert_eq!(ledger.invoice(inv.id).unwrap().total_amount, 15.0);

        let item = ledger.update_item(item.id, 1, Some(2.5)).unwrap();
        assert_eq!(item.line_total, 2.5);
        assert_eq!(ledger.invoice(inv.id).unwrap().total_amount, 2.5);
    }

    #[test]
    fn test_update_item_rejects_zero_quantity() {
        let ledger = ledger();
        let err = ledger.update_item(1, 0, Some(-1.0)).unwrap_err();
        assert_eq!(
            err.messages(),
            vec![
                "quantity must be a positive integer",
                "unit_price must be zero or greater"
            ]
        );
    }

    #[test]
    fn test_update_product_allows_own_sku() {
        let ledger = ledger();
        let a = product(&ledger, "A", 1.0);
        product(&ledger, "B", 1.0);

        let mut fields = a.to_fields();
        fields.insert("price", "2.5");
        let updated = ledger.update_product(a.id, &fields).unwrap();
        assert_eq!(updated.price, 2.5);

        fields.insert("sku", "B");
        let err = ledger.update_product(a.id, &fields).unwrap_err();
        assert!(matches!(err, DomainError::Uniqueness { sku } if sku == "B"));
    }

    #[test]
    fn test_update_invoice_never_touches_total() {
        let ledger = ledger();
        let p = partner(&ledger, "Acme");
        let prod = product(&ledger, "W-1", 4.0);
        let inv = invoice(&ledger, p.id);
        ledger
            .add_item(&NewInvoiceItem::new(inv.id, prod.id, 2, None).to_fields())
            .unwrap();

        let mut fields = ledger.invoice(inv.id).unwrap().to_fields();
        fields.insert("status", "Sent");
        fields.insert("total_amount", "0");
        let updated = ledger.update_invoice(inv.id, &fields).unwrap();
        assert_eq!(updated.status, "Sent");
        assert_eq!(updated.total_amount, 8.0);
    }

    #[test]
    fn test_delete_referenced_product_is_rejected() {
        let ledger = ledger();
        let p = partner(&ledger, "Acme");
        let prod = product(&ledger, "W-1", 4.0);
        let inv = invoice(&ledger, p.id);
        ledger
            .add_item(&NewInvoiceItem::new(inv.id, prod.id, 1, None).to_fields())
            .unwrap();

        let err = ledger.delete_product(prod.id).unwrap_err();
        assert!(matches!(err, DomainError::InUse { dependents: 1, .. }));
        assert!(ledger.product(prod.id).is_ok());

        let unused = product(&ledger, "W-2", 1.0);
        ledger.delete_product(unused.id).unwrap();
        assert!(matches!(
            ledger.product(unused.id),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_missing_rows_are_not_found() {
        let ledger = ledger();
        assert!(matches!(
            ledger.delete_item(7),
            Err(DomainError::NotFound {
                kind: EntityKind::InvoiceItem,
                id: 7
            })
        ));
        assert!(matches!(
            ledger.delete_partner(7),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_check_totals_flags_tampered_invoice() {
        let ledger = ledger();
        let p = partner(&ledger, "Acme");
        let prod = product(&ledger, "W-1", 4.0);
        let inv = invoice(&ledger, p.id);
        ledger
            .add_item(&NewInvoiceItem::new(inv.id, prod.id, 1, None).to_fields())
            .unwrap();
        assert!(ledger.check_totals().unwrap().is_empty());

        ledger
            .store()
            .execute(
                "UPDATE invoices SET total_amount = 99 WHERE id = ?1",
                params![inv.id],
            )
            .unwrap();
        let mismatches = ledger.check_totals().unwrap();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].computed, 4.0);
        assert_eq!(mismatches[0].stored, 99.0);
    }
}
