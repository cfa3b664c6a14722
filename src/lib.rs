//! NovaInvoice: a small invoicing record-keeper
//!
//! Partners, products, invoices and invoice items live in one SQLite file.
//! The [`core::ledger::Ledger`] validates every write and keeps invoice totals
//! equal to the sum of their line totals; [`core::transfer`] moves partners
//! and products in and out as CSV.

pub mod cli;
pub mod core;
pub mod entities;
pub mod logging;
