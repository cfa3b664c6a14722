//! Output formatting utilities

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::{money, truncate_str};
use crate::cli::OutputFormat;
use crate::core::report::{InvoiceRank, ProductSales};
use crate::core::TotalMismatch;
use crate::entities::{Invoice, InvoiceItem, Partner, Product};

/// Records that can be printed as rows
pub trait Tabular: Serialize {
    const HEADERS: &'static [&'static str];

    /// Cell text, in header order; the first cell identifies the record
    fn cells(&self) -> Vec<String>;

    /// Cells for human-readable tables, shortened or formatted where useful
    fn display_cells(&self) -> Vec<String> {
        self.cells()
    }
}

/// Print a collection in the requested format
pub fn print_list<T: Tabular>(items: &[T], format: OutputFormat, empty: &str) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", style(empty).dim());
                return Ok(());
            }
            let mut builder = Builder::default();
            builder.push_record(T::HEADERS.iter().map(|h| h.to_uppercase()));
            for item in items {
                builder.push_record(item.display_cells());
            }
            let mut table = builder.build();
            table.with(Style::sharp());
            println!("{}", table);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(T::HEADERS).into_diagnostic()?;
            for item in items {
                wtr.write_record(item.cells()).into_diagnostic()?;
            }
            wtr.flush().into_diagnostic()?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => {
            for item in items {
                if let Some(id) = item.cells().into_iter().next() {
                    println!("{}", id);
                }
            }
        }
    }
    Ok(())
}

/// Print one record; tables are shown as labelled fields
pub fn print_record<T: Tabular>(title: &str, item: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}", style(title).bold());
            println!("{}", style("─".repeat(60)).dim());
            for (header, value) in T::HEADERS.iter().zip(item.display_cells()) {
                let value = if value.is_empty() { "-".to_string() } else { value };
                println!("{}: {}", style(header).bold(), value);
            }
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).into_diagnostic()?;
            println!("{}", json);
            Ok(())
        }
        other => print_list(std::slice::from_ref(item), other, ""),
    }
}

/// Report a newly written record
pub fn print_written(verb: &str, noun: &str, id: i64, summary: &str, format: OutputFormat) {
    match format {
        OutputFormat::Id => println!("{}", id),
        _ => {
            println!(
                "{} {} {} {}",
                style("✓").green(),
                verb,
                noun,
                style(id).cyan()
            );
            if !summary.is_empty() {
                println!("   {}", style(summary).yellow());
            }
        }
    }
}

fn opt_text<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl Tabular for Partner {
    const HEADERS: &'static [&'static str] = &["id", "name", "tax_id", "email", "phone", "address"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.tax_id.clone(),
            opt_text(&self.email),
            self.phone.clone(),
            self.address.clone(),
        ]
    }

    fn display_cells(&self) -> Vec<String> {
        let mut cells = self.cells();
        cells[5] = truncate_str(&cells[5], 40);
        cells
    }
}

impl Tabular for Product {
    const HEADERS: &'static [&'static str] = &["id", "sku", "name", "description", "price", "stock"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.sku.clone(),
            self.name.clone(),
            self.description.clone(),
            self.price.to_string(),
            self.stock.to_string(),
        ]
    }

    fn display_cells(&self) -> Vec<String> {
        let mut cells = self.cells();
        cells[3] = truncate_str(&self.description, 40);
        cells[4] = money(self.price);
        cells
    }
}

impl Tabular for Invoice {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "partner_id",
        "invoice_date",
        "due_date",
        "status",
        "total_amount",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            opt_text(&self.partner_id),
            self.invoice_date.to_string(),
            opt_text(&self.due_date),
            self.status.clone(),
            self.total_amount.to_string(),
        ]
    }

    fn display_cells(&self) -> Vec<String> {
        let mut cells = self.cells();
        cells[5] = money(self.total_amount);
        cells
    }
}

impl Tabular for InvoiceItem {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "invoice_id",
        "product_id",
        "quantity",
        "unit_price",
        "line_total",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.invoice_id.to_string(),
            self.product_id.to_string(),
            self.quantity.to_string(),
            self.unit_price.to_string(),
            self.line_total.to_string(),
        ]
    }

    fn display_cells(&self) -> Vec<String> {
        let mut cells = self.cells();
        cells[4] = money(self.unit_price);
        cells[5] = money(self.line_total);
        cells
    }
}

impl Tabular for ProductSales {
    const HEADERS: &'static [&'static str] = &["product_id", "sku", "name", "quantity", "revenue"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.sku.clone(),
            self.name.clone(),
            self.quantity.to_string(),
            self.revenue.to_string(),
        ]
    }

    fn display_cells(&self) -> Vec<String> {
        let mut cells = self.cells();
        cells[4] = money(self.revenue);
        cells
    }
}

impl Tabular for InvoiceRank {
    const HEADERS: &'static [&'static str] =
        &["invoice_id", "invoice_date", "partner", "status", "total_amount"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.invoice_id.to_string(),
            self.invoice_date.clone(),
            opt_text(&self.partner),
            self.status.clone(),
            self.total_amount.to_string(),
        ]
    }

    fn display_cells(&self) -> Vec<String> {
        let mut cells = self.cells();
        if self.partner.is_none() {
            cells[2] = "(removed)".to_string();
        }
        cells[4] = money(self.total_amount);
        cells
    }
}

impl Tabular for TotalMismatch {
    const HEADERS: &'static [&'static str] = &["invoice_id", "stored", "computed"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.invoice_id.to_string(),
            self.stored.to_string(),
            self.computed.to_string(),
        ]
    }
}
