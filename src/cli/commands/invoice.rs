//! `nova invoice` command - Invoice management

use chrono::Local;
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{cancelled, confirm, money, open_ledger};
use crate::cli::output::{print_list, print_record, print_written};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::validation::DATE_FORMAT;
use crate::core::{Config, FieldMap, InvoiceStatus};

#[derive(Subcommand, Debug)]
pub enum InvoiceCommands {
    /// List all invoices
    List,

    /// Create a new invoice with no items
    New(NewArgs),

    /// Show an invoice with its items
    Show(IdArg),

    /// Change an invoice header; the total is maintained from its items
    Edit(EditArgs),

    /// Delete an invoice and all of its items
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Billed partner ID
    #[arg(long, short = 'p')]
    pub partner: Option<i64>,

    /// Invoice date, YYYY-MM-DD (defaults to today)
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    /// Due date, YYYY-MM-DD
    #[arg(long)]
    pub due: Option<String>,

    /// Status
    #[arg(long, short = 's', value_enum, default_value_t = InvoiceStatus::Draft)]
    pub status: InvoiceStatus,
}

#[derive(clap::Args, Debug)]
pub struct IdArg {
    /// Invoice ID
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Invoice ID
    pub id: i64,

    /// Billed partner ID
    #[arg(long, short = 'p')]
    pub partner: Option<i64>,

    /// Invoice date, YYYY-MM-DD
    #[arg(long, short = 'd')]
    pub date: Option<String>,

    /// Due date, YYYY-MM-DD (empty to clear)
    #[arg(long)]
    pub due: Option<String>,

    /// Status
    #[arg(long, short = 's', value_enum)]
    pub status: Option<InvoiceStatus>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Invoice ID
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run an invoice subcommand
pub fn run(cmd: InvoiceCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        InvoiceCommands::List => run_list(global, config),
        InvoiceCommands::New(args) => run_new(args, global, config),
        InvoiceCommands::Show(args) => run_show(args, global, config),
        InvoiceCommands::Edit(args) => run_edit(args, global, config),
        InvoiceCommands::Delete(args) => run_delete(args, global, config),
    }
}

fn run_list(global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let invoices = ledger.invoices()?;
    print_list(&invoices, global.format, "No invoices found.")
}

fn run_new(args: NewArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let date = args
        .date
        .unwrap_or_else(|| Local::now().date_naive().format(DATE_FORMAT).to_string());

    let mut fields = FieldMap::new()
        .with("invoice_date", date)
        .with("status", args.status.to_string());
    if let Some(partner) = args.partner {
        fields.insert("partner_id", partner);
    }
    if let Some(due) = args.due {
        fields.insert("due_date", due);
    }

    let ledger = open_ledger(global, config)?;
    let invoice = ledger.create_invoice(&fields)?;
    let summary = format!("{} dated {}", invoice.status, invoice.invoice_date);
    print_written("Created", "invoice", invoice.id, &summary, global.format);
    Ok(())
}

fn run_show(args: IdArg, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let invoice = ledger.invoice(args.id)?;
    let items = ledger.items_for_invoice(args.id)?;

    match global.format {
        OutputFormat::Table => {
            print_record(&format!("Invoice {}", invoice.id), &invoice, global.format)?;
            if let Some(partner_id) = invoice.partner_id {
                if let Ok(partner) = ledger.partner(partner_id) {
                    println!("{}: {}", style("partner").bold(), style(&partner.name).yellow());
                }
            }
            println!();
            print_list(&items, global.format, "No items on this invoice.")?;
            println!(
                "{}: {}",
                style("Total").bold(),
                style(money(invoice.total_amount)).green()
            );
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::json!({ "invoice": invoice, "items": items });
            let text = serde_json::to_string_pretty(&json).into_diagnostic()?;
            println!("{}", text);
            Ok(())
        }
        other => print_record(&format!("Invoice {}", invoice.id), &invoice, other),
    }
}

fn run_edit(args: EditArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let mut fields = ledger.invoice(args.id)?.to_fields();
    if let Some(partner) = args.partner {
        fields.insert("partner_id", partner);
    }
    if let Some(date) = args.date {
        fields.insert("invoice_date", date);
    }
    if let Some(due) = args.due {
        fields.insert("due_date", due);
    }
    if let Some(status) = args.status {
        fields.insert("status", status.to_string());
    }

    let invoice = ledger.update_invoice(args.id, &fields)?;
    let summary = format!("{} dated {}", invoice.status, invoice.invoice_date);
    print_written("Updated", "invoice", invoice.id, &summary, global.format);
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let invoice = ledger.invoice(args.id)?;
    let items = ledger.items_for_invoice(args.id)?.len();

    let prompt = format!(
        "Delete invoice {} and its {} item(s)?",
        invoice.id, items
    );
    if !confirm(&prompt, args.yes)? {
        cancelled();
        return Ok(());
    }

    let removed = ledger.delete_invoice(args.id)?;
    let summary = format!("{} item(s) removed", removed);
    print_written("Deleted", "invoice", args.id, &summary, global.format);
    Ok(())
}
