//! `nova item` command - Invoice line items

use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{cancelled, confirm, money, open_ledger};
use crate::cli::output::print_written;
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::entities::NewInvoiceItem;

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add a line to an invoice
    Add(AddArgs),

    /// Change the quantity or unit price of a line
    Edit(EditArgs),

    /// Remove a line from its invoice
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Invoice ID
    #[arg(long)]
    pub invoice: i64,

    /// Product ID
    #[arg(long, short = 'p')]
    pub product: i64,

    /// Quantity (positive)
    #[arg(long, short = 'q', allow_negative_numbers = true)]
    pub quantity: i64,

    /// Unit price (defaults to the product's current price)
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Item ID
    pub id: i64,

    /// New quantity
    #[arg(long, short = 'q', allow_negative_numbers = true)]
    pub quantity: Option<i64>,

    /// New unit price (keeps the stored price when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Item ID
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run an item subcommand
pub fn run(cmd: ItemCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        ItemCommands::Add(args) => run_add(args, global, config),
        ItemCommands::Edit(args) => run_edit(args, global, config),
        ItemCommands::Delete(args) => run_delete(args, global, config),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let draft = NewInvoiceItem::new(args.invoice, args.product, args.quantity, args.price);
    let item = ledger.add_item(&draft.to_fields())?;
    let total = ledger.invoice(item.invoice_id)?.total_amount;

    let summary = format!(
        "{} x {} = {}, invoice total {}",
        item.quantity,
        money(item.unit_price),
        money(item.line_total),
        money(total)
    );
    print_written("Added", "item", item.id, &summary, global.format);
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let current = ledger.item(args.id)?;
    let quantity = args.quantity.unwrap_or(current.quantity);

    let item = ledger.update_item(args.id, quantity, args.price)?;
    let total = ledger.invoice(item.invoice_id)?.total_amount;
    let summary = format!(
        "line total {}, invoice total {}",
        money(item.line_total),
        money(total)
    );
    print_written("Updated", "item", item.id, &summary, global.format);
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let item = ledger.item(args.id)?;

    let prompt = format!("Remove item {} from invoice {}?", item.id, item.invoice_id);
    if !confirm(&prompt, args.yes)? {
        cancelled();
        return Ok(());
    }

    let total = ledger.delete_item(args.id)?;
    let summary = format!("invoice {} total {}", item.invoice_id, money(total));
    print_written("Deleted", "item", args.id, &summary, global.format);
    Ok(())
}
