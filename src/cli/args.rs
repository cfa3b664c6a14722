//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, init::InitArgs, invoice::InvoiceCommands,
    item::ItemCommands, partner::PartnerCommands, product::ProductCommands,
    report::ReportCommands, transfer::ExportArgs, transfer::ImportArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "nova",
    version,
    about = "NovaInvoice - keep partners, products and invoices consistent",
    long_about = "NovaInvoice - a small invoicing record-keeper.\n\n\
                  Partners, products, invoices and invoice items are kept in one SQLite \
                  file. Invoice totals are maintained automatically as items change, and \
                  partners and products can be bulk imported from CSV."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Database file (defaults to the config file setting, then the data directory)
    #[arg(long, global = true, env = "NOVA_DB")]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Log engine activity to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Comma-separated values with a header row
    Csv,
    /// Pretty-printed JSON
    Json,
    /// Identities only, one per line
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and its schema
    Init(InitArgs),

    /// Manage partners (customers and counterparties)
    #[command(subcommand)]
    Partner(PartnerCommands),

    /// Manage the product catalog
    #[command(subcommand)]
    Product(ProductCommands),

    /// Manage invoices
    #[command(subcommand)]
    Invoice(InvoiceCommands),

    /// Manage invoice line items
    #[command(subcommand)]
    Item(ItemCommands),

    /// Bulk import partners or products from CSV
    Import(ImportArgs),

    /// Export a table as CSV
    Export(ExportArgs),

    /// Sales reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Verify that every invoice total matches its items
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
