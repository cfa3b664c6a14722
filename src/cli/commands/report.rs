//! `nova report` command - Sales reports

use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::open_ledger;
use crate::cli::output::print_list;
use crate::cli::GlobalOpts;
use crate::core::report::{best_sellers, product_sales, top_invoices};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Quantity sold and revenue for every product
    Sales,

    /// The ten best selling products
    Best,

    /// The fifteen largest invoices
    TopInvoices,
}

/// Run a report subcommand
pub fn run(cmd: ReportCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    match cmd {
        ReportCommands::Sales => print_list(&product_sales(&ledger)?, global.format, "No sales yet."),
        ReportCommands::Best => print_list(&best_sellers(&ledger)?, global.format, "No sales yet."),
        ReportCommands::TopInvoices => {
            print_list(&top_invoices(&ledger)?, global.format, "No invoices found.")
        }
    }
}
