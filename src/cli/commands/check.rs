//! `nova check` command - Invoice total audit

use console::style;
use miette::{bail, Result};

use crate::cli::helpers::open_ledger;
use crate::cli::output::print_list;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {}

pub fn run(_args: CheckArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let mismatches = ledger.check_totals()?;

    if mismatches.is_empty() {
        if global.format == OutputFormat::Table {
            println!("{} All invoice totals match their items", style("✓").green());
        } else {
            print_list(&mismatches, global.format, "")?;
        }
        return Ok(());
    }

    print_list(&mismatches, global.format, "")?;
    bail!("{} invoice total(s) do not match their items", mismatches.len());
}
