//! `nova init` command - Create the database

use console::style;
use miette::Result;

use crate::cli::helpers::open_ledger;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::schema::SCHEMA_VERSION;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct InitArgs {}

pub fn run(_args: InitArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let location = ledger
        .store()
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    match global.format {
        OutputFormat::Id => println!("{}", location),
        _ => {
            println!(
                "{} Initialized database at {}",
                style("✓").green(),
                style(&location).cyan()
            );
            println!("   {}", style(format!("schema version {}", SCHEMA_VERSION)).dim());
        }
    }
    Ok(())
}
