//! `nova import` / `nova export` commands - CSV bulk transfer

use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_ledger;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::transfer::{export_csv, export_rows, import_csv, write_csv};
use crate::core::{Config, EntityKind};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// What the file contains (partner or product)
    #[arg(value_enum)]
    pub kind: EntityKind,

    /// CSV file with a header row
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Which table to export
    #[arg(value_enum)]
    pub kind: EntityKind,

    /// Output file (stdout when omitted)
    pub file: Option<PathBuf>,
}

pub fn run_import(args: ImportArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let report = import_csv(&ledger, args.kind, &args.file)?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
            println!("{}", json);
        }
        _ => {
            println!(
                "{} Imported {} {} record(s) from {}",
                style("✓").green(),
                style(report.accepted).cyan(),
                args.kind,
                style(args.file.display()).dim()
            );

            if !report.errors.is_empty() {
                println!(
                    "{} {} row(s) rejected:",
                    style("✗").red(),
                    style(report.rejected()).red()
                );
                for row in report.errors.iter().take(config.max_reported_errors) {
                    println!("   row {}: {}", row.index, row.errors.join("; "));
                }
                let hidden = report.rejected().saturating_sub(config.max_reported_errors);
                if hidden > 0 {
                    println!("   {}", style(format!("... and {} more", hidden)).dim());
                }
            }
        }
    }
    Ok(())
}

pub fn run_export(args: ExportArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;

    match args.file {
        Some(path) => {
            let rows = export_csv(&ledger, args.kind, &path)?;
            eprintln!(
                "{} Exported {} {} record(s) to {}",
                style("✓").green(),
                style(rows).cyan(),
                args.kind,
                style(path.display()).dim()
            );
        }
        None => {
            let table = export_rows(&ledger, args.kind)?;
            write_csv(std::io::stdout(), &table)?;
        }
    }
    Ok(())
}
