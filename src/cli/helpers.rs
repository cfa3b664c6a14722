//! Shared helper functions for CLI commands

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::{Config, FieldMap, Ledger};

/// Open the ledger at the resolved database path
pub fn open_ledger(global: &GlobalOpts, config: &Config) -> Result<Ledger> {
    let path = config.database_path(global.db.as_deref());
    tracing::debug!(target: "nova", event = "db_path_resolved", path = %path.display());
    Ok(Ledger::open(&path)?)
}

/// Ask for confirmation unless `yes` was given
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

/// Prompt for each field, offering the current value as the default
pub fn prompt_fields(fields: &[&str], current: &FieldMap) -> Result<FieldMap> {
    let theme = ColorfulTheme::default();
    let mut answers = FieldMap::new();
    for &field in fields {
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(field)
            .allow_empty(true);
        if let Some(value) = current.present(field) {
            input = input.default(value.as_text());
        }
        let answer = input.interact_text().into_diagnostic()?;
        answers.insert(field, answer);
    }
    Ok(answers)
}

/// Print a cancellation notice
pub fn cancelled() {
    println!("{}", style("Cancelled.").dim());
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Money amounts in tables
pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}
