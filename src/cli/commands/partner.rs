//! `nova partner` command - Partner management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{cancelled, confirm, open_ledger, prompt_fields};
use crate::cli::output::{print_list, print_record, print_written};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, EntityKind, FieldMap};

#[derive(Subcommand, Debug)]
pub enum PartnerCommands {
    /// List all partners
    List,

    /// Create a new partner
    New(NewArgs),

    /// Show a partner's details
    Show(IdArg),

    /// Change a partner; only the given fields are replaced
    Edit(EditArgs),

    /// Delete a partner (its invoices are kept, unlinked)
    Delete(DeleteArgs),

    /// List invoices billed to a partner
    Invoices(IdArg),
}

/// Partner field flags
#[derive(clap::Args, Debug, Default)]
pub struct PartnerFields {
    /// Partner name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Tax identifier
    #[arg(long)]
    pub tax_id: Option<String>,

    /// Email address
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Phone number
    #[arg(long, short = 'p')]
    pub phone: Option<String>,

    /// Postal address
    #[arg(long, short = 'a')]
    pub address: Option<String>,
}

impl PartnerFields {
    /// Only the flags that were given
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        for (name, value) in [
            ("name", &self.name),
            ("tax_id", &self.tax_id),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ] {
            if let Some(value) = value {
                fields.insert(name, value.as_str());
            }
        }
        fields
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: PartnerFields,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct IdArg {
    /// Partner ID
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Partner ID
    pub id: i64,

    #[command(flatten)]
    pub fields: PartnerFields,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Partner ID
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run a partner subcommand
pub fn run(cmd: PartnerCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        PartnerCommands::List => run_list(global, config),
        PartnerCommands::New(args) => run_new(args, global, config),
        PartnerCommands::Show(args) => run_show(args, global, config),
        PartnerCommands::Edit(args) => run_edit(args, global, config),
        PartnerCommands::Delete(args) => run_delete(args, global, config),
        PartnerCommands::Invoices(args) => run_invoices(args, global, config),
    }
}

fn run_list(global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let partners = ledger.partners()?;
    print_list(&partners, global.format, "No partners found.")
}

fn run_new(args: NewArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let fields = if args.interactive {
        prompt_fields(EntityKind::Partner.input_fields(), &args.fields.to_fields())?
    } else {
        args.fields.to_fields()
    };

    let ledger = open_ledger(global, config)?;
    let partner = ledger.create_partner(&fields)?;
    print_written("Created", "partner", partner.id, &partner.name, global.format);
    Ok(())
}

fn run_show(args: IdArg, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let partner = ledger.partner(args.id)?;
    print_record(&format!("Partner {}", partner.id), &partner, global.format)
}

fn run_edit(args: EditArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let mut fields = ledger.partner(args.id)?.to_fields();
    fields.merge(args.fields.to_fields());

    let partner = ledger.update_partner(args.id, &fields)?;
    print_written("Updated", "partner", partner.id, &partner.name, global.format);
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let partner = ledger.partner(args.id)?;

    let prompt = format!("Delete partner {} ({})?", partner.id, partner.name);
    if !confirm(&prompt, args.yes)? {
        cancelled();
        return Ok(());
    }

    let detached = ledger.delete_partner(args.id)?;
    print_written("Deleted", "partner", args.id, "", global.format);
    if detached > 0 && global.format != OutputFormat::Id {
        println!(
            "   {} invoice(s) kept without a partner",
            style(detached).yellow()
        );
    }
    Ok(())
}

fn run_invoices(args: IdArg, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let invoices = ledger.invoices_for_partner(args.id)?;
    print_list(&invoices, global.format, "No invoices for this partner.")
}
