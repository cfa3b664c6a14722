//! `nova product` command - Product catalog management

use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{cancelled, confirm, open_ledger, prompt_fields};
use crate::cli::output::{print_list, print_record, print_written};
use crate::cli::GlobalOpts;
use crate::core::{Config, EntityKind, FieldMap};

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List all products
    List,

    /// Create a new product
    New(NewArgs),

    /// Show a product's details
    Show(IdArg),

    /// Change a product; only the given fields are replaced
    Edit(EditArgs),

    /// Delete a product that no invoice item uses
    Delete(DeleteArgs),

    /// List invoice items that sell a product
    Items(IdArg),
}

/// Product field flags
#[derive(clap::Args, Debug, Default)]
pub struct ProductFields {
    /// Stock keeping unit (unique)
    #[arg(long, short = 's')]
    pub sku: Option<String>,

    /// Product name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Unit price
    #[arg(long)]
    pub price: Option<String>,

    /// Units on hand
    #[arg(long)]
    pub stock: Option<String>,
}

impl ProductFields {
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        for (name, value) in [
            ("sku", &self.sku),
            ("name", &self.name),
            ("description", &self.description),
            ("price", &self.price),
            ("stock", &self.stock),
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
    pub fields: ProductFields,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct IdArg {
    /// Product ID
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Product ID
    pub id: i64,

    #[command(flatten)]
    pub fields: ProductFields,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Product ID
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run a product subcommand
pub fn run(cmd: ProductCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    match cmd {
        ProductCommands::List => run_list(global, config),
        ProductCommands::New(args) => run_new(args, global, config),
        ProductCommands::Show(args) => run_show(args, global, config),
        ProductCommands::Edit(args) => run_edit(args, global, config),
        ProductCommands::Delete(args) => run_delete(args, global, config),
        ProductCommands::Items(args) => run_items(args, global, config),
    }
}

fn run_list(global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let products = ledger.products()?;
    print_list(&products, global.format, "No products found.")
}

fn run_new(args: NewArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let fields = if args.interactive {
        prompt_fields(EntityKind::Product.input_fields(), &args.fields.to_fields())?
    } else {
        args.fields.to_fields()
    };

    let ledger = open_ledger(global, config)?;
    let product = ledger.create_product(&fields)?;
    let summary = format!("{} ({})", product.name, product.sku);
    print_written("Created", "product", product.id, &summary, global.format);
    Ok(())
}

fn run_show(args: IdArg, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let product = ledger.product(args.id)?;
    print_record(&format!("Product {}", product.id), &product, global.format)
}

fn run_edit(args: EditArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let mut fields = ledger.product(args.id)?.to_fields();
    fields.merge(args.fields.to_fields());

    let product = ledger.update_product(args.id, &fields)?;
    let summary = format!("{} ({})", product.name, product.sku);
    print_written("Updated", "product", product.id, &summary, global.format);
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let product = ledger.product(args.id)?;

    let prompt = format!("Delete product {} ({})?", product.id, product.sku);
    if !confirm(&prompt, args.yes)? {
        cancelled();
        return Ok(());
    }

    ledger.delete_product(args.id)?;
    print_written("Deleted", "product", args.id, "", global.format);
    Ok(())
}

fn run_items(args: IdArg, global: &GlobalOpts, config: &Config) -> Result<()> {
    let ledger = open_ledger(global, config)?;
    let items = ledger.items_for_product(args.id)?;
    print_list(&items, global.format, "No invoice items use this product.")
}
