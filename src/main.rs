use clap::Parser;
use miette::Result;
use nova::cli::commands;
use nova::cli::{Cli, Commands};
use nova::core::Config;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let config = Config::load()?;
    nova::logging::init(cli.global.verbose, config.log.as_deref());

    let global = &cli.global;
    match cli.command {
        Commands::Init(args) => commands::init::run(args, global, &config),
        Commands::Partner(cmd) => commands::partner::run(cmd, global, &config),
        Commands::Product(cmd) => commands::product::run(cmd, global, &config),
        Commands::Invoice(cmd) => commands::invoice::run(cmd, global, &config),
        Commands::Item(cmd) => commands::item::run(cmd, global, &config),
        Commands::Import(args) => commands::transfer::run_import(args, global, &config),
        Commands::Export(args) => commands::transfer::run_export(args, global, &config),
        Commands::Report(cmd) => commands::report::run(cmd, global, &config),
        Commands::Check(args) => commands::check::run(args, global, &config),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
