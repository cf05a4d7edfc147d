mod aggregate;
mod cli;
mod columns;
mod controller;
mod error;
mod fmt;
mod grid;
mod ingest;
mod logging;
mod markup;
mod models;
mod rollup;
mod settings;
mod tui;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::View { .. } => logging::init_file(&cli::view::log_path()),
        _ => logging::init_stderr(),
    }

    let result = match cli.command {
        Commands::View { source, mode } => cli::view::run(&source, mode),
        Commands::Report {
            source,
            mode,
            filters,
            format,
            output,
        } => cli::report::run(&source, mode, &filters, format, output.as_deref()),
        Commands::Rollup {
            sales,
            catalog,
            output,
        } => cli::rollup::run(&sales, &catalog, output.as_deref()),
        Commands::Settings {
            default_mode,
            currency_prefix,
            page_length,
            locale,
            data_dir,
        } => cli::settings::run(cli::settings::SettingsUpdate {
            default_mode,
            currency_prefix,
            page_length,
            locale,
            data_dir,
        }),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
