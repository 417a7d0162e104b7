//! lamp-store CLI
//!
//! Builds the bundled reading database from the JSON resources and copies it
//! to where the consumer application picks it up.

mod cli_types;
mod commands;
mod error;
mod logging;
mod progress;
mod settings;

use clap::Parser;

use cli_types::{Cli, Commands, PathArgs};
pub(crate) use error::CliError;

/// Print an empty line through the logger so it lands in `--logfile` too.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, cli.quiet) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, quiet: bool) -> Result<(), CliError> {
    match command {
        Commands::Build { paths } => {
            let resolved = settings::resolve_from_settings(&paths)?;
            commands::build::run_build(&resolved, quiet)
        }
        Commands::Reset { store, confirm } => {
            let resolved = settings::resolve_from_settings(&PathArgs {
                store,
                ..Default::default()
            })?;
            commands::reset::run_reset(&resolved.store_path, confirm)
        }
        Commands::Stats { path } => {
            let path = match path {
                Some(p) => p,
                None => settings::resolve_from_settings(&PathArgs::default())?.output_path(),
            };
            commands::stats::run_stats(&path)
        }
        Commands::Config { paths } => {
            let resolved = settings::resolve_from_settings(&paths)?;
            commands::config::run_config_show(&resolved);
            Ok(())
        }
    }
}
