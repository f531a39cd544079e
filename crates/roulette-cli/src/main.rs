mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!(
        "🎰 ChargeRoulette CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let quiet = cli.quiet;
    let command_result = match cli.command {
        Commands::Spin(args) => {
            info!("Dispatching to 'spin' command.");
            commands::spin::run(args, quiet)
        }
        Commands::Extract(args) => {
            info!("Dispatching to 'extract' command.");
            commands::extract::run(args, quiet)
        }
    };

    match &command_result {
        Ok(()) => {
            info!("✅ Command completed successfully.");
            if !quiet {
                println!("✅ Command completed successfully.");
            }
        }
        Err(e) => error!("Command failed: {}", e),
    }

    command_result
}
