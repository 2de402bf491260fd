use std::path::PathBuf;

use anyhow::{Context, Result};
use biller_core::Biller;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use biller_cli::commands::{bills, compute, timeline};
use biller_cli::{Cli, Commands, Config, loader};

/// Load config, read the data file and reconstruct occupancy.
fn open_biller(cli: &Cli) -> Result<Biller> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let path: PathBuf = cli.data.clone().unwrap_or(config.data_path);
    let document = loader::load_document(&path)?;
    Biller::new(document).with_context(|| format!("invalid data in {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so reports on stdout stay clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Bills) => {
            let biller = open_biller(&cli)?;
            bills::run(biller.bills())?;
        }
        Some(Commands::Compute {
            bill,
            start,
            end,
            amount,
            json,
        }) => {
            let biller = open_biller(&cli)?;
            let args = compute::ComputeArgs {
                bill: bill.clone(),
                start: start.clone(),
                end: end.clone(),
                amount: amount.clone(),
            };
            compute::run(&biller, args, *json)?;
        }
        Some(Commands::Timeline) => {
            let biller = open_biller(&cli)?;
            timeline::run(&biller)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
