//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Shared-residence bill splitter.
///
/// Reconstructs who lived in the residence on each day from a log of
/// move-in/move-out/skip activities, then splits bills between families.
#[derive(Debug, Parser)]
#[command(name = "biller", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the data file (YAML or JSON). Overrides the configured path.
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the bills defined in the data file.
    Bills,

    /// Compute a bill. Missing arguments are asked for interactively.
    Compute {
        /// Bill index or description.
        bill: Option<String>,

        /// First day of the billing period, inclusive (YYYYMMDD).
        start: Option<String>,

        /// Last day of the billing period, inclusive (YYYYMMDD).
        end: Option<String>,

        /// Total amount to split.
        amount: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the reconstructed occupancy timeline.
    Timeline,
}
