use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Discrete-time fuel-cycle simulator — regions, institutions, and
/// facilities trading conserved material through commodity markets.
#[derive(Parser)]
#[command(name = "fuelcycle", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a scenario to its horizon
    Run {
        /// Path to the scenario JSON file
        file: PathBuf,

        /// Print the full trade ledger after the run
        #[arg(long)]
        verbose: bool,
    },

    /// Validate a scenario JSON file
    Validate {
        /// Path to the scenario JSON file
        file: PathBuf,
    },

    /// Output the JSON schema for scenario definitions
    Schema,

    /// Output an example scenario JSON to stdout
    Example,

    /// List all available facility kinds
    ListKinds,

    /// Visualize the agent tree as ASCII or DOT
    Visualize {
        /// Path to the scenario JSON file
        file: PathBuf,

        /// Output format: ascii (default) or dot
        #[arg(long, default_value = "ascii")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}
