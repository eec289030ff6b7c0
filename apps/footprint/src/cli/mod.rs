//! # Footprint CLI Module
//!
//! ## Available Commands
//!
//! - `measure` - Print the footprint of a JSON document
//! - `trace` - Print the path of every object a measurement explores

mod commands;

use clap::{Parser, Subcommand};
use footprint::FootprintConfig;
use footprint_core::FootprintError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Footprint - object graph measurement
///
/// Loads a JSON document as an object graph and counts its objects,
/// references and primitives.
#[derive(Parser, Debug)]
#[command(name = "footprint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure the footprint of a JSON document
    Measure {
        /// Path to the input file
        #[arg(short, long)]
        file: PathBuf,

        /// Do not explore objects of this type (repeatable)
        #[arg(long = "skip-type")]
        skip_type: Vec<String>,
    },

    /// Print the path of each explored object in visit order
    Trace {
        /// Path to the input file
        #[arg(short, long)]
        file: PathBuf,

        /// Stop after this many objects
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), FootprintError> {
    let config = match &cli.config {
        Some(path) => FootprintConfig::from_file(path)?,
        None => FootprintConfig::default(),
    };
    let output = Output {
        json_mode: cli.json_mode,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Measure { file, skip_type } => cmd_measure(&config, output, &file, skip_type),
        Commands::Trace { file, limit } => cmd_trace(&config, output, &file, limit),
    }
}
