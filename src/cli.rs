//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// modgather - collect antiSMASH module visualisations into one page
///
/// Walks INPUT for antiSMASH result directories (any depth), gathers the
/// module ("bubble") visualisation of every region and writes a single
/// browsable page into OUTPUT.
///
/// Examples:
///   modgather ./antismash_runs ./collected
///   modgather ./antismash_runs ./collected --assets /opt/antismash/dependencies
///   modgather --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing antiSMASH output directories
    #[arg(value_name = "INPUT", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Output location, created if it does not exist
    #[arg(value_name = "OUTPUT", required_unless_present = "init_config")]
    pub output: Option<PathBuf>,

    /// Directory holding the visualisation library (JS/CSS) to copy
    #[arg(long, value_name = "DIR", env = "MODGATHER_ASSETS")]
    pub assets: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .modgather.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .modgather.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    ///
    /// Path existence is checked by the pipeline so that it can report the
    /// proper fatal error; only flag combinations are checked here.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.input.is_none() || self.output.is_none() {
            return Err("Both INPUT and OUTPUT directories are required".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
