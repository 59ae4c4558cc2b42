//! modgather - antiSMASH module visualisation collector
//!
//! A CLI tool that finds every antiSMASH result directory below an input
//! directory and builds one webpage showing the module visualisations of
//! all of their regions.
//!
//! Exit codes:
//!   0 - Success (skipped result sets are reported as warnings)
//!   1 - Input or output directory unusable, or other runtime error

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod parser;
mod pipeline;
mod report;
mod scanner;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so the config file can enable verbose output
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("modgather v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_gather(&args, &config) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Gathering failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .modgather.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to point at your antiSMASH dependencies or rename output files.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the gather workflow and print a summary.
fn run_gather(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    let input: PathBuf = args.input.clone().unwrap_or_default();
    let output: PathBuf = args.output.clone().unwrap_or_default();

    if !args.quiet {
        println!("🔍 Collecting antiSMASH results from: {}", input.display());
    }

    let summary = pipeline::run(config, &input, &output, !args.quiet)
        .with_context(|| format!("Failed to gather modules from {}", input.display()))?;

    if summary.duplicate_modules > 0 {
        warn!(
            "{} module(s) appeared twice in the same result set; later copies were kept",
            summary.duplicate_modules
        );
    }

    if args.quiet {
        return Ok(());
    }

    let duration = start_time.elapsed().as_secs_f64();
    println!("\n📊 Summary:");
    println!("   Result sets found: {}", summary.result_sets_found);
    if summary.result_sets_skipped > 0 {
        println!("   Result sets skipped: {}", summary.result_sets_skipped);
    }
    println!("   Modules rendered: {}", summary.bundle.modules);
    println!("   Assets copied: {}", summary.bundle.assets_copied);
    println!("   Data file: {}", summary.bundle.data_path.display());
    println!("   Duration: {:.1}s", duration);
    println!(
        "\n✅ Done! Open {} in a browser.",
        summary.bundle.index_path.display()
    );

    Ok(())
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    let mut config = if let Some(ref config_path) = args.config {
        Config::load(config_path)?
    } else {
        // Try default location
        match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE_NAME, e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    Ok(config)
}
