//! The gather pipeline: locate, parse, merge, write.
//!
//! Stages run one after another on a single thread. Problems with an
//! individual result set are logged and skipped; only the input and output
//! roots can fail a run.

use crate::analysis::MergedDataset;
use crate::config::Config;
use crate::error::GatherError;
use crate::parser::ResultParser;
use crate::report::{BundleBuilder, BundleOptions, BundleSummary};
use crate::scanner::{ResultScanner, ScanConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{info, warn};

/// Outcome of a complete run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Result sets discovered under the input root.
    pub result_sets_found: usize,
    /// Result sets that could not be parsed and were skipped.
    pub result_sets_skipped: usize,
    /// Modules that replaced an earlier module with the same key.
    pub duplicate_modules: usize,
    pub bundle: BundleSummary,
}

/// Gather every result set below `input` into a bundle at `output`.
pub fn run(
    config: &Config,
    input: &Path,
    output: &Path,
    show_progress: bool,
) -> Result<RunSummary, GatherError> {
    let scanner = ResultScanner::new(input.to_path_buf(), ScanConfig::from(&config.scanner));
    let result_sets = scanner.scan()?;

    let builder = BundleBuilder::new(output.to_path_buf(), BundleOptions::from(&config.bundle));
    builder.check()?;

    let parser = ResultParser::new(&config.parser);
    let progress = make_progress_bar(show_progress);

    let mut dataset = MergedDataset::new();
    let mut found = 0;
    let mut skipped = 0;

    for descriptor in result_sets {
        found += 1;
        progress.set_message(descriptor.name.clone());

        match parser.parse(&descriptor) {
            Ok(records) => dataset.extend(records),
            Err(e) => {
                progress.suspend(|| {
                    warn!("Skipping result set {}: {}", descriptor.dir.display(), e);
                });
                skipped += 1;
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();
    if dataset.is_empty() {
        warn!("No module visualisations found below {}", input.display());
    }
    info!(
        "Found {} result set(s), {} skipped, {} module(s) gathered",
        found,
        skipped,
        dataset.len()
    );

    let bundle = builder.write(&dataset)?;

    Ok(RunSummary {
        result_sets_found: found,
        result_sets_skipped: skipped,
        duplicate_modules: dataset.duplicates(),
        bundle,
    })
}

/// Spinner over result sets; the total is unknown while the walk is lazy.
fn make_progress_bar(show_progress: bool) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} result set(s) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}
