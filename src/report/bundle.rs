//! Output bundle writing.
//!
//! Copies the visualisation library into the output directory and writes
//! the generated page and data file next to it. Existing files at the same
//! paths are overwritten; nothing else in the output directory is touched.

use super::generator::{generate_data_js, generate_index_html, PageOptions};
use crate::analysis::MergedDataset;
use crate::config::BundleConfig;
use crate::error::GatherError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Library files the generated page loads directly.
pub const REQUIRED_ASSETS: &[&str] = &["custom_antismash.js", "jquery.js", "style.css"];

/// Options for writing a bundle.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Directory holding the visualisation library.
    pub assets_dir: PathBuf,
    /// Subdirectory of the output receiving the library.
    pub assets_subdir: String,
    pub data_file: String,
    pub index_file: String,
    pub title: String,
}

impl From<&BundleConfig> for BundleOptions {
    fn from(config: &BundleConfig) -> Self {
        Self {
            assets_dir: config.resolved_assets_dir(),
            assets_subdir: config.assets_subdir.clone(),
            data_file: config.data_file.clone(),
            index_file: config.index_file.clone(),
            title: config.title.clone(),
        }
    }
}

impl BundleOptions {
    fn page_options(&self) -> PageOptions {
        PageOptions {
            title: self.title.clone(),
            assets_subdir: self.assets_subdir.clone(),
            data_file: self.data_file.clone(),
        }
    }
}

/// What a bundle write produced.
#[derive(Debug, Clone)]
pub struct BundleSummary {
    pub index_path: PathBuf,
    pub data_path: PathBuf,
    pub assets_copied: usize,
    pub modules: usize,
}

/// Writer for the output directory.
pub struct BundleBuilder {
    output_dir: PathBuf,
    options: BundleOptions,
}

impl BundleBuilder {
    pub fn new(output_dir: PathBuf, options: BundleOptions) -> Self {
        Self {
            output_dir,
            options,
        }
    }

    /// Fail early if the output path or the assets cannot be used.
    ///
    /// Nothing is created here, so a run that stops after this check leaves
    /// the filesystem as it was.
    pub fn check(&self) -> Result<(), GatherError> {
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(GatherError::OutputNotDirectory(self.output_dir.clone()));
        }

        for name in REQUIRED_ASSETS {
            if !self.options.assets_dir.join(name).is_file() {
                return Err(GatherError::MissingAsset {
                    name: name.to_string(),
                    dir: self.options.assets_dir.clone(),
                });
            }
        }

        Ok(())
    }

    /// Write the complete bundle for `dataset`.
    pub fn write(&self, dataset: &MergedDataset) -> Result<BundleSummary, GatherError> {
        self.check()?;

        fs::create_dir_all(&self.output_dir).map_err(|source| GatherError::OutputWrite {
            path: self.output_dir.clone(),
            source,
        })?;

        let assets_copied = self.copy_assets()?;

        let data_path = self.output_dir.join(&self.options.data_file);
        write_file(&data_path, &generate_data_js(dataset)?)?;

        let index_path = self.output_dir.join(&self.options.index_file);
        let html = generate_index_html(dataset, &self.options.page_options());
        write_file(&index_path, &html)?;

        info!(
            "Wrote {} module(s) to {}",
            dataset.len(),
            index_path.display()
        );

        Ok(BundleSummary {
            index_path,
            data_path,
            assets_copied,
            modules: dataset.len(),
        })
    }

    /// Copy every file of the assets directory, keeping its layout.
    fn copy_assets(&self) -> Result<usize, GatherError> {
        let source_root = &self.options.assets_dir;
        let target_root = self.output_dir.join(&self.options.assets_subdir);
        let mut copied = 0;

        // the output may itself live inside the assets directory
        let output_dir = fs::canonicalize(&self.output_dir).ok();
        let walker = WalkDir::new(source_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_same_dir(entry, output_dir.as_deref()));

        for entry in walker {
            let entry = entry.map_err(|e| GatherError::AssetRead {
                path: e.path().unwrap_or(source_root.as_path()).to_path_buf(),
                source: e.into(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(source_root).unwrap_or(entry.path());
            let target = target_root.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|source| GatherError::OutputWrite {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            fs::copy(entry.path(), &target).map_err(|source| GatherError::OutputWrite {
                path: target.clone(),
                source,
            })?;
            debug!("Copied asset {}", relative.display());
            copied += 1;
        }

        Ok(copied)
    }
}

fn is_same_dir(entry: &DirEntry, dir: Option<&Path>) -> bool {
    let Some(dir) = dir else {
        return false;
    };
    entry.file_type().is_dir()
        && fs::canonicalize(entry.path())
            .map(|path| path == dir)
            .unwrap_or(false)
}

fn write_file(path: &Path, content: &str) -> Result<(), GatherError> {
    fs::write(path, content).map_err(|source| GatherError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}
