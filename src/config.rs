//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.modgather.toml` files. Every value has a default matching the
//! antiSMASH output layout, so the file is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".modgather.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Result set discovery settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Result parsing settings.
    #[serde(default)]
    pub parser: ParserConfig,

    /// Output bundle settings.
    #[serde(default)]
    pub bundle: BundleConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Result set discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// File holding the per-region visualiser data.
    #[serde(default = "default_module_index_file")]
    pub module_index_file: String,

    /// Extension of the full results file.
    #[serde(default = "default_results_extension")]
    pub results_extension: String,

    /// Do not descend into directories starting with a dot.
    #[serde(default = "default_true")]
    pub skip_hidden: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            module_index_file: default_module_index_file(),
            results_extension: default_results_extension(),
            skip_hidden: true,
        }
    }
}

fn default_module_index_file() -> String {
    "regions.js".to_string()
}

fn default_results_extension() -> String {
    "json".to_string()
}

fn default_true() -> bool {
    true
}

/// Result parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Keys tried, in order, for the bubble view payload of each region.
    #[serde(default = "default_bubble_view_keys")]
    pub bubble_view_keys: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            bubble_view_keys: default_bubble_view_keys(),
        }
    }
}

fn default_bubble_view_keys() -> Vec<String> {
    vec![
        "antismash.outputs.html.visualisers.bubble_view",
        "antismash.modules.nrps_pks.bubble_view",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Output bundle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Directory holding the visualisation library files to copy.
    ///
    /// When unset, `dependencies/` next to the executable is used, then
    /// `./dependencies`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<PathBuf>,

    /// Subdirectory of the output receiving the copied assets.
    #[serde(default = "default_assets_subdir")]
    pub assets_subdir: String,

    /// Name of the generated data file.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Name of the generated page.
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            assets_dir: None,
            assets_subdir: default_assets_subdir(),
            data_file: default_data_file(),
            index_file: default_index_file(),
            title: default_title(),
        }
    }
}

fn default_assets_subdir() -> String {
    "assets".to_string()
}

fn default_data_file() -> String {
    "data.js".to_string()
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_title() -> String {
    "Collected modules from antiSMASH results".to_string()
}

impl BundleConfig {
    /// Resolve the assets directory to use.
    pub fn resolved_assets_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.assets_dir {
            return dir.clone();
        }

        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("dependencies")));

        match beside_exe {
            Some(dir) if dir.is_dir() => dir,
            _ => PathBuf::from("dependencies"),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref assets) = args.assets {
            self.bundle.assets_dir = Some(assets.clone());
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
