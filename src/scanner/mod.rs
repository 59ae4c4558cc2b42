//! Result set discovery.
//!
//! Walks an input tree in name order and yields every directory that holds
//! both an antiSMASH module index (`regions.js`) and a results JSON file.
//! Directories lacking either file are skipped without a warning, since most
//! directories in a tree of runs are not result sets.

use crate::error::GatherError;
use crate::models::{sanitize_identifier, ResultSetDescriptor};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Configuration for result set discovery.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File name of the module index inside a result set
    pub module_index_file: String,
    /// Extension of the results file (without dot)
    pub results_extension: String,
    /// Do not enter directories whose name starts with a dot
    pub skip_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from(&crate::config::ScannerConfig::default())
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            module_index_file: config.module_index_file.clone(),
            results_extension: config.results_extension.clone(),
            skip_hidden: config.skip_hidden,
        }
    }
}

/// Scanner locating result sets below an input root.
pub struct ResultScanner {
    config: ScanConfig,
    input_root: PathBuf,
}

impl ResultScanner {
    /// Create a new result scanner.
    pub fn new(input_root: PathBuf, config: ScanConfig) -> Self {
        Self { config, input_root }
    }

    /// Check the input root and start the walk.
    ///
    /// The returned iterator is lazy; each call to `next` walks only as far
    /// as the next qualifying directory.
    pub fn scan(&self) -> Result<ResultSets<'_>, GatherError> {
        self.check_root()?;

        // loops and dangling links surface as walk errors
        let walker = WalkDir::new(&self.input_root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        Ok(ResultSets {
            scanner: self,
            walker,
            used_names: HashSet::new(),
        })
    }

    /// Fail unless the input root is an existing, listable directory.
    fn check_root(&self) -> Result<(), GatherError> {
        let root = &self.input_root;

        if !root.exists() {
            return Err(GatherError::InputMissing(root.clone()));
        }
        if !root.is_dir() {
            return Err(GatherError::InputNotDirectory(root.clone()));
        }
        fs::read_dir(root).map_err(|source| GatherError::InputUnreadable {
            path: root.clone(),
            source,
        })?;

        Ok(())
    }

    /// Return the module index and results file of `dir` if both exist.
    fn inspect(&self, dir: &Path) -> Option<(PathBuf, PathBuf)> {
        let module_index = dir.join(&self.config.module_index_file);
        if !module_index.is_file() {
            return None;
        }

        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                debug!("Cannot read directory {}: {}", dir.display(), e);
                return None;
            }
        };

        let mut candidates: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e == self.config.results_extension)
                        .unwrap_or(false)
            })
            .collect();

        // several JSON files: take the first by name
        candidates.sort();
        let results_data = candidates.into_iter().next()?;

        Some((module_index, results_data))
    }

    fn is_hidden(&self, entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
    }
}

/// Lazy sequence of discovered result sets, in traversal order.
pub struct ResultSets<'a> {
    scanner: &'a ResultScanner,
    walker: walkdir::IntoIter,
    used_names: HashSet<String>,
}

impl ResultSets<'_> {
    /// Derive a name from the path below the input root, unique in this walk.
    fn unique_name(&mut self, dir: &Path) -> String {
        let relative = dir.strip_prefix(&self.scanner.input_root).unwrap_or(dir);
        let base = relative
            .components()
            .map(|c| sanitize_identifier(&c.as_os_str().to_string_lossy()))
            .collect::<Vec<_>>()
            .join("-");

        let mut name = base.clone();
        let mut suffix = 2;
        while self.used_names.contains(&name) {
            name = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        self.used_names.insert(name.clone());
        name
    }
}

impl Iterator for ResultSets<'_> {
    type Item = ResultSetDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable path: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if self.scanner.config.skip_hidden && self.scanner.is_hidden(&entry) {
                self.walker.skip_current_dir();
                continue;
            }

            let Some((module_index, results_data)) = self.scanner.inspect(entry.path()) else {
                debug!("Not a result set: {}", entry.path().display());
                continue;
            };

            // the result set's own subdirectories only hold its assets
            self.walker.skip_current_dir();

            let name = self.unique_name(entry.path());
            debug!("Found result set {} at {}", name, entry.path().display());

            return Some(ResultSetDescriptor {
                dir: entry.path().to_path_buf(),
                module_index,
                results_data,
                name,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_result_set(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("regions.js"), "var resultsData = {};").unwrap();
        fs::write(dir.join("genome.json"), "{}").unwrap();
    }

    fn scan_names(root: &Path) -> Vec<String> {
        let scanner = ResultScanner::new(root.to_path_buf(), ScanConfig::default());
        scanner.scan().unwrap().map(|d| d.name).collect()
    }

    #[test]
    fn test_finds_nested_result_sets_in_order() {
        let tmp = TempDir::new().unwrap();
        make_result_set(tmp.path(), "run2");
        make_result_set(tmp.path(), "run1");
        make_result_set(tmp.path(), "batch/deep/run3");
        fs::create_dir_all(tmp.path().join("empty/inner")).unwrap();

        assert_eq!(scan_names(tmp.path()), vec!["batch-deep-run3", "run1", "run2"]);
    }

    #[test]
    fn test_requires_both_files() {
        let tmp = TempDir::new().unwrap();
        let only_index = tmp.path().join("only_index");
        fs::create_dir_all(&only_index).unwrap();
        fs::write(only_index.join("regions.js"), "").unwrap();

        let only_json = tmp.path().join("only_json");
        fs::create_dir_all(&only_json).unwrap();
        fs::write(only_json.join("genome.json"), "{}").unwrap();

        assert!(scan_names(tmp.path()).is_empty());
    }

    #[test]
    fn test_does_not_descend_into_result_set() {
        let tmp = TempDir::new().unwrap();
        make_result_set(tmp.path(), "run1");
        make_result_set(tmp.path(), "run1/nested");

        assert_eq!(scan_names(tmp.path()), vec!["run1"]);
    }

    #[test]
    fn test_skips_hidden_directories() {
        let tmp = TempDir::new().unwrap();
        make_result_set(tmp.path(), ".cache/run1");
        make_result_set(tmp.path(), "run2");

        assert_eq!(scan_names(tmp.path()), vec!["run2"]);
    }

    #[test]
    fn test_first_json_by_name_is_used() {
        let tmp = TempDir::new().unwrap();
        make_result_set(tmp.path(), "run1");
        fs::write(tmp.path().join("run1/aaa.json"), "{}").unwrap();

        let scanner = ResultScanner::new(tmp.path().to_path_buf(), ScanConfig::default());
        let found: Vec<_> = scanner.scan().unwrap().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].results_data, tmp.path().join("run1/aaa.json"));
        assert_eq!(found[0].module_index, tmp.path().join("run1/regions.js"));
    }

    #[test]
    fn test_sanitized_names_are_deduplicated() {
        let tmp = TempDir::new().unwrap();
        make_result_set(tmp.path(), "a b");
        make_result_set(tmp.path(), "a_b");

        assert_eq!(scan_names(tmp.path()), vec!["a_b", "a_b-2"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_result_set_is_found() {
        let tmp = TempDir::new().unwrap();
        make_result_set(tmp.path(), "elsewhere/run1");
        let input = tmp.path().join("input");
        fs::create_dir_all(&input).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("elsewhere/run1"), input.join("run1"))
            .unwrap();

        let scanner = ResultScanner::new(input.clone(), ScanConfig::default());
        let found: Vec<_> = scanner.scan().unwrap().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "run1");
        assert_eq!(found[0].dir, input.join("run1"));
        assert_eq!(found[0].module_index, input.join("run1/regions.js"));
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_entries_are_skipped() {
        let tmp = TempDir::new().unwrap();
        make_result_set(tmp.path(), "a_run");
        make_result_set(tmp.path(), "z_run");
        std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("dangling"))
            .unwrap();
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("loop")).unwrap();

        assert_eq!(scan_names(tmp.path()), vec!["a_run", "z_run"]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let scanner = ResultScanner::new(missing, ScanConfig::default());
        assert!(matches!(scanner.scan(), Err(GatherError::InputMissing(_))));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let scanner = ResultScanner::new(file, ScanConfig::default());
        assert!(matches!(
            scanner.scan(),
            Err(GatherError::InputNotDirectory(_))
        ));
    }
}
