//! Data models for the module gatherer.
//!
//! This module contains the core data structures passed between the
//! pipeline stages: discovered result sets, parsed modules and their keys.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// One discovered antiSMASH result directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSetDescriptor {
    /// Directory holding the result set.
    pub dir: PathBuf,
    /// Path to the module index file (`regions.js`).
    pub module_index: PathBuf,
    /// Path to the full results JSON file.
    pub results_data: PathBuf,
    /// Namespace-unique name derived from the path relative to the input root.
    pub name: String,
}

/// Composite key identifying a module across every result set in a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleKey {
    /// Unique name of the originating result set.
    pub result_set: String,
    /// Module identifier inside that result set (e.g. `r1c1`).
    pub module_id: String,
}

impl ModuleKey {
    pub fn new(result_set: impl Into<String>, module_id: impl Into<String>) -> Self {
        Self {
            result_set: result_set.into(),
            module_id: module_id.into(),
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.result_set, self.module_id)
    }
}

/// Visualisation data for one region, tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRecord {
    /// Unique name of the originating result set.
    pub result_set: String,
    /// antiSMASH anchor of the region (e.g. `r1c1`).
    pub module_id: String,
    /// Identifier of the sequence record the region sits on.
    pub record_name: String,
    /// Region start coordinate.
    pub start: u64,
    /// Region end coordinate.
    pub end: u64,
    /// Product types predicted for the region.
    pub products: Vec<String>,
    /// Bubble view payload, passed through untouched.
    pub bubbles: Value,
}

impl ModuleRecord {
    /// The composite key for this record.
    pub fn key(&self) -> ModuleKey {
        ModuleKey::new(&self.result_set, &self.module_id)
    }

    /// DOM anchor for the region, unique across result sets.
    ///
    /// Only `[A-Za-z0-9_-]` survives so the value is safe as an HTML id and
    /// a CSS selector.
    pub fn anchor(&self) -> String {
        sanitize_identifier(&format!("{}-{}", self.result_set, self.module_id))
    }

    /// Header label shown above the region's drawing.
    pub fn label(&self) -> String {
        format!(
            "{} / {}: {}-{}: {}",
            self.result_set,
            self.record_name,
            self.start,
            self.end,
            self.products.join(", ")
        )
    }
}

/// A region as serialized into the page's data file.
#[derive(Debug, Clone, Serialize)]
pub struct AreaEntry<'a> {
    pub anchor: String,
    pub start: u64,
    pub end: u64,
    pub products: &'a [String],
    pub bubbles: &'a Value,
}

/// A sequence record with its renderable regions, as the page script expects.
#[derive(Debug, Clone, Serialize)]
pub struct RecordEntry<'a> {
    pub name: &'a str,
    pub result_set: &'a str,
    pub areas: Vec<AreaEntry<'a>>,
}

/// Replace everything outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_record() -> ModuleRecord {
        ModuleRecord {
            result_set: "run1".to_string(),
            module_id: "r1c1".to_string(),
            record_name: "NC_003888.3".to_string(),
            start: 1200,
            end: 45000,
            products: vec!["NRPS".to_string(), "T1PKS".to_string()],
            bubbles: json!({"modules": []}),
        }
    }

    #[test]
    fn test_key() {
        let record = make_record();
        assert_eq!(record.key(), ModuleKey::new("run1", "r1c1"));
        assert_eq!(record.key().to_string(), "(run1, r1c1)");
    }

    #[test]
    fn test_anchor_is_namespaced() {
        let record = make_record();
        assert_eq!(record.anchor(), "run1-r1c1");

        let other = ModuleRecord {
            result_set: "run2".to_string(),
            ..record.clone()
        };
        assert_ne!(record.anchor(), other.anchor());
    }

    #[test]
    fn test_anchor_strips_unsafe_characters() {
        let record = ModuleRecord {
            module_id: "r1 c7|x".to_string(),
            ..make_record()
        };
        assert_eq!(record.anchor(), "run1-r1_c7_x");
    }

    #[test]
    fn test_label() {
        let record = make_record();
        assert_eq!(record.label(), "run1 / NC_003888.3: 1200-45000: NRPS, T1PKS");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("a/b c.d"), "a_b_c_d");
        assert_eq!(sanitize_identifier("ok-name_1"), "ok-name_1");
    }
}
