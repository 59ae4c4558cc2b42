//! Result set parsing.
//!
//! Reads the results JSON and the `regions.js` module index of one result
//! set and joins them into `ModuleRecord`s. Any failure is scoped to the
//! result set being parsed; the caller decides whether to skip it.

pub mod regions_js;
pub mod schema;

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::models::{ModuleRecord, ResultSetDescriptor};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub use schema::Area;

/// Parser turning a discovered result set into module records.
#[derive(Debug, Clone)]
pub struct ResultParser {
    bubble_view_keys: Vec<String>,
}

impl Default for ResultParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl ResultParser {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            bubble_view_keys: config.bubble_view_keys.clone(),
        }
    }

    /// Parse one result set.
    ///
    /// Regions without bubble view data are left out, so a valid result set
    /// may produce no records at all.
    pub fn parse(&self, descriptor: &ResultSetDescriptor) -> Result<Vec<ModuleRecord>, ParseError> {
        let areas = self.read_areas(&descriptor.results_data)?;

        let index_text = read_file(&descriptor.module_index)?;
        let results_data = regions_js::extract_results_data(&index_text, &descriptor.module_index)?;

        let mut records: Vec<ModuleRecord> = Vec::new();
        for area in areas {
            let Some(bubbles) = results_data
                .get(&area.anchor)
                .and_then(|data| regions_js::bubble_view(data, &self.bubble_view_keys))
            else {
                debug!("{}: no module data for {}", descriptor.name, area.anchor);
                continue;
            };

            records.push(ModuleRecord {
                result_set: descriptor.name.clone(),
                module_id: area.anchor,
                record_name: area.record_name,
                start: area.start,
                end: area.end,
                products: area.products,
                bubbles: bubbles.clone(),
            });
        }

        group_by_record(&mut records);

        debug!(
            "{}: {} module(s) from {}",
            descriptor.name,
            records.len(),
            descriptor.dir.display()
        );
        Ok(records)
    }

    fn read_areas(&self, path: &Path) -> Result<Vec<Area>, ParseError> {
        let text = read_file(path)?;
        let doc: Value = serde_json::from_str(&text).map_err(|source| ParseError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        schema::extract_areas(&doc)
    }
}

fn read_file(path: &Path) -> Result<String, ParseError> {
    fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Keep regions of the same sequence record together, records in order of
/// first appearance. The sort is stable so regions keep their order.
fn group_by_record(records: &mut [ModuleRecord]) {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for record in records.iter() {
        let next = first_seen.len();
        first_seen.entry(record.record_name.clone()).or_insert(next);
    }
    records.sort_by_key(|record| first_seen[&record.record_name]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const KEY: &str = "antismash.outputs.html.visualisers.bubble_view";

    fn make_descriptor(dir: &Path, results: &Value, regions: &Value) -> ResultSetDescriptor {
        let results_data = dir.join("genome.json");
        let module_index = dir.join("regions.js");
        fs::write(&results_data, results.to_string()).unwrap();
        fs::write(
            &module_index,
            format!(
                "var recordData = [];\nvar resultsData = {};\nvar end = 1;\n",
                serde_json::to_string_pretty(regions).unwrap()
            ),
        )
        .unwrap();

        ResultSetDescriptor {
            dir: dir.to_path_buf(),
            module_index,
            results_data,
            name: "run1".to_string(),
        }
    }

    #[test]
    fn test_parse_joins_areas_with_bubbles() {
        let tmp = TempDir::new().unwrap();
        let results = json!({
            "schema": 2,
            "records": [
                {"id": "NC_1", "areas": [
                    {"start": 100, "end": 900, "products": ["NRPS"]},
                    {"start": 2000, "end": 3000, "products": ["terpene"]}
                ]}
            ]
        });
        let regions = json!({
            "r1c1": {KEY: {"CC1": {"id": "first"}, "CC2": {"id": "second"}}},
            "r1c2": {"other.visualiser": {}}
        });
        let descriptor = make_descriptor(tmp.path(), &results, &regions);

        let records = ResultParser::default().parse(&descriptor).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].module_id, "r1c1");
        assert_eq!(records[0].result_set, "run1");
        assert_eq!(records[0].record_name, "NC_1");
        assert_eq!(records[0].bubbles, json!({"id": "first"}));
    }

    #[test]
    fn test_records_sharing_id_are_grouped() {
        let tmp = TempDir::new().unwrap();
        let results = json!({
            "schema": 3,
            "records": [
                {"id": "a", "areas": [{"start": 1, "end": 2, "products": []}]},
                {"id": "b", "areas": [{"start": 3, "end": 4, "products": []}]},
                {"id": "a", "areas": [{"start": 5, "end": 6, "products": []}]}
            ]
        });
        let regions = json!({
            "r1c1": {KEY: {"CC": {}}},
            "r2c1": {KEY: {"CC": {}}},
            "r3c1": {KEY: {"CC": {}}}
        });
        let descriptor = make_descriptor(tmp.path(), &results, &regions);

        let records = ResultParser::default().parse(&descriptor).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.module_id.as_str()).collect();
        assert_eq!(ids, vec!["r1c1", "r3c1", "r2c1"]);
    }

    #[test]
    fn test_malformed_results_json() {
        let tmp = TempDir::new().unwrap();
        let descriptor = make_descriptor(tmp.path(), &json!({}), &json!({}));
        fs::write(&descriptor.results_data, "{\"schema\": 2, \"records\": [").unwrap();

        assert!(matches!(
            ResultParser::default().parse(&descriptor),
            Err(ParseError::Json { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let descriptor = ResultSetDescriptor {
            dir: PathBuf::from("/nonexistent"),
            module_index: PathBuf::from("/nonexistent/regions.js"),
            results_data: PathBuf::from("/nonexistent/genome.json"),
            name: "gone".to_string(),
        };
        assert!(matches!(
            ResultParser::default().parse(&descriptor),
            Err(ParseError::Read { .. })
        ));
    }
}
