//! Extraction of the `resultsData` object from antiSMASH's `regions.js`.
//!
//! The file is JavaScript, not JSON: several `var x = ...;` assignments in a
//! row. Only the `resultsData` assignment is needed, and it is recovered by
//! slicing lines rather than by evaluating the script.

use crate::error::ParseError;
use serde_json::{Map, Value};
use std::path::Path;

const RESULTS_DATA_MARKER: &str = "var resultsData =";
const NEXT_ASSIGNMENT: &str = "var ";

/// Pull the anchor-keyed `resultsData` object out of a `regions.js` body.
pub fn extract_results_data(text: &str, path: &Path) -> Result<Map<String, Value>, ParseError> {
    let mut lines = text.lines();

    let first = lines
        .by_ref()
        .find(|line| line.starts_with(RESULTS_DATA_MARKER))
        .ok_or_else(|| ParseError::MissingResultsData(path.to_path_buf()))?;

    let mut section = vec![first[RESULTS_DATA_MARKER.len()..].trim_start()];
    section.extend(lines.take_while(|line| !line.starts_with(NEXT_ASSIGNMENT)));

    let joined = section.join("\n");
    let json = joined.trim_end().trim_end_matches(';');

    let value: Value = serde_json::from_str(json).map_err(|source| ParseError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::ResultsDataNotObject(path.to_path_buf())),
    }
}

/// Bubble view data of one region: the first candidate cluster under the
/// first present key.
pub fn bubble_view<'a>(region_data: &'a Value, keys: &[String]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| region_data.get(key.as_str()))
        .find(|view| !view.is_null())
        .and_then(Value::as_object)
        .and_then(|candidates| candidates.values().next())
        .filter(|bubbles| !bubbles.is_null())
}
