//! Error types.
//!
//! `GatherError` covers the failures that abort a run; `ParseError` covers
//! problems confined to a single result set, which are logged and skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Terminal errors. Each one names the offending path.
#[derive(Error, Debug)]
pub enum GatherError {
    /// Input root does not exist
    #[error("Input directory does not exist: {}", .0.display())]
    InputMissing(PathBuf),

    /// Input root exists but is a file or similar
    #[error("Input is not a directory: {}", .0.display())]
    InputNotDirectory(PathBuf),

    /// Input root could not be listed
    #[error("Input directory is not readable: {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output path exists but is not a directory
    #[error("Output is not a directory: {}", .0.display())]
    OutputNotDirectory(PathBuf),

    /// Writing into the output directory failed
    #[error("Failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The assets directory could not be read
    #[error("Failed to read asset {}: {source}", .path.display())]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A visualisation asset the page depends on is absent
    #[error("Required asset {name} not found in {}", .dir.display())]
    MissingAsset { name: String, dir: PathBuf },

    /// The merged dataset could not be serialized
    #[error("Failed to serialize module data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors confined to one result set.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A data file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file is not valid JSON
    #[error("Malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No known schema variant accepted the results file
    #[error("Incompatible antiSMASH results file schema version: {0}")]
    IncompatibleSchema(String),

    /// The results file matched a variant but its content did not fit it
    #[error("Results file does not fit the {variant} layout: {source}")]
    Layout {
        variant: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The module index holds no `resultsData` assignment
    #[error("Javascript data does not contain relevant results: {}", .0.display())]
    MissingResultsData(PathBuf),

    /// `resultsData` is not a JSON object keyed by anchor
    #[error("resultsData in {} is not an object", .0.display())]
    ResultsDataNotObject(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_messages_name_path() {
        let err = GatherError::InputMissing(PathBuf::from("/no/such/dir"));
        assert_eq!(err.to_string(), "Input directory does not exist: /no/such/dir");

        let err = GatherError::OutputNotDirectory(PathBuf::from("out.txt"));
        assert!(err.to_string().contains("out.txt"));
    }

    #[test]
    fn test_schema_message() {
        let err = ParseError::IncompatibleSchema("4".to_string());
        assert!(err.to_string().contains("schema version: 4"));
    }
}
