//! Module merging.
//!
//! This module folds the records of every parsed result set into one
//! ordered dataset keyed by `(result set, module id)`.

use crate::models::{AreaEntry, ModuleKey, ModuleRecord, RecordEntry};
use std::collections::HashMap;
use tracing::warn;

/// Every module of a run, in render order, with unique keys.
#[derive(Debug, Clone, Default)]
pub struct MergedDataset {
    records: Vec<ModuleRecord>,
    positions: HashMap<ModuleKey, usize>,
    duplicates: usize,
}

impl MergedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the end of the dataset.
    ///
    /// A record whose key is already present replaces the earlier record in
    /// place and is counted as a duplicate.
    pub fn insert(&mut self, record: ModuleRecord) {
        let key = record.key();

        if let Some(&index) = self.positions.get(&key) {
            warn!("Duplicate module {}: keeping the later record", key);
            self.records[index] = record;
            self.duplicates += 1;
            return;
        }

        self.positions.insert(key, self.records.len());
        self.records.push(record);
    }

    /// Add every record of one result set, keeping their order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = ModuleRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records that replaced an earlier one.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Records in render order.
    pub fn records(&self) -> &[ModuleRecord] {
        &self.records
    }

    /// Group consecutive modules of the same sequence record into the shape
    /// the page script iterates over.
    pub fn record_entries(&self) -> Vec<RecordEntry<'_>> {
        let mut entries: Vec<RecordEntry<'_>> = Vec::new();

        for record in &self.records {
            let area = AreaEntry {
                anchor: record.anchor(),
                start: record.start,
                end: record.end,
                products: &record.products,
                bubbles: &record.bubbles,
            };

            match entries.last_mut() {
                Some(last)
                    if last.result_set == record.result_set
                        && last.name == record.record_name =>
                {
                    last.areas.push(area);
                }
                _ => entries.push(RecordEntry {
                    name: &record.record_name,
                    result_set: &record.result_set,
                    areas: vec![area],
                }),
            }
        }

        entries
    }
}

impl FromIterator<ModuleRecord> for MergedDataset {
    fn from_iter<I: IntoIterator<Item = ModuleRecord>>(iter: I) -> Self {
        let mut dataset = Self::new();
        dataset.extend(iter);
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_record(result_set: &str, module_id: &str, record_name: &str) -> ModuleRecord {
        ModuleRecord {
            result_set: result_set.to_string(),
            module_id: module_id.to_string(),
            record_name: record_name.to_string(),
            start: 100,
            end: 200,
            products: vec!["NRPS".to_string()],
            bubbles: json!({"from": result_set}),
        }
    }

    #[test]
    fn test_same_module_id_in_two_result_sets() {
        let dataset: MergedDataset = vec![
            create_test_record("run1", "region1", "seq"),
            create_test_record("run2", "region1", "seq"),
        ]
        .into_iter()
        .collect();

        let keys: Vec<_> = dataset.records().iter().map(ModuleRecord::key).collect();
        assert_eq!(
            keys,
            vec![
                ModuleKey::new("run1", "region1"),
                ModuleKey::new("run2", "region1")
            ]
        );
        assert_eq!(dataset.duplicates(), 0);
    }

    #[test]
    fn test_duplicate_key_later_record_wins_in_place() {
        let mut dataset = MergedDataset::new();
        dataset.insert(create_test_record("run1", "r1c1", "seq"));
        dataset.insert(create_test_record("run1", "r1c2", "seq"));

        let mut replacement = create_test_record("run1", "r1c1", "seq");
        replacement.end = 999;
        dataset.insert(replacement);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.duplicates(), 1);
        assert_eq!(dataset.records()[0].end, 999);
        assert_eq!(dataset.records()[1].module_id, "r1c2");
    }

    #[test]
    fn test_record_entries_group_consecutive_records() {
        let dataset: MergedDataset = vec![
            create_test_record("run1", "r1c1", "seqA"),
            create_test_record("run1", "r1c2", "seqA"),
            create_test_record("run1", "r2c1", "seqB"),
            create_test_record("run2", "r1c1", "seqA"),
        ]
        .into_iter()
        .collect();

        let entries = dataset.record_entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].areas.len(), 2);
        assert_eq!(entries[1].name, "seqB");
        assert_eq!(entries[2].result_set, "run2");
        assert_ne!(entries[0].areas[0].anchor, entries[2].areas[0].anchor);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = MergedDataset::new();
        assert!(dataset.is_empty());
        assert!(dataset.record_entries().is_empty());
    }
}
