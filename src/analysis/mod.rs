//! Merging of parsed result sets.

pub mod merger;

pub use merger::MergedDataset;
