//! Output bundle generation.

pub mod bundle;
pub mod generator;

pub use bundle::{BundleBuilder, BundleOptions, BundleSummary};
