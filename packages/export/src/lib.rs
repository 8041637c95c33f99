#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output artifacts of a generation run.
//!
//! Two deliverables: the attribute table as CSV (the persisted hand-off
//! between the attribute and geometry stages, and the format external
//! tools consume), and the joined tracts as a `GeoJSON` feature collection
//! carrying every attribute plus the legend label and fill color per
//! feature.

pub mod features;
pub mod table;

pub use features::{tracts_to_feature_collection, write_feature_collection};
pub use table::{read_attribute_table, write_attribute_table};

use thiserror::Error;

/// Errors that can occur writing or reading export artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filesystem access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization or parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
