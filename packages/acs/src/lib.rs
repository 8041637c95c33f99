#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Demographic data sources for the synthesis pipeline.
//!
//! Real demographic inputs are optional: when an ACS-shaped CSV is
//! available its rows seed the pipeline, and when it is not the pipeline
//! falls back to fully synthetic demographics. That decision happens at
//! the call site; this crate only loads and validates the data.
//!
//! The [`probe`] module covers the upstream-source side: best-effort
//! availability checks against the public Census and NASA endpoints that
//! record reachability metadata without downloading any payloads.

pub mod probe;

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur loading demographic data.
#[derive(Debug, Error)]
pub enum AcsError {
    /// Reading the source file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV could not be parsed into demographic records.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An endpoint probe failed outright.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Writing probe metadata failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One demographic row, shaped like the ACS variables the pipeline uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRecord {
    /// Total population (ACS `B01003_001E`).
    pub population: u32,
    /// Median household income in dollars (ACS `B19013_001E`).
    pub median_income: f64,
    /// Total housing units (ACS `B25001_001E`).
    pub housing_units: u32,
}

/// A provider of per-tract demographic rows.
pub trait DemographicSource {
    /// Human-readable source name for logging.
    fn name(&self) -> &str;

    /// Loads all available records.
    ///
    /// # Errors
    ///
    /// * If the underlying source cannot be read or parsed.
    fn load(&self) -> Result<Vec<DemographicRecord>, AcsError>;
}

/// CSV-backed demographic source.
///
/// Expects a header row with `population`, `median_income`, and
/// `housing_units` columns; extra columns are ignored.
pub struct CsvSource {
    path: std::path::PathBuf,
}

impl CsvSource {
    #[must_use]
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DemographicSource for CsvSource {
    fn name(&self) -> &str {
        "acs-csv"
    }

    fn load(&self) -> Result<Vec<DemographicRecord>, AcsError> {
        let file = std::fs::File::open(&self.path)?;
        let records = parse_records(file)?;
        log::info!(
            "Loaded {} demographic records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Loads demographic records from a CSV path if it exists and parses.
///
/// Absence or a malformed file is a logged condition, not an error: the
/// caller proceeds with synthetic demographics either way.
#[must_use]
pub fn load_optional(path: &Path) -> Option<Vec<DemographicRecord>> {
    if !path.exists() {
        log::info!(
            "No demographic CSV at {}; using synthetic demographics",
            path.display()
        );
        return None;
    }
    match CsvSource::new(path).load() {
        Ok(records) if records.is_empty() => {
            log::warn!("{} contains no records; using synthetic demographics", path.display());
            None
        }
        Ok(records) => Some(records),
        Err(e) => {
            log::warn!(
                "Failed to load {}: {e}; using synthetic demographics",
                path.display()
            );
            None
        }
    }
}

fn parse_records<R: Read>(reader: R) -> Result<Vec<DemographicRecord>, AcsError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
