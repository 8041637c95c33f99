#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-city configuration and boundary handling.
//!
//! Each supported city is defined as a TOML file embedded at compile time,
//! carrying every city-specific constant the synthesis pipeline needs:
//! distribution parameters, AC and green-space model constants, neighborhood
//! centers for weighted seed placement, and the city boundary ring.
//!
//! Boundaries are data, not code: the embedded ring is a default, and any
//! run can swap in a different boundary from an external `GeoJSON` file.

pub mod boundary;
pub mod config;
pub mod registry;

pub use boundary::Boundary;
pub use config::CityConfig;

use thiserror::Error;

/// Errors that can occur loading city configuration or boundaries.
#[derive(Debug, Error)]
pub enum CityError {
    /// TOML parsing failed.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reading an external boundary file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// The configuration is structurally unusable (empty boundary,
    /// zero tract count). This is the one fatal condition in the
    /// pipeline; everything else substitutes and continues.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of what is wrong.
        message: String,
    },
}

impl CityError {
    /// Shorthand for an [`CityError::InvalidConfiguration`] with a message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}
