#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Core tract domain types shared across the heat-vuln-map system.
//!
//! A [`Tract`] is one synthetic areal unit: a row of modeled demographic and
//! climate attributes joined positionally with a polygon geometry. The
//! [`VulnerabilityLevel`] enum carries the 1-5 severity contract that the
//! map renderer relies on (1 is always lowest risk, 5 always highest).

use geo::Polygon;
use serde::{Deserialize, Serialize};

/// Heat vulnerability severity level, from 1 (lowest risk) to 5 (highest).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum VulnerabilityLevel {
    /// Level 1: Lowest risk
    Lowest = 1,
    /// Level 2: Low risk
    Low = 2,
    /// Level 3: Moderate risk
    Moderate = 3,
    /// Level 4: High risk
    High = 4,
    /// Level 5: Highest risk
    Highest = 5,
}

impl VulnerabilityLevel {
    /// Returns the numeric value of this level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a level from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-5.
    pub const fn from_value(value: u8) -> Result<Self, InvalidLevelError> {
        match value {
            1 => Ok(Self::Lowest),
            2 => Ok(Self::Low),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::High),
            5 => Ok(Self::Highest),
            _ => Err(InvalidLevelError { value }),
        }
    }

    /// Human-readable legend label, e.g. `"Level 3 - Moderate Risk"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lowest => "Level 1 - Lowest Risk",
            Self::Low => "Level 2 - Low Risk",
            Self::Moderate => "Level 3 - Moderate Risk",
            Self::High => "Level 4 - High Risk",
            Self::Highest => "Level 5 - Highest Risk",
        }
    }

    /// Conventional choropleth fill color for this level.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Lowest => "#2E8B57",
            Self::Low => "#90EE90",
            Self::Moderate => "#FFFF00",
            Self::High => "#FFA500",
            Self::Highest => "#FF4500",
        }
    }

    /// Returns all variants in ascending severity order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Lowest,
            Self::Low,
            Self::Moderate,
            Self::High,
            Self::Highest,
        ]
    }
}

impl From<VulnerabilityLevel> for u8 {
    fn from(level: VulnerabilityLevel) -> Self {
        level.value()
    }
}

impl TryFrom<u8> for VulnerabilityLevel {
    type Error = InvalidLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl std::fmt::Display for VulnerabilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when attempting to create a [`VulnerabilityLevel`] from an
/// invalid numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLevelError {
    /// The invalid level value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid vulnerability level {}: expected 1-5", self.value)
    }
}

impl std::error::Error for InvalidLevelError {}

/// Housing structure classification derived from the units-in-structure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingType {
    /// Single detached or attached unit (structure codes 1-2).
    SingleFamily,
    /// Multi-unit structure (codes 3 and up).
    MultiFamily,
}

impl HousingType {
    /// Classifies an ACS-style units-in-structure code.
    ///
    /// Codes 1 and 2 (single detached/attached) are single-family;
    /// everything else is multi-family.
    #[must_use]
    pub const fn from_structure_code(code: u8) -> Self {
        match code {
            1 | 2 => Self::SingleFamily,
            _ => Self::MultiFamily,
        }
    }
}

/// One synthetic tract's modeled attributes.
///
/// This is the row format of the persisted attribute table: field order and
/// names here are the CSV column contract between the attribute stage and
/// the geometry/rendering stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TractAttributes {
    /// Synthetic tract identifier, e.g. `"400101"`.
    pub tract_id: String,
    /// Total population.
    pub population: u32,
    /// Median household income in dollars.
    pub median_income: u32,
    /// Total housing units.
    pub housing_units: u32,
    /// ACS-style units-in-structure code (1-5).
    pub structure_code: u8,
    /// Mean July surface temperature in degrees C, heat island included.
    pub mean_temperature: f64,
    /// Modeled probability of air conditioning access.
    pub ac_probability: f64,
    /// Estimated green space fraction of tract area.
    pub green_space_pct: f64,
    /// Composite vulnerability score in [0, 1].
    pub vulnerability_score: f64,
    /// Binned severity level 1-5.
    pub vulnerability_index: u8,
}

impl TractAttributes {
    /// Housing classification for the AC-access model.
    #[must_use]
    pub const fn housing_type(&self) -> HousingType {
        HousingType::from_structure_code(self.structure_code)
    }

    /// The binned index as a typed level.
    ///
    /// # Errors
    ///
    /// Returns an error if `vulnerability_index` is outside 1-5, which
    /// indicates a corrupted attribute table.
    pub const fn level(&self) -> Result<VulnerabilityLevel, InvalidLevelError> {
        VulnerabilityLevel::from_value(self.vulnerability_index)
    }
}

/// A fully assembled tract: attributes joined with its polygon geometry.
///
/// Attributes and geometries are generated separately and joined 1:1 by
/// position; `index` records that position and is the stable identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Tract {
    /// Position in the generation sequence (0-based).
    pub index: usize,
    /// Modeled attribute row.
    pub attributes: TractAttributes,
    /// Boundary-clipped polygon in (longitude, latitude) coordinates.
    pub geometry: Polygon<f64>,
}
