//! City configuration record: every per-city constant in one place.
//!
//! The legacy per-city scripts duplicated these values inline; here one
//! [`CityConfig`] parameterizes a single implementation.

use serde::{Deserialize, Serialize};

use crate::{Boundary, CityError};

/// A log-normal sampling spec with integer clip bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogNormalSpec {
    /// Mean of the distribution in natural units (not log space).
    pub mean: f64,
    /// Sigma of the underlying normal in log space.
    pub sigma: f64,
    /// Lower clip bound.
    pub min: u32,
    /// Upper clip bound.
    pub max: u32,
}

/// Housing-unit derivation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingSpec {
    /// Lower bound of the uniform household-size draw.
    pub household_size_min: f64,
    /// Upper bound of the uniform household-size draw.
    pub household_size_max: f64,
    /// Lower clip for derived housing-unit counts.
    pub units_min: u32,
    /// Upper clip for derived housing-unit counts.
    pub units_max: u32,
    /// Discrete weights for units-in-structure codes 1-5.
    pub structure_weights: Vec<f64>,
}

/// Temperature model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSpec {
    /// July mean surface temperature in degrees C.
    pub mean_c: f64,
    /// Standard deviation of the base draw.
    pub sigma_c: f64,
    /// Maximum heat-island addend in degrees C, applied at the densest
    /// tract and scaled down linearly with normalized density.
    pub heat_island_max_c: f64,
}

/// AC-access model constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcSpec {
    /// Regional base probability of AC access.
    pub base_probability: f64,
    /// Income at which the income factor is 1.0.
    pub reference_income: f64,
    /// Lower clamp on the income factor.
    pub income_factor_min: f64,
    /// Upper clamp on the income factor.
    pub income_factor_max: f64,
    /// Multiplier for single-family housing.
    pub single_family_factor: f64,
    /// Multiplier for multi-family housing.
    pub multi_family_factor: f64,
    /// Final probability lower clamp.
    pub probability_min: f64,
    /// Final probability upper clamp.
    pub probability_max: f64,
    /// Income substituted when a row's income is missing or non-positive.
    pub fallback_income: f64,
}

/// Green-space model constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenSpaceSpec {
    /// Weight of the inverse-density term in the blend.
    pub density_blend: f64,
    /// Lower bound of the uniform noise term.
    pub noise_min: f64,
    /// Upper bound of the uniform noise term.
    pub noise_max: f64,
    /// Final fraction lower clamp.
    pub pct_min: f64,
    /// Final fraction upper clamp.
    pub pct_max: f64,
}

/// A named neighborhood center used to bias Voronoi seed placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodCenter {
    /// Neighborhood name, for logging only.
    pub name: String,
    /// Center longitude.
    pub lon: f64,
    /// Center latitude.
    pub lat: f64,
    /// Nominal density weight. Higher weight pulls more seeds and
    /// shrinks their perturbation spread.
    pub weight: f64,
}

/// Raw boundary ring as it appears in the TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySpec {
    /// Closed ring of `[lon, lat]` pairs.
    pub ring: Vec<[f64; 2]>,
}

/// Full per-city configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityConfig {
    /// Stable machine identifier, e.g. `"hartford"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of tracts to synthesize.
    pub tract_count: usize,
    /// Random seed for the whole run.
    pub seed: u64,
    /// Numeric base for synthetic tract IDs, e.g. `400101`.
    pub tract_id_base: u32,
    /// Population sampling parameters.
    pub population: LogNormalSpec,
    /// Income sampling parameters.
    pub income: LogNormalSpec,
    /// Housing-unit derivation parameters.
    pub housing: HousingSpec,
    /// Temperature model parameters.
    pub temperature: TemperatureSpec,
    /// AC-access model constants.
    pub ac: AcSpec,
    /// Green-space model constants.
    pub green_space: GreenSpaceSpec,
    /// Neighborhood centers for weighted seed placement.
    pub neighborhoods: Vec<NeighborhoodCenter>,
    /// Default city boundary.
    pub boundary: BoundarySpec,
}

impl CityConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or the parsed config
    /// fails [`CityConfig::validate`].
    pub fn from_toml(toml_str: &str) -> Result<Self, CityError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the fatal preconditions: positive tract count and a usable
    /// boundary ring. Everything else is substituted at synthesis time.
    ///
    /// # Errors
    ///
    /// Returns [`CityError::InvalidConfiguration`] on violation.
    pub fn validate(&self) -> Result<(), CityError> {
        if self.tract_count == 0 {
            return Err(CityError::invalid(format!(
                "city '{}' has tract_count 0",
                self.id
            )));
        }
        if self.boundary.ring.len() < 4 {
            return Err(CityError::invalid(format!(
                "city '{}' boundary ring has {} points, need at least 4",
                self.id,
                self.boundary.ring.len()
            )));
        }
        Ok(())
    }

    /// Builds the default [`Boundary`] from the embedded ring.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring is degenerate (near-zero area).
    pub fn default_boundary(&self) -> Result<Boundary, CityError> {
        Boundary::from_ring(&self.boundary.ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml(tract_count: usize, ring_points: usize) -> String {
        let ring: Vec<String> = match ring_points {
            4 => vec![
                "[0.0, 0.0]".into(),
                "[1.0, 0.0]".into(),
                "[1.0, 1.0]".into(),
                "[0.0, 0.0]".into(),
            ],
            n => (0..n).map(|_| "[0.0, 0.0]".into()).collect(),
        };
        format!(
            r#"
id = "test"
name = "Test"
tract_count = {tract_count}
seed = 1
tract_id_base = 100

[population]
mean = 3000.0
sigma = 0.5
min = 500
max = 8000

[income]
mean = 50000.0
sigma = 0.4
min = 25000
max = 120000

[housing]
household_size_min = 2.2
household_size_max = 2.8
units_min = 200
units_max = 3000
structure_weights = [0.3, 0.2, 0.2, 0.2, 0.1]

[temperature]
mean_c = 28.0
sigma_c = 2.0
heat_island_max_c = 3.0

[ac]
base_probability = 0.65
reference_income = 50000.0
income_factor_min = 0.3
income_factor_max = 2.0
single_family_factor = 1.2
multi_family_factor = 0.8
probability_min = 0.1
probability_max = 0.99
fallback_income = 45000.0

[green_space]
density_blend = 0.3
noise_min = 0.05
noise_max = 0.25
pct_min = 0.05
pct_max = 0.6

[[neighborhoods]]
name = "Center"
lon = 0.5
lat = 0.5
weight = 2.0

[boundary]
ring = [{}]
"#,
            ring.join(", ")
        )
    }

    #[test]
    fn parses_minimal_config() {
        let config = CityConfig::from_toml(&minimal_toml(10, 4)).unwrap();
        assert_eq!(config.id, "test");
        assert_eq!(config.tract_count, 10);
        assert_eq!(config.neighborhoods.len(), 1);
    }

    #[test]
    fn zero_tract_count_is_fatal() {
        let err = CityConfig::from_toml(&minimal_toml(0, 4)).unwrap_err();
        assert!(matches!(err, CityError::InvalidConfiguration { .. }));
    }

    #[test]
    fn short_ring_is_fatal() {
        let err = CityConfig::from_toml(&minimal_toml(10, 2)).unwrap_err();
        assert!(matches!(err, CityError::InvalidConfiguration { .. }));
    }
}
