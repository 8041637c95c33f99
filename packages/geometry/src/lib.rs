#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic tract polygon generation.
//!
//! Two partition algorithms over a city [`Boundary`]: a deterministic
//! grid baseline and a weighted Voronoi tessellation seeded from the
//! city's neighborhood centers. Both feed the same post-processing: every
//! polygon is clipped to the boundary (with a disk fallback ladder for
//! degenerate cells) and an order-dependent repair pass removes any
//! residual overlap. The result always has exactly one polygon per tract.
//!
//! All randomness comes from a caller-owned [`ChaCha8Rng`], so a given
//! seed reproduces the exact same tract map.

pub mod grid;
pub mod repair;
pub mod seeds;
pub mod validity;
pub mod voronoi;

use geo::Polygon;
use heat_vuln_city::Boundary;
use heat_vuln_city::config::NeighborhoodCenter;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use grid::grid_partition;
pub use repair::repair_overlaps;
pub use voronoi::weighted_voronoi;

/// Errors that can occur generating tract geometries.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The request itself is unusable (e.g. zero tracts).
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Details about what was invalid.
        message: String,
    },
}

impl GeometryError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Which partition algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Bounding-box grid clipped to the boundary. Fully deterministic.
    Grid,
    /// Weighted Voronoi tessellation around neighborhood-biased seeds.
    #[default]
    Voronoi,
}

impl Algorithm {
    /// Parses a user-facing algorithm name.
    ///
    /// # Errors
    ///
    /// * If the name is not a known algorithm.
    pub fn from_name(name: &str) -> Result<Self, GeometryError> {
        match name.to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "voronoi" => Ok(Self::Voronoi),
            other => Err(GeometryError::invalid(format!(
                "Unknown geometry algorithm '{other}' (expected 'grid' or 'voronoi')"
            ))),
        }
    }
}

/// Generates `count` tract polygons inside the boundary.
///
/// `weights` are optional per-tract weights (population or vulnerability)
/// that bias Voronoi seed placement toward heavier neighborhood centers;
/// the grid algorithm ignores them. The overlap-repair pass runs for both
/// algorithms, so the returned polygons are pairwise disjoint up to the
/// boundary's area epsilon.
///
/// # Errors
///
/// * If `count` is zero.
pub fn synthesize_tract_geometries(
    boundary: &Boundary,
    centers: &[NeighborhoodCenter],
    weights: Option<&[f64]>,
    count: usize,
    algorithm: Algorithm,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Polygon<f64>>, GeometryError> {
    if count == 0 {
        return Err(GeometryError::invalid("Tract count must be at least 1"));
    }

    let raw = match algorithm {
        Algorithm::Grid => grid_partition(boundary, count),
        Algorithm::Voronoi => weighted_voronoi(boundary, centers, weights, count, rng),
    };
    log::info!(
        "{algorithm:?} partition produced {} polygons for {count} tracts",
        raw.len()
    );

    let mut repaired = repair_overlaps(raw, boundary);
    repaired.truncate(count);
    Ok(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, BooleanOps};
    use heat_vuln_city::registry::find_city;
    use rand::SeedableRng;

    use crate::validity::area_epsilon;

    #[test]
    fn zero_count_is_rejected() {
        let config = find_city("hartford").unwrap();
        let boundary = config.default_boundary().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = synthesize_tract_geometries(
            &boundary,
            &config.neighborhoods,
            None,
            0,
            Algorithm::Voronoi,
            &mut rng,
        );
        assert!(matches!(
            result,
            Err(GeometryError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn both_algorithms_honor_the_count() {
        let config = find_city("stamford").unwrap();
        let boundary = config.default_boundary().unwrap();
        for algorithm in [Algorithm::Grid, Algorithm::Voronoi] {
            let mut rng = ChaCha8Rng::seed_from_u64(43);
            let polygons = synthesize_tract_geometries(
                &boundary,
                &config.neighborhoods,
                None,
                60,
                algorithm,
                &mut rng,
            )
            .unwrap();
            assert_eq!(polygons.len(), 60, "{algorithm:?}");
        }
    }

    #[test]
    fn final_set_is_pairwise_disjoint() {
        let config = find_city("hartford").unwrap();
        let boundary = config.default_boundary().unwrap();
        let epsilon = area_epsilon(&boundary);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let polygons = synthesize_tract_geometries(
            &boundary,
            &config.neighborhoods,
            None,
            35,
            Algorithm::Voronoi,
            &mut rng,
        )
        .unwrap();
        for i in 0..polygons.len() {
            for j in (i + 1)..polygons.len() {
                let shared = polygons[i].intersection(&polygons[j]).unsigned_area();
                assert!(shared <= epsilon, "tracts {i} and {j} share {shared:e}");
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_map() {
        let config = find_city("new_haven").unwrap();
        let boundary = config.default_boundary().unwrap();
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            synthesize_tract_geometries(
                &boundary,
                &config.neighborhoods,
                None,
                20,
                Algorithm::Voronoi,
                &mut rng,
            )
            .unwrap()
        };
        let a = run(47);
        let b = run(47);
        for (p, q) in a.iter().zip(&b) {
            assert_eq!(p.exterior().0, q.exterior().0);
        }
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!(Algorithm::from_name("grid").unwrap(), Algorithm::Grid);
        assert_eq!(Algorithm::from_name("Voronoi").unwrap(), Algorithm::Voronoi);
        assert!(Algorithm::from_name("hexbin").is_err());
    }
}
