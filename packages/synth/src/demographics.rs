//! Base demographic rows: population, income, and housing units.
//!
//! Real ACS-shaped data is preferred when available; log-normal sampling
//! with city-specific parameters is the documented fallback, not an error
//! path.

use heat_vuln_city::CityConfig;
use heat_vuln_city::config::LogNormalSpec;
use rand::Rng;
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand_chacha::ChaCha8Rng;
use rand_distr::LogNormal;

/// One tract's base demographic values before the climate and access
/// models run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRow {
    /// Total population.
    pub population: u32,
    /// Median household income in dollars.
    pub median_income: u32,
    /// Total housing units.
    pub housing_units: u32,
    /// ACS-style units-in-structure code (1-5).
    pub structure_code: u8,
}

/// A row of real demographic data substituted for synthetic sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemographicInput {
    /// Total population.
    pub population: u32,
    /// Median household income in dollars.
    pub median_income: u32,
    /// Total housing units.
    pub housing_units: u32,
}

/// Generates `config.tract_count` base rows by log-normal sampling.
pub fn generate_base_rows(config: &CityConfig, rng: &mut ChaCha8Rng) -> Vec<BaseRow> {
    let structure_dist = structure_distribution(config);

    (0..config.tract_count)
        .map(|_| {
            let population = sample_lognormal(&config.population, rng);
            let median_income = sample_lognormal(&config.income, rng);
            let household_size =
                rng.gen_range(config.housing.household_size_min..=config.housing.household_size_max);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let housing_units = ((f64::from(population) / household_size) as u32)
                .clamp(config.housing.units_min, config.housing.units_max);
            let structure_code = sample_structure_code(&structure_dist, rng);
            BaseRow {
                population,
                median_income,
                housing_units,
                structure_code,
            }
        })
        .collect()
}

/// Builds base rows from real demographic records, padding or truncating
/// to `config.tract_count`.
///
/// Structure codes are still sampled (the real table does not carry them),
/// and any shortfall is filled with synthetic rows so the count invariant
/// holds regardless of how much real data arrived.
pub fn base_rows_from_records(
    records: &[DemographicInput],
    config: &CityConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<BaseRow> {
    let structure_dist = structure_distribution(config);

    let mut rows: Vec<BaseRow> = records
        .iter()
        .take(config.tract_count)
        .map(|r| BaseRow {
            population: r.population,
            median_income: r.median_income,
            housing_units: r.housing_units.max(1),
            structure_code: sample_structure_code(&structure_dist, rng),
        })
        .collect();

    if rows.len() < config.tract_count {
        log::warn!(
            "Only {} of {} demographic records available for {}; filling remainder synthetically",
            rows.len(),
            config.tract_count,
            config.id
        );
        let mut shortfall_config = config.clone();
        shortfall_config.tract_count = config.tract_count - rows.len();
        rows.extend(generate_base_rows(&shortfall_config, rng));
    }

    rows
}

/// Draws one value from a log-normal distribution and clips it to the
/// spec's integer bounds.
fn sample_lognormal(spec: &LogNormalSpec, rng: &mut ChaCha8Rng) -> u32 {
    // Mean is given in natural units; the underlying normal's mean is its log.
    let dist = match LogNormal::new(spec.mean.max(1.0).ln(), spec.sigma.abs()) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Degenerate log-normal spec ({e}); using midpoint of clip bounds");
            return u32::midpoint(spec.min, spec.max);
        }
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let value = dist.sample(rng).round().max(0.0) as u32;
    value.clamp(spec.min, spec.max)
}

/// Weighted distribution over structure codes 1-5, or `None` when the
/// configured weights are unusable (then codes are drawn uniformly).
fn structure_distribution(config: &CityConfig) -> Option<WeightedIndex<f64>> {
    match WeightedIndex::new(config.housing.structure_weights.iter().copied()) {
        Ok(dist) => Some(dist),
        Err(e) => {
            log::warn!(
                "Unusable structure weights for {} ({e}); sampling codes uniformly",
                config.id
            );
            None
        }
    }
}

fn sample_structure_code(dist: &Option<WeightedIndex<f64>>, rng: &mut ChaCha8Rng) -> u8 {
    #[allow(clippy::cast_possible_truncation)]
    match dist {
        Some(d) => (d.sample(rng) + 1) as u8,
        None => rng.gen_range(1..=5u8),
    }
}
