#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic per-tract attribute generation.
//!
//! Given a [`CityConfig`], produces one [`TractAttributes`] row per tract:
//! log-normal demographics, a heat-island-adjusted temperature, AC-access
//! and green-space model outputs, and the composite vulnerability score
//! binned into 5 levels.
//!
//! The whole pipeline follows an "always produce an answer" policy: missing
//! real data, zero-variance columns, and non-finite intermediates are
//! substituted inline (medians, constants) rather than propagated. The only
//! fatal condition is a config that asks for zero tracts.
//!
//! Randomness is an explicit, owned [`ChaCha8Rng`] threaded through each
//! call: same seed in, bit-identical rows out.

pub mod ac;
pub mod climate;
pub mod demographics;
pub mod green_space;
pub mod normalize;
pub mod vulnerability;

use heat_vuln_city::CityConfig;
use heat_vuln_tract_models::TractAttributes;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use demographics::DemographicInput;

/// Errors from attribute synthesis.
#[derive(Debug, Error)]
pub enum SynthError {
    /// The configuration cannot produce any output at all.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of what is wrong.
        message: String,
    },
}

/// Runs the full attribute pipeline for one city.
///
/// When `real_data` is provided, those rows are preferred over log-normal
/// sampling (padded or truncated to the configured tract count); otherwise
/// everything is synthesized. Either way exactly `config.tract_count` rows
/// come back.
///
/// # Errors
///
/// Returns [`SynthError::InvalidConfiguration`] when `config.tract_count`
/// is zero. All other degenerate inputs are substituted, not raised.
pub fn synthesize_attributes(
    config: &CityConfig,
    real_data: Option<&[DemographicInput]>,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<TractAttributes>, SynthError> {
    if config.tract_count == 0 {
        return Err(SynthError::InvalidConfiguration {
            message: format!("city '{}' requested zero tracts", config.id),
        });
    }

    let rows = match real_data {
        Some(records) => {
            log::info!(
                "Using {} real demographic records for {}",
                records.len().min(config.tract_count),
                config.id
            );
            demographics::base_rows_from_records(records, config, rng)
        }
        None => {
            log::info!(
                "No real demographic data for {}; synthesizing {} tracts",
                config.id,
                config.tract_count
            );
            demographics::generate_base_rows(config, rng)
        }
    };

    let temperatures = climate::synthesize_temperature(&rows, config, rng);
    let ac_probabilities = ac::model_ac_access(&rows, config);
    let green = green_space::model_green_space(&rows, config, rng);

    let incomes: Vec<f64> = rows.iter().map(|r| f64::from(r.median_income)).collect();
    let vuln = vulnerability::compute_vulnerability(
        &temperatures,
        &incomes,
        &ac_probabilities,
        &green,
    );

    log::info!(
        "Synthesized {} attribute rows for {} (temperature {:.1}C..{:.1}C)",
        rows.len(),
        config.id,
        temperatures.iter().copied().fold(f64::INFINITY, f64::min),
        temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    );

    Ok(rows
        .iter()
        .enumerate()
        .map(|(i, row)| TractAttributes {
            tract_id: (config.tract_id_base + u32::try_from(i).unwrap_or(u32::MAX)).to_string(),
            population: row.population,
            median_income: row.median_income,
            housing_units: row.housing_units,
            structure_code: row.structure_code,
            mean_temperature: temperatures[i],
            ac_probability: ac_probabilities[i],
            green_space_pct: green[i],
            vulnerability_score: vuln.scores[i],
            vulnerability_index: vuln.indices[i],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use heat_vuln_city::registry::{all_cities, find_city};
    use rand::SeedableRng;

    #[test]
    fn produces_exact_row_count_for_every_city() {
        for config in all_cities() {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
            let rows = synthesize_attributes(&config, None, &mut rng).unwrap();
            assert_eq!(rows.len(), config.tract_count, "city {}", config.id);
        }
    }

    #[test]
    fn all_rows_satisfy_probability_bounds() {
        for config in all_cities() {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
            for row in synthesize_attributes(&config, None, &mut rng).unwrap() {
                assert!(row.ac_probability > 0.0 && row.ac_probability <= 1.0);
                assert!((0.0..=1.0).contains(&row.green_space_pct));
                assert!((0.0..=1.0).contains(&row.vulnerability_score));
                assert!((1..=5).contains(&row.vulnerability_index));
            }
        }
    }

    #[test]
    fn index_is_monotone_in_score() {
        let config = find_city("hartford").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let rows = synthesize_attributes(&config, None, &mut rng).unwrap();
        for a in &rows {
            for b in &rows {
                if a.vulnerability_score < b.vulnerability_score {
                    assert!(a.vulnerability_index <= b.vulnerability_index);
                }
            }
        }
    }

    #[test]
    fn reseed_produces_bit_identical_tables() {
        let config = find_city("stamford").unwrap();
        let mut rng_a = ChaCha8Rng::seed_from_u64(config.seed);
        let mut rng_b = ChaCha8Rng::seed_from_u64(config.seed);
        let rows_a = synthesize_attributes(&config, None, &mut rng_a).unwrap();
        let rows_b = synthesize_attributes(&config, None, &mut rng_b).unwrap();
        assert_eq!(rows_a, rows_b);
    }

    #[test]
    fn zero_tract_count_is_fatal() {
        let mut config = find_city("hartford").unwrap();
        config.tract_count = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            synthesize_attributes(&config, None, &mut rng),
            Err(SynthError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn constant_real_income_still_yields_valid_indices() {
        // All-equal income exercises the zero-variance normalize path
        let mut config = find_city("hartford").unwrap();
        config.tract_count = 20;
        let records = vec![
            DemographicInput {
                population: 3000,
                median_income: 50000,
                housing_units: 1000,
            };
            20
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let rows = synthesize_attributes(&config, Some(&records), &mut rng).unwrap();
        assert_eq!(rows.len(), 20);
        assert!(rows.iter().all(|r| (1..=5).contains(&r.vulnerability_index)));
    }

    #[test]
    fn index_histogram_covers_all_rows() {
        let config = find_city("new_haven").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let rows = synthesize_attributes(&config, None, &mut rng).unwrap();
        let mut histogram = [0usize; 5];
        for row in &rows {
            histogram[usize::from(row.vulnerability_index) - 1] += 1;
        }
        assert_eq!(histogram.iter().sum::<usize>(), config.tract_count);
    }

    #[test]
    fn tract_ids_are_sequential_from_base() {
        let mut config = find_city("hartford").unwrap();
        config.tract_count = 3;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let rows = synthesize_attributes(&config, None, &mut rng).unwrap();
        assert_eq!(rows[0].tract_id, "400101");
        assert_eq!(rows[1].tract_id, "400102");
        assert_eq!(rows[2].tract_id, "400103");
    }
}
