//! Temperature synthesis with the urban heat island adjustment.

use heat_vuln_city::CityConfig;
use rand::prelude::Distribution;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

use crate::demographics::BaseRow;
use crate::normalize::normalize;

/// Synthesizes a mean July temperature per tract: a normal base draw plus
/// a heat-island addend proportional to normalized population density.
///
/// Density normalization is a population-level statistic over the whole
/// row set, so this must run after all base rows exist.
pub fn synthesize_temperature(
    rows: &[BaseRow],
    config: &CityConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<f64> {
    let spec = &config.temperature;
    let base_dist = match Normal::new(spec.mean_c, spec.sigma_c.abs()) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Degenerate temperature spec for {} ({e}); using the mean", config.id);
            return vec![spec.mean_c; rows.len()];
        }
    };

    // Population per housing unit; the unit clamp upstream keeps this finite.
    let densities: Vec<f64> = rows
        .iter()
        .map(|r| f64::from(r.population) / f64::from(r.housing_units.max(1)))
        .collect();
    let normalized_density = normalize(&densities);

    rows.iter()
        .zip(normalized_density)
        .map(|(_, density)| base_dist.sample(rng) + density * spec.heat_island_max_c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use heat_vuln_city::registry::find_city;
    use rand::SeedableRng;

    use crate::demographics::generate_base_rows;

    #[test]
    fn temperatures_cluster_around_city_mean() {
        let config = find_city("hartford").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let rows = generate_base_rows(&config, &mut rng);
        let temps = synthesize_temperature(&rows, &config, &mut rng);

        assert_eq!(temps.len(), rows.len());
        #[allow(clippy::cast_precision_loss)]
        let mean = temps.iter().sum::<f64>() / temps.len() as f64;
        // Base mean plus roughly half the heat island range
        let expected = config.temperature.mean_c + config.temperature.heat_island_max_c / 2.0;
        assert!(
            (mean - expected).abs() < 1.5,
            "mean temperature {mean:.2} too far from expected {expected:.2}"
        );
    }

    #[test]
    fn denser_tracts_get_hotter_addend() {
        let config = find_city("hartford").unwrap();
        let rows = vec![
            BaseRow {
                population: 8000,
                median_income: 50000,
                housing_units: 1000,
                structure_code: 3,
            },
            BaseRow {
                population: 500,
                median_income: 50000,
                housing_units: 1000,
                structure_code: 1,
            },
        ];
        // Average over repeated draws to separate the addend from base noise
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (mut dense_sum, mut sparse_sum) = (0.0, 0.0);
        for _ in 0..200 {
            let temps = synthesize_temperature(&rows, &config, &mut rng);
            dense_sum += temps[0];
            sparse_sum += temps[1];
        }
        assert!(
            dense_sum / 200.0 > sparse_sum / 200.0 + config.temperature.heat_island_max_c / 2.0,
            "dense tract should average noticeably hotter"
        );
    }
}
