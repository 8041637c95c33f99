//! Green-space fraction model.
//!
//! A housing-density proxy, inverted and normalized, blended with uniform
//! noise and clipped to the city's bounds: fewer housing units per tract
//! means more green space.

use heat_vuln_city::CityConfig;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::demographics::BaseRow;
use crate::normalize::normalize;

/// Computes the estimated green-space fraction for every row.
pub fn model_green_space(
    rows: &[BaseRow],
    config: &CityConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<f64> {
    let spec = &config.green_space;

    let densities: Vec<f64> = rows
        .iter()
        .map(|r| f64::from(r.housing_units) / 100.0)
        .collect();
    let normalized = normalize(&densities);

    normalized
        .iter()
        .map(|&density| {
            let inverse = 1.0 - density;
            let noise = rng.gen_range(spec.noise_min..=spec.noise_max);
            (inverse * spec.density_blend + noise).clamp(spec.pct_min, spec.pct_max)
        })
        .collect()
}
