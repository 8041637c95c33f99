//! Weighted seed-point placement for the Voronoi tessellation.
//!
//! Seeds are not uniform: each tract is pulled toward one of the city's
//! named neighborhood centers, with heavier tracts (by population or
//! vulnerability percentile) more likely to land near the strongest
//! centers, and a Gaussian perturbation whose spread shrinks as the
//! center's nominal density weight grows.

use geo::Coord;
use heat_vuln_city::Boundary;
use heat_vuln_city::config::NeighborhoodCenter;
use rand::Rng;
use rand::prelude::Distribution;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

/// Attempts to land a perturbed point inside the boundary before giving
/// up and using the center verbatim.
const MAX_PLACEMENT_ATTEMPTS: usize = 50;

/// Fraction of the shorter bounding-box side used as the base Gaussian
/// spread before the center-weight and tract-weight adjustments.
const SPREAD_RATIO: f64 = 0.1;

/// Places one seed point per tract.
///
/// `weights` are arbitrary non-negative per-tract weights (population or
/// vulnerability); `None` means uniform. Centers are ranked by their
/// nominal weight; the heaviest tracts go to the top center, mid-weight
/// tracts to one of the top three, and the rest anywhere.
pub fn place_seeds(
    boundary: &Boundary,
    centers: &[NeighborhoodCenter],
    weights: Option<&[f64]>,
    count: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<Coord<f64>> {
    let ranked = ranked_centers(boundary, centers);
    let bbox = boundary.bbox();
    let base_spread = bbox.width().min(bbox.height()) * SPREAD_RATIO;

    let max_weight = weights
        .map(|w| w.iter().copied().fold(0.0_f64, f64::max))
        .filter(|&m| m > 0.0);

    (0..count)
        .map(|i| {
            let tract_weight = match (weights, max_weight) {
                (Some(w), Some(max)) if i < w.len() => (w[i] / max).clamp(0.0, 1.0),
                _ => 0.5,
            };
            let center = choose_center(&ranked, tract_weight, rng);
            let spread = base_spread / center.weight.max(0.1) * tract_weight.mul_add(1.0, 0.5);
            place_one(boundary, center, spread, rng)
        })
        .collect()
}

/// Centers sorted by descending nominal weight. An empty center list is
/// substituted with a single synthetic center at the bounding-box middle
/// so placement always works.
fn ranked_centers(boundary: &Boundary, centers: &[NeighborhoodCenter]) -> Vec<NeighborhoodCenter> {
    let mut ranked: Vec<NeighborhoodCenter> = if centers.is_empty() {
        let bbox = boundary.bbox();
        log::warn!("No neighborhood centers configured; using the bounding-box center");
        vec![NeighborhoodCenter {
            name: "center".to_string(),
            lon: f64::midpoint(bbox.min().x, bbox.max().x),
            lat: f64::midpoint(bbox.min().y, bbox.max().y),
            weight: 1.0,
        }]
    } else {
        centers.to_vec()
    };
    ranked.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Picks a center for one tract based on its normalized weight.
fn choose_center<'a>(
    ranked: &'a [NeighborhoodCenter],
    tract_weight: f64,
    rng: &mut ChaCha8Rng,
) -> &'a NeighborhoodCenter {
    if tract_weight > 0.7 || ranked.len() == 1 {
        return &ranked[0];
    }
    if tract_weight > 0.4 {
        // Top three centers at 50/25/25
        let roll: f64 = rng.r#gen();
        let idx = if roll < 0.5 {
            0
        } else if roll < 0.75 {
            1
        } else {
            2
        };
        return &ranked[idx.min(ranked.len() - 1)];
    }
    &ranked[rng.gen_range(0..ranked.len())]
}

/// Perturbs a center by a Gaussian offset, retrying until the point lands
/// inside the boundary or the attempt budget runs out (then the center is
/// used verbatim).
fn place_one(
    boundary: &Boundary,
    center: &NeighborhoodCenter,
    spread: f64,
    rng: &mut ChaCha8Rng,
) -> Coord<f64> {
    let Ok(offset) = Normal::new(0.0, spread.max(f64::MIN_POSITIVE)) else {
        // Non-finite spread; only possible with a degenerate boundary
        return Coord {
            x: center.lon,
            y: center.lat,
        };
    };

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let lon = center.lon + offset.sample(rng);
        let lat = center.lat + offset.sample(rng);
        if boundary.contains(lon, lat) {
            return Coord { x: lon, y: lat };
        }
    }
    Coord {
        x: center.lon,
        y: center.lat,
    }
}
