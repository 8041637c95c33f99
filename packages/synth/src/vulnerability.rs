//! Composite vulnerability score and 1-5 index binning.
//!
//! Fixed weights: temperature 30%, AC access 25%, income 25%, green space
//! 20%. Income, AC, and green space enter inverted (less of each means more
//! vulnerable).

use crate::normalize::normalize;

/// Component weight for normalized temperature.
const WEIGHT_TEMPERATURE: f64 = 0.30;
/// Component weight for inverted AC-access probability.
const WEIGHT_AC: f64 = 0.25;
/// Component weight for inverted normalized income.
const WEIGHT_INCOME: f64 = 0.25;
/// Component weight for inverted normalized green space.
const WEIGHT_GREEN: f64 = 0.20;

/// Tolerance below which all scores are treated as identical and every
/// tract gets the middle index.
const DEGENERATE_RANGE: f64 = 1e-10;

/// The composite score column and its binned 1-5 index.
#[derive(Debug, Clone, PartialEq)]
pub struct VulnerabilityColumns {
    /// Composite score in [0, 1] per tract.
    pub scores: Vec<f64>,
    /// Equal-width bin index 1-5 per tract.
    pub indices: Vec<u8>,
}

/// Computes composite vulnerability scores and bins them into 5 levels.
///
/// All component columns must have the same length. Degenerate inputs
/// (zero-variance columns, non-finite values) are absorbed by
/// [`normalize`]; a zero-variance score column maps every tract to the
/// middle index 3.
#[must_use]
pub fn compute_vulnerability(
    temperatures: &[f64],
    incomes: &[f64],
    ac_probabilities: &[f64],
    green_space: &[f64],
) -> VulnerabilityColumns {
    let temp_score = normalize(temperatures);
    let income_score = normalize(incomes);
    let green_score = normalize(green_space);

    let scores: Vec<f64> = (0..temperatures.len())
        .map(|i| {
            let composite = temp_score[i] * WEIGHT_TEMPERATURE
                + (1.0 - ac_probabilities[i]) * WEIGHT_AC
                + (1.0 - income_score[i]) * WEIGHT_INCOME
                + (1.0 - green_score[i]) * WEIGHT_GREEN;
            if composite.is_finite() {
                composite.clamp(0.0, 1.0)
            } else {
                0.5
            }
        })
        .collect();

    let indices = bin_scores(&scores);
    VulnerabilityColumns { scores, indices }
}

/// Bins scores into 5 equal-width buckets over their observed range.
///
/// Monotone by construction: a higher score can never land in a lower
/// bucket.
#[must_use]
pub fn bin_scores(scores: &[f64]) -> Vec<u8> {
    if scores.is_empty() {
        return Vec::new();
    }

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if !(max - min).is_finite() || max - min < DEGENERATE_RANGE {
        return vec![3; scores.len()];
    }

    scores
        .iter()
        .map(|&s| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let bucket = ((s - min) / (max - min) * 5.0).floor() as u8 + 1;
            bucket.min(5)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_bounded_and_indexed() {
        let temps = vec![26.0, 28.0, 30.0, 32.0];
        let incomes = vec![120_000.0, 80_000.0, 50_000.0, 25_000.0];
        let ac = vec![0.95, 0.8, 0.6, 0.3];
        let green = vec![0.5, 0.4, 0.2, 0.05];

        let cols = compute_vulnerability(&temps, &incomes, &ac, &green);
        assert_eq!(cols.scores.len(), 4);
        assert!(cols.scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
        assert!(cols.indices.iter().all(|&i| (1..=5).contains(&i)));
        // Hot, poor, no AC, no green space is the most vulnerable
        assert_eq!(cols.indices[3], 5);
        assert_eq!(cols.indices[0], 1);
    }

    #[test]
    fn binning_is_monotone() {
        let scores = vec![0.1, 0.9, 0.3, 0.5, 0.2, 0.8, 0.45];
        let indices = bin_scores(&scores);
        for i in 0..scores.len() {
            for j in 0..scores.len() {
                if scores[i] < scores[j] {
                    assert!(
                        indices[i] <= indices[j],
                        "score {} got bucket {} but score {} got bucket {}",
                        scores[i],
                        indices[i],
                        scores[j],
                        indices[j]
                    );
                }
            }
        }
    }

    #[test]
    fn extremes_hit_first_and_last_bucket() {
        let indices = bin_scores(&[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn degenerate_variance_maps_to_middle() {
        let indices = bin_scores(&[0.42; 12]);
        assert!(indices.iter().all(|&i| i == 3));
    }

    #[test]
    fn identical_columns_do_not_panic() {
        let constant = vec![1.0; 8];
        let cols = compute_vulnerability(&constant, &constant, &constant, &constant);
        assert!(cols.scores.iter().all(|s| s.is_finite()));
        assert!(cols.indices.iter().all(|&i| i == 3));
    }

    #[test]
    fn empty_input_empty_output() {
        let cols = compute_vulnerability(&[], &[], &[], &[]);
        assert!(cols.scores.is_empty());
        assert!(cols.indices.is_empty());
    }
}
