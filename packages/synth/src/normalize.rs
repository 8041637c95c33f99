//! Shared min-max normalization with degenerate-input substitution.
//!
//! Every weighted-sum computation in the pipeline runs through
//! [`normalize`], so non-finite values and zero-variance columns can never
//! produce NaN scores downstream.

/// Tolerance below which a column is treated as having zero variance.
const ZERO_VARIANCE_EPSILON: f64 = 1e-12;

/// Normalizes a column of values to the [0, 1] range.
///
/// Non-finite entries are replaced with the column median before scaling.
/// A column with zero variance (or no finite values at all) short-circuits
/// to a constant 0.5 vector rather than dividing by zero.
#[must_use]
pub fn normalize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let med = finite_median(values);
    let Some(med) = med else {
        // No finite values at all
        return vec![0.5; values.len()];
    };

    let cleaned: Vec<f64> = values
        .iter()
        .map(|&v| if v.is_finite() { v } else { med })
        .collect();

    let min = cleaned.iter().copied().fold(f64::INFINITY, f64::min);
    let max = cleaned.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < ZERO_VARIANCE_EPSILON {
        return vec![0.5; values.len()];
    }

    cleaned
        .iter()
        .map(|&v| ((v - min) / (max - min)).clamp(0.0, 1.0))
        .collect()
}

/// Median of the finite entries of a column, or `None` if there are none.
#[must_use]
pub fn finite_median(values: &[f64]) -> Option<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        Some(f64::midpoint(finite[mid - 1], finite[mid]))
    } else {
        Some(finite[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_to_unit_range() {
        let normalized = normalize(&[10.0, 20.0, 30.0]);
        assert_eq!(normalized, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn zero_variance_returns_half() {
        let normalized = normalize(&[42.0, 42.0, 42.0, 42.0]);
        assert!(normalized.iter().all(|&v| (v - 0.5).abs() < f64::EPSILON));
    }

    #[test]
    fn non_finite_replaced_with_median() {
        let normalized = normalize(&[1.0, f64::INFINITY, 3.0, f64::NAN, 5.0]);
        assert_eq!(normalized.len(), 5);
        assert!(normalized.iter().all(|v| v.is_finite()));
        assert!(normalized.iter().all(|&v| (0.0..=1.0).contains(&v)));
        // INF and NAN take the median (3.0), which normalizes to 0.5
        assert!((normalized[1] - 0.5).abs() < 1e-12);
        assert!((normalized[3] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn all_non_finite_returns_half() {
        let normalized = normalize(&[f64::NAN, f64::INFINITY, f64::NEG_INFINITY]);
        assert!(normalized.iter().all(|&v| (v - 0.5).abs() < f64::EPSILON));
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(finite_median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(finite_median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(finite_median(&[f64::NAN]), None);
    }
}
