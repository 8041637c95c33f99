//! Air-conditioning access probability model.
//!
//! A deterministic function of income and housing type: regional base
//! probability scaled by a clamped income factor and a housing-type factor,
//! clamped to the city's probability bounds.

use heat_vuln_city::CityConfig;
use heat_vuln_tract_models::HousingType;

use crate::demographics::BaseRow;

/// Computes the AC-access probability for every row.
pub fn model_ac_access(rows: &[BaseRow], config: &CityConfig) -> Vec<f64> {
    rows.iter().map(|row| ac_probability(row, config)).collect()
}

/// The per-row probability model.
#[must_use]
pub fn ac_probability(row: &BaseRow, config: &CityConfig) -> f64 {
    let spec = &config.ac;

    let income = if row.median_income == 0 {
        spec.fallback_income
    } else {
        f64::from(row.median_income)
    };

    let income_factor = (income / spec.reference_income)
        .clamp(spec.income_factor_min, spec.income_factor_max);

    let housing_factor = match HousingType::from_structure_code(row.structure_code) {
        HousingType::SingleFamily => spec.single_family_factor,
        HousingType::MultiFamily => spec.multi_family_factor,
    };

    (spec.base_probability * income_factor * housing_factor)
        .clamp(spec.probability_min, spec.probability_max)
}
