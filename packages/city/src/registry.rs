//! Compile-time registry of supported cities.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new city requires creating a TOML file in `sources/` and adding
//! a corresponding entry here.

use crate::CityConfig;

/// Number of registered cities. Updated when new cities are added.
/// Enforced by a test.
#[cfg(test)]
const EXPECTED_CITY_COUNT: usize = 3;

/// Embedded TOML city definitions.
const CITY_TOMLS: &[(&str, &str)] = &[
    ("hartford", include_str!("../sources/hartford.toml")),
    ("stamford", include_str!("../sources/stamford.toml")),
    ("new_haven", include_str!("../sources/new_haven.toml")),
];

/// Returns all registered city configurations.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse or validate. Since
/// these are compile-time constants, failures indicate a development
/// error and are caught during CI.
#[must_use]
pub fn all_cities() -> Vec<CityConfig> {
    CITY_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            CityConfig::from_toml(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse city config '{name}': {e}"))
        })
        .collect()
}

/// Finds a city configuration by its id.
#[must_use]
pub fn find_city(id: &str) -> Option<CityConfig> {
    all_cities().into_iter().find(|c| c.id == id)
}
