//! Full generation pipeline for one city.
//!
//! Config lookup, optional real-demographics load, attribute synthesis,
//! tract polygon synthesis (population-weighted), the positional join,
//! and the CSV + `GeoJSON` writes.

use std::error::Error;
use std::path::PathBuf;

use heat_vuln_city::{Boundary, registry};
use heat_vuln_geometry::{Algorithm, synthesize_tract_geometries};
use heat_vuln_synth::demographics::DemographicInput;
use heat_vuln_tract_models::{Tract, VulnerabilityLevel};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct GenerateArgs {
    pub city: String,
    pub algorithm: String,
    pub out: PathBuf,
    pub acs_csv: Option<PathBuf>,
    pub boundary: Option<PathBuf>,
    pub seed: Option<u64>,
}

/// Runs the whole pipeline and writes the artifacts under `args.out`.
pub fn generate(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let mut config = registry::find_city(&args.city).ok_or_else(|| {
        let available: Vec<String> = registry::all_cities()
            .into_iter()
            .map(|c| c.id)
            .collect();
        format!(
            "unknown city '{}' (available: {})",
            args.city,
            available.join(", ")
        )
    })?;
    if let Some(seed) = args.seed {
        log::info!("Overriding {} seed {} with {seed}", config.id, config.seed);
        config.seed = seed;
    }

    let boundary = match &args.boundary {
        Some(path) => Boundary::from_geojson_file(path)?,
        None => config.default_boundary()?,
    };
    let algorithm = Algorithm::from_name(&args.algorithm)?;

    let real_data = args.acs_csv.as_deref().and_then(|path| {
        heat_vuln_acs::load_optional(path).map(|records| {
            records
                .into_iter()
                .map(|r| DemographicInput {
                    population: r.population,
                    median_income: clamp_to_u32(r.median_income),
                    housing_units: r.housing_units,
                })
                .collect::<Vec<_>>()
        })
    });

    log::info!(
        "Generating {} tracts for {} ({algorithm:?}, seed {})",
        config.tract_count,
        config.name,
        config.seed
    );
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let attributes = heat_vuln_synth::synthesize_attributes(&config, real_data.as_deref(), &mut rng)?;

    let weights: Vec<f64> = attributes.iter().map(|a| f64::from(a.population)).collect();
    let polygons = synthesize_tract_geometries(
        &boundary,
        &config.neighborhoods,
        Some(&weights),
        config.tract_count,
        algorithm,
        &mut rng,
    )?;

    let tracts: Vec<Tract> = attributes
        .iter()
        .cloned()
        .zip(polygons)
        .enumerate()
        .map(|(index, (attributes, geometry))| Tract {
            index,
            attributes,
            geometry,
        })
        .collect();

    let csv_path = args.out.join(format!("{}_attributes.csv", config.id));
    heat_vuln_export::write_attribute_table(&csv_path, &attributes)?;

    let geojson_path = args.out.join(format!("{}_tracts.geojson", config.id));
    let collection = heat_vuln_export::tracts_to_feature_collection(&tracts);
    heat_vuln_export::write_feature_collection(&geojson_path, &collection)?;

    print_summary(&attributes);
    println!("{}", csv_path.display());
    println!("{}", geojson_path.display());
    Ok(())
}

fn print_summary(attributes: &[heat_vuln_tract_models::TractAttributes]) {
    for level in VulnerabilityLevel::all() {
        let count = attributes
            .iter()
            .filter(|a| a.vulnerability_index == level.value())
            .count();
        println!("{:<26} {count}", level.label());
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_to_u32(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    #[test]
    fn end_to_end_grid_run_on_square_boundary() {
        let mut config = registry::find_city("hartford").unwrap();
        config.tract_count = 10;
        let boundary =
            Boundary::from_ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]])
                .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let attributes =
            heat_vuln_synth::synthesize_attributes(&config, None, &mut rng).unwrap();
        let weights: Vec<f64> = attributes.iter().map(|a| f64::from(a.population)).collect();
        let polygons = synthesize_tract_geometries(
            &boundary,
            &config.neighborhoods,
            Some(&weights),
            config.tract_count,
            Algorithm::Grid,
            &mut rng,
        )
        .unwrap();

        assert_eq!(attributes.len(), 10);
        assert_eq!(polygons.len(), 10);

        let total: f64 = polygons.iter().map(Area::unsigned_area).sum();
        assert!(total > 0.0 && total <= boundary.area() + 1e-9);
        for polygon in &polygons {
            assert!(polygon.unsigned_area() > 0.0);
        }

        let mut histogram = [0usize; 5];
        for row in &attributes {
            histogram[usize::from(row.vulnerability_index) - 1] += 1;
        }
        assert_eq!(histogram.iter().sum::<usize>(), 10);
    }

    #[test]
    fn clamp_handles_ordinary_and_degenerate_incomes() {
        assert_eq!(clamp_to_u32(52_000.4), 52_000);
        assert_eq!(clamp_to_u32(52_000.6), 52_001);
        assert_eq!(clamp_to_u32(-5.0), 0);
        assert_eq!(clamp_to_u32(f64::NAN), 0);
        assert_eq!(clamp_to_u32(f64::INFINITY), 0);
        assert_eq!(clamp_to_u32(1e20), u32::MAX);
    }
}
