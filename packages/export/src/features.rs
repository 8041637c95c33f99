//! `GeoJSON` export of the joined tracts.
//!
//! Each tract becomes one `Feature`: the polygon as geometry, every
//! attribute column as a property, plus `level_label` and `level_color`
//! so a renderer can style the choropleth without re-deriving the
//! legend.

use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use heat_vuln_tract_models::{Tract, VulnerabilityLevel};

use crate::ExportError;

/// Converts joined tracts into a `GeoJSON` feature collection.
///
/// An out-of-range vulnerability index (which a well-formed pipeline
/// never produces) is exported without the legend properties rather than
/// failing the whole export.
#[must_use]
pub fn tracts_to_feature_collection(tracts: &[Tract]) -> FeatureCollection {
    let features = tracts.iter().map(tract_to_feature).collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Serializes a feature collection to a `.geojson` file, creating parent
/// directories as needed.
///
/// # Errors
///
/// * If the file cannot be created or serialization fails.
pub fn write_feature_collection(
    path: &Path,
    collection: &FeatureCollection,
) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(collection)?;
    std::fs::write(path, json)?;
    log::info!(
        "Wrote {} features to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

fn tract_to_feature(tract: &Tract) -> Feature {
    let geometry = Geometry::new(geojson::Value::from(&tract.geometry));

    let mut properties = match serde_json::to_value(&tract.attributes) {
        Ok(JsonValue::Object(map)) => map,
        _ => JsonObject::new(),
    };
    properties.insert("index".to_string(), tract.index.into());
    match VulnerabilityLevel::from_value(tract.attributes.vulnerability_index) {
        Ok(level) => {
            properties.insert("level_label".to_string(), level.label().into());
            properties.insert("level_color".to_string(), level.color().into());
        }
        Err(e) => log::warn!("Tract {} has {e}; exporting without legend", tract.index),
    }

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
