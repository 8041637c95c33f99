//! Best-effort availability probes for the upstream data sources.
//!
//! Real MODIS retrieval needs Earthdata authentication and the bulk ACS
//! pull is a separate concern, so these probes go exactly as far as
//! identifying the endpoints: one HEAD request each, and a metadata JSON
//! recording the product codes, coverage bounds, and reachability status.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::AcsError;

/// Census ACS 5-year estimates API.
pub const CENSUS_ACS_URL: &str = "https://api.census.gov/data/2022/acs/acs5";

/// MODIS Terra land-surface-temperature product page.
pub const MODIS_TERRA_URL: &str = "https://modis.gsfc.nasa.gov/data/dataprod/mod11.php";

/// MODIS Aqua land-surface-temperature product page.
pub const MODIS_AQUA_URL: &str = "https://modis.gsfc.nasa.gov/data/dataprod/myd11.php";

const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Connecticut coverage bounds recorded in the temperature metadata.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CoverageBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Approximate Connecticut bounding box.
pub const CONNECTICUT_BOUNDS: CoverageBounds = CoverageBounds {
    north: 42.05,
    south: 40.95,
    east: -71.78,
    west: -73.73,
};

#[derive(Debug, Serialize)]
struct TemperatureMetadata {
    data_source: &'static str,
    product_codes: [&'static str; 2],
    spatial_resolution: &'static str,
    temporal_resolution: &'static str,
    target_bounds: CoverageBounds,
    collection_date: String,
    access_method: &'static str,
    endpoints: Vec<EndpointStatus>,
}

#[derive(Debug, Serialize)]
struct AcsMetadata {
    data_source: &'static str,
    collection_date: String,
    endpoint: EndpointStatus,
}

/// Reachability result for one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointStatus {
    pub url: String,
    pub status: String,
}

/// Probes the public endpoints and writes one metadata JSON per source
/// under `out_dir`. Returns the paths written.
///
/// Unreachable endpoints are recorded as such, not treated as failures;
/// only local I/O problems are errors.
///
/// # Errors
///
/// * If `out_dir` cannot be created or a metadata file cannot be written.
pub async fn run_probes(out_dir: &Path) -> Result<Vec<PathBuf>, AcsError> {
    std::fs::create_dir_all(out_dir)?;

    let client = reqwest::Client::builder().timeout(PROBE_TIMEOUT).build()?;
    let timestamp = Utc::now().to_rfc3339();

    let acs = AcsMetadata {
        data_source: "US Census Bureau American Community Survey 5-Year Estimates",
        collection_date: timestamp.clone(),
        endpoint: probe_endpoint(&client, CENSUS_ACS_URL).await,
    };
    let acs_path = out_dir.join("acs_endpoint_metadata.json");
    write_metadata(&acs_path, &acs)?;

    let temperature = TemperatureMetadata {
        data_source: "NASA MODIS Land Surface Temperature",
        product_codes: ["MOD11A1", "MYD11A1"],
        spatial_resolution: "1km",
        temporal_resolution: "daily",
        target_bounds: CONNECTICUT_BOUNDS,
        collection_date: timestamp,
        access_method: "NASA Earthdata API (requires authentication)",
        endpoints: vec![
            probe_endpoint(&client, MODIS_TERRA_URL).await,
            probe_endpoint(&client, MODIS_AQUA_URL).await,
        ],
    };
    let temperature_path = out_dir.join("nasa_temperature_metadata.json");
    write_metadata(&temperature_path, &temperature)?;

    Ok(vec![acs_path, temperature_path])
}

async fn probe_endpoint(client: &reqwest::Client, url: &str) -> EndpointStatus {
    let status = match client.head(url).send().await {
        Ok(response) if response.status().is_success() => "reachable".to_string(),
        Ok(response) => {
            log::warn!("{url} answered {}", response.status());
            format!("http_{}", response.status().as_u16())
        }
        Err(e) => {
            log::warn!("{url} unreachable: {e}");
            "unreachable".to_string()
        }
    };
    log::info!("Probe {url}: {status}");
    EndpointStatus {
        url: url.to_string(),
        status,
    }
}

fn write_metadata<T: Serialize>(path: &Path, metadata: &T) -> Result<(), AcsError> {
    let json = serde_json::to_string_pretty(metadata)?;
    std::fs::write(path, json)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
