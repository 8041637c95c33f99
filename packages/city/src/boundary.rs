//! City boundary: the enclosing polygon every tract geometry is clipped to.
//!
//! A boundary can come from the embedded city TOML ring or from an external
//! `GeoJSON` file. Several legacy scripts hand-authored slightly different
//! rings for the same city; that disagreement is treated as a data concern,
//! so the boundary is always an explicit, swappable input.

use geo::{Area, BoundingRect, Contains, Coord, LineString, MultiPolygon, Point, Polygon, Rect};
use geojson::GeoJson;

use crate::CityError;

/// Minimum area (squared degrees) below which a ring is considered
/// degenerate rather than a usable boundary.
const MIN_BOUNDARY_AREA: f64 = 1e-12;

/// A validated city boundary polygon in (lon, lat) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    polygon: Polygon<f64>,
    bbox: Rect<f64>,
    area: f64,
}

impl Boundary {
    /// Builds a boundary from an ordered ring of `[lon, lat]` pairs.
    ///
    /// The ring is closed automatically if the last point does not repeat
    /// the first.
    ///
    /// # Errors
    ///
    /// Returns [`CityError::InvalidConfiguration`] if the ring has fewer
    /// than 4 points or encloses a near-zero area.
    pub fn from_ring(ring: &[[f64; 2]]) -> Result<Self, CityError> {
        if ring.len() < 4 {
            return Err(CityError::invalid(format!(
                "boundary ring has {} points, need at least 4",
                ring.len()
            )));
        }
        let coords: Vec<Coord<f64>> = ring.iter().map(|[x, y]| Coord { x: *x, y: *y }).collect();
        let polygon = Polygon::new(LineString::new(coords), vec![]);
        Self::from_polygon(polygon)
    }

    /// Wraps an already-built polygon, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`CityError::InvalidConfiguration`] if the polygon is
    /// degenerate (near-zero area or no bounding box).
    pub fn from_polygon(polygon: Polygon<f64>) -> Result<Self, CityError> {
        let area = polygon.unsigned_area();
        if area < MIN_BOUNDARY_AREA {
            return Err(CityError::invalid(format!(
                "boundary polygon area {area:e} is degenerate"
            )));
        }
        let bbox = polygon
            .bounding_rect()
            .ok_or_else(|| CityError::invalid("boundary polygon has no bounding box"))?;
        Ok(Self {
            polygon,
            bbox,
            area,
        })
    }

    /// Parses a boundary from `GeoJSON` text.
    ///
    /// Accepts a bare geometry, a feature, or a feature collection (first
    /// feature wins). `MultiPolygon` geometries keep their largest part.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or no usable polygon is found.
    pub fn from_geojson_str(geojson_str: &str) -> Result<Self, CityError> {
        let geojson: GeoJson = geojson_str.parse()?;
        let geometry = match geojson {
            GeoJson::Geometry(g) => g,
            GeoJson::Feature(f) => f
                .geometry
                .ok_or_else(|| CityError::invalid("boundary feature has no geometry"))?,
            GeoJson::FeatureCollection(fc) => fc
                .features
                .into_iter()
                .find_map(|f| f.geometry)
                .ok_or_else(|| CityError::invalid("boundary collection has no geometry"))?,
        };
        let geo_geom: geo::Geometry<f64> = geometry
            .try_into()
            .map_err(|e| CityError::invalid(format!("boundary geometry conversion failed: {e}")))?;
        let polygon = match geo_geom {
            geo::Geometry::Polygon(p) => p,
            geo::Geometry::MultiPolygon(mp) => largest_part(mp)
                .ok_or_else(|| CityError::invalid("boundary MultiPolygon is empty"))?,
            other => {
                return Err(CityError::invalid(format!(
                    "boundary must be a Polygon or MultiPolygon, got {other:?}"
                )));
            }
        };
        Self::from_polygon(polygon)
    }

    /// Reads and parses a boundary from a `GeoJSON` file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_geojson_file(path: &std::path::Path) -> Result<Self, CityError> {
        let contents = std::fs::read_to_string(path)?;
        log::info!("Loaded boundary from {}", path.display());
        Self::from_geojson_str(&contents)
    }

    /// The boundary polygon.
    #[must_use]
    pub const fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Boundary area in squared degrees.
    #[must_use]
    pub const fn area(&self) -> f64 {
        self.area
    }

    /// Bounding box of the boundary.
    #[must_use]
    pub const fn bbox(&self) -> Rect<f64> {
        self.bbox
    }

    /// Whether a (lon, lat) point falls inside the boundary.
    #[must_use]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.polygon.contains(&Point::new(lon, lat))
    }
}

/// Returns the largest-area part of a `MultiPolygon`, if any.
#[must_use]
pub fn largest_part(mp: MultiPolygon<f64>) -> Option<Polygon<f64>> {
    mp.into_iter().max_by(|a, b| {
        a.unsigned_area()
            .partial_cmp(&b.unsigned_area())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
