//! Shared polygon validity predicate and the fallback shape builders.
//!
//! Every algorithm routes its output through the same checks: a usable
//! tract polygon has a ring of at least 4 points and an area above an
//! epsilon that scales with the boundary's own area, so the same code
//! works for cities of very different physical size.

use geo::{Area, BooleanOps, Coord, LineString, Polygon};
use heat_vuln_city::Boundary;
use heat_vuln_city::boundary::largest_part;

/// Fraction of the boundary area below which a polygon is considered
/// degenerate.
const AREA_EPSILON_RATIO: f64 = 1e-6;

/// Number of sides for fallback disk polygons.
const DISK_SIDES: usize = 16;

/// Fraction of the shorter bounding-box side used as the standard
/// fallback disk radius.
const DISK_RADIUS_RATIO: f64 = 0.04;

/// Minimum-area threshold for tract polygons inside this boundary.
#[must_use]
pub fn area_epsilon(boundary: &Boundary) -> f64 {
    boundary.area() * AREA_EPSILON_RATIO
}

/// Standard fallback disk radius for this boundary.
#[must_use]
pub fn disk_radius(boundary: &Boundary) -> f64 {
    let bbox = boundary.bbox();
    bbox.width().min(bbox.height()) * DISK_RADIUS_RATIO
}

/// Whether a polygon passes the shared validity predicate.
#[must_use]
pub fn is_valid_polygon(polygon: &Polygon<f64>, epsilon: f64) -> bool {
    polygon.exterior().0.len() >= 4 && polygon.unsigned_area() > epsilon
}

/// Builds a regular polygon approximating a disk around a center point.
///
/// The legacy fallback shapes were literal hexagons built by trigonometry;
/// a 16-gon keeps the same idea with a rounder outline.
#[must_use]
pub fn disk_polygon(center: Coord<f64>, radius: f64) -> Polygon<f64> {
    #[allow(clippy::cast_precision_loss)]
    let ring: Vec<Coord<f64>> = (0..=DISK_SIDES)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64) / (DISK_SIDES as f64);
            Coord {
                x: radius.mul_add(angle.cos(), center.x),
                y: radius.mul_add(angle.sin(), center.y),
            }
        })
        .collect();
    Polygon::new(LineString::new(ring), vec![])
}

/// Clips a polygon to the boundary, keeping only the largest part of a
/// multi-part result. Returns `None` when the clipped result is empty or
/// below the area epsilon.
#[must_use]
pub fn clip_to_boundary(
    polygon: &Polygon<f64>,
    boundary: &Boundary,
    epsilon: f64,
) -> Option<Polygon<f64>> {
    let clipped = boundary.polygon().intersection(polygon);
    largest_part(clipped).filter(|p| is_valid_polygon(p, epsilon))
}

/// The full fallback ladder for one cell: clip the candidate, then try a
/// standard disk around the seed, then a half-radius disk, and as a last
/// resort keep the unclipped small disk so the count invariant holds.
#[must_use]
pub fn clip_or_fallback(
    candidate: Option<&Polygon<f64>>,
    seed: Coord<f64>,
    boundary: &Boundary,
    epsilon: f64,
) -> Polygon<f64> {
    if let Some(poly) = candidate {
        if let Some(clipped) = clip_to_boundary(poly, boundary, epsilon) {
            return clipped;
        }
    }

    let radius = disk_radius(boundary);
    // Tiny epsilon for the disks themselves: a clipped sliver of a disk
    // still beats an unclipped one.
    let disk_epsilon = epsilon * 1e-3;
    if let Some(clipped) = clip_to_boundary(&disk_polygon(seed, radius), boundary, disk_epsilon) {
        return clipped;
    }
    if let Some(clipped) =
        clip_to_boundary(&disk_polygon(seed, radius / 2.0), boundary, disk_epsilon)
    {
        return clipped;
    }

    log::warn!(
        "Seed ({:.4}, {:.4}) could not be clipped into the boundary; keeping a bare disk",
        seed.x,
        seed.y
    );
    disk_polygon(seed, radius / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_boundary() -> Boundary {
        Boundary::from_ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]).unwrap()
    }

    #[test]
    fn epsilon_scales_with_boundary_area() {
        let small = unit_boundary();
        let large =
            Boundary::from_ring(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]])
                .unwrap();
        assert!((area_epsilon(&large) / area_epsilon(&small) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn disk_polygon_has_expected_area() {
        let disk = disk_polygon(Coord { x: 0.5, y: 0.5 }, 0.1);
        let area = disk.unsigned_area();
        // Area of a regular 16-gon is slightly under the circle's
        let circle = std::f64::consts::PI * 0.01;
        assert!(area > circle * 0.95 && area < circle);
    }

    #[test]
    fn clip_keeps_inside_portion() {
        let boundary = unit_boundary();
        // A square half in, half out
        let square = Polygon::new(
            LineString::from(vec![(0.5, 0.25), (1.5, 0.25), (1.5, 0.75), (0.5, 0.75)]),
            vec![],
        );
        let clipped = clip_to_boundary(&square, &boundary, area_epsilon(&boundary)).unwrap();
        assert!((clipped.unsigned_area() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn clip_rejects_outside_polygon() {
        let boundary = unit_boundary();
        let square = Polygon::new(
            LineString::from(vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0)]),
            vec![],
        );
        assert!(clip_to_boundary(&square, &boundary, area_epsilon(&boundary)).is_none());
    }

    #[test]
    fn fallback_ladder_always_returns_a_polygon() {
        let boundary = unit_boundary();
        let epsilon = area_epsilon(&boundary);
        // Candidate completely outside the boundary, seed inside
        let outside = Polygon::new(
            LineString::from(vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0)]),
            vec![],
        );
        let result = clip_or_fallback(
            Some(&outside),
            Coord { x: 0.5, y: 0.5 },
            &boundary,
            epsilon,
        );
        assert!(is_valid_polygon(&result, 0.0));

        // Even a seed far outside still yields something
        let stranded = clip_or_fallback(None, Coord { x: 50.0, y: 50.0 }, &boundary, epsilon);
        assert!(stranded.exterior().0.len() >= 4);
    }
}
