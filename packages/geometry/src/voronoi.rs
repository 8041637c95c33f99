//! Voronoi tessellation of weighted seed points.
//!
//! Builds a Delaunay triangulation over the seeds plus a ring of distant
//! ghost generators around the boundary envelope, so every real seed is an
//! interior vertex with a bounded Voronoi cell (the "diagram against an
//! enclosing envelope" construction). Each cell is the polygon of
//! circumcenters of the triangles around its seed, sorted by angle, then
//! clipped to the boundary.
//!
//! Cells of one diagram never overlap, and clipping preserves that. The
//! disk fallbacks for degenerate cells are not guaranteed overlap-free
//! with their neighbors; they are small and rare, and kept as a known
//! limitation rather than papered over.

use std::collections::HashSet;

use geo::{Coord, LineString, Polygon};
use heat_vuln_city::Boundary;
use heat_vuln_city::config::NeighborhoodCenter;
use rand_chacha::ChaCha8Rng;
use spade::{DelaunayTriangulation, Point2, Triangulation};

use crate::seeds::place_seeds;
use crate::validity::{area_epsilon, clip_or_fallback};

/// Number of ghost generators placed around the envelope.
const GHOST_RING_POINTS: usize = 16;

/// Ghost ring radius as a multiple of the larger bounding-box side.
const GHOST_MARGIN_FACTOR: f64 = 3.0;

/// Rounding scale for deduplicating near-identical circumcenters.
const CORNER_KEY_SCALE: f64 = 1e9;

/// Places weighted seeds and tessellates the boundary around them.
///
/// Returns exactly `count` boundary-clipped polygons; degenerate cells
/// fall back to clipped disks per the shared ladder.
pub fn weighted_voronoi(
    boundary: &Boundary,
    centers: &[NeighborhoodCenter],
    weights: Option<&[f64]>,
    count: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<Polygon<f64>> {
    let seeds = place_seeds(boundary, centers, weights, count, rng);
    voronoi_tessellation(boundary, &seeds)
}

/// Tessellates the boundary into one cell per seed point.
#[must_use]
pub fn voronoi_tessellation(boundary: &Boundary, seeds: &[Coord<f64>]) -> Vec<Polygon<f64>> {
    let epsilon = area_epsilon(boundary);

    let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
    for ghost in ghost_ring(boundary) {
        // Ghosts are construction scaffolding; a failed insert only costs
        // cell closure for nearby seeds, which the fallback ladder covers.
        let _ = triangulation.insert(ghost);
    }

    let mut claimed = HashSet::new();
    let handles: Vec<Option<spade::handles::FixedVertexHandle>> = seeds
        .iter()
        .map(|seed| match triangulation.insert(Point2::new(seed.x, seed.y)) {
            // A duplicate seed returns the same handle; only the first
            // claimant owns the cell, later ones fall back to disks.
            Ok(handle) if claimed.insert(handle) => Some(handle),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Seed ({:.4}, {:.4}) rejected by triangulation: {e}", seed.x, seed.y);
                None
            }
        })
        .collect();

    seeds
        .iter()
        .zip(&handles)
        .map(|(seed, handle)| {
            let cell = handle.and_then(|h| voronoi_cell(&triangulation, h));
            clip_or_fallback(cell.as_ref(), *seed, boundary, epsilon)
        })
        .collect()
}

/// Distant generators around the envelope that close the hull cells.
fn ghost_ring(boundary: &Boundary) -> Vec<Point2<f64>> {
    let bbox = boundary.bbox();
    let center_x = f64::midpoint(bbox.min().x, bbox.max().x);
    let center_y = f64::midpoint(bbox.min().y, bbox.max().y);
    let radius = bbox.width().max(bbox.height()) * GHOST_MARGIN_FACTOR;

    #[allow(clippy::cast_precision_loss)]
    (0..GHOST_RING_POINTS)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64) / (GHOST_RING_POINTS as f64);
            Point2::new(
                radius.mul_add(angle.cos(), center_x),
                radius.mul_add(angle.sin(), center_y),
            )
        })
        .collect()
}

/// Reconstructs the (bounded) Voronoi cell of one generator as the angle-
/// sorted polygon of circumcenters of its adjacent triangles.
///
/// Returns `None` for hull vertices (unbounded cells) and degenerate
/// cases with fewer than three distinct corners.
fn voronoi_cell(
    triangulation: &DelaunayTriangulation<Point2<f64>>,
    handle: spade::handles::FixedVertexHandle,
) -> Option<Polygon<f64>> {
    let vertex = triangulation.vertex(handle);
    let generator = vertex.position();

    let mut corners: Vec<Coord<f64>> = Vec::new();
    let mut seen: HashSet<(i64, i64)> = HashSet::new();

    for edge in vertex.out_edges() {
        let face = edge.face();
        let Some(inner) = face.as_inner() else {
            // Hull vertex: the cell extends to infinity
            return None;
        };
        let [a, b, c] = inner.positions();
        let center = circumcenter(a, b, c)?;
        #[allow(clippy::cast_possible_truncation)]
        let key = (
            (center.x * CORNER_KEY_SCALE).round() as i64,
            (center.y * CORNER_KEY_SCALE).round() as i64,
        );
        if seen.insert(key) {
            corners.push(center);
        }
    }

    if corners.len() < 3 {
        return None;
    }

    corners.sort_by(|p, q| {
        let angle_p = (p.y - generator.y).atan2(p.x - generator.x);
        let angle_q = (q.y - generator.y).atan2(q.x - generator.x);
        angle_p
            .partial_cmp(&angle_q)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Some(Polygon::new(LineString::new(corners), vec![]))
}

/// Circumcenter of a triangle, or `None` when the points are collinear.
fn circumcenter(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Option<Coord<f64>> {
    let d = 2.0 * (b.y - c.y).mul_add(a.x, (c.y - a.y).mul_add(b.x, (a.y - b.y) * c.x));
    if d.abs() < 1e-30 {
        return None;
    }
    let a_sq = a.x.mul_add(a.x, a.y * a.y);
    let b_sq = b.x.mul_add(b.x, b.y * b.y);
    let c_sq = c.x.mul_add(c.x, c.y * c.y);
    let ux = (b.y - c.y).mul_add(a_sq, (c.y - a.y).mul_add(b_sq, (a.y - b.y) * c_sq)) / d;
    let uy = (c.x - b.x).mul_add(a_sq, (a.x - c.x).mul_add(b_sq, (b.x - a.x) * c_sq)) / d;
    if ux.is_finite() && uy.is_finite() {
        Some(Coord { x: ux, y: uy })
    } else {
        None
    }
}
