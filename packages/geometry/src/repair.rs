//! Order-dependent overlap repair for a finished tract set.
//!
//! Runs as a final pass over whatever the partition algorithm produced:
//! polygons are visited in index order, and each one yields any area it
//! shares with a lower-indexed polygon. Lower indices therefore keep
//! their full shape, which makes the repaired set a deterministic
//! function of the input order. An R-tree over bounding boxes prefilters
//! the pairwise checks without changing the result.

use geo::{Area, BooleanOps, BoundingRect, Centroid, Coord, Polygon, Rect};
use heat_vuln_city::Boundary;
use heat_vuln_city::boundary::largest_part;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};

use crate::validity::{
    area_epsilon, clip_to_boundary, disk_polygon, disk_radius, is_valid_polygon,
};

type IndexedEnvelope = GeomWithData<Rectangle<(f64, f64)>, usize>;

/// Rewrites the polygon list so no two members share more than the
/// boundary's area epsilon. The output has the same length and order as
/// the input.
#[must_use]
pub fn repair_overlaps(polygons: Vec<Polygon<f64>>, boundary: &Boundary) -> Vec<Polygon<f64>> {
    let epsilon = area_epsilon(boundary);

    let mut accepted: Vec<Polygon<f64>> = Vec::with_capacity(polygons.len());
    let mut tree: RTree<IndexedEnvelope> = RTree::new();
    let mut repaired_count = 0_usize;

    for (index, polygon) in polygons.into_iter().enumerate() {
        let mut overlapping = overlapping_indices(&tree, &polygon);
        // Stable subtraction order keeps the repair deterministic
        overlapping.sort_unstable();

        let mut current = polygon;
        let mut survived = true;
        let mut touched = false;

        for &other in &overlapping {
            if current.intersection(&accepted[other]).unsigned_area() <= epsilon {
                continue;
            }
            touched = true;
            match largest_part(current.difference(&accepted[other])) {
                Some(part) if is_valid_polygon(&part, epsilon) => current = part,
                _ => {
                    survived = false;
                    break;
                }
            }
        }

        if !survived {
            current = replacement_patch(&current, &accepted, &tree, boundary, epsilon);
            touched = true;
        }
        if touched {
            repaired_count += 1;
        }

        if let Some(bbox) = current.bounding_rect() {
            tree.insert(GeomWithData::new(envelope_rect(&bbox), index));
        }
        accepted.push(current);
    }

    if repaired_count > 0 {
        log::debug!("Overlap repair rewrote {repaired_count} polygons");
    }
    accepted
}

/// Indices of accepted polygons whose bounding box intersects the
/// candidate's.
fn overlapping_indices(tree: &RTree<IndexedEnvelope>, polygon: &Polygon<f64>) -> Vec<usize> {
    let Some(bbox) = polygon.bounding_rect() else {
        return Vec::new();
    };
    let envelope = AABB::from_corners(
        (bbox.min().x, bbox.min().y),
        (bbox.max().x, bbox.max().y),
    );
    tree.locate_in_envelope_intersecting(&envelope)
        .map(|entry| entry.data)
        .collect()
}

fn envelope_rect(bbox: &Rect<f64>) -> Rectangle<(f64, f64)> {
    Rectangle::from_corners((bbox.min().x, bbox.min().y), (bbox.max().x, bbox.max().y))
}

/// Replaces a polygon that was consumed entirely by its neighbors.
///
/// First choice is a half-radius disk at the old centroid, clipped to the
/// boundary and carved against the neighbors it still touches; if even
/// that vanishes, a thin rectangle offset from the centroid stands in so
/// the count invariant holds.
fn replacement_patch(
    original: &Polygon<f64>,
    accepted: &[Polygon<f64>],
    tree: &RTree<IndexedEnvelope>,
    boundary: &Boundary,
    epsilon: f64,
) -> Polygon<f64> {
    let center = original.centroid().map_or_else(
        || {
            let bbox = boundary.bbox();
            Coord {
                x: f64::midpoint(bbox.min().x, bbox.max().x),
                y: f64::midpoint(bbox.min().y, bbox.max().y),
            }
        },
        |p| Coord { x: p.x(), y: p.y() },
    );
    let radius = disk_radius(boundary) / 2.0;
    let patch_epsilon = epsilon * 1e-3;

    let disk = disk_polygon(center, radius);
    if let Some(patch) = carve_patch(&disk, accepted, tree, boundary, patch_epsilon) {
        return patch;
    }

    // Last resort: a small rectangle offset from the original bounding box
    let anchor = original
        .bounding_rect()
        .map_or(center, |bbox| bbox.min());
    let offset = Rect::new(
        Coord {
            x: anchor.x + radius,
            y: anchor.y + radius,
        },
        Coord {
            x: anchor.x + 2.0 * radius,
            y: anchor.y + 2.0 * radius,
        },
    )
    .to_polygon();
    if let Some(patch) = carve_patch(&offset, accepted, tree, boundary, patch_epsilon) {
        return patch;
    }

    log::warn!(
        "No overlap-free patch near ({:.4}, {:.4}); keeping an unclipped sliver",
        center.x,
        center.y
    );
    offset
}

/// Clips a patch candidate to the boundary and carves away every accepted
/// polygon it still overlaps.
fn carve_patch(
    candidate: &Polygon<f64>,
    accepted: &[Polygon<f64>],
    tree: &RTree<IndexedEnvelope>,
    boundary: &Boundary,
    patch_epsilon: f64,
) -> Option<Polygon<f64>> {
    let mut patch = clip_to_boundary(candidate, boundary, patch_epsilon)?;
    let mut neighbors = overlapping_indices(tree, &patch);
    neighbors.sort_unstable();
    for other in neighbors {
        if patch.intersection(&accepted[other]).unsigned_area() <= patch_epsilon {
            continue;
        }
        patch = largest_part(patch.difference(&accepted[other]))
            .filter(|p| is_valid_polygon(p, patch_epsilon))?;
    }
    Some(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::LineString;

    fn unit_boundary() -> Boundary {
        Boundary::from_ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]).unwrap()
    }

    fn square(min_x: f64, min_y: f64, side: f64) -> Polygon<f64> {
        Rect::new(
            Coord { x: min_x, y: min_y },
            Coord {
                x: min_x + side,
                y: min_y + side,
            },
        )
        .to_polygon()
    }

    #[test]
    fn disjoint_polygons_pass_through() {
        let boundary = unit_boundary();
        let input = vec![square(0.0, 0.0, 0.4), square(0.5, 0.5, 0.4)];
        let output = repair_overlaps(input.clone(), &boundary);
        assert_eq!(output.len(), 2);
        for (before, after) in input.iter().zip(&output) {
            assert!(
                (before.unsigned_area() - after.unsigned_area()).abs() < 1e-12,
                "disjoint polygons should keep their area"
            );
        }
    }

    #[test]
    fn overlap_goes_to_the_lower_index() {
        let boundary = unit_boundary();
        let first = square(0.0, 0.0, 0.6);
        let second = square(0.4, 0.0, 0.6);
        let output = repair_overlaps(vec![first.clone(), second], &boundary);

        assert!(
            (output[0].unsigned_area() - first.unsigned_area()).abs() < 1e-12,
            "first polygon keeps its full area"
        );
        // Second lost the 0.2 x 0.6 shared strip
        assert!((output[1].unsigned_area() - 0.12).abs() < 1e-9);
    }

    #[test]
    fn repaired_set_is_pairwise_disjoint() {
        let boundary = unit_boundary();
        let epsilon = area_epsilon(&boundary);
        let input = vec![
            square(0.0, 0.0, 0.5),
            square(0.3, 0.0, 0.5),
            square(0.0, 0.3, 0.5),
            square(0.3, 0.3, 0.5),
        ];
        let output = repair_overlaps(input, &boundary);
        assert_eq!(output.len(), 4);
        for i in 0..output.len() {
            for j in (i + 1)..output.len() {
                let shared = output[i].intersection(&output[j]).unsigned_area();
                assert!(shared <= epsilon, "polygons {i} and {j} share {shared:e}");
            }
        }
    }

    #[test]
    fn fully_consumed_polygon_gets_a_patch() {
        let boundary = unit_boundary();
        let big = square(0.0, 0.0, 1.0);
        let inner = square(0.4, 0.4, 0.2);
        let output = repair_overlaps(vec![big, inner], &boundary);
        assert_eq!(output.len(), 2);
        assert!(
            output[1].unsigned_area() > 0.0,
            "consumed polygon must be replaced, not dropped"
        );
    }

    #[test]
    fn repair_is_deterministic() {
        let boundary = unit_boundary();
        let input = vec![
            square(0.0, 0.0, 0.5),
            square(0.25, 0.25, 0.5),
            square(0.5, 0.0, 0.5),
        ];
        let a = repair_overlaps(input.clone(), &boundary);
        let b = repair_overlaps(input, &boundary);
        for (p, q) in a.iter().zip(&b) {
            assert_eq!(
                p.exterior().0.len(),
                q.exterior().0.len(),
                "same input must produce the same repaired rings"
            );
            assert!((p.unsigned_area() - q.unsigned_area()).abs() < 1e-15);
        }
    }

    #[test]
    fn degenerate_ring_does_not_panic() {
        let boundary = unit_boundary();
        let degenerate = Polygon::new(LineString::new(vec![]), vec![]);
        let output = repair_overlaps(vec![square(0.0, 0.0, 0.5), degenerate], &boundary);
        assert_eq!(output.len(), 2);
    }
}
