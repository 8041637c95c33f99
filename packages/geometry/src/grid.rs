//! Deterministic grid partition of a city boundary.
//!
//! The baseline algorithm: cover the boundary's bounding box with a grid
//! whose aspect ratio roughly matches the box, intersect every cell with
//! the boundary, and keep the surviving pieces. Non-overlap holds by
//! construction since distinct grid cells have disjoint interiors.

use geo::{Area, BooleanOps, Coord, Polygon, Rect};
use heat_vuln_city::Boundary;
use heat_vuln_city::boundary::largest_part;

use crate::validity::{area_epsilon, clip_to_boundary, disk_polygon, disk_radius, is_valid_polygon};

/// Grid refinement attempts before falling back to disk padding. Each
/// attempt doubles the cell budget to make up for bounding-box cells
/// that miss an irregular boundary entirely.
const MAX_REFINEMENTS: u32 = 4;

/// Partitions the boundary into `count` tract polygons.
///
/// Cells whose boundary intersection is empty or below the area epsilon
/// are discarded. An irregular boundary covers only part of its bounding
/// box, so a first pass can come up short; the grid is then refined (the
/// cell budget doubles) until `count` cells survive. If refinement still
/// falls short, the remainder is padded with small disks at discarded
/// cell centers, carved against the kept cells so the non-overlap
/// guarantee survives padding. A boundary so degenerate that no cell ever
/// survives becomes a single whole-boundary tract, with the shortfall
/// logged.
#[must_use]
pub fn grid_partition(boundary: &Boundary, count: usize) -> Vec<Polygon<f64>> {
    let epsilon = area_epsilon(boundary);

    let mut kept = Vec::new();
    let mut discarded_centers = Vec::new();
    let mut budget = count;
    for _ in 0..=MAX_REFINEMENTS {
        (kept, discarded_centers) = partition_once(boundary, budget, count, epsilon);
        if kept.len() == count {
            return kept;
        }
        budget = budget.saturating_mul(2);
    }

    if kept.is_empty() {
        log::warn!("No grid cell survived clipping; falling back to the whole boundary");
        return vec![boundary.polygon().clone()];
    }

    pad_with_disks(&mut kept, &discarded_centers, boundary, count, epsilon);
    if kept.len() < count {
        log::warn!(
            "Grid partition produced {} of {} requested tracts",
            kept.len(),
            count
        );
    }
    kept
}

/// One pass over a grid sized for `budget` cells, keeping at most `count`
/// surviving pieces (row-major order) and the centers of discarded cells.
#[allow(clippy::cast_precision_loss)]
fn partition_once(
    boundary: &Boundary,
    budget: usize,
    count: usize,
    epsilon: f64,
) -> (Vec<Polygon<f64>>, Vec<Coord<f64>>) {
    let bbox = boundary.bbox();
    let (cols, rows) = grid_dimensions(budget, bbox.width() / bbox.height());

    let cell_width = bbox.width() / cols as f64;
    let cell_height = bbox.height() / rows as f64;

    let mut kept: Vec<Polygon<f64>> = Vec::with_capacity(count);
    let mut discarded_centers: Vec<Coord<f64>> = Vec::new();

    'cells: for row in 0..rows {
        for col in 0..cols {
            let min = Coord {
                x: (col as f64).mul_add(cell_width, bbox.min().x),
                y: (row as f64).mul_add(cell_height, bbox.min().y),
            };
            let max = Coord {
                x: min.x + cell_width,
                y: min.y + cell_height,
            };
            let cell = Rect::new(min, max).to_polygon();

            match clip_to_boundary(&cell, boundary, epsilon) {
                Some(piece) => {
                    kept.push(piece);
                    if kept.len() == count {
                        break 'cells;
                    }
                }
                None => discarded_centers.push(Coord {
                    x: f64::midpoint(min.x, max.x),
                    y: f64::midpoint(min.y, max.y),
                }),
            }
        }
    }

    (kept, discarded_centers)
}

/// Chooses grid dimensions so `cols * rows >= count` and the cell aspect
/// roughly matches the bounding box.
fn grid_dimensions(count: usize, aspect: f64) -> (usize, usize) {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cols = ((count as f64 * aspect.max(f64::EPSILON)).sqrt().ceil() as usize).max(1);
    let rows = count.div_ceil(cols).max(1);
    (cols, rows)
}

/// Pads a shortfall with small disks at discarded cell centers, clipped to
/// the boundary and carved against every kept polygon they touch.
fn pad_with_disks(
    kept: &mut Vec<Polygon<f64>>,
    centers: &[Coord<f64>],
    boundary: &Boundary,
    count: usize,
    epsilon: f64,
) {
    let radius = disk_radius(boundary);
    let disk_epsilon = epsilon * 1e-3;

    for center in centers {
        if kept.len() == count {
            break;
        }
        let Some(mut disk) = clip_to_boundary(&disk_polygon(*center, radius), boundary, disk_epsilon)
        else {
            continue;
        };
        // Carve against existing cells so padding cannot reintroduce overlap
        let mut emptied = false;
        for existing in kept.iter() {
            if disk.intersection(existing).unsigned_area() > disk_epsilon {
                match largest_part(disk.difference(existing)) {
                    Some(part) if is_valid_polygon(&part, disk_epsilon) => disk = part,
                    _ => {
                        emptied = true;
                        break;
                    }
                }
            }
        }
        if !emptied {
            kept.push(disk);
        }
    }
}
