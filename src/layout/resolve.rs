// Iterative overlap resolution. Each pass walks every pair (i, j), i < j, and
// pushes the later division away from the earlier one along the axis with the
// smaller overlap. Passes repeat until one finds nothing or the cap is hit.

use tracing::{debug, debug_span};

use super::overlap::{effective_rect, overlapping_pairs, rects_overlap};
use crate::config::{ClampBounds, LayoutConfig, clamp_axis};
use crate::ir::{CANVAS_EXTENT, Division, Point, PositionMap, Rect};

/// Outcome of a resolution run.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub positions: PositionMap,
    /// Passes performed, including the final clean one.
    pub iterations: usize,
    pub converged: bool,
    /// Overlapping pairs left after the final containment pass.
    pub remaining_overlaps: usize,
}

/// Resolves overlaps and returns the updated override map. Non-convergence is
/// silent here; use [`resolve_with_report`] to observe it.
pub fn resolve_overlaps(
    divisions: &[Division],
    positions: &PositionMap,
    config: &LayoutConfig,
) -> PositionMap {
    resolve_with_report(divisions, positions, config).positions
}

pub fn resolve_with_report(
    divisions: &[Division],
    positions: &PositionMap,
    config: &LayoutConfig,
) -> Resolution {
    let _span = debug_span!("resolve_overlaps", divisions = divisions.len()).entered();
    let buffer = config.buffer;
    let bounds = config.resolve.bounds;
    let mut working = positions.clone();

    // Out-of-bounds input is normalized first so that a pass reporting no
    // overlaps also leaves nothing for the final containment pass to move.
    contain_all(divisions, &mut working);

    let mut iterations = 0;
    let mut overlaps_exist = true;
    while overlaps_exist && iterations < config.resolve.max_iterations {
        overlaps_exist = false;
        iterations += 1;
        for i in 0..divisions.len() {
            for j in (i + 1)..divisions.len() {
                let a = effective_rect(&divisions[i], &working);
                let b = effective_rect(&divisions[j], &working);
                if !rects_overlap(&a, &b, buffer) {
                    continue;
                }
                overlaps_exist = true;
                let moved = push_apart(&a, &b, buffer, &bounds);
                debug!(
                    from = %divisions[i].id,
                    pushed = %divisions[j].id,
                    x = moved.x,
                    y = moved.y,
                    pass = iterations,
                    "pushed overlapping division"
                );
                working.insert(divisions[j].id.clone(), moved);
            }
        }
    }

    contain_all(divisions, &mut working);

    let remaining_overlaps = if overlaps_exist {
        overlapping_pairs(divisions, &working, buffer).len()
    } else {
        0
    };
    debug!(iterations, remaining_overlaps, "resolution finished");

    Resolution {
        positions: working,
        iterations,
        converged: remaining_overlaps == 0,
        remaining_overlaps,
    }
}

/// New top-left for `b` after pushing it away from `a`.
fn push_apart(a: &Rect, b: &Rect, buffer: f32, bounds: &ClampBounds) -> Point {
    let center_a = a.center();
    let center_b = b.center();
    let dir_x = center_b.x - center_a.x;
    let dir_y = center_b.y - center_a.y;

    let ab = a.buffered(buffer);
    let bb = b.buffered(buffer);
    let overlap_x = (ab.right - bb.left).min(bb.right - ab.left);
    let overlap_y = (ab.bottom - bb.top).min(bb.bottom - ab.top);
    let push = overlap_x.max(overlap_y) + buffer;

    if overlap_x < overlap_y {
        let x = b.x + push * away(dir_x);
        Point::new(bounds.clamp_x(x, b.width), b.y)
    } else {
        let y = b.y + push * away(dir_y);
        Point::new(b.x, bounds.clamp_y(y, b.height))
    }
}

/// Push direction along one axis; coincident centers push toward +.
fn away(direction: f32) -> f32 {
    if direction < 0.0 { -1.0 } else { 1.0 }
}

/// Forces every division into `[0, 100 - size]` on both axes. Only divisions
/// that move, or already carried an override, are written to the map.
pub(crate) fn contain_all(divisions: &[Division], positions: &mut PositionMap) {
    for division in divisions {
        let rect = effective_rect(division, positions);
        let x = clamp_axis(rect.x, 0.0, CANVAS_EXTENT - rect.width);
        let y = clamp_axis(rect.y, 0.0, CANVAS_EXTENT - rect.height);
        if x != rect.x || y != rect.y {
            positions.insert(division.id.clone(), Point::new(x, y));
        }
    }
}
