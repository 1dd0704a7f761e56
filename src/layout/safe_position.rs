// Safe position search for a new division: try the declared default first, then
// walk an outward spiral around the canvas center until a candidate clears every
// existing division.

use std::f32::consts::TAU;

use super::overlap::count_conflicts;
use crate::config::LayoutConfig;
use crate::ir::{CANVAS_CENTER, Division, Point, PositionMap};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafePlacement {
    pub position: Point,
    /// Candidates tested, the default included.
    pub attempts: usize,
    pub conflict_free: bool,
}

/// Best-effort position for `new`. When the search runs out of attempts the
/// last spiral candidate is returned.
pub fn find_safe_position(
    new: &Division,
    existing: &[Division],
    positions: &PositionMap,
    config: &LayoutConfig,
) -> Point {
    find_safe_position_with_report(new, existing, positions, config).position
}

pub fn find_safe_position_with_report(
    new: &Division,
    existing: &[Division],
    positions: &PositionMap,
    config: &LayoutConfig,
) -> SafePlacement {
    let max_attempts = config.safe_position.max_attempts;
    let mut candidate = new.position.origin();

    for attempt in 0..max_attempts {
        let rect = new.position.at(candidate);
        if count_conflicts(&rect, existing, positions, config.buffer) == 0 {
            return SafePlacement {
                position: candidate,
                attempts: attempt + 1,
                conflict_free: true,
            };
        }
        candidate = spiral_candidate(attempt, new.width(), new.height(), config);
    }

    let conflict_free =
        count_conflicts(&new.position.at(candidate), existing, positions, config.buffer) == 0;
    tracing::debug!(
        id = %new.id,
        x = candidate.x,
        y = candidate.y,
        conflict_free,
        "safe position search exhausted"
    );
    SafePlacement {
        position: candidate,
        attempts: max_attempts,
        conflict_free,
    }
}

/// Top-left of the spiral candidate for `attempt`: the rectangle is centered on
/// a point `radius` away from the canvas center, snapped and clamped.
pub(crate) fn spiral_candidate(
    attempt: usize,
    width: f32,
    height: f32,
    config: &LayoutConfig,
) -> Point {
    let safe = &config.safe_position;
    let angles = safe.spiral_angles.max(1);
    let radius = (attempt / angles) as f32 * safe.spiral_step;
    let angle = (attempt % angles) as f32 * (TAU / angles as f32);

    let center_x = CANVAS_CENTER + radius * angle.cos();
    let center_y = CANVAS_CENTER + radius * angle.sin();
    let x = snap(center_x - width * 0.5, safe.grid_snap);
    let y = snap(center_y - height * 0.5, safe.grid_snap);

    let bounds = config.resolve.bounds;
    Point::new(bounds.clamp_x(x, width), bounds.clamp_y(y, height))
}

fn snap(value: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}
