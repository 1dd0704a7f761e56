mod error;
pub mod floorplan;
pub mod grid_scan;
pub mod overlap;
pub mod resolve;
pub mod safe_position;

pub use error::LayoutError;
pub use floorplan::Floorplan;
pub use grid_scan::{OccupancyGrid, find_optimal_position, scan_free_cell};
pub use overlap::{effective_rect, has_overlaps, overlapping_pairs, overlaps, rects_overlap};
pub use resolve::{Resolution, resolve_overlaps, resolve_with_report};
pub use safe_position::{SafePlacement, find_safe_position, find_safe_position_with_report};

use crate::config::{FailurePolicy, LayoutConfig, NoFreeCellPolicy, clamp_axis};
use crate::ir::{CANVAS_EXTENT, Division, Point, PositionMap};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a new division picks its first position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PlacementStrategy {
    /// First free cell of the coarse grid.
    Grid,
    /// Default position, then the outward spiral.
    Spiral,
    /// Grid scan, falling back to the spiral when the grid is full.
    #[default]
    Auto,
}

/// The four layout operations with the configured failure policies applied.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn resolve(
        &self,
        divisions: &[Division],
        positions: &PositionMap,
    ) -> Result<Resolution, LayoutError> {
        let report = resolve_with_report(divisions, positions, &self.config);
        if !report.converged {
            soft_failure(
                self.config.resolve.on_non_convergence,
                LayoutError::NotConverged {
                    iterations: report.iterations,
                    remaining: report.remaining_overlaps,
                },
            )?;
        }
        Ok(report)
    }

    pub fn safe_position(
        &self,
        new: &Division,
        existing: &[Division],
        positions: &PositionMap,
    ) -> Result<SafePlacement, LayoutError> {
        let placement = find_safe_position_with_report(new, existing, positions, &self.config);
        if !placement.conflict_free {
            soft_failure(
                self.config.safe_position.on_exhausted,
                LayoutError::NoSafePosition {
                    id: new.id.clone(),
                    attempts: placement.attempts,
                },
            )?;
        }
        Ok(placement)
    }

    /// Grid-scan placement for `new`, applying the no-free-cell policy.
    pub fn optimal_position(
        &self,
        new: &Division,
        existing: &[Division],
        positions: &PositionMap,
    ) -> Result<Point, LayoutError> {
        if let Some(point) = scan_free_cell(existing, positions, &self.config) {
            return Ok(point);
        }
        match self.config.grid_scan.on_no_free_cell {
            NoFreeCellPolicy::Fallback => Ok(self.config.grid_scan.fallback),
            NoFreeCellPolicy::NotFound => Err(LayoutError::NoFreeCell),
            NoFreeCellPolicy::SafePosition => {
                Ok(self.safe_position(new, existing, positions)?.position)
            }
        }
    }

    /// First position for `new`, kept inside the canvas. `existing` must not
    /// contain `new` itself.
    pub fn place(
        &self,
        new: &Division,
        existing: &[Division],
        positions: &PositionMap,
        strategy: PlacementStrategy,
    ) -> Result<Point, LayoutError> {
        let point = match strategy {
            PlacementStrategy::Grid => self.optimal_position(new, existing, positions)?,
            PlacementStrategy::Spiral => self.safe_position(new, existing, positions)?.position,
            PlacementStrategy::Auto => match scan_free_cell(existing, positions, &self.config) {
                Some(point) => point,
                None => self.safe_position(new, existing, positions)?.position,
            },
        };
        Ok(Point::new(
            clamp_axis(point.x, 0.0, CANVAS_EXTENT - new.width()),
            clamp_axis(point.y, 0.0, CANVAS_EXTENT - new.height()),
        ))
    }
}

fn soft_failure(policy: FailurePolicy, err: LayoutError) -> Result<(), LayoutError> {
    match policy {
        FailurePolicy::Silent => Ok(()),
        FailurePolicy::Warn => {
            warn!("{err}; keeping best-effort layout");
            Ok(())
        }
        FailurePolicy::Error => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Rect;

    fn pegs() -> Vec<Division> {
        // One small division in the middle of every grid cell.
        let mut pegs = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                let x = 14.0 + col as f32 * 30.0;
                let y = 14.0 + row as f32 * 30.0;
                pegs.push(Division::new(format!("peg-{col}-{row}"), Rect::new(x, y, 2.0, 2.0)));
            }
        }
        pegs
    }

    fn tight_config() -> LayoutConfig {
        let mut config = LayoutConfig::default();
        config.buffer = 2.0;
        config.grid_scan.on_no_free_cell = NoFreeCellPolicy::NotFound;
        config
    }

    #[test]
    fn grid_strategy_reports_a_full_grid() {
        let engine = LayoutEngine::new(tight_config()).unwrap();
        let new = Division::new("new", Rect::new(14.0, 14.0, 5.0, 5.0));
        let result = engine.place(&new, &pegs(), &PositionMap::new(), PlacementStrategy::Grid);
        assert_eq!(result, Err(LayoutError::NoFreeCell));
    }

    #[test]
    fn auto_strategy_falls_back_to_the_spiral() {
        let engine = LayoutEngine::new(tight_config()).unwrap();
        let new = Division::new("new", Rect::new(14.0, 14.0, 5.0, 5.0));
        let point = engine
            .place(&new, &pegs(), &PositionMap::new(), PlacementStrategy::Auto)
            .unwrap();
        assert_eq!(point, Point::new(50.0, 50.0));
    }

    #[test]
    fn fallback_policy_returns_fixed_point() {
        let mut config = tight_config();
        config.grid_scan.on_no_free_cell = NoFreeCellPolicy::Fallback;
        let engine = LayoutEngine::new(config).unwrap();
        let new = Division::new("new", Rect::new(0.0, 0.0, 60.0, 60.0));
        // The fallback (50, 50) is pulled back inside the canvas for a 60x60 division.
        let point = engine
            .place(&new, &pegs(), &PositionMap::new(), PlacementStrategy::Grid)
            .unwrap();
        assert_eq!(point, Point::new(40.0, 40.0));
    }

    #[test]
    fn error_policy_surfaces_non_convergence() {
        let mut config = LayoutConfig::default();
        config.resolve.bounds = crate::config::ClampBounds::dashboard();
        config.resolve.on_non_convergence = FailurePolicy::Error;
        let engine = LayoutEngine::new(config).unwrap();
        let divisions = vec![
            Division::new("a", Rect::new(20.0, 20.0, 25.0, 25.0)),
            Division::new("b", Rect::new(20.0, 20.0, 25.0, 25.0)),
        ];
        let err = engine.resolve(&divisions, &PositionMap::new()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::NotConverged {
                iterations: 100,
                remaining: 1
            }
        );
    }

    #[test]
    fn warn_policy_keeps_best_effort_result() {
        let mut config = LayoutConfig::default();
        config.resolve.bounds = crate::config::ClampBounds::dashboard();
        let engine = LayoutEngine::new(config).unwrap();
        let divisions = vec![
            Division::new("a", Rect::new(20.0, 20.0, 25.0, 25.0)),
            Division::new("b", Rect::new(20.0, 20.0, 25.0, 25.0)),
        ];
        let report = engine.resolve(&divisions, &PositionMap::new()).unwrap();
        assert!(!report.converged);
    }

    #[test]
    fn error_policy_surfaces_an_exhausted_spiral() {
        // Four tiles around the center leave no 25x25 slot anywhere.
        let corners = vec![
            Division::new("nw", Rect::new(20.0, 20.0, 25.0, 25.0)),
            Division::new("ne", Rect::new(55.0, 20.0, 25.0, 25.0)),
            Division::new("sw", Rect::new(20.0, 55.0, 25.0, 25.0)),
            Division::new("se", Rect::new(55.0, 55.0, 25.0, 25.0)),
        ];
        let mut config = LayoutConfig::default();
        config.safe_position.on_exhausted = FailurePolicy::Error;
        let engine = LayoutEngine::new(config).unwrap();
        let new = Division::new("ops", Rect::new(55.0, 40.0, 25.0, 25.0));

        let err = engine
            .safe_position(&new, &corners, &PositionMap::new())
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::NoSafePosition {
                id: "ops".to_string(),
                attempts: 200
            }
        );
        let err = engine
            .place(&new, &corners, &PositionMap::new(), PlacementStrategy::Spiral)
            .unwrap_err();
        assert!(matches!(err, LayoutError::NoSafePosition { attempts: 200, .. }));
    }

    #[test]
    fn safe_position_policy_sends_a_full_grid_to_the_spiral() {
        let mut config = tight_config();
        config.grid_scan.on_no_free_cell = NoFreeCellPolicy::SafePosition;
        let engine = LayoutEngine::new(config).unwrap();
        let new = Division::new("new", Rect::new(14.0, 14.0, 5.0, 5.0));

        assert_eq!(
            engine.optimal_position(&new, &pegs(), &PositionMap::new()),
            Ok(Point::new(50.0, 50.0))
        );
        let point = engine
            .place(&new, &pegs(), &PositionMap::new(), PlacementStrategy::Grid)
            .unwrap();
        assert_eq!(point, Point::new(50.0, 50.0));
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = LayoutConfig::default();
        config.grid_scan.cell_size = -3.0;
        assert!(LayoutEngine::new(config).is_err());
    }
}
