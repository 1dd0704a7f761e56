// Coarse placement: split the canvas into square cells, mark the ones covered by
// buffered divisions and hand out the first free cell in row-major order.

use super::overlap::effective_rect;
use crate::config::LayoutConfig;
use crate::ir::{Division, Point, PositionMap, Rect};

/// Occupancy of the placement grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    cols: usize,
    rows: usize,
    occupied: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            occupied: vec![false; cols * rows],
        }
    }

    pub fn from_divisions(
        existing: &[Division],
        positions: &PositionMap,
        config: &LayoutConfig,
    ) -> Self {
        let cells = config.grid_scan.cells_per_axis();
        let mut grid = Self::new(cells, cells);
        for division in existing {
            grid.mark(
                &effective_rect(division, positions),
                config.buffer,
                config.grid_scan.cell_size,
            );
        }
        grid
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Marks every cell the buffered rectangle overlaps. Touching a cell edge
    /// does not occupy it.
    pub fn mark(&mut self, rect: &Rect, buffer: f32, cell_size: f32) {
        let bounds = rect.buffered(buffer);
        let Some((first_col, last_col)) = cell_span(bounds.left, bounds.right, cell_size, self.cols)
        else {
            return;
        };
        let Some((first_row, last_row)) = cell_span(bounds.top, bounds.bottom, cell_size, self.rows)
        else {
            return;
        };
        for row in first_row..=last_row {
            for col in first_col..=last_col {
                self.occupied[row * self.cols + col] = true;
            }
        }
    }

    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.occupied[row * self.cols + col]
    }

    pub fn first_free(&self) -> Option<(usize, usize)> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (col, row)))
            .find(|&(col, row)| !self.is_occupied(col, row))
    }
}

/// Inclusive range of cells overlapped by `[lo, hi)` along one axis.
fn cell_span(lo: f32, hi: f32, cell: f32, count: usize) -> Option<(usize, usize)> {
    if count == 0 || cell <= 0.0 || hi <= 0.0 || lo >= cell * count as f32 || hi <= lo {
        return None;
    }
    let first = (lo / cell).floor().max(0.0) as usize;
    let last = ((hi / cell).ceil() as usize)
        .saturating_sub(1)
        .min(count - 1);
    (first <= last).then_some((first, last))
}

/// Position of the first free grid cell, or `None` when every cell is taken.
pub fn scan_free_cell(
    existing: &[Division],
    positions: &PositionMap,
    config: &LayoutConfig,
) -> Option<Point> {
    let grid = OccupancyGrid::from_divisions(existing, positions, config);
    let (col, row) = grid.first_free()?;
    let cell = config.grid_scan.cell_size;
    let inset = config.grid_scan.cell_inset;
    Some(Point::new(
        col as f32 * cell + inset,
        row as f32 * cell + inset,
    ))
}

/// Grid-scan placement; a full grid yields the configured fallback point.
pub fn find_optimal_position(
    existing: &[Division],
    positions: &PositionMap,
    config: &LayoutConfig,
) -> Point {
    scan_free_cell(existing, positions, config).unwrap_or(config.grid_scan.fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn division(id: &str, x: f32, y: f32, w: f32, h: f32) -> Division {
        Division::new(id, Rect::new(x, y, w, h))
    }

    #[test]
    fn empty_canvas_returns_first_cell() {
        let config = LayoutConfig::default();
        assert_eq!(
            find_optimal_position(&[], &PositionMap::new(), &config),
            Point::new(5.0, 5.0)
        );
    }

    #[test]
    fn buffered_box_touching_a_cell_edge_leaves_it_free() {
        // Buffered box spans [-10, 30] on both axes: exactly cell (0, 0).
        let existing = vec![division("a", 0.0, 0.0, 20.0, 20.0)];
        let config = LayoutConfig::default();
        let grid = OccupancyGrid::from_divisions(&existing, &PositionMap::new(), &config);
        assert!(grid.is_occupied(0, 0));
        assert!(!grid.is_occupied(1, 0));
        assert!(!grid.is_occupied(0, 1));
        assert_eq!(
            find_optimal_position(&existing, &PositionMap::new(), &config),
            Point::new(35.0, 5.0)
        );
    }

    #[test]
    fn scans_rows_before_columns() {
        let existing = vec![division("banner", 0.0, 0.0, 90.0, 10.0)];
        let config = LayoutConfig::default();
        assert_eq!(
            find_optimal_position(&existing, &PositionMap::new(), &config),
            Point::new(5.0, 35.0)
        );
    }

    #[test]
    fn full_grid_falls_back() {
        let existing = vec![division("floor", 0.0, 0.0, 100.0, 100.0)];
        let config = LayoutConfig::default();
        assert_eq!(scan_free_cell(&existing, &PositionMap::new(), &config), None);
        assert_eq!(
            find_optimal_position(&existing, &PositionMap::new(), &config),
            Point::new(50.0, 50.0)
        );
    }

    #[test]
    fn uses_overrides_when_marking() {
        let existing = vec![division("a", 0.0, 0.0, 20.0, 20.0)];
        let mut positions = PositionMap::new();
        positions.insert("a".to_string(), Point::new(70.0, 70.0));
        let config = LayoutConfig::default();
        assert_eq!(
            find_optimal_position(&existing, &positions, &config),
            Point::new(5.0, 5.0)
        );
    }

    #[test]
    fn tiny_cells_from_an_unvalidated_config_stay_bounded() {
        let mut config = LayoutConfig::default();
        config.grid_scan.cell_size = 0.00001;
        let grid = OccupancyGrid::from_divisions(&[], &PositionMap::new(), &config);
        assert_eq!((grid.cols(), grid.rows()), (100, 100));
        assert_eq!(
            find_optimal_position(&[], &PositionMap::new(), &config),
            Point::new(5.0, 5.0)
        );
    }

    #[test]
    fn cell_span_ignores_boxes_outside_the_grid() {
        assert_eq!(cell_span(-40.0, -5.0, 30.0, 3), None);
        assert_eq!(cell_span(92.0, 110.0, 30.0, 3), None);
        assert_eq!(cell_span(-10.0, 45.0, 30.0, 3), Some((0, 1)));
        assert_eq!(cell_span(80.0, 110.0, 30.0, 3), Some((2, 2)));
    }
}
