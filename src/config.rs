use crate::ir::{CANVAS_EXTENT, Point};
use crate::layout::LayoutError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a soft failure (non-convergence, exhausted search) reaches the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Return the best-effort result without comment.
    Silent,
    /// Return the best-effort result and emit a warning.
    #[default]
    Warn,
    /// Turn the soft failure into an error.
    Error,
}

/// What the grid scan does when every cell is occupied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum NoFreeCellPolicy {
    /// Return the configured fallback point.
    #[default]
    Fallback,
    /// Report `LayoutError::NoFreeCell`.
    NotFound,
    /// Hand the division to the spiral safe-position search.
    SafePosition,
}

/// Area a pushed or searched division is clamped into, as canvas edges.
/// The division's own size is subtracted from `right`/`bottom`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClampBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ClampBounds {
    pub const fn canvas() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: CANVAS_EXTENT,
            bottom: CANVAS_EXTENT,
        }
    }

    /// Margins of the office dashboard: 5 units on three sides, 15 at the bottom
    /// for the status bar.
    pub const fn dashboard() -> Self {
        Self {
            left: 5.0,
            top: 5.0,
            right: 95.0,
            bottom: 85.0,
        }
    }

    pub fn clamp_x(&self, x: f32, width: f32) -> f32 {
        clamp_axis(x, self.left, self.right - width)
    }

    pub fn clamp_y(&self, y: f32, height: f32) -> f32 {
        clamp_axis(y, self.top, self.bottom - height)
    }
}

impl Default for ClampBounds {
    fn default() -> Self {
        Self::canvas()
    }
}

/// Clamp that never panics: when the range is empty the lower bound wins.
pub(crate) fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    if hi < lo {
        return lo;
    }
    value.clamp(lo, hi)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    pub max_iterations: usize,
    pub bounds: ClampBounds,
    pub on_non_convergence: FailurePolicy,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            bounds: ClampBounds::default(),
            on_non_convergence: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafePositionConfig {
    pub max_attempts: usize,
    /// Radius growth per full turn of the spiral.
    pub spiral_step: f32,
    /// Discrete angles tried per turn.
    pub spiral_angles: usize,
    pub grid_snap: f32,
    pub on_exhausted: FailurePolicy,
}

impl Default for SafePositionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 200,
            spiral_step: 10.0,
            spiral_angles: 8,
            grid_snap: 10.0,
            on_exhausted: FailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridScanConfig {
    pub cell_size: f32,
    /// Offset from a free cell's corner to the returned position.
    pub cell_inset: f32,
    pub fallback: Point,
    pub on_no_free_cell: NoFreeCellPolicy,
}

/// Smallest accepted grid cell; bounds the grid at 100x100 cells.
pub const MIN_CELL_SIZE: f32 = 1.0;

impl GridScanConfig {
    /// Whole cells that fit along one canvas axis, never more than the count
    /// for [`MIN_CELL_SIZE`].
    pub fn cells_per_axis(&self) -> usize {
        (CANVAS_EXTENT / self.cell_size)
            .floor()
            .clamp(0.0, CANVAS_EXTENT / MIN_CELL_SIZE) as usize
    }
}

impl Default for GridScanConfig {
    fn default() -> Self {
        Self {
            cell_size: 30.0,
            cell_inset: 5.0,
            fallback: Point::new(50.0, 50.0),
            on_no_free_cell: NoFreeCellPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Margin added around every division before intersection tests; also the
    /// minimum extra push distance.
    pub buffer: f32,
    pub resolve: ResolveConfig,
    pub safe_position: SafePositionConfig,
    pub grid_scan: GridScanConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            buffer: 10.0,
            resolve: ResolveConfig::default(),
            safe_position: SafePositionConfig::default(),
            grid_scan: GridScanConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.buffer.is_finite() || self.buffer < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "buffer must be a non-negative number, got {}",
                self.buffer
            )));
        }
        if self.resolve.max_iterations == 0 {
            return Err(LayoutError::InvalidConfig(
                "resolve.maxIterations must be at least 1".to_string(),
            ));
        }
        let b = self.resolve.bounds;
        let inside = |v: f32| v.is_finite() && (0.0..=CANVAS_EXTENT).contains(&v);
        if !(inside(b.left) && inside(b.top) && inside(b.right) && inside(b.bottom))
            || b.left >= b.right
            || b.top >= b.bottom
        {
            return Err(LayoutError::InvalidConfig(format!(
                "resolve.bounds must describe a non-empty area inside the canvas, got {b:?}"
            )));
        }
        let safe = &self.safe_position;
        if safe.max_attempts == 0 || safe.spiral_angles == 0 {
            return Err(LayoutError::InvalidConfig(
                "safePosition.maxAttempts and spiralAngles must be at least 1".to_string(),
            ));
        }
        if !safe.spiral_step.is_finite() || safe.spiral_step <= 0.0 {
            return Err(LayoutError::InvalidConfig(
                "safePosition.spiralStep must be positive".to_string(),
            ));
        }
        if !safe.grid_snap.is_finite() || safe.grid_snap < 0.0 {
            return Err(LayoutError::InvalidConfig(
                "safePosition.gridSnap must be zero or positive".to_string(),
            ));
        }
        let grid = &self.grid_scan;
        if !grid.cell_size.is_finite()
            || grid.cell_size < MIN_CELL_SIZE
            || grid.cell_size > CANVAS_EXTENT
        {
            return Err(LayoutError::InvalidConfig(format!(
                "gridScan.cellSize must be in [{MIN_CELL_SIZE}, {CANVAS_EXTENT}], got {}",
                grid.cell_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
    /// Include the list of still-overlapping pairs in dumps.
    pub include_overlaps: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            include_overlaps: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BoundsValue {
    Named(String),
    Explicit {
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
    },
}

impl BoundsValue {
    fn into_bounds(self) -> anyhow::Result<ClampBounds> {
        match self {
            BoundsValue::Named(name) => match name.as_str() {
                "canvas" => Ok(ClampBounds::canvas()),
                "dashboard" => Ok(ClampBounds::dashboard()),
                other => Err(anyhow::anyhow!("unknown bounds preset '{other}'")),
            },
            BoundsValue::Explicit {
                left,
                top,
                right,
                bottom,
            } => Ok(ClampBounds {
                left,
                top,
                right,
                bottom,
            }),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ResolveConfigFile {
    max_iterations: Option<usize>,
    bounds: Option<BoundsValue>,
    on_non_convergence: Option<FailurePolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SafePositionConfigFile {
    max_attempts: Option<usize>,
    spiral_step: Option<f32>,
    spiral_angles: Option<usize>,
    grid_snap: Option<f32>,
    on_exhausted: Option<FailurePolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GridScanConfigFile {
    cell_size: Option<f32>,
    cell_inset: Option<f32>,
    fallback: Option<Point>,
    on_no_free_cell: Option<NoFreeCellPolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct OutputConfigFile {
    pretty: Option<bool>,
    include_overlaps: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    buffer: Option<f32>,
    resolve: Option<ResolveConfigFile>,
    safe_position: Option<SafePositionConfigFile>,
    grid_scan: Option<GridScanConfigFile>,
    output: Option<OutputConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Overlays a camelCase JSON config on the defaults; absent fields keep their default.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(v) = parsed.buffer {
        config.layout.buffer = v;
    }

    if let Some(resolve) = parsed.resolve {
        if let Some(v) = resolve.max_iterations {
            config.layout.resolve.max_iterations = v;
        }
        if let Some(v) = resolve.bounds {
            config.layout.resolve.bounds = v.into_bounds()?;
        }
        if let Some(v) = resolve.on_non_convergence {
            config.layout.resolve.on_non_convergence = v;
        }
    }

    if let Some(safe) = parsed.safe_position {
        if let Some(v) = safe.max_attempts {
            config.layout.safe_position.max_attempts = v;
        }
        if let Some(v) = safe.spiral_step {
            config.layout.safe_position.spiral_step = v;
        }
        if let Some(v) = safe.spiral_angles {
            config.layout.safe_position.spiral_angles = v;
        }
        if let Some(v) = safe.grid_snap {
            config.layout.safe_position.grid_snap = v;
        }
        if let Some(v) = safe.on_exhausted {
            config.layout.safe_position.on_exhausted = v;
        }
    }

    if let Some(grid) = parsed.grid_scan {
        if let Some(v) = grid.cell_size {
            config.layout.grid_scan.cell_size = v;
        }
        if let Some(v) = grid.cell_inset {
            config.layout.grid_scan.cell_inset = v;
        }
        if let Some(v) = grid.fallback {
            config.layout.grid_scan.fallback = v;
        }
        if let Some(v) = grid.on_no_free_cell {
            config.layout.grid_scan.on_no_free_cell = v;
        }
    }

    if let Some(output) = parsed.output {
        if let Some(v) = output.pretty {
            config.output.pretty = v;
        }
        if let Some(v) = output.include_overlaps {
            config.output.include_overlaps = v;
        }
    }

    config.layout.validate()?;
    Ok(config)
}
