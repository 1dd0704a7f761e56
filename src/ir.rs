use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::layout::LayoutError;

/// Extent of the percentage canvas on both axes.
pub const CANVAS_EXTENT: f32 = 100.0;
/// Center of the canvas on both axes.
pub const CANVAS_CENTER: f32 = CANVAS_EXTENT / 2.0;

/// Runtime position overrides keyed by division id.
pub type PositionMap = BTreeMap<String, Point>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas percentage units; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn at(self, origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Edges grown by `buffer` on every side.
    pub fn buffered(&self, buffer: f32) -> Bounds {
        Bounds {
            left: self.x - buffer,
            right: self.right() + buffer,
            top: self.y - buffer,
            bottom: self.bottom() + buffer,
        }
    }
}

/// Edge representation used by the intersection tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Strict intersection: touching edges do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Default placement. The engine never changes `width`/`height`.
    pub position: Rect,
}

impl Division {
    pub fn new(id: impl Into<String>, position: Rect) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            position,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn width(&self) -> f32 {
        self.position.width
    }

    pub fn height(&self) -> f32 {
        self.position.height
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let Rect {
            x,
            y,
            width,
            height,
        } = self.position;
        if self.id.trim().is_empty() {
            return Err(LayoutError::InvalidDivision {
                id: self.id.clone(),
                reason: "id must not be empty".to_string(),
            });
        }
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return Err(LayoutError::InvalidDivision {
                id: self.id.clone(),
                reason: "position contains a non-finite value".to_string(),
            });
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(LayoutError::InvalidDivision {
                id: self.id.clone(),
                reason: format!("size {width}x{height} must be positive"),
            });
        }
        Ok(())
    }
}

/// A set of divisions plus whatever overrides were already applied to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub positions: PositionMap,
}

impl LayoutDocument {
    pub fn new(divisions: Vec<Division>) -> Self {
        Self {
            divisions,
            positions: PositionMap::new(),
        }
    }

    pub fn division(&self, id: &str) -> Option<&Division> {
        self.divisions.iter().find(|division| division.id == id)
    }

    /// Checks every division and rejects duplicate ids and overrides for unknown ids.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        for division in &self.divisions {
            division.validate()?;
            if !seen.insert(division.id.as_str()) {
                return Err(LayoutError::DuplicateDivision(division.id.clone()));
            }
        }
        for (id, point) in &self.positions {
            if !seen.contains(id.as_str()) {
                return Err(LayoutError::UnknownDivision(id.clone()));
            }
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(LayoutError::InvalidDivision {
                    id: id.clone(),
                    reason: "override contains a non-finite value".to_string(),
                });
            }
        }
        Ok(())
    }
}
