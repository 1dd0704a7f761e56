use tracing::info;

use super::overlap::{effective_rect, overlapping_pairs};
use super::{LayoutEngine, LayoutError, PlacementStrategy, Resolution};
use crate::config::LayoutConfig;
use crate::ir::{Division, LayoutDocument, Point, PositionMap, Rect};

/// Owner of a floor plan's divisions and their canonical position overrides.
///
/// Every mutating operation works on copies and commits only when the layout
/// engine accepts the result, so a failed operation leaves the plan unchanged.
#[derive(Debug, Clone)]
pub struct Floorplan {
    engine: LayoutEngine,
    divisions: Vec<Division>,
    positions: PositionMap,
}

impl Floorplan {
    pub fn new(document: LayoutDocument, config: LayoutConfig) -> Result<Self, LayoutError> {
        document.validate()?;
        Ok(Self {
            engine: LayoutEngine::new(config)?,
            divisions: document.divisions,
            positions: document.positions,
        })
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    pub fn division(&self, id: &str) -> Option<&Division> {
        self.divisions.iter().find(|division| division.id == id)
    }

    pub fn effective_rect(&self, id: &str) -> Result<Rect, LayoutError> {
        self.division(id)
            .map(|division| effective_rect(division, &self.positions))
            .ok_or_else(|| LayoutError::UnknownDivision(id.to_string()))
    }

    pub fn is_overridden(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Ids of every pair that currently overlaps under the configured buffer.
    pub fn overlapping_pairs(&self) -> Vec<(String, String)> {
        overlapping_pairs(
            &self.divisions,
            &self.positions,
            self.engine.config().buffer,
        )
        .into_iter()
        .map(|(i, j)| (self.divisions[i].id.clone(), self.divisions[j].id.clone()))
        .collect()
    }

    pub fn resolve(&mut self) -> Result<Resolution, LayoutError> {
        let resolution = self.engine.resolve(&self.divisions, &self.positions)?;
        self.positions = resolution.positions.clone();
        Ok(resolution)
    }

    /// Places a new division, then resolves the whole plan. Returns where the
    /// division ended up.
    pub fn add_division(
        &mut self,
        division: Division,
        strategy: PlacementStrategy,
    ) -> Result<Point, LayoutError> {
        division.validate()?;
        if self.division(&division.id).is_some() {
            return Err(LayoutError::DuplicateDivision(division.id));
        }
        let placed = self
            .engine
            .place(&division, &self.divisions, &self.positions, strategy)?;

        let mut divisions = self.divisions.clone();
        let mut positions = self.positions.clone();
        positions.insert(division.id.clone(), placed);
        let id = division.id.clone();
        divisions.push(division);

        let resolution = self.engine.resolve(&divisions, &positions)?;
        let final_position = resolution
            .positions
            .get(&id)
            .copied()
            .unwrap_or(placed);
        info!(%id, x = final_position.x, y = final_position.y, "division added");
        self.divisions = divisions;
        self.positions = resolution.positions;
        Ok(final_position)
    }

    /// Drag end: pin `id` at `to`, then resolve.
    pub fn move_division(&mut self, id: &str, to: Point) -> Result<Resolution, LayoutError> {
        if self.division(id).is_none() {
            return Err(LayoutError::UnknownDivision(id.to_string()));
        }
        if !to.x.is_finite() || !to.y.is_finite() {
            return Err(LayoutError::InvalidDivision {
                id: id.to_string(),
                reason: "target position contains a non-finite value".to_string(),
            });
        }
        let mut positions = self.positions.clone();
        positions.insert(id.to_string(), to);
        let resolution = self.engine.resolve(&self.divisions, &positions)?;
        self.positions = resolution.positions.clone();
        Ok(resolution)
    }

    pub fn remove_division(&mut self, id: &str) -> Result<Division, LayoutError> {
        let index = self
            .divisions
            .iter()
            .position(|division| division.id == id)
            .ok_or_else(|| LayoutError::UnknownDivision(id.to_string()))?;
        self.positions.remove(id);
        Ok(self.divisions.remove(index))
    }

    /// Drops every override; divisions return to their default positions.
    pub fn reset(&mut self) {
        self.positions.clear();
    }

    pub fn document(&self) -> LayoutDocument {
        LayoutDocument {
            divisions: self.divisions.clone(),
            positions: self.positions.clone(),
        }
    }
}
