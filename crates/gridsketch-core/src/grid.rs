//! Coordinate mapping between screen pixels and grid cells.
//!
//! Vertices are only ever stored in grid space. Screen space is transient and
//! used for display and pointer sampling. The pan offset is a screen-space
//! translation, like a camera offset.

use crate::config::{CanvasConfig, validate_cell_size};
use crate::error::{GeometryError, GeometryResult};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A discrete grid cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i64,
    pub y: i64,
}

impl GridCoord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<GridCoord> for Point {
    fn from(coord: GridCoord) -> Self {
        Point::new(coord.x as f64, coord.y as f64)
    }
}

/// Map a screen position to the grid cell containing it.
pub fn to_grid_coordinate(screen: Point, cell_size: f64, pan_offset: Vec2) -> GeometryResult<GridCoord> {
    validate_cell_size(cell_size)?;
    let world = unfloored(screen, cell_size, pan_offset);
    floor_cell(world).ok_or_else(|| {
        GeometryError::InvalidGeometry(format!(
            "screen position {:?} does not map to a grid cell",
            screen
        ))
    })
}

/// Map a grid cell back to the screen position of its origin corner.
pub fn to_screen_coordinate(coord: GridCoord, cell_size: f64, pan_offset: Vec2) -> GeometryResult<Point> {
    validate_cell_size(cell_size)?;
    Ok(Point::new(
        coord.x as f64 * cell_size + pan_offset.x,
        coord.y as f64 * cell_size + pan_offset.y,
    ))
}

/// Floor to a cell, or None if either axis is non-finite or outside i64.
fn floor_cell(world: Point) -> Option<GridCoord> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    const LIMIT: f64 = i64::MAX as f64;
    let x = world.x.floor();
    let y = world.y.floor();
    if !(x >= -LIMIT && x < LIMIT && y >= -LIMIT && y < LIMIT) {
        return None;
    }
    Some(GridCoord::new(x as i64, y as i64))
}

fn unfloored(screen: Point, cell_size: f64, pan_offset: Vec2) -> Point {
    Point::new(
        (screen.x - pan_offset.x) / cell_size,
        (screen.y - pan_offset.y) / cell_size,
    )
}

/// Validated mapping state for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapper {
    cell_size: f64,
    pan_offset: Vec2,
    hit_tolerance_px: f64,
}

impl GridMapper {
    /// Build a mapper from a config, rejecting invalid settings.
    pub fn new(config: &CanvasConfig) -> GeometryResult<Self> {
        config.validate()?;
        Ok(Self {
            cell_size: config.cell_size,
            pan_offset: config.pan_offset,
            hit_tolerance_px: config.hit_tolerance_px,
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn pan_offset(&self) -> Vec2 {
        self.pan_offset
    }

    /// Screen position to grid cell.
    ///
    /// Pointer positions are expected to be finite. In release builds a
    /// position outside the representable grid saturates to the edge cell.
    pub fn to_grid(&self, screen: Point) -> GridCoord {
        let world = self.screen_to_world(screen);
        match floor_cell(world) {
            Some(coord) => coord,
            None => {
                debug_assert!(false, "screen position {:?} has no grid cell", screen);
                GridCoord::new(world.x.floor() as i64, world.y.floor() as i64)
            }
        }
    }

    /// Grid cell to screen position.
    pub fn to_screen(&self, coord: GridCoord) -> Point {
        self.world_to_screen(coord.into())
    }

    /// Screen position to a continuous grid-space point (no flooring).
    pub fn screen_to_world(&self, screen: Point) -> Point {
        unfloored(screen, self.cell_size, self.pan_offset)
    }

    /// Continuous grid-space point to screen position.
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.cell_size + self.pan_offset.x,
            world.y * self.cell_size + self.pan_offset.y,
        )
    }

    /// Screen rectangle covered by a grid cell.
    pub fn cell_rect(&self, coord: GridCoord) -> Rect {
        let origin = self.to_screen(coord);
        Rect::new(
            origin.x,
            origin.y,
            origin.x + self.cell_size,
            origin.y + self.cell_size,
        )
    }

    /// Pan the view by a delta in screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan_offset += delta;
    }

    pub fn set_pan_offset(&mut self, pan_offset: Vec2) {
        self.pan_offset = pan_offset;
    }

    /// Hit tolerance converted to grid units.
    pub fn tolerance(&self) -> f64 {
        self.hit_tolerance_px / self.cell_size
    }
}
