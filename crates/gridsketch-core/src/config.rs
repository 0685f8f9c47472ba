//! Viewport configuration consumed from the navigation collaborator.

use crate::error::{GeometryError, GeometryResult};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Default grid cell size in screen pixels.
pub const GRID_SIZE: f64 = 20.0;

/// Default pointer hit tolerance in screen pixels.
pub const HIT_TOLERANCE_PX: f64 = 6.0;

/// Grid and viewport settings shared by pointer input, rendering and hit-testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Size of one grid cell in screen pixels.
    pub cell_size: f64,
    /// Pan offset in screen pixels.
    pub pan_offset: Vec2,
    /// Pointer proximity tolerance in screen pixels.
    pub hit_tolerance_px: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            cell_size: GRID_SIZE,
            pan_offset: Vec2::ZERO,
            hit_tolerance_px: HIT_TOLERANCE_PX,
        }
    }
}

impl CanvasConfig {
    /// Check that the settings can drive a coordinate mapping.
    pub fn validate(&self) -> GeometryResult<()> {
        validate_cell_size(self.cell_size)?;
        if !self.pan_offset.is_finite() {
            return Err(GeometryError::Configuration(format!(
                "pan offset must be finite, got {:?}",
                self.pan_offset
            )));
        }
        if !self.hit_tolerance_px.is_finite() || self.hit_tolerance_px < 0.0 {
            return Err(GeometryError::Configuration(format!(
                "hit tolerance must be a non-negative number, got {}",
                self.hit_tolerance_px
            )));
        }
        Ok(())
    }

    /// Deserialize and validate a config from JSON.
    pub fn from_json(json: &str) -> GeometryResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GeometryError::Configuration(format!("Invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub(crate) fn validate_cell_size(cell_size: f64) -> GeometryResult<()> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::Configuration(format!(
            "cell size must be > 0, got {}",
            cell_size
        )))
    }
}
