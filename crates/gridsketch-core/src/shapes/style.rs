//! Style carried by each object. Opaque to the geometry core.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Stroke and fill settings for a shape, with colors kept as RGBA8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke_rgba: [u8; 4],
    /// Stroke width in screen pixels.
    pub stroke_width: f64,
    /// None = no fill.
    pub fill_rgba: Option<[u8; 4]>,
}

impl ShapeStyle {
    /// Outline-only style.
    pub fn stroked(color: Color, stroke_width: f64) -> Self {
        Self {
            stroke_rgba: rgba8(color),
            stroke_width,
            fill_rgba: None,
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill_rgba = Some(rgba8(color));
        self
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::stroked(Color::BLACK, 2.0)
    }
}

fn rgba8(color: Color) -> [u8; 4] {
    let rgba = color.to_rgba8();
    [rgba.r, rgba.g, rgba.b, rgba.a]
}
