//! Creation tool: drawing new shapes with the pointer.

use crate::error::GeometryResult;
use crate::shapes::{GeometricObject, ObjectId, ShapeKind, ShapeProperties, ShapeStyle};
use crate::store::GeometryStore;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Point,
    Line,
    Circle,
    Rectangle,
    Diamond,
}

impl ToolKind {
    /// The shape this tool draws, if any.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Point => Some(ShapeKind::Point),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Diamond => Some(ShapeKind::Diamond),
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    #[default]
    Idle,
    /// A shape is being drawn between two grid points.
    Active { start: Point, current: Point },
}

/// Turn a pointer drag into shape properties.
///
/// Circles grow from the press point. Bounding shapes use the two points as
/// opposite corners in any order.
pub fn properties_from_drag(kind: ShapeKind, start: Point, end: Point) -> ShapeProperties {
    match kind {
        ShapeKind::Point => ShapeProperties::Point { center: start },
        ShapeKind::Line => ShapeProperties::Line { start, end },
        ShapeKind::Circle => ShapeProperties::Circle {
            center: start,
            radius: start.distance(end),
        },
        ShapeKind::Rectangle => ShapeProperties::Rectangle {
            center: start.midpoint(end),
            width: (end.x - start.x).abs(),
            height: (end.y - start.y).abs(),
        },
        ShapeKind::Diamond => ShapeProperties::Diamond {
            center: start.midpoint(end),
            width: (end.x - start.x).abs(),
            height: (end.y - start.y).abs(),
        },
    }
}

/// Tracks the current tool and any shape being drawn.
#[derive(Debug, Clone, Default)]
pub struct CreationTool {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Style applied to new shapes.
    pub current_style: ShapeStyle,
}

impl CreationTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any shape in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Whether the current tool draws shapes.
    pub fn is_drawing_tool(&self) -> bool {
        self.current_tool.shape_kind().is_some()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Begin drawing at a grid point. Does nothing for the select tool.
    pub fn begin(&mut self, point: Point) {
        if self.is_drawing_tool() {
            self.state = ToolState::Active {
                start: point,
                current: point,
            };
        }
    }

    pub fn update(&mut self, point: Point) {
        if let ToolState::Active { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// The shape as it would be created now. Never stored.
    pub fn preview(&self) -> Option<GeometricObject> {
        let ToolState::Active { start, current } = self.state else {
            return None;
        };
        let kind = self.current_tool.shape_kind()?;
        GeometricObject::from_properties(
            properties_from_drag(kind, start, current),
            self.current_style.clone(),
        )
        .ok()
    }

    /// Finish drawing and create the shape in the store.
    ///
    /// Returns `Ok(None)` when nothing was being drawn. Degenerate shapes fail
    /// with `InvalidGeometry` and create nothing.
    pub fn end(&mut self, point: Point, store: &mut GeometryStore) -> GeometryResult<Option<ObjectId>> {
        let ToolState::Active { start, .. } = std::mem::take(&mut self.state) else {
            return Ok(None);
        };
        let Some(kind) = self.current_tool.shape_kind() else {
            return Ok(None);
        };
        let properties = properties_from_drag(kind, start, point);
        store
            .create_with_style(properties, self.current_style.clone())
            .map(Some)
    }

    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }
}
