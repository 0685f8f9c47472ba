//! GridSketch Core Library
//!
//! Geometry object core for the GridSketch drawing surface: shape vertices and
//! their derived properties, the drag and edit-preview sessions that mutate
//! them, grid coordinate mapping, and hit-testing.

pub mod canvas;
pub mod config;
pub mod drag;
pub mod error;
pub mod grid;
pub mod hit;
pub mod preview;
pub mod shapes;
pub mod store;
pub mod tools;

pub use canvas::{Canvas, PointerAction};
pub use config::{CanvasConfig, GRID_SIZE};
pub use drag::{DragController, DragSession};
pub use error::{EditKind, GeometryError, GeometryResult};
pub use grid::{GridCoord, GridMapper, to_grid_coordinate, to_screen_coordinate};
pub use preview::{PreviewController, PreviewSession};
pub use shapes::{
    CIRCLE_VERTEX_COUNT, GeometricObject, ObjectId, ShapeKind, ShapeProperties, ShapeStyle,
    calculate_properties, generate_vertices,
};
pub use store::GeometryStore;
pub use tools::{CreationTool, ToolKind};
