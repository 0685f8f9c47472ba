//! Canvas state: routes pointer and editor events to the geometry core.

use crate::config::CanvasConfig;
use crate::drag::DragController;
use crate::error::GeometryResult;
use crate::grid::{GridCoord, GridMapper};
use crate::preview::PreviewController;
use crate::shapes::{GeometricObject, ObjectId, ShapeProperties, ShapeStyle};
use crate::store::GeometryStore;
use crate::tools::{CreationTool, ToolKind};
use kurbo::{Point, Rect, Vec2};

/// What a pointer press started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Nothing under the pointer and no drawing tool selected.
    None,
    /// A new shape is being drawn.
    Drawing,
    /// An existing object is being dragged.
    Dragging(ObjectId),
}

/// Runtime canvas state (not persisted).
#[derive(Debug, Clone)]
pub struct Canvas {
    config: CanvasConfig,
    mapper: GridMapper,
    store: GeometryStore,
    drag: DragController,
    preview: PreviewController,
    /// Creation tool.
    pub tool: CreationTool,
}

impl Canvas {
    /// Create an empty canvas for a viewport configuration.
    pub fn new(config: CanvasConfig) -> GeometryResult<Self> {
        let mapper = GridMapper::new(&config)?;
        Ok(Self {
            config,
            mapper,
            store: GeometryStore::new(),
            drag: DragController::new(),
            preview: PreviewController::new(),
            tool: CreationTool::new(),
        })
    }

    /// Read access for rendering and inspection.
    pub fn store(&self) -> &GeometryStore {
        &self.store
    }

    pub fn mapper(&self) -> &GridMapper {
        &self.mapper
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Change the cell size. The current mapping is kept on error.
    pub fn set_cell_size(&mut self, cell_size: f64) -> GeometryResult<()> {
        let config = CanvasConfig {
            cell_size,
            ..self.config.clone()
        };
        self.mapper = GridMapper::new(&config)?;
        self.config = config;
        Ok(())
    }

    /// Move the view by a delta in screen pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.mapper.pan_by(delta);
        self.config.pan_offset = self.mapper.pan_offset();
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool.set_tool(tool);
    }

    /// Create a shape from properties with the current tool style.
    pub fn create(&mut self, properties: ShapeProperties) -> GeometryResult<ObjectId> {
        self.store
            .create_with_style(properties, self.tool.current_style.clone())
    }

    pub fn set_style(&mut self, id: ObjectId, style: ShapeStyle) -> GeometryResult<()> {
        self.store.set_style(id, style)
    }

    /// Delete an object, cancelling any drag or preview that targets it.
    pub fn delete(&mut self, id: ObjectId) -> GeometryResult<GeometricObject> {
        let object = self.store.delete(id)?;
        if self.drag.forget(id) {
            log::warn!("Cancelled drag on deleted object {}", id);
        }
        if self.preview.forget(id) {
            log::warn!("Cancelled preview on deleted object {}", id);
        }
        Ok(object)
    }

    /// Grid cell under the pointer.
    pub fn grid_at(&self, screen: Point) -> GridCoord {
        self.mapper.to_grid(screen)
    }

    /// Screen rectangle to highlight under the pointer. Reads no shared state.
    pub fn hover_highlight(&self, screen: Point) -> Rect {
        self.mapper.cell_rect(self.mapper.to_grid(screen))
    }

    /// Topmost object under a screen position.
    pub fn object_at(&self, screen: Point) -> Option<ObjectId> {
        let world = self.mapper.screen_to_world(screen);
        self.store
            .objects_at_point(world, self.mapper.tolerance())
            .first()
            .copied()
    }

    /// Pointer pressed: start drawing, or grab the topmost object.
    pub fn pointer_down(&mut self, screen: Point) -> GeometryResult<PointerAction> {
        let cell: Point = self.mapper.to_grid(screen).into();
        if self.tool.is_drawing_tool() {
            self.tool.begin(cell);
            return Ok(PointerAction::Drawing);
        }
        match self.object_at(screen) {
            Some(id) => {
                self.drag.begin(&mut self.store, id, cell)?;
                Ok(PointerAction::Dragging(id))
            }
            None => Ok(PointerAction::None),
        }
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, screen: Point) -> GeometryResult<()> {
        let cell: Point = self.mapper.to_grid(screen).into();
        if self.drag.is_active() {
            self.drag.update(&mut self.store, cell)
        } else {
            self.tool.update(cell);
            Ok(())
        }
    }

    /// Pointer released: finish the drag or create the drawn shape.
    pub fn pointer_up(&mut self, screen: Point) -> GeometryResult<Option<ObjectId>> {
        let cell: Point = self.mapper.to_grid(screen).into();
        if self.drag.is_active() {
            self.drag.update(&mut self.store, cell)?;
            return self.drag.end(&mut self.store).map(Some);
        }
        self.tool.end(cell, &mut self.store)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Shape being drawn, for the renderer.
    pub fn drawing_preview(&self) -> Option<GeometricObject> {
        self.tool.preview()
    }

    /// Open the numeric editor on an object.
    pub fn open_editor(&mut self, id: ObjectId) -> GeometryResult<&GeometricObject> {
        self.preview.open(&mut self.store, id)
    }

    pub fn update_editor(&mut self, properties: ShapeProperties) -> GeometryResult<&GeometricObject> {
        self.preview.update_preview(properties)
    }

    pub fn apply_editor(&mut self) -> GeometryResult<ObjectId> {
        self.preview.apply(&mut self.store)
    }

    pub fn cancel_editor(&mut self) -> GeometryResult<()> {
        self.preview.cancel(&mut self.store)
    }

    /// Live working copy for the editing panel, while the editor is open.
    pub fn editor_state(&self) -> Option<&GeometricObject> {
        self.preview.working_copy()
    }
}
