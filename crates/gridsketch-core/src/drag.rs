//! Drag controller: rigid translation of an object's vertices.
//!
//! A drag never calls a vertex generator and never reads properties. The
//! offsets captured at grab time are applied verbatim on every move, and the
//! properties are recalculated once when the pointer is released.

use crate::error::{EditKind, GeometryError, GeometryResult};
use crate::shapes::{ObjectId, calculate_properties};
use crate::store::GeometryStore;
use kurbo::{Point, Vec2};

/// State of an active drag gesture.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// The object being dragged.
    pub target: ObjectId,
    /// Where the pointer engaged, in grid space.
    pub grab_point: Point,
    /// Per-vertex offset from the grab point, fixed for the whole gesture.
    pub vertex_offsets: Vec<Vec2>,
}

/// Owns the single drag slot.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Start dragging an object grabbed at `grab_point`.
    pub fn begin(
        &mut self,
        store: &mut GeometryStore,
        id: ObjectId,
        grab_point: Point,
    ) -> GeometryResult<()> {
        if let Some(active) = &self.session {
            return Err(GeometryError::ConcurrentEdit {
                id: active.target,
                holder: EditKind::Drag,
            });
        }
        let vertex_offsets: Vec<Vec2> = store
            .get(id)?
            .vertices()
            .iter()
            .map(|v| *v - grab_point)
            .collect();
        store.acquire(id, EditKind::Drag)?;
        log::debug!("Drag started on {} at {:?}", id, grab_point);
        self.session = Some(DragSession {
            target: id,
            grab_point,
            vertex_offsets,
        });
        Ok(())
    }

    /// Move the dragged object so the grab point follows the pointer.
    pub fn update(&mut self, store: &mut GeometryStore, pointer: Point) -> GeometryResult<()> {
        let session = self
            .session
            .as_ref()
            .ok_or(GeometryError::InvalidState("no drag in progress"))?;
        let vertices = session
            .vertex_offsets
            .iter()
            .map(|offset| pointer + *offset)
            .collect();
        let target = session.target;
        if let Err(e) = store.replace_vertices(target, vertices) {
            if matches!(e, GeometryError::NotFound(_)) {
                log::warn!("Drag target {} disappeared, dropping gesture", target);
                self.session = None;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Finish the gesture: recalculate properties once and commit.
    ///
    /// If the final vertices no longer describe the shape, the vertices stay
    /// where they are, the properties keep their last good value, and the
    /// error is returned.
    pub fn end(&mut self, store: &mut GeometryStore) -> GeometryResult<ObjectId> {
        let session = self
            .session
            .take()
            .ok_or(GeometryError::InvalidState("no drag in progress"))?;
        let target = session.target;
        let result = commit_final(store, target);
        store.release(target, EditKind::Drag);
        match &result {
            Ok(()) => log::debug!("Drag ended on {}", target),
            Err(e) => log::warn!("Drag on {} ended without recalculation: {}", target, e),
        }
        result.map(|()| target)
    }

    /// Drop the gesture if it targets `id`. Used when the object is deleted.
    pub fn forget(&mut self, id: ObjectId) -> bool {
        if self.session.as_ref().is_some_and(|s| s.target == id) {
            self.session = None;
            true
        } else {
            false
        }
    }
}

fn commit_final(store: &mut GeometryStore, target: ObjectId) -> GeometryResult<()> {
    let object = store.get(target)?;
    let vertices = object.vertices().to_vec();
    let properties = calculate_properties(object.kind(), &vertices)?;
    store.commit(target, vertices, properties, EditKind::Drag)
}
