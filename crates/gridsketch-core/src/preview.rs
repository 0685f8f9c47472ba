//! Edit preview controller: numeric property editing on a working copy.
//!
//! While a session is open the store is never written. `apply` performs the
//! only write of the session; `cancel` performs none.

use crate::error::{EditKind, GeometryError, GeometryResult};
use crate::shapes::{GeometricObject, ObjectId, ShapeProperties, generate_vertices};
use crate::store::GeometryStore;

/// State of an open preview session.
#[derive(Debug, Clone)]
pub struct PreviewSession {
    /// The object being edited.
    pub target: ObjectId,
    /// Deep copy of the object when the session opened.
    pub original: GeometricObject,
    /// The live-edited copy shown to the editing panel.
    pub working: GeometricObject,
}

/// Owns the single preview slot.
#[derive(Debug, Clone, Default)]
pub struct PreviewController {
    session: Option<PreviewSession>,
}

impl PreviewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&PreviewSession> {
        self.session.as_ref()
    }

    /// The working copy, while previewing.
    pub fn working_copy(&self) -> Option<&GeometricObject> {
        self.session.as_ref().map(|s| &s.working)
    }

    /// Open an edit session on an existing object.
    pub fn open(&mut self, store: &mut GeometryStore, id: ObjectId) -> GeometryResult<&GeometricObject> {
        if let Some(active) = &self.session {
            return Err(GeometryError::ConcurrentEdit {
                id: active.target,
                holder: EditKind::Preview,
            });
        }
        let original = store.get(id)?.clone();
        store.acquire(id, EditKind::Preview)?;
        log::debug!("Preview opened on {}", id);
        let session = self.session.insert(PreviewSession {
            target: id,
            working: original.clone(),
            original,
        });
        Ok(&session.working)
    }

    /// Regenerate the working copy from edited properties.
    ///
    /// Rejected edits leave the working copy as it was.
    pub fn update_preview(&mut self, properties: ShapeProperties) -> GeometryResult<&GeometricObject> {
        let session = self
            .session
            .as_mut()
            .ok_or(GeometryError::InvalidState("no preview in progress"))?;
        if properties.kind() != session.working.kind() {
            return Err(GeometryError::InvalidGeometry(format!(
                "cannot edit {:?} with {:?} properties",
                session.working.kind(),
                properties.kind()
            )));
        }
        let vertices = generate_vertices(&properties)?;
        session.working.vertices = vertices;
        session.working.properties = properties;
        Ok(&session.working)
    }

    /// Commit the working copy with a single store write.
    pub fn apply(&mut self, store: &mut GeometryStore) -> GeometryResult<ObjectId> {
        let session = self
            .session
            .take()
            .ok_or(GeometryError::InvalidState("no preview in progress"))?;
        let target = session.target;
        let result = store.commit(
            target,
            session.working.vertices,
            session.working.properties,
            EditKind::Preview,
        );
        store.release(target, EditKind::Preview);
        match &result {
            Ok(()) => log::debug!("Preview applied to {}", target),
            Err(e) => log::warn!("Preview on {} could not be applied: {}", target, e),
        }
        result.map(|()| target)
    }

    /// Discard the working copy. The store is not written.
    pub fn cancel(&mut self, store: &mut GeometryStore) -> GeometryResult<()> {
        let session = self
            .session
            .take()
            .ok_or(GeometryError::InvalidState("no preview in progress"))?;
        store.release(session.target, EditKind::Preview);
        log::debug!("Preview cancelled on {}", session.target);
        Ok(())
    }

    /// Drop the session if it targets `id`. Used when the object is deleted.
    pub fn forget(&mut self, id: ObjectId) -> bool {
        if self.session.as_ref().is_some_and(|s| s.target == id) {
            self.session = None;
            true
        } else {
            false
        }
    }
}
