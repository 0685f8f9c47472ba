//! Geometry object store: the single source of truth for rendering and
//! hit-testing.

use crate::error::{EditKind, GeometryError, GeometryResult};
use crate::hit;
use crate::shapes::{
    GeometricObject, ObjectId, PROPERTY_TOLERANCE, ShapeKind, ShapeProperties, ShapeStyle,
    calculate_properties,
};
use kurbo::Point;
use std::collections::HashMap;

/// Holds every object on the surface plus the per-object edit locks.
#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    objects: HashMap<ObjectId, GeometricObject>,
    /// Z-order of objects (back to front).
    z_order: Vec<ObjectId>,
    /// Which session currently holds a pending change to an object.
    holders: HashMap<ObjectId, EditKind>,
    revision: u64,
    writes: u64,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an object from properties with the default style.
    pub fn create(&mut self, properties: ShapeProperties) -> GeometryResult<ObjectId> {
        self.create_with_style(properties, ShapeStyle::default())
    }

    /// Create an object from properties, generating its vertices.
    pub fn create_with_style(
        &mut self,
        properties: ShapeProperties,
        style: ShapeStyle,
    ) -> GeometryResult<ObjectId> {
        let object = GeometricObject::from_properties(properties, style)?;
        Ok(self.insert(object))
    }

    /// Create an object from drawn vertices, calculating its properties.
    pub fn create_from_vertices(
        &mut self,
        kind: ShapeKind,
        vertices: Vec<Point>,
        style: ShapeStyle,
    ) -> GeometryResult<ObjectId> {
        let object = GeometricObject::from_vertices(kind, vertices, style)?;
        Ok(self.insert(object))
    }

    fn insert(&mut self, object: GeometricObject) -> ObjectId {
        let id = object.id();
        log::debug!("Created {:?} {}", object.kind(), id);
        self.z_order.push(id);
        self.objects.insert(id, object);
        self.revision += 1;
        id
    }

    pub fn get(&self, id: ObjectId) -> GeometryResult<&GeometricObject> {
        self.objects.get(&id).ok_or(GeometryError::NotFound(id))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Objects in z-order (back to front).
    pub fn objects(&self) -> impl Iterator<Item = &GeometricObject> {
        self.z_order.iter().filter_map(|id| self.objects.get(id))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Find objects at a grid-space point, front to back.
    pub fn objects_at_point(&self, point: Point, tolerance: f64) -> Vec<ObjectId> {
        self.z_order
            .iter()
            .rev()
            .filter(|id| {
                self.objects
                    .get(*id)
                    .is_some_and(|object| hit::contains(object, point, tolerance))
            })
            .copied()
            .collect()
    }

    /// Replace vertices and properties together.
    ///
    /// Fails with `ConcurrentEdit` while a drag or preview holds the object.
    pub fn replace(
        &mut self,
        id: ObjectId,
        vertices: Vec<Point>,
        properties: ShapeProperties,
    ) -> GeometryResult<()> {
        self.get(id)?;
        if let Some(&holder) = self.holders.get(&id) {
            return Err(GeometryError::ConcurrentEdit { id, holder });
        }
        self.write(id, vertices, properties)
    }

    /// Commit path for a session that holds the object.
    pub(crate) fn commit(
        &mut self,
        id: ObjectId,
        vertices: Vec<Point>,
        properties: ShapeProperties,
        by: EditKind,
    ) -> GeometryResult<()> {
        self.check_holder(id, by)?;
        self.write(id, vertices, properties)
    }

    fn write(
        &mut self,
        id: ObjectId,
        vertices: Vec<Point>,
        properties: ShapeProperties,
    ) -> GeometryResult<()> {
        let object = self.objects.get_mut(&id).ok_or(GeometryError::NotFound(id))?;
        if properties.kind() != object.kind() {
            return Err(GeometryError::InvalidGeometry(format!(
                "cannot turn {:?} into {:?}",
                object.kind(),
                properties.kind()
            )));
        }
        properties.validate()?;
        let derived = calculate_properties(object.kind(), &vertices)?;
        if !derived.approx_eq(&properties, PROPERTY_TOLERANCE) {
            return Err(GeometryError::InconsistentGeometry(format!(
                "properties {:?} do not match vertices (expected {:?})",
                properties, derived
            )));
        }
        object.vertices = vertices;
        object.properties = properties;
        self.writes += 1;
        self.revision += 1;
        Ok(())
    }

    /// Replace only the vertices. Properties stay as they were until the
    /// drag commits.
    pub(crate) fn replace_vertices(&mut self, id: ObjectId, vertices: Vec<Point>) -> GeometryResult<()> {
        self.check_holder(id, EditKind::Drag)?;
        let object = self.objects.get_mut(&id).ok_or(GeometryError::NotFound(id))?;
        if vertices.len() != object.vertices.len() {
            return Err(GeometryError::InconsistentGeometry(format!(
                "expected {} vertices, got {}",
                object.vertices.len(),
                vertices.len()
            )));
        }
        object.vertices = vertices;
        self.writes += 1;
        self.revision += 1;
        Ok(())
    }

    /// Change an object's style. Geometry is untouched.
    pub fn set_style(&mut self, id: ObjectId, style: ShapeStyle) -> GeometryResult<()> {
        if let Some(&holder) = self.holders.get(&id) {
            return Err(GeometryError::ConcurrentEdit { id, holder });
        }
        let object = self.objects.get_mut(&id).ok_or(GeometryError::NotFound(id))?;
        object.style = style;
        self.revision += 1;
        Ok(())
    }

    /// Remove an object. Any lock on it is dropped with it.
    pub fn delete(&mut self, id: ObjectId) -> GeometryResult<GeometricObject> {
        let object = self.objects.remove(&id).ok_or(GeometryError::NotFound(id))?;
        self.z_order.retain(|&other| other != id);
        if let Some(holder) = self.holders.remove(&id) {
            log::debug!("Dropped {} lock on deleted object {}", holder, id);
        }
        self.revision += 1;
        Ok(object)
    }

    /// Which session, if any, holds the object.
    pub fn edit_holder(&self, id: ObjectId) -> Option<EditKind> {
        self.holders.get(&id).copied()
    }

    /// Lock an object for a session. At most one session of each kind may
    /// hold any object in the store at a time.
    pub(crate) fn acquire(&mut self, id: ObjectId, by: EditKind) -> GeometryResult<()> {
        self.get(id)?;
        if let Some(&holder) = self.holders.get(&id) {
            return Err(GeometryError::ConcurrentEdit { id, holder });
        }
        if let Some((&held, _)) = self.holders.iter().find(|(_, kind)| **kind == by) {
            return Err(GeometryError::ConcurrentEdit { id: held, holder: by });
        }
        self.holders.insert(id, by);
        Ok(())
    }

    pub(crate) fn release(&mut self, id: ObjectId, by: EditKind) {
        if self.holders.get(&id) == Some(&by) {
            self.holders.remove(&id);
        }
    }

    fn check_holder(&self, id: ObjectId, by: EditKind) -> GeometryResult<()> {
        self.get(id)?;
        match self.holders.get(&id) {
            Some(&holder) if holder == by => Ok(()),
            Some(&holder) => Err(GeometryError::ConcurrentEdit { id, holder }),
            None => Err(GeometryError::InvalidState("object is not held by this session")),
        }
    }

    /// Monotonic counter bumped by every change, for collaborators that poll.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of geometry writes (`replace` and vertex-only updates).
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::generate_vertices;

    fn circle(store: &mut GeometryStore) -> ObjectId {
        store
            .create(ShapeProperties::Circle { center: Point::ZERO, radius: 20.0 })
            .unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let mut store = GeometryStore::new();
        let id = circle(&mut store);
        let object = store.get(id).unwrap();
        assert_eq!(object.id(), id);
        assert_eq!(object.kind(), ShapeKind::Circle);
        assert_eq!(store.len(), 1);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_create_rejects_degenerate() {
        let mut store = GeometryStore::new();
        let result = store.create(ShapeProperties::Rectangle {
            center: Point::ZERO,
            width: 0.0,
            height: 3.0,
        });
        assert!(matches!(result, Err(GeometryError::InvalidGeometry(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_missing() {
        let store = GeometryStore::new();
        let id = uuid::Uuid::new_v4();
        assert_eq!(store.get(id).unwrap_err(), GeometryError::NotFound(id));
    }

    #[test]
    fn test_replace_keeps_properties_in_sync() {
        let mut store = GeometryStore::new();
        let id = circle(&mut store);
        let properties = ShapeProperties::Circle { center: Point::new(3.0, 3.0), radius: 5.0 };
        let vertices = generate_vertices(&properties).unwrap();
        store.replace(id, vertices.clone(), properties.clone()).unwrap();

        let object = store.get(id).unwrap();
        assert_eq!(object.vertices(), vertices.as_slice());
        assert_eq!(object.properties(), &properties);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_replace_rejects_mismatched_properties() {
        let mut store = GeometryStore::new();
        let id = circle(&mut store);
        let before = store.get(id).unwrap().clone();
        let vertices = generate_vertices(&ShapeProperties::Circle {
            center: Point::ZERO,
            radius: 5.0,
        })
        .unwrap();
        let result = store.replace(
            id,
            vertices,
            ShapeProperties::Circle { center: Point::ZERO, radius: 6.0 },
        );
        assert!(matches!(result, Err(GeometryError::InconsistentGeometry(_))));
        assert_eq!(store.get(id).unwrap(), &before);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_replace_rejects_kind_change() {
        let mut store = GeometryStore::new();
        let id = circle(&mut store);
        let properties = ShapeProperties::Point { center: Point::ZERO };
        let result = store.replace(id, vec![Point::ZERO], properties);
        assert!(matches!(result, Err(GeometryError::InvalidGeometry(_))));
    }

    #[test]
    fn test_locked_object_rejects_outside_writes() {
        let mut store = GeometryStore::new();
        let id = circle(&mut store);
        store.acquire(id, EditKind::Preview).unwrap();

        let object = store.get(id).unwrap().clone();
        let result = store.replace(id, object.vertices.clone(), object.properties.clone());
        assert_eq!(
            result,
            Err(GeometryError::ConcurrentEdit { id, holder: EditKind::Preview })
        );
        assert!(matches!(
            store.acquire(id, EditKind::Drag),
            Err(GeometryError::ConcurrentEdit { .. })
        ));
        assert!(store.set_style(id, ShapeStyle::default()).is_err());
        assert!(matches!(
            store.replace_vertices(id, object.vertices.clone()),
            Err(GeometryError::ConcurrentEdit { .. })
        ));

        store.release(id, EditKind::Preview);
        assert_eq!(store.edit_holder(id), None);
        assert!(store.acquire(id, EditKind::Drag).is_ok());
    }

    #[test]
    fn test_one_session_of_each_kind() {
        let mut store = GeometryStore::new();
        let a = circle(&mut store);
        let b = circle(&mut store);
        let c = circle(&mut store);

        store.acquire(a, EditKind::Drag).unwrap();
        assert_eq!(
            store.acquire(b, EditKind::Drag),
            Err(GeometryError::ConcurrentEdit { id: a, holder: EditKind::Drag })
        );
        store.acquire(b, EditKind::Preview).unwrap();
        assert_eq!(
            store.acquire(c, EditKind::Preview),
            Err(GeometryError::ConcurrentEdit { id: b, holder: EditKind::Preview })
        );
        assert_eq!(store.edit_holder(c), None);

        store.release(a, EditKind::Drag);
        assert!(store.acquire(c, EditKind::Drag).is_ok());
    }

    #[test]
    fn test_vertex_only_write_requires_drag() {
        let mut store = GeometryStore::new();
        let id = circle(&mut store);
        let vertices = store.get(id).unwrap().vertices.clone();
        assert!(matches!(
            store.replace_vertices(id, vertices),
            Err(GeometryError::InvalidState(_))
        ));
    }

    #[test]
    fn test_delete_drops_lock() {
        let mut store = GeometryStore::new();
        let id = circle(&mut store);
        store.acquire(id, EditKind::Drag).unwrap();
        store.delete(id).unwrap();
        assert!(!store.contains(id));
        assert_eq!(store.edit_holder(id), None);
        assert!(matches!(store.delete(id), Err(GeometryError::NotFound(_))));
    }

    #[test]
    fn test_objects_at_point_front_to_back() {
        let mut store = GeometryStore::new();
        let back = store
            .create(ShapeProperties::Rectangle { center: Point::ZERO, width: 10.0, height: 10.0 })
            .unwrap();
        let front = store
            .create(ShapeProperties::Circle { center: Point::new(2.0, 2.0), radius: 2.0 })
            .unwrap();

        assert_eq!(store.objects_at_point(Point::new(2.0, 2.0), 0.0), vec![front, back]);
        assert_eq!(store.objects_at_point(Point::new(-4.0, -4.0), 0.0), vec![back]);
        let order: Vec<ObjectId> = store.objects().map(|o| o.id()).collect();
        assert_eq!(order, vec![back, front]);
    }

    #[test]
    fn test_create_from_vertices() {
        let mut store = GeometryStore::new();
        let id = store
            .create_from_vertices(
                ShapeKind::Rectangle,
                vec![Point::new(5.0, 3.0), Point::new(-5.0, -3.0)],
                ShapeStyle::default(),
            )
            .unwrap();
        assert_eq!(
            store.get(id).unwrap().properties(),
            &ShapeProperties::Rectangle { center: Point::ZERO, width: 10.0, height: 6.0 }
        );
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut store = GeometryStore::new();
        let start = store.revision();
        let id = circle(&mut store);
        store.set_style(id, ShapeStyle::default()).unwrap();
        store.delete(id).unwrap();
        assert_eq!(store.revision(), start + 3);
    }
}
