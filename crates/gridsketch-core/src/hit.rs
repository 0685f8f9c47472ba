//! Hit testing against an object's vertices.
//!
//! Only vertices are read. Bounding shapes normalize their extents first, so
//! the result never depends on the direction a shape was drawn in.

use crate::shapes::calculate::extent;
use crate::shapes::{GeometricObject, ShapeKind, ShapeProperties, calculate_properties};
use kurbo::Point;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Check if a grid-space point hits an object.
///
/// `tolerance` is in grid units and applies to points and lines, which have
/// no interior.
pub fn contains(object: &GeometricObject, point: Point, tolerance: f64) -> bool {
    let vertices = object.vertices();
    match object.kind() {
        ShapeKind::Point => vertices
            .first()
            .is_some_and(|v| v.distance(point) <= tolerance),
        ShapeKind::Line => match vertices {
            [start, end] => point_to_segment_dist(point, *start, *end) <= tolerance,
            _ => false,
        },
        ShapeKind::Circle => match calculate_properties(ShapeKind::Circle, vertices) {
            Ok(ShapeProperties::Circle { center, radius }) => point.distance(center) <= radius,
            Ok(_) => false,
            Err(e) => {
                log::warn!("Skipping hit test for object {}: {}", object.id(), e);
                false
            }
        },
        ShapeKind::Rectangle => {
            let rect = extent(vertices);
            point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
        }
        ShapeKind::Diamond => {
            let rect = extent(vertices);
            let (hw, hh) = (rect.width() / 2.0, rect.height() / 2.0);
            if hw <= 0.0 || hh <= 0.0 {
                return false;
            }
            let center = rect.center();
            (point.x - center.x).abs() / hw + (point.y - center.y).abs() / hh <= 1.0
        }
    }
}
