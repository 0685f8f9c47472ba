//! Property calculators: vertices to properties.
//!
//! Each calculator is the inverse of the matching generator. Bounding shapes
//! never assume a draw direction; only min/max extents are used.

use super::{CIRCLE_VERTEX_COUNT, ShapeKind, ShapeProperties, close_at, magnitude, points_close};
use crate::error::{GeometryError, GeometryResult};
use kurbo::{Point, Rect};

/// Relative tolerance for the circle equidistance and diamond layout checks.
const LAYOUT_TOLERANCE: f64 = 1e-7;

/// Derive the properties of a shape from its vertices.
pub fn calculate_properties(kind: ShapeKind, vertices: &[Point]) -> GeometryResult<ShapeProperties> {
    expect_count(kind, vertices)?;
    if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
        return Err(GeometryError::InconsistentGeometry(format!(
            "non-finite vertex {:?}",
            bad
        )));
    }
    match kind {
        ShapeKind::Point => Ok(ShapeProperties::Point { center: vertices[0] }),
        ShapeKind::Line => Ok(ShapeProperties::Line {
            start: vertices[0],
            end: vertices[1],
        }),
        ShapeKind::Circle => circle_properties(vertices),
        ShapeKind::Rectangle => {
            let extent = extent(vertices);
            Ok(ShapeProperties::Rectangle {
                center: extent.center(),
                width: extent.width(),
                height: extent.height(),
            })
        }
        ShapeKind::Diamond => diamond_properties(vertices),
    }
}

fn expect_count(kind: ShapeKind, vertices: &[Point]) -> GeometryResult<()> {
    let expected = kind.vertex_count();
    if vertices.len() == expected {
        Ok(())
    } else {
        Err(GeometryError::InconsistentGeometry(format!(
            "{:?} needs {} vertices, found {}",
            kind,
            expected,
            vertices.len()
        )))
    }
}

/// Min/max extent of the vertices, independent of their order.
pub(crate) fn extent(vertices: &[Point]) -> Rect {
    let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
    let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for v in vertices {
        x0 = x0.min(v.x);
        y0 = y0.min(v.y);
        x1 = x1.max(v.x);
        y1 = y1.max(v.y);
    }
    Rect::new(x0, y0, x1, y1)
}

/// The generator places vertex 0 east of the center and walks a quarter turn
/// every N/4 vertices, so the center is the midpoint of opposing cardinals.
fn circle_properties(vertices: &[Point]) -> GeometryResult<ShapeProperties> {
    let quarter = CIRCLE_VERTEX_COUNT / 4;
    let east = vertices[0];
    let south = vertices[quarter];
    let west = vertices[2 * quarter];
    let north = vertices[3 * quarter];
    let center = Point::new((east.x + west.x) / 2.0, (south.y + north.y) / 2.0);
    let radius = east.distance(center);

    if radius <= 0.0 {
        return Err(GeometryError::InconsistentGeometry(
            "circle vertices collapse to a point".to_string(),
        ));
    }
    let at = magnitude(center);
    for (i, v) in vertices.iter().enumerate() {
        let d = v.distance(center);
        if !close_at(d, radius, LAYOUT_TOLERANCE, at) {
            return Err(GeometryError::InconsistentGeometry(format!(
                "circle vertex {} is {} from center, expected {}",
                i, d, radius
            )));
        }
    }
    Ok(ShapeProperties::Circle { center, radius })
}

fn diamond_properties(vertices: &[Point]) -> GeometryResult<ShapeProperties> {
    let extent = extent(vertices);
    let center = extent.center();
    let cardinals = [
        Point::new(extent.x0, center.y),
        Point::new(center.x, extent.y0),
        Point::new(extent.x1, center.y),
        Point::new(center.x, extent.y1),
    ];
    for cardinal in cardinals {
        if !vertices.iter().any(|v| points_close(*v, cardinal, LAYOUT_TOLERANCE)) {
            return Err(GeometryError::InconsistentGeometry(format!(
                "diamond has no vertex at cardinal point {:?}",
                cardinal
            )));
        }
    }
    Ok(ShapeProperties::Diamond {
        center,
        width: extent.width(),
        height: extent.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{PROPERTY_TOLERANCE, generate_vertices};

    fn samples() -> Vec<ShapeProperties> {
        vec![
            ShapeProperties::Point { center: Point::new(-3.0, 8.0) },
            ShapeProperties::Line { start: Point::new(1.0, 2.0), end: Point::new(-7.5, 0.25) },
            ShapeProperties::Circle { center: Point::ZERO, radius: 100.0 },
            ShapeProperties::Circle { center: Point::new(12.3, -4.7), radius: 0.35 },
            ShapeProperties::Circle { center: Point::new(-1e4, 2e4), radius: 3.0 },
            ShapeProperties::Rectangle { center: Point::ZERO, width: 10.0, height: 6.0 },
            ShapeProperties::Rectangle { center: Point::new(0.1, 0.7), width: 0.3, height: 9.9 },
            ShapeProperties::Diamond { center: Point::new(4.0, 4.0), width: 8.0, height: 2.0 },
            ShapeProperties::Diamond { center: Point::new(-2.5, 1.1), width: 0.7, height: 13.0 },
        ]
    }

    #[test]
    fn test_properties_roundtrip() {
        for properties in samples() {
            let vertices = generate_vertices(&properties).unwrap();
            let back = calculate_properties(properties.kind(), &vertices).unwrap();
            assert!(
                back.approx_eq(&properties, PROPERTY_TOLERANCE),
                "{:?} came back as {:?}",
                properties,
                back
            );
        }
    }

    #[test]
    fn test_vertices_roundtrip() {
        for properties in samples() {
            let vertices = generate_vertices(&properties).unwrap();
            let back = calculate_properties(properties.kind(), &vertices).unwrap();
            let regenerated = generate_vertices(&back).unwrap();
            assert_eq!(regenerated.len(), vertices.len());
            for (a, b) in vertices.iter().zip(&regenerated) {
                assert!(points_close(*a, *b, PROPERTY_TOLERANCE), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_circle_radius_is_not_shrunk() {
        let properties = ShapeProperties::Circle { center: Point::ZERO, radius: 100.0 };
        let vertices = generate_vertices(&properties).unwrap();
        match calculate_properties(ShapeKind::Circle, &vertices).unwrap() {
            ShapeProperties::Circle { center, radius } => {
                assert!(center.distance(Point::ZERO) < 1e-9);
                assert!((radius - 100.0).abs() < 1e-9);
            }
            other => panic!("Expected circle, got {:?}", other),
        }
    }

    #[test]
    fn test_small_shapes_far_from_origin() {
        for at in [1e8, -3e10, 1e12] {
            let center = Point::new(at + 0.3, at / 2.0);
            for properties in [
                ShapeProperties::Circle { center, radius: 0.7 },
                ShapeProperties::Rectangle { center, width: 0.9, height: 0.4 },
                ShapeProperties::Diamond { center, width: 0.5, height: 1.5 },
            ] {
                let vertices = generate_vertices(&properties).unwrap();
                let back = calculate_properties(properties.kind(), &vertices).unwrap();
                assert!(
                    back.approx_eq(&properties, PROPERTY_TOLERANCE),
                    "{:?} came back as {:?}",
                    properties,
                    back
                );
            }
        }
    }

    #[test]
    fn test_circle_not_equidistant() {
        let properties = ShapeProperties::Circle { center: Point::ZERO, radius: 10.0 };
        let mut vertices = generate_vertices(&properties).unwrap();
        vertices[3].x += 1.0;
        assert!(matches!(
            calculate_properties(ShapeKind::Circle, &vertices),
            Err(GeometryError::InconsistentGeometry(_))
        ));
    }

    #[test]
    fn test_wrong_vertex_count() {
        let result = calculate_properties(ShapeKind::Circle, &[Point::ZERO, Point::new(1.0, 0.0)]);
        assert!(matches!(result, Err(GeometryError::InconsistentGeometry(_))));
        let result = calculate_properties(ShapeKind::Rectangle, &[Point::ZERO]);
        assert!(matches!(result, Err(GeometryError::InconsistentGeometry(_))));
    }

    #[test]
    fn test_rectangle_either_corner_order() {
        let expected = ShapeProperties::Rectangle { center: Point::ZERO, width: 10.0, height: 6.0 };
        let a = Point::new(-5.0, -3.0);
        let b = Point::new(5.0, 3.0);
        assert_eq!(calculate_properties(ShapeKind::Rectangle, &[a, b]).unwrap(), expected);
        assert_eq!(calculate_properties(ShapeKind::Rectangle, &[b, a]).unwrap(), expected);

        // Anti-diagonal corners describe the same rectangle.
        let c = Point::new(-5.0, 3.0);
        let d = Point::new(5.0, -3.0);
        assert_eq!(calculate_properties(ShapeKind::Rectangle, &[d, c]).unwrap(), expected);
    }

    #[test]
    fn test_diamond_any_vertex_order() {
        let properties = ShapeProperties::Diamond { center: Point::new(2.0, 3.0), width: 6.0, height: 4.0 };
        let mut vertices = generate_vertices(&properties).unwrap();
        vertices.reverse();
        vertices.swap(0, 2);
        assert_eq!(calculate_properties(ShapeKind::Diamond, &vertices).unwrap(), properties);
    }

    #[test]
    fn test_diamond_off_cardinal() {
        let vertices = [
            Point::new(0.0, 0.0),
            Point::new(2.0, -2.0),
            Point::new(4.0, 0.0),
            Point::new(1.0, 2.0),
        ];
        assert!(matches!(
            calculate_properties(ShapeKind::Diamond, &vertices),
            Err(GeometryError::InconsistentGeometry(_))
        ));
    }
}
