//! Shape entity model.
//!
//! Vertices are the ground truth geometry of an object. Properties are derived
//! from them by the calculators in [`calculate`] and turned back into vertices
//! by the generators in [`generate`].

pub mod calculate;
pub mod generate;
mod style;

pub use calculate::calculate_properties;
pub use generate::generate_vertices;
pub use style::ShapeStyle;

use crate::error::{GeometryError, GeometryResult};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for geometric objects.
pub type ObjectId = Uuid;

/// Number of vertices used to approximate a circle.
///
/// Must be a multiple of 4 so the cardinal points land on vertices.
pub const CIRCLE_VERTEX_COUNT: usize = 16;

/// Relative tolerance for comparing derived properties.
pub const PROPERTY_TOLERANCE: f64 = 1e-9;

/// The kinds of shapes the surface can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Point,
    Line,
    Circle,
    Rectangle,
    Diamond,
}

impl ShapeKind {
    /// Number of vertices a generator produces for this kind.
    pub fn vertex_count(self) -> usize {
        match self {
            ShapeKind::Point => 1,
            ShapeKind::Line => 2,
            ShapeKind::Circle => CIRCLE_VERTEX_COUNT,
            ShapeKind::Rectangle => 2,
            ShapeKind::Diamond => 4,
        }
    }
}

/// Shape-specific derived parameters, used for display and numeric editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeProperties {
    Point { center: Point },
    Line { start: Point, end: Point },
    Circle { center: Point, radius: f64 },
    Rectangle { center: Point, width: f64, height: f64 },
    Diamond { center: Point, width: f64, height: f64 },
}

impl ShapeProperties {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeProperties::Point { .. } => ShapeKind::Point,
            ShapeProperties::Line { .. } => ShapeKind::Line,
            ShapeProperties::Circle { .. } => ShapeKind::Circle,
            ShapeProperties::Rectangle { .. } => ShapeKind::Rectangle,
            ShapeProperties::Diamond { .. } => ShapeKind::Diamond,
        }
    }

    /// Center of the shape. For lines this is the midpoint.
    pub fn center(&self) -> Point {
        match self {
            ShapeProperties::Point { center }
            | ShapeProperties::Circle { center, .. }
            | ShapeProperties::Rectangle { center, .. }
            | ShapeProperties::Diamond { center, .. } => *center,
            ShapeProperties::Line { start, end } => start.midpoint(*end),
        }
    }

    /// Radius, for circles.
    pub fn radius(&self) -> Option<f64> {
        match self {
            ShapeProperties::Circle { radius, .. } => Some(*radius),
            _ => None,
        }
    }

    /// Reject degenerate or non-finite parameters.
    pub fn validate(&self) -> GeometryResult<()> {
        match self {
            ShapeProperties::Point { center } => finite_point("center", *center),
            ShapeProperties::Line { start, end } => {
                finite_point("start", *start)?;
                finite_point("end", *end)
            }
            ShapeProperties::Circle { center, radius } => {
                finite_point("center", *center)?;
                positive("radius", *radius)
            }
            ShapeProperties::Rectangle { center, width, height }
            | ShapeProperties::Diamond { center, width, height } => {
                finite_point("center", *center)?;
                positive("width", *width)?;
                positive("height", *height)
            }
        }
    }

    /// Compare two property sets within a relative tolerance.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        match (self, other) {
            (ShapeProperties::Point { center: a }, ShapeProperties::Point { center: b }) => {
                points_close(*a, *b, tolerance)
            }
            (
                ShapeProperties::Line { start: s1, end: e1 },
                ShapeProperties::Line { start: s2, end: e2 },
            ) => points_close(*s1, *s2, tolerance) && points_close(*e1, *e2, tolerance),
            (
                ShapeProperties::Circle { center: c1, radius: r1 },
                ShapeProperties::Circle { center: c2, radius: r2 },
            ) => {
                let at = magnitude(*c1).max(magnitude(*c2));
                points_close(*c1, *c2, tolerance) && close_at(*r1, *r2, tolerance, at)
            }
            (
                ShapeProperties::Rectangle { center: c1, width: w1, height: h1 },
                ShapeProperties::Rectangle { center: c2, width: w2, height: h2 },
            )
            | (
                ShapeProperties::Diamond { center: c1, width: w1, height: h1 },
                ShapeProperties::Diamond { center: c2, width: w2, height: h2 },
            ) => {
                let at = magnitude(*c1).max(magnitude(*c2));
                points_close(*c1, *c2, tolerance)
                    && close_at(*w1, *w2, tolerance, at)
                    && close_at(*h1, *h2, tolerance, at)
            }
            _ => false,
        }
    }
}

fn finite_point(name: &str, point: Point) -> GeometryResult<()> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::InvalidGeometry(format!(
            "{} must be finite, got {:?}",
            name, point
        )))
    }
}

fn positive(name: &str, value: f64) -> GeometryResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidGeometry(format!(
            "{} must be > 0, got {}",
            name, value
        )))
    }
}

/// Relative float comparison, absolute near zero.
/// Absolute slack per unit of coordinate magnitude. Lengths measured between
/// points far from the origin carry rounding error on the order of the
/// coordinates' ulp, not of the length itself.
const ULP_SLACK: f64 = 64.0 * f64::EPSILON;

pub(crate) fn close(a: f64, b: f64, tolerance: f64) -> bool {
    close_at(a, b, tolerance, 0.0)
}

/// Like [`close`], for lengths derived from points of the given magnitude.
pub(crate) fn close_at(a: f64, b: f64, tolerance: f64, magnitude: f64) -> bool {
    (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0) + ULP_SLACK * magnitude.abs()
}

pub(crate) fn magnitude(p: Point) -> f64 {
    p.x.abs().max(p.y.abs())
}

pub(crate) fn points_close(a: Point, b: Point, tolerance: f64) -> bool {
    close(a.x, b.x, tolerance) && close(a.y, b.y, tolerance)
}

/// A persisted shape on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometricObject {
    pub(crate) id: ObjectId,
    pub(crate) vertices: Vec<Point>,
    pub(crate) properties: ShapeProperties,
    /// Style properties.
    pub style: ShapeStyle,
}

impl GeometricObject {
    /// Build an object from properties, generating its vertices.
    pub fn from_properties(properties: ShapeProperties, style: ShapeStyle) -> GeometryResult<Self> {
        let vertices = generate_vertices(&properties)?;
        Ok(Self {
            id: Uuid::new_v4(),
            vertices,
            properties,
            style,
        })
    }

    /// Build an object from drawn vertices, calculating its properties.
    pub fn from_vertices(kind: ShapeKind, vertices: Vec<Point>, style: ShapeStyle) -> GeometryResult<Self> {
        let properties = calculate_properties(kind, &vertices)?;
        properties.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            vertices,
            properties,
            style,
        })
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.properties.kind()
    }

    /// Ground-truth geometry.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Derived parameters. Never read these as geometry.
    pub fn properties(&self) -> &ShapeProperties {
        &self.properties
    }

    /// Bounding box of the vertices in grid space.
    pub fn bounds(&self) -> Rect {
        let mut iter = self.vertices.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(Rect::from_points(*first, *first), |rect, p| {
            rect.union_pt(*p)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_degenerate() {
        let circle = ShapeProperties::Circle { center: Point::ZERO, radius: 0.0 };
        assert!(matches!(circle.validate(), Err(GeometryError::InvalidGeometry(_))));

        let rect = ShapeProperties::Rectangle { center: Point::ZERO, width: 4.0, height: -1.0 };
        assert!(rect.validate().is_err());

        let point = ShapeProperties::Point { center: Point::new(f64::NAN, 0.0) };
        assert!(point.validate().is_err());

        let line = ShapeProperties::Line { start: Point::ZERO, end: Point::ZERO };
        assert!(line.validate().is_ok());
    }

    #[test]
    fn test_approx_eq_kind_mismatch() {
        let rect = ShapeProperties::Rectangle { center: Point::ZERO, width: 4.0, height: 4.0 };
        let diamond = ShapeProperties::Diamond { center: Point::ZERO, width: 4.0, height: 4.0 };
        assert!(!rect.approx_eq(&diamond, PROPERTY_TOLERANCE));
        assert!(rect.approx_eq(&rect.clone(), PROPERTY_TOLERANCE));
    }

    #[test]
    fn test_bounds_from_vertices() {
        let object = GeometricObject::from_properties(
            ShapeProperties::Diamond { center: Point::new(10.0, 10.0), width: 6.0, height: 4.0 },
            ShapeStyle::default(),
        )
        .unwrap();
        assert_eq!(object.bounds(), Rect::new(7.0, 8.0, 13.0, 12.0));
    }

    #[test]
    fn test_from_vertices_rejects_degenerate_rectangle() {
        let result = GeometricObject::from_vertices(
            ShapeKind::Rectangle,
            vec![Point::new(3.0, 3.0), Point::new(3.0, 8.0)],
            ShapeStyle::default(),
        );
        assert!(matches!(result, Err(GeometryError::InvalidGeometry(_))));
    }

    #[test]
    fn test_vertex_counts() {
        for properties in [
            ShapeProperties::Point { center: Point::ZERO },
            ShapeProperties::Line { start: Point::ZERO, end: Point::new(1.0, 1.0) },
            ShapeProperties::Circle { center: Point::ZERO, radius: 3.0 },
            ShapeProperties::Rectangle { center: Point::ZERO, width: 2.0, height: 2.0 },
            ShapeProperties::Diamond { center: Point::ZERO, width: 2.0, height: 2.0 },
        ] {
            let object = GeometricObject::from_properties(properties, ShapeStyle::default()).unwrap();
            assert_eq!(object.vertices().len(), object.kind().vertex_count());
        }
    }
}
