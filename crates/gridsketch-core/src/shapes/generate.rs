//! Vertex generators: properties to vertices.

use super::{CIRCLE_VERTEX_COUNT, ShapeProperties};
use crate::error::GeometryResult;
use kurbo::Point;
use std::f64::consts::TAU;

/// Generate the vertex sequence for a set of properties.
pub fn generate_vertices(properties: &ShapeProperties) -> GeometryResult<Vec<Point>> {
    properties.validate()?;
    let vertices = match *properties {
        ShapeProperties::Point { center } => vec![center],
        ShapeProperties::Line { start, end } => vec![start, end],
        ShapeProperties::Circle { center, radius } => circle_vertices(center, radius),
        ShapeProperties::Rectangle { center, width, height } => {
            rectangle_vertices(center, width, height)
        }
        ShapeProperties::Diamond { center, width, height } => {
            diamond_vertices(center, width, height)
        }
    };
    Ok(vertices)
}

/// Unit direction of circle vertex `i`. Quarter turns are exact so the
/// calculator can recover the center from the cardinal vertices.
pub(crate) fn circle_direction(i: usize) -> (f64, f64) {
    let quarter = CIRCLE_VERTEX_COUNT / 4;
    if i % quarter == 0 {
        return match i / quarter {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        };
    }
    let angle = TAU * i as f64 / CIRCLE_VERTEX_COUNT as f64;
    (angle.cos(), angle.sin())
}

fn circle_vertices(center: Point, radius: f64) -> Vec<Point> {
    (0..CIRCLE_VERTEX_COUNT)
        .map(|i| {
            let (dx, dy) = circle_direction(i);
            Point::new(center.x + radius * dx, center.y + radius * dy)
        })
        .collect()
}

/// Two opposite corners: min corner first.
fn rectangle_vertices(center: Point, width: f64, height: f64) -> Vec<Point> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    vec![
        Point::new(center.x - hw, center.y - hh),
        Point::new(center.x + hw, center.y + hh),
    ]
}

/// Cardinal points in west, north, east, south order (grid y grows downward).
fn diamond_vertices(center: Point, width: f64, height: f64) -> Vec<Point> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    vec![
        Point::new(center.x - hw, center.y),
        Point::new(center.x, center.y - hh),
        Point::new(center.x + hw, center.y),
        Point::new(center.x, center.y + hh),
    ]
}
