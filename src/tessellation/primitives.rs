use std::f64::consts::TAU;

use crate::error::Result;
use crate::math::polygon_2d::segment_direction;
use crate::math::{Point2, Vector2, World};

use super::loft::extrude;
use super::Mesh;

/// Points of a regular polygon approximating a circle, counter-clockwise.
#[must_use]
pub fn circle_points(center: Point2, radius: f64, segments: usize) -> Vec<Point2> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let a = i as f64 / segments as f64 * TAU;
            Point2::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect()
}

/// Corners of an axis-aligned rectangle, counter-clockwise.
#[must_use]
pub fn rectangle_points(min: Point2, max: Point2) -> Vec<Point2> {
    vec![
        min,
        Point2::new(max.x, min.y),
        max,
        Point2::new(min.x, max.y),
    ]
}

/// A box whose footprint runs from `from` to `to` with the given width,
/// spanning `z0..z1`.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`](crate::error::GeometryError::ZeroVector)
/// if `from` and `to` coincide.
pub fn oriented_box(from: Point2, to: Point2, width: f64, z0: f64, z1: f64) -> Result<Mesh<World>> {
    let dir = segment_direction(&from, &to)?;
    let side = Vector2::new(-dir.y, dir.x) * (width * 0.5);
    let footprint = vec![from - side, to - side, to + side, from + side];
    extrude(&footprint, &[], z0, z1)
}
