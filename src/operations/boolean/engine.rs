use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use crate::geometry::{Contour, Shape};
use crate::math::Space;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Subtract,
    Intersect,
}

/// Converts a contour into a clipping polygon.
///
/// Returns `None` when fewer than 3 distinct points remain after cleaning.
pub(super) fn to_polygon<S: Space>(contour: &Contour<S>) -> Option<Polygon<f64>> {
    let ring = contour.cleaned();
    if ring.len() < 3 {
        return None;
    }
    let coords: Vec<Coord<f64>> = ring.points.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
    Some(Polygon::new(LineString::new(coords), vec![]))
}

/// Converts contours into one multipolygon, skipping degenerate rings.
pub(super) fn to_multi<'a, S: Space>(
    contours: impl IntoIterator<Item = &'a Contour<S>>,
) -> MultiPolygon<f64> {
    MultiPolygon::new(contours.into_iter().filter_map(to_polygon).collect())
}

/// Converts a clipped ring back into a contour, dropping the closing point.
fn from_ring<S: Space>(ring: &LineString<f64>) -> Option<Contour<S>> {
    let contour: Contour<S> = Contour::new(
        ring.coords()
            .map(|c| crate::math::Point2::new(c.x, c.y))
            .collect(),
    )
    .cleaned();
    (contour.len() >= 3).then_some(contour)
}

/// Converts a clipping result into outline-with-holes shapes.
pub(super) fn to_shapes<S: Space>(result: &MultiPolygon<f64>) -> Vec<Shape<S>> {
    result
        .iter()
        .filter_map(|poly| {
            let outline = from_ring(poly.exterior())?;
            let holes = poly.interiors().iter().filter_map(from_ring).collect();
            Some(Shape::new(outline, holes))
        })
        .collect()
}

/// Flattens shapes into independent rings; holes become plain contours.
pub(super) fn flatten<S: Space>(shapes: Vec<Shape<S>>) -> Vec<Contour<S>> {
    shapes.into_iter().flat_map(Shape::into_rings).collect()
}

/// Runs one boolean operation between two multipolygons.
pub(super) fn run(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>, op: BooleanOp) -> MultiPolygon<f64> {
    if b.0.is_empty() {
        return match op {
            BooleanOp::Union | BooleanOp::Subtract => a.clone(),
            BooleanOp::Intersect => MultiPolygon::new(Vec::new()),
        };
    }
    if a.0.is_empty() {
        return match op {
            BooleanOp::Union => b.clone(),
            BooleanOp::Subtract | BooleanOp::Intersect => MultiPolygon::new(Vec::new()),
        };
    }
    match op {
        BooleanOp::Union => a.union(b),
        BooleanOp::Subtract => a.difference(b),
        BooleanOp::Intersect => a.intersection(b),
    }
}

/// Executes `a <op> b` and returns the flattened ring list.
pub(super) fn boolean_execute<S: Space>(
    a: &Contour<S>,
    b: &Contour<S>,
    op: BooleanOp,
) -> Vec<Contour<S>> {
    let a = to_multi([a]);
    let b = to_multi([b]);
    flatten(to_shapes(&run(&a, &b, op)))
}
