use geo::MultiPolygon;

use crate::geometry::{Contour, Shape};
use crate::math::Space;

use super::engine::{boolean_execute, run, to_multi, to_shapes, BooleanOp};

/// Computes the boolean union of two contours.
pub struct Union<'a, S: Space> {
    a: &'a Contour<S>,
    b: &'a Contour<S>,
}

impl<'a, S: Space> Union<'a, S> {
    /// Creates a new `Union` operation.
    #[must_use]
    pub fn new(a: &'a Contour<S>, b: &'a Contour<S>) -> Self {
        Self { a, b }
    }

    /// Executes the union, returning every resulting ring as an
    /// independent contour.
    #[must_use]
    pub fn execute(&self) -> Vec<Contour<S>> {
        boolean_execute(self.a, self.b, BooleanOp::Union)
    }
}

/// Merges any number of contours into outline-with-holes shapes.
pub struct UnionAll<'a, S: Space> {
    contours: &'a [Contour<S>],
}

impl<'a, S: Space> UnionAll<'a, S> {
    /// Creates a new `UnionAll` operation.
    #[must_use]
    pub fn new(contours: &'a [Contour<S>]) -> Self {
        Self { contours }
    }

    /// Executes the union, keeping holes attached to their outlines.
    #[must_use]
    pub fn execute(&self) -> Vec<Shape<S>> {
        let merged = self
            .contours
            .iter()
            .fold(MultiPolygon::new(Vec::new()), |acc, c| {
                run(&acc, &to_multi([c]), BooleanOp::Union)
            });
        to_shapes(&merged)
    }
}
