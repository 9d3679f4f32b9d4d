use crate::geometry::Contour;
use crate::math::Space;

use super::engine::{boolean_execute, BooleanOp};

/// Computes the boolean intersection of two contours.
pub struct Intersect<'a, S: Space> {
    a: &'a Contour<S>,
    b: &'a Contour<S>,
}

impl<'a, S: Space> Intersect<'a, S> {
    /// Creates a new `Intersect` operation.
    #[must_use]
    pub fn new(a: &'a Contour<S>, b: &'a Contour<S>) -> Self {
        Self { a, b }
    }

    /// Executes the intersection. Disjoint inputs produce no rings.
    #[must_use]
    pub fn execute(&self) -> Vec<Contour<S>> {
        boolean_execute(self.a, self.b, BooleanOp::Intersect)
    }
}
