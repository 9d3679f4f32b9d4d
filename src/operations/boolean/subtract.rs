use crate::geometry::{Contour, Shape};
use crate::math::Space;

use super::engine::{boolean_execute, run, to_multi, to_shapes, BooleanOp};

/// Computes the boolean subtraction of one contour from another.
pub struct Subtract<'a, S: Space> {
    a: &'a Contour<S>,
    b: &'a Contour<S>,
}

impl<'a, S: Space> Subtract<'a, S> {
    /// Creates a new `Subtract` operation (A - B).
    #[must_use]
    pub fn new(a: &'a Contour<S>, b: &'a Contour<S>) -> Self {
        Self { a, b }
    }

    /// Executes the subtraction.
    ///
    /// Holes produced by the cut are returned as independent rings next
    /// to their outlines.
    #[must_use]
    pub fn execute(&self) -> Vec<Contour<S>> {
        boolean_execute(self.a, self.b, BooleanOp::Subtract)
    }
}

/// Sequentially subtracts every cutter from one solid.
///
/// Unlike [`Subtract`], the result keeps holes attached to their outline
/// so callers can measure the true remaining area.
pub struct SubtractAll<'a, S: Space> {
    solid: &'a Contour<S>,
    cutters: &'a [Contour<S>],
}

impl<'a, S: Space> SubtractAll<'a, S> {
    /// Creates a new `SubtractAll` operation.
    #[must_use]
    pub fn new(solid: &'a Contour<S>, cutters: &'a [Contour<S>]) -> Self {
        Self { solid, cutters }
    }

    /// Executes the subtraction. Degenerate cutters are skipped.
    #[must_use]
    pub fn execute(&self) -> Vec<Shape<S>> {
        let remaining = self
            .cutters
            .iter()
            .fold(to_multi([self.solid]), |acc, cutter| {
                run(&acc, &to_multi([cutter]), BooleanOp::Subtract)
            });
        to_shapes(&remaining)
    }
}
