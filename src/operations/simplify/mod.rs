mod chaikin;
mod douglas_peucker;

pub use chaikin::Chaikin;
pub use douglas_peucker::{adaptive_tolerance, simplify, DouglasPeucker};

use crate::geometry::Contour;
use crate::math::Space;

/// Tolerance of the coarse pass in [`refine_traced`].
pub const REFINE_COARSE_TOLERANCE: f64 = 1.5;
/// Chaikin passes in [`refine_traced`].
pub const REFINE_SMOOTH_ITERATIONS: usize = 3;
/// Tolerance of the final pass in [`refine_traced`].
pub const REFINE_FINE_TOLERANCE: f64 = 0.5;

/// Cleans traced boundaries for editing: drop stair-step noise, round the
/// corners, then thin out the points the smoothing added.
///
/// Rings that fall under 3 points are dropped.
#[must_use]
pub fn refine_traced<S: Space>(contours: &[Contour<S>]) -> Vec<Contour<S>> {
    contours
        .iter()
        .map(|c| {
            let coarse = simplify(c, REFINE_COARSE_TOLERANCE);
            let smooth = Chaikin::new(&coarse, REFINE_SMOOTH_ITERATIONS).execute();
            simplify(&smooth, REFINE_FINE_TOLERANCE)
        })
        .filter(|c| c.len() >= 3)
        .collect()
}
