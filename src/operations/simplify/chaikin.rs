use crate::geometry::Contour;
use crate::math::Space;

/// Smooths a closed contour by Chaikin corner cutting.
///
/// Each pass replaces every edge `p -> q` with the points at 1/4 and 3/4
/// along it, doubling the point count and rounding every corner.
#[derive(Debug)]
pub struct Chaikin<'a, S: Space> {
    contour: &'a Contour<S>,
    iterations: usize,
}

impl<'a, S: Space> Chaikin<'a, S> {
    /// Creates a new smoothing pass.
    #[must_use]
    pub fn new(contour: &'a Contour<S>, iterations: usize) -> Self {
        Self { contour, iterations }
    }

    /// Executes the smoothing. Rings under 3 points are returned as-is.
    #[must_use]
    pub fn execute(&self) -> Contour<S> {
        let mut points = self.contour.points.clone();
        if points.len() < 3 {
            return self.contour.clone();
        }
        for _ in 0..self.iterations {
            let n = points.len();
            points = (0..n)
                .flat_map(|i| {
                    let p = points[i];
                    let q = points[(i + 1) % n];
                    [p + (q - p) * 0.25, p + (q - p) * 0.75]
                })
                .collect();
        }
        Contour::new(points)
    }
}
