use crate::geometry::Contour;
use crate::math::distance_2d::point_to_line_dist;
use crate::math::{Point2, Space};

/// Simplifies a contour with the Ramer-Douglas-Peucker algorithm.
///
/// The point list is treated as an open polyline from the first to the last
/// point; both endpoints are always kept exactly. Every dropped point lies
/// within `tolerance` of the kept segment that replaced it.
#[derive(Debug)]
pub struct DouglasPeucker<'a, S: Space> {
    contour: &'a Contour<S>,
    tolerance: f64,
}

impl<'a, S: Space> DouglasPeucker<'a, S> {
    /// Creates a new simplification.
    #[must_use]
    pub fn new(contour: &'a Contour<S>, tolerance: f64) -> Self {
        Self { contour, tolerance }
    }

    /// Creates a simplification whose tolerance follows the contour size.
    #[must_use]
    pub fn adaptive(contour: &'a Contour<S>) -> Self {
        Self::new(contour, adaptive_tolerance(contour.len()))
    }

    /// Executes the simplification.
    #[must_use]
    pub fn execute(&self) -> Contour<S> {
        Contour::new(simplify_points(&self.contour.points, self.tolerance))
    }
}

/// Convenience wrapper around [`DouglasPeucker`].
#[must_use]
pub fn simplify<S: Space>(contour: &Contour<S>, tolerance: f64) -> Contour<S> {
    DouglasPeucker::new(contour, tolerance).execute()
}

/// Tolerance in pixels for a traced boundary of `point_count` raw points.
///
/// Small shapes such as fine text keep more detail.
#[must_use]
pub fn adaptive_tolerance(point_count: usize) -> f64 {
    match point_count {
        0..=49 => 0.4,
        50..=199 => 0.8,
        _ => 1.5,
    }
}

fn simplify_points(points: &[Point2], tolerance: f64) -> Vec<Point2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    // Explicit stack instead of recursion: traced rings can be long.
    let mut stack = vec![(0, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let (a, b) = (&points[first], &points[last]);
        let (index, dist) = ((first + 1)..last)
            .map(|i| (i, point_to_line_dist(&points[i], a, b)))
            .fold((first, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if dist > tolerance {
            keep[index] = true;
            stack.push((first, index));
            stack.push((index, last));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}
