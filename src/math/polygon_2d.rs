use super::{Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns the unsigned area of a closed polygon.
#[must_use]
pub fn area(points: &[Point2]) -> f64 {
    signed_area(points).abs()
}

/// Returns `true` if the polygon winds counter-clockwise (y up).
#[must_use]
pub fn is_ccw(points: &[Point2]) -> bool {
    signed_area(points) > 0.0
}

/// Returns the area centroid of a polygon, falling back to the vertex mean
/// for degenerate (zero-area) input.
#[must_use]
pub fn centroid(points: &[Point2]) -> Point2 {
    let n = points.len();
    if n == 0 {
        return Point2::origin();
    }
    let a = signed_area(points);
    if a.abs() < TOLERANCE {
        #[allow(clippy::cast_precision_loss)]
        let inv = 1.0 / n as f64;
        let sum = points.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords);
        return Point2::from(sum * inv);
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    Point2::new(cx / (6.0 * a), cy / (6.0 * a))
}

/// Axis-aligned bounds of a 2D point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    pub min: Point2,
    pub max: Point2,
}

impl Bounds2 {
    /// Computes the bounds of the given points, or `None` if there are none.
    #[must_use]
    pub fn of<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Grows the bounds to contain `p`.
    pub fn include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Merges two bounds.
    #[must_use]
    pub fn union(mut self, other: &Self) -> Self {
        self.include(&other.min);
        self.include(&other.max);
        self
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Even-odd point-in-polygon test (ray cast towards +x).
#[must_use]
pub fn point_in_polygon(p: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Removes non-finite points, consecutive duplicates and a closing duplicate
/// of the first point.
#[must_use]
pub fn clean_ring(points: &[Point2]) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points.iter().filter(|p| p.x.is_finite() && p.y.is_finite()) {
        if out.last().is_some_and(|last| (p - last).norm() < TOLERANCE) {
            continue;
        }
        out.push(*p);
    }
    while out.len() > 1 && (out[0] - out[out.len() - 1]).norm() < TOLERANCE {
        out.pop();
    }
    out
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(d / len)
}

/// Returns the right-pointing normal of a direction vector.
///
/// For a counter-clockwise ring this is the outward normal.
#[must_use]
pub fn right_normal(dir: Vector2) -> Vector2 {
    Vector2::new(dir.y, -dir.x)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_relative_eq!(signed_area(&square()), 1.0);
        assert!(is_ccw(&square()));
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square();
        pts.reverse();
        assert_relative_eq!(signed_area(&pts), -1.0);
        assert_relative_eq!(area(&pts), 1.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn centroid_of_square() {
        let c = centroid(&square());
        assert_relative_eq!(c.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(c.y, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn centroid_of_collinear_points_is_mean() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), Point2::new(4.0, 0.0)];
        let c = centroid(&pts);
        assert_relative_eq!(c.x, 2.0);
    }

    #[test]
    fn bounds_and_center() {
        let b = Bounds2::of(&square()).unwrap();
        assert_relative_eq!(b.width(), 1.0);
        assert_relative_eq!(b.center().y, 0.5);
        assert!(Bounds2::of(&[]).is_none());
    }

    #[test]
    fn point_in_square() {
        assert!(point_in_polygon(&Point2::new(0.5, 0.5), &square()));
        assert!(!point_in_polygon(&Point2::new(1.5, 0.5), &square()));
    }

    #[test]
    fn point_in_concave_polygon() {
        // U shape: the notch is outside.
        let u = vec![
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(2.0, 3.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        assert!(!point_in_polygon(&Point2::new(1.5, 2.0), &u));
        assert!(point_in_polygon(&Point2::new(0.5, 2.0), &u));
    }

    #[test]
    fn clean_ring_drops_duplicates_and_closure() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(f64::NAN, 1.0),
            Point2::new(0.0, 0.0),
        ];
        assert_eq!(clean_ring(&pts).len(), 3);
    }

    #[test]
    fn segment_direction_zero_length() {
        let a = Point2::new(1.0, 1.0);
        assert!(segment_direction(&a, &a).is_err());
        let d = segment_direction(&a, &Point2::new(4.0, 5.0)).unwrap();
        assert_relative_eq!(d.x, 0.6);
        assert_relative_eq!(d.y, 0.8);
    }

    #[test]
    fn right_normal_points_outward_for_ccw() {
        // Bottom edge of a CCW square walks +x; outward is -y.
        let n = right_normal(Vector2::new(1.0, 0.0));
        assert_relative_eq!(n.y, -1.0);
    }
}
