use crate::geometry::Contour;
use crate::math::polygon_2d::{right_normal, segment_direction, signed_area};
use crate::math::{Point2, Space, Vector2, TOLERANCE};

/// Maximum miter displacement as a multiple of `|distance|`. Sharp concave
/// corners would otherwise throw spikes far past the offset band.
pub const MITER_CLAMP: f64 = 2.0;

/// Offsets a closed ring with miter joins.
///
/// Each vertex moves along the bisector of its two adjacent edge normals,
/// scaled by `1 / cos(half-angle)` so both offset edges sit `distance`
/// away, with the scale clamped to [`MITER_CLAMP`] `× |distance|`.
///
/// # Sign Convention
///
/// - Positive distance: outward (the shape grows)
/// - Negative distance: inward (the shape shrinks)
///
/// The outward side is resolved from the ring's own winding, so the
/// result does not depend on whether the input is CW or CCW.
///
/// The output always has exactly one point per input point, which lets
/// wall builders pair inner and outer rings vertex by vertex. Collapsed or
/// self-intersecting results of large inward offsets are not repaired.
#[derive(Debug)]
pub struct MiterOffset<'a, S: Space> {
    contour: &'a Contour<S>,
    distance: f64,
}

impl<'a, S: Space> MiterOffset<'a, S> {
    /// Creates a new offset operation.
    #[must_use]
    pub fn new(contour: &'a Contour<S>, distance: f64) -> Self {
        Self { contour, distance }
    }

    /// Executes the offset.
    ///
    /// Returns an empty contour for rings with fewer than 3 points or
    /// without any non-degenerate edge.
    #[must_use]
    pub fn execute(&self) -> Contour<S> {
        let pts = &self.contour.points;
        let n = pts.len();
        if n < 3 {
            return Contour::default();
        }
        if self.distance.abs() < TOLERANCE {
            return self.contour.clone();
        }

        let Some(normals) = outward_edge_normals(pts) else {
            return Contour::default();
        };

        let limit = MITER_CLAMP * self.distance.abs();
        let offset = (0..n)
            .map(|i| {
                let n_in = normals[(i + n - 1) % n];
                let n_out = normals[i];
                pts[i] + miter_vector(n_in, n_out, self.distance, limit)
            })
            .collect();

        Contour::new(offset)
    }
}

/// Convenience wrapper around [`MiterOffset`].
#[must_use]
pub fn offset<S: Space>(contour: &Contour<S>, distance: f64) -> Contour<S> {
    MiterOffset::new(contour, distance).execute()
}

/// Outward unit normal of every edge `i -> i+1`.
///
/// Zero-length edges borrow the normal of the nearest preceding valid edge.
/// Returns `None` if every edge is degenerate.
fn outward_edge_normals(pts: &[Point2]) -> Option<Vec<Vector2>> {
    let n = pts.len();
    let winding = if signed_area(pts) < 0.0 { -1.0 } else { 1.0 };

    let raw: Vec<Option<Vector2>> = (0..n)
        .map(|i| {
            segment_direction(&pts[i], &pts[(i + 1) % n])
                .ok()
                .map(|dir| right_normal(dir) * winding)
        })
        .collect();

    let first_valid = raw.iter().position(Option::is_some)?;
    let mut last = raw[first_valid]?;
    // Walk from the first valid edge so every gap has a predecessor.
    let mut normals = vec![Vector2::zeros(); n];
    for k in 0..n {
        let i = (first_valid + k) % n;
        if let Some(normal) = raw[i] {
            last = normal;
        }
        normals[i] = last;
    }
    Some(normals)
}

/// Displacement for one vertex given its incoming and outgoing normals.
fn miter_vector(n_in: Vector2, n_out: Vector2, distance: f64, limit: f64) -> Vector2 {
    let sum = n_in + n_out;
    let len = sum.norm();
    if len < TOLERANCE {
        // Full reversal: no bisector, push along the outgoing normal.
        return n_out * distance;
    }
    let bisector = sum / len;
    // |n_in + n_out| = 2 cos(half-angle), never zero past the check above.
    let cos_half = len * 0.5;
    let scale = (distance / cos_half).clamp(-limit, limit);
    bisector * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::distance_2d::point_to_segment_dist;
    use crate::math::Millimeter;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Contour<Millimeter> {
        Contour::from_xy(&[(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)])
    }

    // ── Basic offsets ──────────────────────────────────────────

    #[test]
    fn outward_square_grows_by_distance() {
        let out = offset(&square(10.0), 1.0);
        assert_eq!(out.len(), 4);
        assert_relative_eq!(out.points[0].x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(out.points[0].y, -1.0, epsilon = 1e-9);
        assert_relative_eq!(out.area(), 144.0, epsilon = 1e-9);
    }

    #[test]
    fn inward_square_shrinks_by_distance() {
        let out = offset(&square(10.0), -2.0);
        assert_relative_eq!(out.area(), 36.0, epsilon = 1e-9);
    }

    #[test]
    fn winding_does_not_change_direction() {
        let mut cw = square(10.0);
        cw.points.reverse();
        let out = offset(&cw, 1.0);
        assert_relative_eq!(out.area(), 144.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_distance_is_identity() {
        let sq = square(3.0);
        assert_eq!(offset(&sq, 0.0), sq);
    }

    #[test]
    fn too_few_points_returns_empty() {
        let line = Contour::<Millimeter>::from_xy(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(offset(&line, 1.0).is_empty());
    }

    #[test]
    fn fully_degenerate_ring_returns_empty() {
        let dot = Contour::<Millimeter>::from_xy(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        assert!(offset(&dot, 1.0).is_empty());
    }

    #[test]
    fn duplicate_vertex_keeps_point_count() {
        let c = Contour::<Millimeter>::from_xy(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ]);
        let out = offset(&c, 1.0);
        assert_eq!(out.len(), 5);
        assert!(out.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    // ── Miter clamp ────────────────────────────────────────────

    #[test]
    fn sharp_spike_is_clamped() {
        // Very thin triangle: the tip miter would be huge without the clamp.
        let c = Contour::<Millimeter>::from_xy(&[(0.0, 0.0), (100.0, 1.0), (0.0, 2.0)]);
        let out = offset(&c, 1.0);
        for (p, q) in c.points.iter().zip(&out.points) {
            assert!((q - p).norm() <= MITER_CLAMP + 1e-9);
        }
    }

    // ── Round trip ─────────────────────────────────────────────

    #[test]
    fn convex_round_trip_reproduces_polygon() {
        let hexagon: Contour<Millimeter> = Contour::new(
            (0..6)
                .map(|i| {
                    let a = f64::from(i) * std::f64::consts::PI / 3.0;
                    Point2::new(20.0 * a.cos(), 20.0 * a.sin())
                })
                .collect(),
        );
        let back = offset(&offset(&hexagon, 2.5), -2.5);
        for (a, b) in hexagon.points.iter().zip(&back.points) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn offset_edges_sit_at_distance() {
        let sq = square(10.0);
        let inset = offset(&sq, -0.3);
        for p in &inset.points {
            let d = (0..4)
                .map(|i| point_to_segment_dist(p, &sq.points[i], &sq.points[(i + 1) % 4]))
                .fold(f64::INFINITY, f64::min);
            assert_relative_eq!(d, 0.3, epsilon = 1e-9);
        }
    }
}
