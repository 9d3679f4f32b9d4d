use super::Point2;

/// Returns the minimum distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Returns the perpendicular distance from `p` to the infinite line through
/// `a` and `b`, or the distance to `a` when the line is degenerate.
#[must_use]
pub fn point_to_line_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len = d.norm();
    if len < 1e-10 {
        return (p - a).norm();
    }
    ((p - a).perp(&d) / len).abs()
}

/// Returns the distance from `p` to the nearest edge of a closed ring.
#[must_use]
pub fn point_to_ring_dist(p: &Point2, ring: &[Point2]) -> f64 {
    let n = ring.len();
    match n {
        0 => f64::INFINITY,
        1 => (p - ring[0]).norm(),
        _ => (0..n)
            .map(|i| point_to_segment_dist(p, &ring[i], &ring[(i + 1) % n]))
            .fold(f64::INFINITY, f64::min),
    }
}
