use super::contour::{Contour, ContourSet, NodeType};
use crate::math::{Point2, Space};

/// Number of points each smooth span is sampled into (end point excluded).
pub const SMOOTH_SAMPLES: usize = 8;

/// Densifies a contour around its smooth nodes.
///
/// Every segment that touches a [`NodeType::Smooth`] vertex is replaced by a
/// uniform Catmull-Rom span through the neighbouring vertices; segments
/// between two corners stay straight. Original vertices are kept exactly.
/// A contour with no smooth nodes is returned unchanged.
#[must_use]
pub fn resample<S: Space>(contour: &Contour<S>, node_types: &[NodeType]) -> Contour<S> {
    let pts = &contour.points;
    let n = pts.len();
    if n < 3 || node_types.len() != n || !node_types.contains(&NodeType::Smooth) {
        return contour.clone();
    }

    let mut out = Vec::with_capacity(n * SMOOTH_SAMPLES);
    for i in 0..n {
        let j = (i + 1) % n;
        out.push(pts[i]);
        if node_types[i] == NodeType::Corner && node_types[j] == NodeType::Corner {
            continue;
        }
        let p0 = pts[(i + n - 1) % n];
        let p3 = pts[(j + 1) % n];
        for k in 1..SMOOTH_SAMPLES {
            #[allow(clippy::cast_precision_loss)]
            let t = k as f64 / SMOOTH_SAMPLES as f64;
            out.push(catmull_rom(&p0, &pts[i], &pts[j], &p3, t));
        }
    }
    Contour::new(out)
}

/// Resamples every contour of a set, keeping index alignment of roles.
#[must_use]
pub fn resample_set<S: Space>(set: &ContourSet<S>) -> Vec<Contour<S>> {
    set.contours()
        .iter()
        .zip(set.node_types())
        .map(|(c, nodes)| resample(c, nodes))
        .collect()
}

/// Evaluates a uniform Catmull-Rom segment between `p1` and `p2`.
fn catmull_rom(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2, t: f64) -> Point2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let c0 = -0.5 * t3 + t2 - 0.5 * t;
    let c1 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let c2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let c3 = 0.5 * t3 - 0.5 * t2;
    Point2::from(p0.coords * c0 + p1.coords * c1 + p2.coords * c2 + p3.coords * c3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Pixel;
    use approx::assert_relative_eq;

    fn diamond() -> Contour<Pixel> {
        Contour::from_xy(&[(0.0, -10.0), (10.0, 0.0), (0.0, 10.0), (-10.0, 0.0)])
    }

    #[test]
    fn all_corners_is_identity() {
        let c = diamond();
        let out = resample(&c, &[NodeType::Corner; 4]);
        assert_eq!(out, c);
    }

    #[test]
    fn all_smooth_densifies_and_keeps_vertices() {
        let c = diamond();
        let out = resample(&c, &[NodeType::Smooth; 4]);
        assert_eq!(out.len(), 4 * SMOOTH_SAMPLES);
        assert_eq!(out.points[0], c.points[0]);
        assert_eq!(out.points[SMOOTH_SAMPLES], c.points[1]);
        // A smoothed diamond bulges outward past its straight edges.
        assert!(out.area() > c.area());
    }

    #[test]
    fn only_segments_touching_smooth_nodes_are_curved() {
        let c = diamond();
        let nodes = [NodeType::Smooth, NodeType::Corner, NodeType::Corner, NodeType::Corner];
        let out = resample(&c, &nodes);
        // Segments 0-1 and 3-0 are curved, 1-2 and 2-3 stay straight.
        assert_eq!(out.len(), 4 + 2 * (SMOOTH_SAMPLES - 1));
    }

    #[test]
    fn catmull_rom_hits_endpoints() {
        let p = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(3.0, 1.0),
        ];
        let a = catmull_rom(&p[0], &p[1], &p[2], &p[3], 0.0);
        let b = catmull_rom(&p[0], &p[1], &p[2], &p[3], 1.0);
        assert_relative_eq!(a.x, 1.0);
        assert_relative_eq!(b.y, 1.0);
    }

    #[test]
    fn mismatched_node_row_is_ignored() {
        let c = diamond();
        assert_eq!(resample(&c, &[NodeType::Smooth]), c);
    }
}
