use tracing::warn;

use crate::geometry::Contour;
use crate::math::{Millimeter, Point2, World};
use crate::operations::offset::offset;
use crate::tessellation::{oriented_box, Layer, Loft, Mesh};

/// Direction a scanline runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// Lines of constant x.
    Vertical,
    /// Lines of constant y.
    Horizontal,
}

/// Lattice dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    pub spacing: f64,
    pub strut_width: f64,
    pub rim_width: f64,
}

/// A lightweight plate: a rim following the outline plus crossed struts
/// spanning the inside, all between `z0` and `z1`.
///
/// Struts come from scanlines every `spacing` mm in x and in y; each
/// scanline is cut against the outline and a strut spans every inside
/// interval.
#[must_use]
pub fn grid_plate(contour: &Contour<Millimeter>, params: GridParams, z0: f64, z1: f64) -> Mesh<World> {
    let mut mesh = Mesh::new();

    let inner = offset(contour, -params.rim_width);
    match Loft::new(vec![
        Layer::with_holes(z0, contour.points.clone(), vec![inner.points.clone()]),
        Layer::with_holes(z1, contour.points.clone(), vec![inner.points]),
    ])
    .execute()
    {
        Ok(rim) => mesh.merge(rim),
        Err(e) => warn!(error = %e, "grid rim skipped"),
    }

    for axis in [Axis::Vertical, Axis::Horizontal] {
        for (from, to) in strut_spans(contour, axis, params.spacing) {
            if let Ok(strut) = oriented_box(from, to, params.strut_width, z0, z1) {
                mesh.merge(strut);
            }
        }
    }

    mesh
}

/// Inside intervals of every scanline along `axis`.
fn strut_spans(contour: &Contour<Millimeter>, axis: Axis, spacing: f64) -> Vec<(Point2, Point2)> {
    let Some(bounds) = contour.bounds() else {
        return Vec::new();
    };
    if spacing <= 0.0 {
        return Vec::new();
    }
    // Scan coordinate and running coordinate for each axis.
    let split = |p: &Point2| match axis {
        Axis::Vertical => (p.x, p.y),
        Axis::Horizontal => (p.y, p.x),
    };
    let join = |scan: f64, run: f64| match axis {
        Axis::Vertical => Point2::new(scan, run),
        Axis::Horizontal => Point2::new(run, scan),
    };
    let (lo, hi) = match axis {
        Axis::Vertical => (bounds.min.x, bounds.max.x),
        Axis::Horizontal => (bounds.min.y, bounds.max.y),
    };

    let pts = &contour.points;
    let n = pts.len();
    let mut spans = Vec::new();
    let mut line = lo + spacing;
    while line < hi {
        let mut hits: Vec<f64> = (0..n)
            .filter_map(|i| {
                let (sa, ra) = split(&pts[i]);
                let (sb, rb) = split(&pts[(i + 1) % n]);
                // Half-open test so a vertex on the line counts once.
                let crosses = (sa <= line && line < sb) || (sb <= line && line < sa);
                crosses.then(|| ra + (line - sa) * (rb - ra) / (sb - sa))
            })
            .collect();
        hits.sort_by(f64::total_cmp);
        spans.extend(
            hits.chunks_exact(2)
                .map(|pair| (join(line, pair[0]), join(line, pair[1]))),
        );
        line += spacing;
    }
    spans
}
