use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::signed_area;
use crate::math::{Point2, Point3, World};

use super::triangulate::triangulate_rings;
use super::Mesh;

/// One horizontal cross-section of a [`Loft`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Height of the section.
    pub z: f64,
    /// Outer boundary.
    pub outer: Vec<Point2>,
    /// Hole boundaries.
    pub holes: Vec<Vec<Point2>>,
}

impl Layer {
    /// Creates a section without holes.
    #[must_use]
    pub fn new(z: f64, outer: Vec<Point2>) -> Self {
        Self {
            z,
            outer,
            holes: Vec::new(),
        }
    }

    /// Creates a section with holes.
    #[must_use]
    pub fn with_holes(z: f64, outer: Vec<Point2>, holes: Vec<Vec<Point2>>) -> Self {
        Self { z, outer, holes }
    }

    fn rings(&self) -> impl Iterator<Item = &Vec<Point2>> {
        std::iter::once(&self.outer).chain(&self.holes)
    }
}

/// Builds a closed solid by stitching stacked cross-sections.
///
/// Every layer must have the same number of holes and the same point count
/// per ring, with vertex `i` of one layer connected to vertex `i` of the
/// next. The first and last layers are closed with flat caps.
///
/// Orientation is taken from the first layer and applied to all layers, so
/// the result faces outward whether the input rings are CW or CCW.
#[derive(Debug)]
pub struct Loft {
    layers: Vec<Layer>,
}

impl Loft {
    /// Creates a new `Loft` over layers ordered by increasing `z`.
    #[must_use]
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Executes the loft.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for fewer than 2 layers or a
    /// ring under 3 points, [`GeometryError::RingMismatch`] when layers do
    /// not correspond point for point, or an operation error if a cap
    /// cannot be triangulated.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Mesh<World>> {
        let (first, last) = match self.layers.as_slice() {
            [first, .., last] => (first, last),
            _ => return Err(GeometryError::Degenerate("loft needs at least 2 layers".into()).into()),
        };
        self.validate(first)?;

        // Outer rings run CCW, holes CW, seen from above.
        let flips: Vec<bool> = first
            .rings()
            .enumerate()
            .map(|(r, ring)| {
                let area = signed_area(ring);
                if r == 0 { area < 0.0 } else { area > 0.0 }
            })
            .collect();

        let oriented: Vec<Vec<Vec<Point2>>> = self
            .layers
            .iter()
            .map(|layer| {
                layer
                    .rings()
                    .zip(&flips)
                    .map(|(ring, &flip)| {
                        let mut ring = ring.clone();
                        if flip {
                            ring.reverse();
                        }
                        ring
                    })
                    .collect()
            })
            .collect();

        let ring_lens: Vec<usize> = first.rings().map(Vec::len).collect();
        let ring_offsets: Vec<usize> = ring_lens
            .iter()
            .scan(0, |acc, &n| {
                let start = *acc;
                *acc += n;
                Some(start)
            })
            .collect();
        let per_layer: usize = ring_lens.iter().sum();

        let mut mesh = Mesh::new();
        for (layer, rings) in self.layers.iter().zip(&oriented) {
            for p in rings.iter().flatten() {
                mesh.vertices.push(Point3::new(p.x, p.y, layer.z));
                mesh.uvs.push(*p);
            }
        }

        // Side walls
        for k in 0..self.layers.len() - 1 {
            let lower = k * per_layer;
            let upper = (k + 1) * per_layer;
            for (&start, &n) in ring_offsets.iter().zip(&ring_lens) {
                for i in 0..n {
                    let j = (i + 1) % n;
                    let a = (lower + start + i) as u32;
                    let b = (lower + start + j) as u32;
                    let c = (upper + start + j) as u32;
                    let d = (upper + start + i) as u32;
                    mesh.indices.push([a, b, c]);
                    mesh.indices.push([a, c, d]);
                }
            }
        }

        // Caps
        let bottom = cap(&oriented[0])?;
        let top = cap(&oriented[oriented.len() - 1])?;
        let top_base = (self.layers.len() - 1) * per_layer;
        mesh.indices
            .extend(bottom.iter().map(|&[a, b, c]| [a as u32, c as u32, b as u32]));
        mesh.indices.extend(
            top.iter()
                .map(|t| t.map(|i| (top_base + i) as u32)),
        );

        mesh.compute_normals();
        debug!(
            layers = self.layers.len(),
            triangles = mesh.triangle_count(),
            z_min = first.z,
            z_max = last.z,
            "lofted solid"
        );
        Ok(mesh)
    }

    fn validate(&self, first: &Layer) -> Result<()> {
        if let Some(short) = first.rings().find(|r| r.len() < 3) {
            return Err(GeometryError::Degenerate(format!(
                "loft ring has {} points, need at least 3",
                short.len()
            ))
            .into());
        }
        for layer in &self.layers[1..] {
            if layer.holes.len() != first.holes.len() {
                return Err(GeometryError::RingMismatch {
                    expected: first.holes.len(),
                    actual: layer.holes.len(),
                }
                .into());
            }
            for (a, b) in first.rings().zip(layer.rings()) {
                if a.len() != b.len() {
                    return Err(GeometryError::RingMismatch {
                        expected: a.len(),
                        actual: b.len(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

fn cap(rings: &[Vec<Point2>]) -> Result<Vec<[usize; 3]>> {
    let slices: Vec<&[Point2]> = rings.iter().map(Vec::as_slice).collect();
    triangulate_rings(&slices)
}

/// Extrudes an outline with holes straight up from `z0` to `z1`.
///
/// # Errors
///
/// Returns an error under the same conditions as [`Loft::execute`].
pub fn extrude(outer: &[Point2], holes: &[Vec<Point2>], z0: f64, z1: f64) -> Result<Mesh<World>> {
    Loft::new(vec![
        Layer::with_holes(z0, outer.to_vec(), holes.to_vec()),
        Layer::with_holes(z1, outer.to_vec(), holes.to_vec()),
    ])
    .execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CutterError;
    use crate::tessellation::test_util::{is_closed, signed_volume};
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    // ── Extrusion ──────────────────────────────────────────────

    #[test]
    fn extruded_square_is_closed_box() {
        let mesh = extrude(&rect(0.0, 0.0, 2.0, 3.0), &[], 0.0, 4.0).unwrap();
        assert!(is_closed(&mesh));
        assert_eq!(mesh.triangle_count(), 12);
        assert_relative_eq!(signed_volume(&mesh), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn clockwise_input_still_faces_outward() {
        let mut cw = rect(0.0, 0.0, 2.0, 2.0);
        cw.reverse();
        let mesh = extrude(&cw, &[], 0.0, 1.0).unwrap();
        assert!(is_closed(&mesh));
        assert_relative_eq!(signed_volume(&mesh), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn convex_polygon_is_manifold() {
        let hexagon: Vec<Point2> = (0..6)
            .map(|i| {
                let a = f64::from(i) * std::f64::consts::PI / 3.0;
                Point2::new(5.0 * a.cos(), 5.0 * a.sin())
            })
            .collect();
        let mesh = extrude(&hexagon, &[], 0.0, 2.0).unwrap();
        assert!(is_closed(&mesh));
        // V - E + F = 2 for a closed genus-0 surface.
        let v = mesh.vertices.len() as i64;
        let e = crate::tessellation::test_util::edge_use(&mesh).len() as i64;
        let f = mesh.triangle_count() as i64;
        assert_eq!(v - e + f, 2);
    }

    #[test]
    fn hole_is_subtracted_from_volume() {
        // Same winding for the hole is fine: orientation is normalized.
        let mesh = extrude(&rect(0.0, 0.0, 10.0, 10.0), &[rect(3.0, 3.0, 7.0, 7.0)], 0.0, 1.0).unwrap();
        assert!(is_closed(&mesh));
        assert_relative_eq!(signed_volume(&mesh), 84.0, epsilon = 1e-9);
    }

    // ── Multi-layer ────────────────────────────────────────────

    #[test]
    fn tapered_loft_volume() {
        // Frustum from 4x4 to 2x2 over height 3.
        let mesh = Loft::new(vec![
            Layer::new(0.0, rect(-2.0, -2.0, 2.0, 2.0)),
            Layer::new(3.0, rect(-1.0, -1.0, 1.0, 1.0)),
        ])
        .execute()
        .unwrap();
        assert!(is_closed(&mesh));
        // (h/3)(A1 + A2 + sqrt(A1 A2))
        assert_relative_eq!(signed_volume(&mesh), 28.0, epsilon = 1e-9);
    }

    #[test]
    fn three_layers_stay_closed() {
        let mesh = Loft::new(vec![
            Layer::new(0.0, rect(0.0, 0.0, 4.0, 4.0)),
            Layer::new(1.0, rect(0.0, 0.0, 4.0, 4.0)),
            Layer::new(2.0, rect(1.0, 1.0, 3.0, 3.0)),
        ])
        .execute()
        .unwrap();
        assert!(is_closed(&mesh));
    }

    // ── Errors ─────────────────────────────────────────────────

    #[test]
    fn mismatched_layers_are_rejected() {
        let err = Loft::new(vec![
            Layer::new(0.0, rect(0.0, 0.0, 1.0, 1.0)),
            Layer::new(1.0, vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)]),
        ])
        .execute()
        .unwrap_err();
        assert!(matches!(
            err,
            CutterError::Geometry(GeometryError::RingMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn single_layer_is_degenerate() {
        let err = Loft::new(vec![Layer::new(0.0, rect(0.0, 0.0, 1.0, 1.0))])
            .execute()
            .unwrap_err();
        assert!(matches!(err, CutterError::Geometry(GeometryError::Degenerate(_))));
    }
}
