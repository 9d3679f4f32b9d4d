mod loft;
mod primitives;
mod triangulate;

pub use loft::{extrude, Layer, Loft};
pub use primitives::{circle_points, oriented_box, rectangle_points};
pub use triangulate::triangulate_rings;

use std::marker::PhantomData;

use crate::math::{Point2, Point3, Space, Vector3};

/// Axis-aligned 3D bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3 {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds3 {
    /// Returns the center of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns the edge lengths of the box.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }
}

/// An indexed triangle mesh in coordinate space `S`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<S: Space> {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// UV coordinates.
    pub uvs: Vec<Point2>,
    /// Triangle indices (each triple defines a counter-clockwise triangle).
    pub indices: Vec<[u32; 3]>,
    space: PhantomData<S>,
}

impl<S: Space> Default for Mesh<S> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            space: PhantomData,
        }
    }
}

impl<S: Space> Mesh<S> {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Appends another mesh, re-basing its indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: Mesh<S>) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.normals.extend(other.normals);
        self.uvs.extend(other.uvs);
        self.indices
            .extend(other.indices.into_iter().map(|t| t.map(|i| i + base)));
    }

    /// Bounding box of all vertices, `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds3> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold(
            Bounds3 {
                min: first,
                max: first,
            },
            |b, p| Bounds3 {
                min: b.min.inf(p),
                max: b.max.sup(p),
            },
        ))
    }

    /// Moves every vertex by `offset`, retagging the mesh into space `T`.
    #[must_use]
    pub fn translated<T: Space>(&self, offset: Vector3) -> Mesh<T> {
        Mesh {
            vertices: self.vertices.iter().map(|p| p + offset).collect(),
            normals: self.normals.clone(),
            uvs: self.uvs.clone(),
            indices: self.indices.clone(),
            space: PhantomData,
        }
    }

    /// Positions of the three corners of every triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.indices
            .iter()
            .map(|t| t.map(|i| self.vertices[i as usize]))
    }

    /// Recomputes smooth vertex normals as the area-weighted average of the
    /// adjacent face normals.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];
        for tri in &self.indices {
            let [a, b, c] = tri.map(|i| self.vertices[i as usize]);
            let face = (b - a).cross(&(c - a));
            for &i in tri {
                normals[i as usize] += face;
            }
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z))
            .collect();
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::collections::HashMap;

    use super::Mesh;
    use crate::math::Space;

    /// Counts how many triangles use each undirected edge.
    pub(crate) fn edge_use<S: Space>(mesh: &Mesh<S>) -> HashMap<(u32, u32), usize> {
        let mut counts = HashMap::new();
        for t in &mesh.indices {
            for k in 0..3 {
                let (a, b) = (t[k], t[(k + 1) % 3]);
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Returns `true` if every edge is shared by exactly two triangles.
    pub(crate) fn is_closed<S: Space>(mesh: &Mesh<S>) -> bool {
        !mesh.is_empty() && edge_use(mesh).values().all(|&n| n == 2)
    }

    /// Signed volume by the divergence theorem; positive for outward-facing
    /// triangles.
    pub(crate) fn signed_volume<S: Space>(mesh: &Mesh<S>) -> f64 {
        mesh.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }
}
