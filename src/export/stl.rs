use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, error};

use crate::error::{ExportError, Result};
use crate::generate::CutterPart;
use crate::math::{Point3, Vector3};
use crate::tessellation::Mesh;

/// Length of the unused binary STL header.
pub const STL_HEADER_LEN: usize = 80;
/// Length of one triangle record: normal, three vertices, attribute count.
pub const STL_RECORD_LEN: usize = 50;

/// Serializes visible parts into one binary STL.
///
/// Each part is moved back to its assembled position first, so parts keep
/// their relative placement in the file.
#[derive(Debug)]
pub struct StlExport<'a> {
    parts: &'a [CutterPart],
    hidden: &'a HashSet<String>,
}

impl<'a> StlExport<'a> {
    /// Creates a new export of `parts`, skipping ids in `hidden`.
    #[must_use]
    pub fn new(parts: &'a [CutterPart], hidden: &'a HashSet<String>) -> Self {
        Self { parts, hidden }
    }

    /// Executes the export.
    ///
    /// Returns an empty buffer when no part is visible.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::TooManyTriangles`] if the triangle count does
    /// not fit the format's 32-bit counter.
    pub fn execute(&self) -> Result<Vec<u8>> {
        let meshes: Vec<_> = self
            .parts
            .iter()
            .filter(|p| !self.hidden.contains(&p.id))
            .map(CutterPart::world_mesh)
            .collect();
        if meshes.is_empty() {
            return Ok(Vec::new());
        }

        let total: usize = meshes.iter().map(Mesh::triangle_count).sum();
        let count = u32::try_from(total).map_err(|_| ExportError::TooManyTriangles(total))?;

        let mut out = Vec::with_capacity(STL_HEADER_LEN + 4 + total * STL_RECORD_LEN);
        out.resize(STL_HEADER_LEN, 0);
        out.extend_from_slice(&count.to_le_bytes());
        for tri in meshes.iter().flat_map(Mesh::triangles) {
            write_vector(&mut out, &facet_normal(&tri));
            for p in &tri {
                write_vector(&mut out, &p.coords);
            }
            out.extend_from_slice(&0u16.to_le_bytes());
        }

        debug!(parts = meshes.len(), triangles = total, bytes = out.len(), "stl encoded");
        Ok(out)
    }
}

/// Convenience wrapper around [`StlExport`].
///
/// Returns an empty buffer when nothing is visible or the model is too
/// large to encode.
#[must_use]
pub fn export_stl(parts: &[CutterPart], hidden: &HashSet<String>) -> Vec<u8> {
    StlExport::new(parts, hidden).execute().unwrap_or_else(|e| {
        error!(error = %e, "stl export failed");
        Vec::new()
    })
}

/// Encodes the visible parts and writes them to `path`.
///
/// # Errors
///
/// Returns an export error if encoding or writing fails.
pub fn write_stl(path: impl AsRef<Path>, parts: &[CutterPart], hidden: &HashSet<String>) -> Result<()> {
    let bytes = StlExport::new(parts, hidden).execute()?;
    std::fs::write(path, bytes).map_err(ExportError::from)?;
    Ok(())
}

fn facet_normal(tri: &[Point3; 3]) -> Vector3 {
    (tri[1] - tri[0])
        .cross(&(tri[2] - tri[0]))
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::zeros)
}

#[allow(clippy::cast_possible_truncation)]
fn write_vector(out: &mut Vec<u8>, v: &Vector3) {
    for c in v.iter() {
        out.extend_from_slice(&(*c as f32).to_le_bytes());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::generate::{PartGroup, PartKind};
    use crate::math::{Point2, World};
    use crate::tessellation::{extrude, Mesh};
    use approx::assert_relative_eq;

    fn cube_part(id: &str, at: (f64, f64)) -> CutterPart {
        let (x, y) = at;
        let footprint = vec![
            Point2::new(x, y),
            Point2::new(x + 2.0, y),
            Point2::new(x + 2.0, y + 2.0),
            Point2::new(x, y + 2.0),
        ];
        let mesh: Mesh<World> = extrude(&footprint, &[], 0.0, 2.0).unwrap();
        CutterPart::from_world(id, PartKind::Outer, PartGroup::Cutter, Some(0), &mesh).unwrap()
    }

    fn read_f32(bytes: &[u8], at: usize) -> f32 {
        f32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn vertices(bytes: &[u8]) -> Vec<[f32; 3]> {
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap()) as usize;
        (0..count)
            .flat_map(|t| {
                let record = 84 + t * STL_RECORD_LEN;
                (0..3).map(move |v| {
                    let at = record + 12 + v * 12;
                    [read_f32(bytes, at), read_f32(bytes, at + 4), read_f32(bytes, at + 8)]
                })
            })
            .collect()
    }

    // ── Layout ─────────────────────────────────────────────────

    #[test]
    fn binary_layout() {
        let parts = vec![cube_part("a", (0.0, 0.0))];
        let bytes = export_stl(&parts, &HashSet::new());
        assert_eq!(bytes.len(), STL_HEADER_LEN + 4 + 12 * STL_RECORD_LEN);
        assert!(bytes[..STL_HEADER_LEN].iter().all(|&b| b == 0));
        assert_eq!(u32::from_le_bytes(bytes[80..84].try_into().unwrap()), 12);
    }

    #[test]
    fn normals_are_unit_length() {
        let parts = vec![cube_part("a", (0.0, 0.0))];
        let bytes = export_stl(&parts, &HashSet::new());
        for t in 0..12 {
            let at = 84 + t * STL_RECORD_LEN;
            let n = [read_f32(&bytes, at), read_f32(&bytes, at + 4), read_f32(&bytes, at + 8)];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert_relative_eq!(len, 1.0, epsilon = 1e-5);
        }
    }

    // ── Visibility ─────────────────────────────────────────────

    #[test]
    fn hidden_parts_are_skipped() {
        let parts = vec![cube_part("a", (0.0, 0.0)), cube_part("b", (5.0, 0.0))];
        let hidden: HashSet<String> = ["b".to_owned()].into();
        let bytes = export_stl(&parts, &hidden);
        assert_eq!(u32::from_le_bytes(bytes[80..84].try_into().unwrap()), 12);
    }

    #[test]
    fn nothing_visible_gives_empty_buffer() {
        let parts = vec![cube_part("a", (0.0, 0.0))];
        let hidden: HashSet<String> = ["a".to_owned()].into();
        assert!(export_stl(&parts, &hidden).is_empty());
        assert!(export_stl(&[], &HashSet::new()).is_empty());
    }

    // ── Placement ──────────────────────────────────────────────

    #[test]
    fn stored_position_is_reapplied() {
        let mut part = cube_part("a", (-1.0, -1.0));
        // Centred cube, placed at (10, 20, 0).
        part.position = Vector3::new(10.0, 20.0, 0.0);
        let bytes = export_stl(&[part], &HashSet::new());

        let verts = vertices(&bytes);
        let (mut min, mut max) = ([f32::MAX; 3], [f32::MIN; 3]);
        for v in &verts {
            for k in 0..3 {
                min[k] = min[k].min(v[k]);
                max[k] = max[k].max(v[k]);
            }
        }
        assert_relative_eq!(f32::midpoint(min[0], max[0]), 10.0, epsilon = 1e-5);
        assert_relative_eq!(f32::midpoint(min[1], max[1]), 20.0, epsilon = 1e-5);
        assert_relative_eq!(f32::midpoint(min[2], max[2]), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn parts_keep_relative_placement() {
        let parts = vec![cube_part("a", (0.0, 0.0)), cube_part("b", (10.0, 0.0))];
        let verts = vertices(&export_stl(&parts, &HashSet::new()));
        let max_x = verts.iter().map(|v| v[0]).fold(f32::MIN, f32::max);
        let min_x = verts.iter().map(|v| v[0]).fold(f32::MAX, f32::min);
        assert_relative_eq!(min_x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(max_x, 12.0, epsilon = 1e-5);
    }

    #[test]
    fn write_stl_creates_file() {
        let path = std::env::temp_dir().join(format!("cutterkit-{}.stl", std::process::id()));
        write_stl(&path, &[cube_part("a", (0.0, 0.0))], &HashSet::new()).unwrap();
        let len = std::fs::metadata(&path).unwrap().len();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(len, 84 + 12 * 50);
    }
}
