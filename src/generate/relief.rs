use tracing::warn;

use crate::geometry::Contour;
use crate::math::{Millimeter, Point2, World};
use crate::operations::classify::ContourTree;
use crate::tessellation::{extrude, Mesh};

/// A raised island of artwork: an even-depth ring and the odd-depth rings
/// directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReliefRegion {
    pub outline: usize,
    pub holes: Vec<usize>,
}

/// Groups rings into islands by nesting parity, so letter counters and
/// rings-within-rings read as holes.
#[must_use]
pub fn relief_regions(rings: &[Contour<Millimeter>]) -> Vec<ReliefRegion> {
    let tree = ContourTree::build(rings);
    (0..rings.len())
        .filter(|&i| tree.depth_of(i).is_some_and(|d| d % 2 == 0))
        .map(|outline| ReliefRegion {
            outline,
            holes: tree.children_of(outline),
        })
        .collect()
}

/// Extrudes one region from `z0` up by `height`.
#[must_use]
pub fn relief_mesh(
    rings: &[Contour<Millimeter>],
    region: &ReliefRegion,
    z0: f64,
    height: f64,
) -> Mesh<World> {
    let holes: Vec<Vec<Point2>> = region.holes.iter().map(|&h| rings[h].points.clone()).collect();
    match extrude(&rings[region.outline].points, &holes, z0, z0 + height) {
        Ok(mesh) => mesh,
        Err(e) => {
            warn!(ring = region.outline, error = %e, "relief region skipped");
            Mesh::new()
        }
    }
}
