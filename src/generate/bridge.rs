use tracing::debug;

use crate::error::Result;
use crate::geometry::{Contour, Role};
use crate::math::{Millimeter, Point2, World, TOLERANCE};
use crate::operations::classify::ContourTree;
use crate::tessellation::{oriented_box, Mesh};

/// Boundary samples per contour when searching for the closest pair.
pub const BRIDGE_SAMPLES: usize = 50;

/// Extra strut length past each anchor point, in mm.
const BRIDGE_OVERHANG: f64 = 1.0;

/// A strut tying an island contour to the contour around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bridge {
    pub child: usize,
    pub parent: usize,
    /// Anchor on the child boundary.
    pub from: Point2,
    /// Anchor on the parent boundary.
    pub to: Point2,
}

impl Bridge {
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.to - self.from).norm()
    }

    /// Part id of the strut.
    #[must_use]
    pub fn id(&self) -> String {
        format!("bridge-{}-{}", self.child, self.parent)
    }

    /// Strut mesh: `length + 2` mm long, centred on the anchors.
    ///
    /// # Errors
    ///
    /// Returns a geometry error if the anchors coincide.
    pub fn mesh(&self, width: f64, height: f64) -> Result<Mesh<World>> {
        let dir = (self.to - self.from) / self.length().max(TOLERANCE);
        let from = self.from - dir * BRIDGE_OVERHANG;
        let to = self.to + dir * BRIDGE_OVERHANG;
        oriented_box(from, to, width, 0.0, height)
    }
}

/// Finds one bridge per non-void contour nested inside another non-void
/// contour.
#[must_use]
pub fn find_bridges(contours: &[Contour<Millimeter>], roles: &[Role]) -> Vec<Bridge> {
    let tree = ContourTree::build_with(contours, |i| roles.get(i).copied().unwrap_or_default() != Role::Void);

    let mut bridges: Vec<Bridge> = (0..contours.len())
        .filter_map(|child| {
            let parent = tree.parent_of(child)?;
            let (from, to) = closest_pair(&contours[child], &contours[parent])?;
            Some(Bridge { child, parent, from, to })
        })
        .filter(|b| {
            let ok = b.length() > TOLERANCE;
            if !ok {
                debug!(child = b.child, parent = b.parent, "contours touch; no bridge");
            }
            ok
        })
        .collect();
    bridges.sort_by_key(|b| b.child);
    bridges
}

/// Closest pair between stride-sampled boundaries of two contours.
fn closest_pair(a: &Contour<Millimeter>, b: &Contour<Millimeter>) -> Option<(Point2, Point2)> {
    let sa = samples(a);
    let sb = samples(b);
    sa.iter()
        .flat_map(|p| sb.iter().map(move |q| (*p, *q)))
        .min_by(|x, y| (x.1 - x.0).norm_squared().total_cmp(&(y.1 - y.0).norm_squared()))
}

fn samples(contour: &Contour<Millimeter>) -> Vec<Point2> {
    let stride = (contour.len() / BRIDGE_SAMPLES).max(1);
    contour.points.iter().step_by(stride).copied().collect()
}
