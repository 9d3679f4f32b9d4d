use crate::error::Result;
use crate::geometry::Contour;
use crate::math::{Millimeter, World};
use crate::operations::offset::offset;
use crate::tessellation::{extrude, Layer, Loft, Mesh};

use super::settings::BladeProfile;

/// Height of the narrow tip of a stepped blade.
pub const STEPPED_TIP_HEIGHT: f64 = 1.0;
/// Height of the taper between the full wall and the tip.
pub const STEPPED_TRANSITION_HEIGHT: f64 = 3.0;
/// Wall thickness at the tip of a stepped blade.
pub const STEPPED_TIP_WIDTH: f64 = 0.4;

/// A wall whose inside face is `contour` and whose outside face is the
/// contour grown by `thickness`, standing from `z0` to `z0 + height`.
///
/// # Errors
///
/// Returns a geometry error if the offset ring degenerates.
pub fn wall(contour: &Contour<Millimeter>, thickness: f64, z0: f64, height: f64) -> Result<Mesh<World>> {
    profiled_wall(contour, &[(z0, thickness), (z0 + height, thickness)])
}

/// A cutting wall with the selected blade profile.
///
/// # Errors
///
/// Returns a geometry error if an offset ring degenerates.
pub fn blade(
    contour: &Contour<Millimeter>,
    profile: BladeProfile,
    thickness: f64,
    height: f64,
) -> Result<Mesh<World>> {
    match profile {
        BladeProfile::Standard => wall(contour, thickness, 0.0, height),
        BladeProfile::Stepped => profiled_wall(contour, &stepped_stations(thickness, height)),
    }
}

/// `(z, thickness)` stations of a stepped blade.
///
/// The tip and transition keep their fixed heights; only the full-thickness
/// section shrinks with the blade, down to zero. Blades shorter than the tip
/// plus transition therefore come out taller than requested.
#[must_use]
pub fn stepped_stations(thickness: f64, height: f64) -> Vec<(f64, f64)> {
    let base = (height - STEPPED_TIP_HEIGHT - STEPPED_TRANSITION_HEIGHT).max(0.0);
    let tip = STEPPED_TIP_WIDTH.min(thickness);
    let mut stations = vec![(0.0, thickness)];
    if base > 0.0 {
        stations.push((base, thickness));
    }
    stations.push((base + STEPPED_TRANSITION_HEIGHT, tip));
    stations.push((base + STEPPED_TRANSITION_HEIGHT + STEPPED_TIP_HEIGHT, tip));
    stations
}

/// Lofts a wall through `(z, thickness)` stations, keeping the inside face
/// vertical.
fn profiled_wall(contour: &Contour<Millimeter>, stations: &[(f64, f64)]) -> Result<Mesh<World>> {
    let layers = stations
        .iter()
        .map(|&(z, thickness)| {
            Layer::with_holes(z, offset(contour, thickness).points, vec![contour.points.clone()])
        })
        .collect();
    Loft::new(layers).execute()
}

/// A flat base under an outline: either a flange reaching `thickness`
/// beyond the contour or the whole contour filled.
///
/// # Errors
///
/// Returns a geometry error if the ring degenerates.
pub fn base(contour: &Contour<Millimeter>, solid: bool, thickness: f64, height: f64) -> Result<Mesh<World>> {
    if solid {
        extrude(&contour.points, &[], 0.0, height)
    } else {
        wall(contour, thickness, 0.0, height)
    }
}
