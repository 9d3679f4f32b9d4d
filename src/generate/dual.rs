use tracing::warn;

use crate::geometry::Contour;
use crate::math::{Millimeter, Point2, World};
use crate::operations::offset::offset;
use crate::tessellation::{extrude, rectangle_points, Mesh};

use super::grid::{grid_plate, GridParams};
use super::settings::CutterSettings;
use super::walls::wall;

/// Gap between the cutter and the stamp laid out beside it, in mm.
pub const STAMP_GAP: f64 = 10.0;

/// Share of the plate's longer side covered by the handle.
const HANDLE_SPAN: f64 = 0.6;

/// Outline of the stamp plate: the cutter's inside face shrunk by the fit
/// tolerance.
#[must_use]
pub fn stamp_plate_contour(cutter: &Contour<Millimeter>, tolerance: f64) -> Contour<Millimeter> {
    offset(cutter, -tolerance)
}

/// Meshes of one stamp, printed face-down: details on the bed, the plate on
/// top of them, the handle on top of the plate.
#[derive(Debug, Default)]
pub struct Stamp {
    pub plate: Mesh<World>,
    pub handle: Mesh<World>,
}

/// Builds the plate and handle that fit inside `cutter`.
#[must_use]
pub fn build_stamp(cutter: &Contour<Millimeter>, settings: &CutterSettings) -> Stamp {
    let plate_contour = stamp_plate_contour(cutter, settings.stamp_tolerance);
    let z0 = settings.marker_height;
    let z1 = z0 + settings.stamp_plate_height;

    let plate = if settings.grid_infill {
        grid_plate(
            &plate_contour,
            GridParams {
                spacing: settings.grid_spacing,
                strut_width: settings.grid_strut_width,
                rim_width: settings.grid_rim_width,
            },
            z0,
            z1,
        )
    } else {
        extrude(&plate_contour.points, &[], z0, z1).unwrap_or_else(|e| {
            warn!(error = %e, "stamp plate skipped");
            Mesh::new()
        })
    };

    let handle = plate_contour
        .bounds()
        .and_then(|b| {
            let half_t = settings.handle_thickness / 2.0;
            let c = b.center();
            let half_span = if b.width() >= b.height() {
                (b.width() * HANDLE_SPAN / 2.0).max(half_t)
            } else {
                (b.height() * HANDLE_SPAN / 2.0).max(half_t)
            };
            let (hx, hy) = if b.width() >= b.height() {
                (half_span, half_t)
            } else {
                (half_t, half_span)
            };
            let footprint = rectangle_points(Point2::new(c.x - hx, c.y - hy), Point2::new(c.x + hx, c.y + hy));
            extrude(&footprint, &[], z1, z1 + settings.handle_height).ok()
        })
        .unwrap_or_default();

    Stamp { plate, handle }
}

/// A detail wall on the stamp face.
///
/// # Errors
///
/// Returns a geometry error if the offset ring degenerates.
pub fn stamp_detail(contour: &Contour<Millimeter>, settings: &CutterSettings) -> crate::error::Result<Mesh<World>> {
    wall(contour, settings.marker_thickness, 0.0, settings.marker_height)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::distance_2d::point_to_ring_dist;
    use approx::assert_relative_eq;

    fn blob() -> Contour<Millimeter> {
        // Ellipse with a shallow notch in the top.
        let mut pts: Vec<Point2> = (0..48)
            .map(|i| {
                let a = f64::from(i) / 48.0 * std::f64::consts::TAU;
                Point2::new(30.0 * a.cos(), 20.0 * a.sin())
            })
            .collect();
        pts[12] = Point2::new(0.0, 17.0);
        Contour::new(pts)
    }

    // ── Fit ────────────────────────────────────────────────────

    #[test]
    fn plate_sits_inside_cutter_with_clearance() {
        let cutter = blob();
        let plate = stamp_plate_contour(&cutter, 0.3);
        assert_eq!(plate.len(), cutter.len());
        for p in &plate.points {
            assert!(cutter.contains(p));
            assert!(point_to_ring_dist(p, &cutter.points) >= 0.3 - 1e-9);
        }
    }

    #[test]
    fn plate_fits_square_cutter() {
        let sq = Contour::<Millimeter>::from_xy(&[(0.0, 0.0), (40.0, 0.0), (40.0, 40.0), (0.0, 40.0)]);
        let plate = stamp_plate_contour(&sq, 0.3);
        assert_relative_eq!(plate.area(), 39.4 * 39.4, epsilon = 1e-9);
    }

    // ── Layout ─────────────────────────────────────────────────

    #[test]
    fn stamp_is_stacked_face_down() {
        let settings = CutterSettings::default();
        let stamp = build_stamp(&blob(), &settings);
        let plate = stamp.plate.bounds().unwrap();
        let handle = stamp.handle.bounds().unwrap();
        assert_relative_eq!(plate.min.z, settings.marker_height);
        assert_relative_eq!(plate.max.z, settings.marker_height + settings.stamp_plate_height);
        assert_relative_eq!(handle.min.z, plate.max.z);
        assert_relative_eq!(handle.max.z, plate.max.z + settings.handle_height);
        // Handle runs along the longer (x) side.
        assert!(handle.size().x > handle.size().y);
    }

    #[test]
    fn grid_plate_replaces_solid_plate() {
        let settings = CutterSettings {
            grid_infill: true,
            ..CutterSettings::default()
        };
        let solid = build_stamp(&blob(), &CutterSettings::default());
        let grid = build_stamp(&blob(), &settings);
        assert!(!grid.plate.is_empty());
        assert_ne!(grid.plate.triangle_count(), solid.plate.triangle_count());
    }

    #[test]
    fn detail_wall_on_the_bed() {
        let settings = CutterSettings::default();
        let sq = Contour::<Millimeter>::from_xy(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)]);
        let b = stamp_detail(&sq, &settings).unwrap().bounds().unwrap();
        assert_relative_eq!(b.min.z, 0.0);
        assert_relative_eq!(b.max.z, settings.marker_height);
    }
}
