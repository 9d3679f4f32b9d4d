use std::f64::consts::{FRAC_PI_2, PI, TAU};

use tracing::warn;

use crate::error::Result;
use crate::geometry::Contour;
use crate::math::polygon_2d::Bounds2;
use crate::math::{Millimeter, Point2, Vector2, World};
use crate::operations::boolean::UnionAll;
use crate::operations::offset::offset;
use crate::tessellation::{circle_points, extrude, Layer, Loft, Mesh};

use super::settings::{BackerShape, CutterSettings};

const CIRCLE_SEGMENTS: usize = 96;
const RING_SEGMENTS: usize = 32;
const CORNER_SEGMENTS: usize = 8;
const HEART_SEGMENTS: usize = 96;

/// Outline of a backer with the keyring hole position.
#[derive(Debug, Clone, PartialEq)]
pub struct BackerOutline {
    pub outline: Vec<Point2>,
    pub holes: Vec<Vec<Point2>>,
}

/// Builds the keychain backer under the artwork.
///
/// `content` is every solid ring of the artwork; `silhouette` the outermost
/// ones that a silhouette backer follows.
#[must_use]
pub fn build_backer(
    content: &[Contour<Millimeter>],
    silhouette: &[Contour<Millimeter>],
    settings: &CutterSettings,
) -> Mesh<World> {
    let Some(bounds) = content
        .iter()
        .filter_map(Contour::bounds)
        .reduce(|a, b| a.union(&b))
    else {
        return Mesh::new();
    };

    let outlines = match settings.backer_shape {
        BackerShape::Silhouette => silhouette_outlines(silhouette, &bounds, settings),
        shape => vec![geometric_outline(shape, &bounds, settings)],
    };

    let mut mesh = Mesh::new();
    for backer in outlines {
        match beveled_slab(
            &backer.outline,
            &backer.holes,
            settings.backer_thickness,
            settings.bevel_size,
            settings.bevel_segments,
        ) {
            Ok(m) => mesh.merge(m),
            Err(e) => warn!(error = %e, "backer piece skipped"),
        }
    }
    mesh
}

/// The artwork outline itself, joined with a round tab that carries the
/// keyring hole above the top centre.
fn silhouette_outlines(
    silhouette: &[Contour<Millimeter>],
    bounds: &Bounds2,
    settings: &CutterSettings,
) -> Vec<BackerOutline> {
    let hole_r = settings.ring_hole_diameter / 2.0;
    let tab_center = Point2::new(
        bounds.center().x + settings.ring_offset_x,
        bounds.max.y + hole_r + settings.ring_offset_y,
    );
    let tab = Contour::new(circle_points(tab_center, hole_r + settings.ring_wall, CIRCLE_SEGMENTS));

    let mut pieces: Vec<Contour<Millimeter>> = silhouette
        .iter()
        .filter(|c| c.len() >= 3)
        .cloned()
        .collect();
    pieces.push(tab);

    UnionAll::new(&pieces)
        .execute()
        .into_iter()
        .map(|shape| {
            let mut holes: Vec<Vec<Point2>> = shape.holes.into_iter().map(|h| h.points).collect();
            if shape.outline.contains(&tab_center) {
                holes.push(circle_points(tab_center, hole_r, RING_SEGMENTS));
            }
            BackerOutline {
                outline: shape.outline.points,
                holes,
            }
        })
        .collect()
}

/// A circle, rounded rectangle, hexagon or heart enclosing the artwork plus
/// padding, with room for the keyring hole at the top.
#[must_use]
pub fn geometric_outline(shape: BackerShape, bounds: &Bounds2, settings: &CutterSettings) -> BackerOutline {
    let hole_r = settings.ring_hole_diameter / 2.0;
    let ring_room = settings.ring_hole_diameter + settings.ring_wall;
    let mut area = *bounds;
    area.max.y += ring_room;

    let c = area.center();
    let hw = area.width() / 2.0 + settings.backer_padding;
    let hh = area.height() / 2.0 + settings.backer_padding;
    let inset = settings.ring_wall + hole_r;

    let (outline, hole_at) = match shape {
        BackerShape::Circle | BackerShape::Silhouette => {
            let r = hw.hypot(hh);
            (circle_points(c, r, CIRCLE_SEGMENTS), Point2::new(c.x, c.y + r - inset))
        }
        BackerShape::RoundedRectangle => {
            let r = settings.corner_radius.min(hw).min(hh);
            (rounded_rectangle(c, hw, hh, r), Point2::new(c.x, c.y + hh - inset))
        }
        BackerShape::Hexagon => {
            let r = (hw + hh / 3.0_f64.sqrt()).max(2.0 * hh / 3.0_f64.sqrt());
            let apothem = r * 3.0_f64.sqrt() / 2.0;
            (hexagon(c, r), Point2::new(c.x, c.y + apothem - inset))
        }
        BackerShape::Heart => {
            let k = (hw / 10.0).max(hh / 7.0);
            let origin = c - Vector2::new(0.0, 1.5 * k);
            // Top of the left lobe sits near (-8, 11.9) on the unit heart.
            (heart(origin, k), Point2::new(origin.x - 8.0 * k, origin.y + 11.9 * k - inset))
        }
    };

    let hole_center = hole_at + Vector2::new(settings.ring_offset_x, settings.ring_offset_y);
    BackerOutline {
        outline,
        holes: vec![circle_points(hole_center, hole_r, RING_SEGMENTS)],
    }
}

fn rounded_rectangle(c: Point2, hw: f64, hh: f64, r: f64) -> Vec<Point2> {
    let corners = [
        (Point2::new(c.x + hw - r, c.y - hh + r), -FRAC_PI_2),
        (Point2::new(c.x + hw - r, c.y + hh - r), 0.0),
        (Point2::new(c.x - hw + r, c.y + hh - r), FRAC_PI_2),
        (Point2::new(c.x - hw + r, c.y - hh + r), PI),
    ];
    if r <= 0.0 {
        return corners.iter().map(|(p, _)| *p).collect();
    }
    corners
        .iter()
        .flat_map(|&(center, start)| {
            (0..=CORNER_SEGMENTS).map(move |i| {
                #[allow(clippy::cast_precision_loss)]
                let a = start + FRAC_PI_2 * i as f64 / CORNER_SEGMENTS as f64;
                Point2::new(center.x + r * a.cos(), center.y + r * a.sin())
            })
        })
        .collect()
}

fn hexagon(c: Point2, r: f64) -> Vec<Point2> {
    (0..6)
        .map(|i| {
            let a = f64::from(i) * PI / 3.0;
            Point2::new(c.x + r * a.cos(), c.y + r * a.sin())
        })
        .collect()
}

/// The classic parametric heart scaled by `k`: about 32 wide and 29 tall
/// at `k = 1`, with the notch at `origin + (0, 5k)`.
fn heart(origin: Point2, k: f64) -> Vec<Point2> {
    (0..HEART_SEGMENTS)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / HEART_SEGMENTS as f64 * TAU;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            Point2::new(origin.x + k * x, origin.y + k * y)
        })
        .collect()
}

/// A flat slab of `thickness` whose top edge is rounded over `bevel` mm in
/// quarter-circle steps: the outline shrinks and the holes grow toward the
/// top face.
///
/// # Errors
///
/// Returns a geometry error if a ring degenerates.
pub fn beveled_slab(
    outline: &[Point2],
    holes: &[Vec<Point2>],
    thickness: f64,
    bevel: f64,
    segments: u32,
) -> Result<Mesh<World>> {
    let bevel = bevel.min(thickness);
    if bevel <= f64::EPSILON {
        return extrude(outline, holes, 0.0, thickness);
    }

    let outline: Contour<Millimeter> = Contour::new(outline.to_vec());
    let holes: Vec<Contour<Millimeter>> = holes.iter().map(|h| Contour::new(h.clone())).collect();
    let station = |z: f64, inset: f64| {
        Layer::with_holes(
            z,
            offset(&outline, -inset).points,
            holes.iter().map(|h| offset(h, inset).points).collect(),
        )
    };

    let mut layers = vec![station(0.0, 0.0)];
    let shoulder = thickness - bevel;
    if shoulder > f64::EPSILON {
        layers.push(station(shoulder, 0.0));
    }
    let segments = segments.max(1);
    for k in 1..=segments {
        let theta = f64::from(k) / f64::from(segments) * FRAC_PI_2;
        layers.push(station(shoulder + bevel * theta.sin(), bevel * (1.0 - theta.cos())));
    }
    Loft::new(layers).execute()
}
