mod bridge;
mod dual;
mod grid;
mod keychain;
mod normalize;
mod part;
mod relief;
mod settings;
mod voids;
mod walls;

pub use bridge::{find_bridges, Bridge, BRIDGE_SAMPLES};
pub use dual::{build_stamp, stamp_detail, stamp_plate_contour, Stamp, STAMP_GAP};
pub use grid::{grid_plate, GridParams};
pub use keychain::{beveled_slab, build_backer, geometric_outline, BackerOutline};
pub use normalize::Normalization;
pub use part::{CutterPart, PartGroup, PartKind};
pub use relief::{relief_mesh, relief_regions, ReliefRegion};
pub use settings::{
    BackerShape, BaseStyle, BladeProfile, CutterSettings, GenerationMode, OutputType, MIN_DIMENSION,
};
pub use voids::{flatten_fragments, subtract_voids, Fragment, FragmentRing};
pub use walls::{
    base, blade, stepped_stations, wall, STEPPED_TIP_HEIGHT, STEPPED_TIP_WIDTH,
    STEPPED_TRANSITION_HEIGHT,
};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::geometry::curve::resample_set;
use crate::geometry::{Contour, ContourSet};
use crate::math::{Millimeter, Pixel, Vector3, World};
use crate::operations::classify::{resolve_roles, ContourTree, ResolvedRole};
use crate::tessellation::{Bounds3, Mesh};

/// Lowest strut height for automatic bridges, in mm.
const MIN_BRIDGE_HEIGHT: f64 = 2.0;
/// How far below the cutter rim automatic bridges stop, in mm.
const BRIDGE_RIM_CLEARANCE: f64 = 5.0;

/// Builds every printable part for one set of contours.
///
/// Produces cutter walls and bases, a matching stamp in dual mode, or a
/// keychain backer with relief. The pass is a pure function of its inputs.
/// A degenerate ring only costs its own part; it is logged and skipped.
#[derive(Debug)]
pub struct GenerateGeometry<'a> {
    contours: &'a ContourSet<Pixel>,
    width: u32,
    height: u32,
    settings: &'a CutterSettings,
}

impl<'a> GenerateGeometry<'a> {
    /// Creates a generation pass for contours traced from a
    /// `width x height` image.
    #[must_use]
    pub fn new(contours: &'a ContourSet<Pixel>, width: u32, height: u32, settings: &'a CutterSettings) -> Self {
        Self {
            contours,
            width,
            height,
            settings,
        }
    }

    /// Executes the pass.
    #[must_use]
    pub fn execute(&self) -> Vec<CutterPart> {
        let settings = self.settings.sanitized();
        let contours = self.millimeters(&settings);
        let rings = flatten_fragments(subtract_voids(&contours, self.contours.roles()));
        debug!(contours = contours.len(), rings = rings.len(), "void pass done");

        let mut parts = match settings.output_type {
            OutputType::Cutter => {
                let mut parts = cutter_parts(&rings, &settings);
                if settings.auto_bridge {
                    parts.extend(bridge_parts(&contours, self.contours, &settings));
                }
                parts
            }
            OutputType::Keychain => keychain_parts(&rings, &settings),
        };
        place_stamp_group(&mut parts);

        info!(parts = parts.len(), "geometry generated");
        parts
    }

    /// Solid fragments left after removing the voids, in millimetres.
    #[must_use]
    pub fn fragments(&self) -> Vec<Fragment> {
        let settings = self.settings.sanitized();
        subtract_voids(&self.millimeters(&settings), self.contours.roles())
    }

    fn millimeters(&self, settings: &CutterSettings) -> Vec<Contour<Millimeter>> {
        let normalization = Normalization::new(self.width, self.height, settings.size, settings.mirrored());
        resample_set(self.contours)
            .iter()
            .map(|c| normalization.apply(c))
            .collect()
    }
}

/// `{prefix}-{source}`, with the fragment ordinal appended when one
/// contour fanned out into several rings.
fn ring_id(prefix: &str, ring: &FragmentRing) -> String {
    if ring.siblings > 1 {
        format!("{prefix}-{}-{}", ring.source, ring.ordinal)
    } else {
        format!("{prefix}-{}", ring.source)
    }
}

fn push_part(
    parts: &mut Vec<CutterPart>,
    id: String,
    kind: PartKind,
    group: PartGroup,
    contour_index: Option<usize>,
    mesh: Result<Mesh<World>>,
) {
    match mesh {
        Ok(mesh) => {
            if let Some(part) = CutterPart::from_world(id.clone(), kind, group, contour_index, &mesh) {
                parts.push(part);
            } else {
                debug!(id = %id, "empty part dropped");
            }
        }
        Err(e) => warn!(id = %id, error = %e, "part skipped"),
    }
}

fn cutter_parts(rings: &[FragmentRing], settings: &CutterSettings) -> Vec<CutterPart> {
    let contours: Vec<Contour<Millimeter>> = rings.iter().map(|r| r.contour.clone()).collect();
    let roles: Vec<_> = rings.iter().map(|r| r.role).collect();
    let resolved = resolve_roles(&contours, &roles);
    let dual = settings.generation_mode == GenerationMode::Dual;
    let grid = GridParams {
        spacing: settings.grid_spacing,
        strut_width: settings.grid_strut_width,
        rim_width: settings.grid_rim_width,
    };

    let mut parts = Vec::new();
    for (ring, role) in rings.iter().zip(resolved) {
        let source = Some(ring.source);
        let contour = &ring.contour;
        match role {
            ResolvedRole::Outer => {
                push_part(
                    &mut parts,
                    ring_id("outer", ring),
                    PartKind::Outer,
                    PartGroup::Cutter,
                    source,
                    blade(contour, settings.blade_profile, settings.cutter_thickness, settings.cutter_height),
                );
                if settings.base_enabled {
                    let mesh = match settings.base_style {
                        BaseStyle::Solid if settings.grid_infill => {
                            Ok(grid_plate(contour, grid, 0.0, settings.base_height))
                        }
                        style => base(
                            contour,
                            style == BaseStyle::Solid,
                            settings.base_thickness,
                            settings.base_height,
                        ),
                    };
                    push_part(&mut parts, ring_id("base", ring), PartKind::Base, PartGroup::Cutter, source, mesh);
                }
                if dual {
                    let stamp = build_stamp(contour, settings);
                    push_part(
                        &mut parts,
                        ring_id("stamp-plate", ring),
                        PartKind::Base,
                        PartGroup::Stamp,
                        source,
                        Ok(stamp.plate),
                    );
                    push_part(
                        &mut parts,
                        ring_id("stamp-handle", ring),
                        PartKind::Handle,
                        PartGroup::Stamp,
                        source,
                        Ok(stamp.handle),
                    );
                }
            }
            ResolvedRole::Inner if dual => push_part(
                &mut parts,
                ring_id("stamp-detail", ring),
                PartKind::Inner,
                PartGroup::Stamp,
                source,
                stamp_detail(contour, settings),
            ),
            ResolvedRole::Inner => push_part(
                &mut parts,
                ring_id("inner", ring),
                PartKind::Inner,
                PartGroup::Cutter,
                source,
                wall(contour, settings.marker_thickness, 0.0, settings.marker_height),
            ),
            ResolvedRole::Base => push_part(
                &mut parts,
                ring_id("base", ring),
                PartKind::Base,
                PartGroup::Cutter,
                source,
                base(contour, true, settings.base_thickness, settings.base_height),
            ),
            // Voids were consumed by the void pass.
            ResolvedRole::Void => {}
        }
    }
    parts
}

/// Struts tying floating islands to the contour around them. Built from the
/// contours before the void pass so the nesting matches what was drawn.
fn bridge_parts(
    contours: &[Contour<Millimeter>],
    set: &ContourSet<Pixel>,
    settings: &CutterSettings,
) -> Vec<CutterPart> {
    let height = (settings.cutter_height - BRIDGE_RIM_CLEARANCE).max(MIN_BRIDGE_HEIGHT);
    let mut parts = Vec::new();
    for bridge in find_bridges(contours, set.roles()) {
        push_part(
            &mut parts,
            bridge.id(),
            PartKind::Bridge,
            PartGroup::Cutter,
            Some(bridge.child),
            bridge.mesh(settings.bridge_width, height),
        );
    }
    debug!(bridges = parts.len(), "bridges built");
    parts
}

fn keychain_parts(rings: &[FragmentRing], settings: &CutterSettings) -> Vec<CutterPart> {
    let contours: Vec<Contour<Millimeter>> = rings.iter().map(|r| r.contour.clone()).collect();
    let tree = ContourTree::build(&contours);
    let silhouette: Vec<Contour<Millimeter>> = tree.roots().into_iter().map(|i| contours[i].clone()).collect();

    let mut parts = Vec::new();
    push_part(
        &mut parts,
        "backer".to_owned(),
        PartKind::Base,
        PartGroup::Keychain,
        None,
        Ok(build_backer(&contours, &silhouette, settings)),
    );
    for region in relief_regions(&contours) {
        push_part(
            &mut parts,
            format!("relief-{}", region.outline),
            PartKind::Inner,
            PartGroup::Keychain,
            Some(rings[region.outline].source),
            Ok(relief_mesh(&contours, &region, settings.backer_thickness, settings.marker_height)),
        );
    }
    parts
}

/// Moves the stamp group beside the cutter along +X.
fn place_stamp_group(parts: &mut [CutterPart]) {
    let extent = |group: PartGroup| {
        parts
            .iter()
            .filter(|p| p.group == group)
            .filter_map(|p| p.world_mesh().bounds())
            .reduce(|a, b| Bounds3 {
                min: a.min.inf(&b.min),
                max: a.max.sup(&b.max),
            })
    };
    let (Some(cutter), Some(stamp)) = (extent(PartGroup::Cutter), extent(PartGroup::Stamp)) else {
        return;
    };
    let shift = cutter.max.x - stamp.min.x + STAMP_GAP;
    for part in parts.iter_mut().filter(|p| p.group == PartGroup::Stamp) {
        part.position += Vector3::new(shift, 0.0, 0.0);
    }
}
