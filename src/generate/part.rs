use serde::{Deserialize, Serialize};

use crate::math::{Local, Vector3, World};
use crate::tessellation::Mesh;

/// What a part is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    Base,
    Inner,
    Outer,
    Handle,
    Bridge,
}

/// Independently exportable set a part belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartGroup {
    Cutter,
    Stamp,
    Keychain,
}

/// One printable solid.
///
/// The mesh is stored centred on its own bounding box so a viewer can
/// rotate and hide parts individually; `position` is where that centre
/// sits in the assembled model.
#[derive(Debug, Clone, PartialEq)]
pub struct CutterPart {
    pub geometry: Mesh<Local>,
    pub kind: PartKind,
    /// Input contour the part was built from, if any.
    pub contour_index: Option<usize>,
    pub id: String,
    pub group: PartGroup,
    pub position: Vector3,
}

impl CutterPart {
    /// Centres an assembled mesh and records the offset.
    ///
    /// Returns `None` for an empty mesh.
    #[must_use]
    pub fn from_world(
        id: impl Into<String>,
        kind: PartKind,
        group: PartGroup,
        contour_index: Option<usize>,
        mesh: &Mesh<World>,
    ) -> Option<Self> {
        if mesh.is_empty() {
            return None;
        }
        let position = mesh.bounds()?.center().coords;
        Some(Self {
            geometry: mesh.translated(-position),
            kind,
            contour_index,
            id: id.into(),
            group,
            position,
        })
    }

    /// The mesh moved back to its place in the assembled model.
    #[must_use]
    pub fn world_mesh(&self) -> Mesh<World> {
        self.geometry.translated(self.position)
    }
}
