use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::math::polygon_2d::{self, Bounds2};
use crate::math::{Point2, Space};

/// A closed 2D polygon boundary.
///
/// The ring is implicitly closed: the first point is not repeated at the
/// end. Winding is not normalized; consumers that care use
/// [`Contour::signed_area`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", transparent)]
pub struct Contour<S: Space> {
    pub points: Vec<Point2>,
    #[serde(skip)]
    space: PhantomData<S>,
}

impl<S: Space> Default for Contour<S> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<S: Space> Contour<S> {
    /// Wraps a point list as a contour in space `S`.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self {
            points,
            space: PhantomData,
        }
    }

    /// Builds a contour from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn signed_area(&self) -> f64 {
        polygon_2d::signed_area(&self.points)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        polygon_2d::area(&self.points)
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds2> {
        Bounds2::of(&self.points)
    }

    /// Even-odd containment test against this ring.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        polygon_2d::point_in_polygon(p, &self.points)
    }

    /// Returns a copy with non-finite points and duplicates removed.
    #[must_use]
    pub fn cleaned(&self) -> Self {
        Self::new(polygon_2d::clean_ring(&self.points))
    }

    /// Applies `f` to every point, producing a contour in another space.
    #[must_use]
    pub fn map_into<T: Space>(&self, f: impl Fn(&Point2) -> Point2) -> Contour<T> {
        Contour::new(self.points.iter().map(f).collect())
    }
}

/// A closed outline with zero or more holes, all in space `S`.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape<S: Space> {
    pub outline: Contour<S>,
    pub holes: Vec<Contour<S>>,
}

impl<S: Space> Shape<S> {
    #[must_use]
    pub fn new(outline: Contour<S>, holes: Vec<Contour<S>>) -> Self {
        Self { outline, holes }
    }

    /// Filled area: outline minus holes.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.outline.area() - self.holes.iter().map(Contour::area).sum::<f64>()
    }

    /// Flattens into independent rings, outline first.
    #[must_use]
    pub fn into_rings(self) -> Vec<Contour<S>> {
        let mut rings = Vec::with_capacity(1 + self.holes.len());
        rings.push(self.outline);
        rings.extend(self.holes);
        rings
    }
}

/// Semantic tag deciding how a contour is meshed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Outer boundary; becomes the cutting wall.
    Cut,
    /// Inner boundary; becomes a stamp or seal detail.
    Stamp,
    /// Explicit flat backing.
    Base,
    /// Subtracted from every solid as a hole.
    Void,
    /// Inferred: the contour with most points is outer, the rest inner.
    #[default]
    Auto,
}

/// Per-vertex interpolation hint used when resampling edited contours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Corner,
    Smooth,
}

/// Contours with their index-aligned role and node-type arrays.
///
/// `roles.len() == contours.len()` and
/// `node_types[i].len() == contours[i].len()` always hold after
/// construction. Misaligned input trips a debug assertion; release builds
/// heal it by padding or truncating with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", from = "ContourSetWire<S>")]
pub struct ContourSet<S: Space> {
    contours: Vec<Contour<S>>,
    roles: Vec<Role>,
    node_types: Vec<Vec<NodeType>>,
}

impl<S: Space> Default for ContourSet<S> {
    fn default() -> Self {
        Self::with_defaults(Vec::new())
    }
}

impl<S: Space> ContourSet<S> {
    /// Builds a set; missing arrays are default-filled.
    #[must_use]
    pub fn new(
        contours: Vec<Contour<S>>,
        roles: Option<Vec<Role>>,
        node_types: Option<Vec<Vec<NodeType>>>,
    ) -> Self {
        let roles = match roles {
            Some(roles) => {
                debug_assert_eq!(
                    roles.len(),
                    contours.len(),
                    "roles array out of step with contours"
                );
                realign_roles(roles, contours.len())
            }
            None => vec![Role::Auto; contours.len()],
        };
        let node_types = match node_types {
            Some(rows) => {
                debug_assert!(
                    rows.len() == contours.len()
                        && rows.iter().zip(&contours).all(|(r, c)| r.len() == c.len()),
                    "node types out of step with contours"
                );
                realign_node_types(rows, &contours)
            }
            None => contours.iter().map(|c| vec![NodeType::Corner; c.len()]).collect(),
        };
        Self {
            contours,
            roles,
            node_types,
        }
    }

    /// Builds a set with every role `Auto` and every node a corner.
    #[must_use]
    pub fn with_defaults(contours: Vec<Contour<S>>) -> Self {
        Self::new(contours, None, None)
    }

    #[must_use]
    pub fn contours(&self) -> &[Contour<S>] {
        &self.contours
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    #[must_use]
    pub fn node_types(&self) -> &[Vec<NodeType>] {
        &self.node_types
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Replaces one contour wholesale, resetting its node types to corners.
    pub fn replace(&mut self, index: usize, contour: Contour<S>) {
        if let Some(slot) = self.contours.get_mut(index) {
            self.node_types[index] = vec![NodeType::Corner; contour.len()];
            *slot = contour;
        }
    }

    /// Sets the role of one contour; out-of-range indices are ignored.
    pub fn set_role(&mut self, index: usize, role: Role) {
        if let Some(slot) = self.roles.get_mut(index) {
            *slot = role;
        }
    }

    /// Appends a contour with the given role and all-corner nodes.
    pub fn push(&mut self, contour: Contour<S>, role: Role) {
        self.node_types.push(vec![NodeType::Corner; contour.len()]);
        self.roles.push(role);
        self.contours.push(contour);
    }
}

/// Wire form of [`ContourSet`]; deserialization runs through
/// [`ContourSet::new`] so the alignment invariant holds.
#[derive(Deserialize)]
#[serde(bound = "")]
struct ContourSetWire<S: Space> {
    contours: Vec<Contour<S>>,
    #[serde(default)]
    roles: Option<Vec<Role>>,
    #[serde(default)]
    node_types: Option<Vec<Vec<NodeType>>>,
}

impl<S: Space> From<ContourSetWire<S>> for ContourSet<S> {
    fn from(wire: ContourSetWire<S>) -> Self {
        Self::new(wire.contours, wire.roles, wire.node_types)
    }
}

/// Pads with `Auto` or truncates so the array matches `len`.
#[must_use]
pub fn realign_roles(mut roles: Vec<Role>, len: usize) -> Vec<Role> {
    roles.resize(len, Role::Auto);
    roles
}

/// Pads or truncates the outer array and replaces any row whose length
/// differs from its contour with an all-corner row.
#[must_use]
pub fn realign_node_types<S: Space>(
    mut rows: Vec<Vec<NodeType>>,
    contours: &[Contour<S>],
) -> Vec<Vec<NodeType>> {
    rows.resize_with(contours.len(), Vec::new);
    for (row, contour) in rows.iter_mut().zip(contours) {
        if row.len() != contour.len() {
            *row = vec![NodeType::Corner; contour.len()];
        }
    }
    rows
}
