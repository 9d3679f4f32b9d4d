use tracing::debug;

use crate::geometry::{Contour, Role, Shape};
use crate::math::Millimeter;
use crate::operations::boolean::SubtractAll;

/// A solid region left after the void pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub shape: Shape<Millimeter>,
    /// Index of the input contour this fragment came from.
    pub source: usize,
    pub role: Role,
}

/// One ring of a flattened fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentRing {
    pub contour: Contour<Millimeter>,
    pub source: usize,
    pub role: Role,
    /// Position among the rings sharing `source`.
    pub ordinal: usize,
    /// Number of rings sharing `source`.
    pub siblings: usize,
}

/// Removes every void contour from every solid contour.
///
/// Each solid is cut by all voids in turn, overlapping or not. A solid can
/// fan out into several fragments; all of them keep the solid's index and
/// role. Missing roles count as [`Role::Auto`].
#[must_use]
pub fn subtract_voids(contours: &[Contour<Millimeter>], roles: &[Role]) -> Vec<Fragment> {
    let role_of = |i: usize| roles.get(i).copied().unwrap_or_default();
    let voids: Vec<Contour<Millimeter>> = contours
        .iter()
        .enumerate()
        .filter(|&(i, _)| role_of(i) == Role::Void)
        .map(|(_, c)| c.clone())
        .collect();

    contours
        .iter()
        .enumerate()
        .filter(|&(i, _)| role_of(i) != Role::Void)
        .flat_map(|(source, contour)| {
            let role = role_of(source);
            let shapes = if voids.is_empty() {
                let cleaned = contour.cleaned();
                if cleaned.len() < 3 {
                    Vec::new()
                } else {
                    vec![Shape::new(cleaned, Vec::new())]
                }
            } else {
                SubtractAll::new(contour, &voids).execute()
            };
            if shapes.len() > 1 {
                debug!(source, fragments = shapes.len(), "solid split by voids");
            }
            shapes
                .into_iter()
                .map(move |shape| Fragment { shape, source, role })
        })
        .collect()
}

/// Flattens fragments into independent rings; holes become plain rings.
#[must_use]
pub fn flatten_fragments(fragments: Vec<Fragment>) -> Vec<FragmentRing> {
    let mut rings: Vec<FragmentRing> = Vec::new();
    for fragment in fragments {
        let (source, role) = (fragment.source, fragment.role);
        for contour in fragment.shape.into_rings() {
            let ordinal = rings.iter().filter(|r| r.source == source).count();
            rings.push(FragmentRing {
                contour,
                source,
                role,
                ordinal,
                siblings: 0,
            });
        }
    }
    let counts: Vec<usize> = rings
        .iter()
        .map(|r| rings.iter().filter(|o| o.source == r.source).count())
        .collect();
    for (ring, count) in rings.iter_mut().zip(counts) {
        ring.siblings = count;
    }
    rings
}
