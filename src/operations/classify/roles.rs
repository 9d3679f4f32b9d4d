use serde::{Deserialize, Serialize};

use crate::geometry::{Contour, Role};
use crate::math::Space;

/// Meshing role of a contour after explicit and automatic roles are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedRole {
    /// Cutting boundary.
    Outer,
    /// Detail marker wall.
    Inner,
    /// Flat base.
    Base,
    /// Region removed from every solid.
    Void,
}

/// Resolves a role for every contour.
///
/// Explicit roles always win. Among `Auto` contours, the contour with the
/// most vertices overall becomes [`ResolvedRole::Outer`] (the first on
/// ties) and all others [`ResolvedRole::Inner`]. Missing roles count as
/// `Auto`.
#[must_use]
pub fn resolve_roles<S: Space>(contours: &[Contour<S>], roles: &[Role]) -> Vec<ResolvedRole> {
    let outer = contours
        .iter()
        .enumerate()
        .fold(None::<(usize, usize)>, |best, (i, c)| match best {
            Some((_, n)) if n >= c.len() => best,
            _ => Some((i, c.len())),
        })
        .map(|(i, _)| i);

    (0..contours.len())
        .map(|i| match roles.get(i).copied().unwrap_or_default() {
            Role::Cut => ResolvedRole::Outer,
            Role::Stamp => ResolvedRole::Inner,
            Role::Base => ResolvedRole::Base,
            Role::Void => ResolvedRole::Void,
            Role::Auto if Some(i) == outer => ResolvedRole::Outer,
            Role::Auto => ResolvedRole::Inner,
        })
        .collect()
}
