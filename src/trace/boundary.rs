use std::collections::HashSet;

use tracing::debug;

use crate::geometry::Contour;
use crate::math::{Pixel, Point2};

use super::threshold::InkMask;

/// Traced boundaries with fewer points are dropped as noise.
pub const MIN_BOUNDARY_POINTS: usize = 10;

/// Moore neighbourhood, clockwise on screen (y grows downward), from east.
const DIRECTIONS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn direction_of(dx: i64, dy: i64) -> Option<usize> {
    DIRECTIONS.iter().position(|&d| d == (dx, dy))
}

/// Extracts the boundary of every ink region by Moore-neighbour tracing.
///
/// The grid is scanned row-major. Each unvisited ink pixel with a
/// background 8-neighbour starts a trace that walks the boundary clockwise
/// until it returns to the start pixel, repeats a walk state, or hits
/// `2 * width * height` steps. A trace whose pixels were mostly visited
/// already re-walks a known outline and is dropped, as are traces shorter
/// than [`MIN_BOUNDARY_POINTS`].
#[must_use]
pub fn trace_boundaries(mask: &InkMask) -> Vec<Contour<Pixel>> {
    let (w, h) = (i64::from(mask.width()), i64::from(mask.height()));
    let mut visited = vec![false; mask.width() as usize * mask.height() as usize];
    let mut contours = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let Some(idx) = mask.index(x, y) else {
                continue;
            };
            if visited[idx] || !mask.get(x, y) {
                continue;
            }
            let Some(back) = DIRECTIONS
                .iter()
                .position(|(dx, dy)| !mask.get(x + dx, y + dy))
            else {
                continue;
            };

            let path = follow(mask, (x, y), back);
            let seen = path
                .iter()
                .filter(|&&(px, py)| mask.index(px, py).is_some_and(|i| visited[i]))
                .count();
            for &(px, py) in &path {
                if let Some(i) = mask.index(px, py) {
                    visited[i] = true;
                }
            }
            visited[idx] = true;

            if seen * 2 > path.len() {
                debug!(x, y, points = path.len(), "dropping repeated boundary");
                continue;
            }
            if path.len() < MIN_BOUNDARY_POINTS {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            contours.push(Contour::new(
                path.into_iter()
                    .map(|(px, py)| Point2::new(px as f64, py as f64))
                    .collect(),
            ));
        }
    }

    contours
}

/// Walks one boundary from `start`, whose background neighbour lies in
/// direction `back`.
fn follow(mask: &InkMask, start: (i64, i64), back: usize) -> Vec<(i64, i64)> {
    let cap = 2 * usize::try_from(i64::from(mask.width()) * i64::from(mask.height())).unwrap_or(0);
    let mut path = vec![start];
    let mut states = HashSet::new();
    let (mut p, mut back) = (start, back);

    for _ in 0..cap {
        if !states.insert((p, back)) {
            break;
        }
        // Sweep clockwise from the backtrack pixel to the next ink pixel.
        let Some((next, prev)) = (1..8).find_map(|k| {
            let d = (back + k) % 8;
            let q = (p.0 + DIRECTIONS[d].0, p.1 + DIRECTIONS[d].1);
            mask.get(q.0, q.1).then_some((q, (back + k - 1) % 8))
        }) else {
            // Isolated pixel.
            break;
        };
        let b = (p.0 + DIRECTIONS[prev].0, p.1 + DIRECTIONS[prev].1);
        let Some(new_back) = direction_of(b.0 - next.0, b.1 - next.1) else {
            break;
        };
        if next == start {
            break;
        }
        path.push(next);
        p = next;
        back = new_back;
    }

    path
}
