use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{OperationError, Result};
use crate::math::Point2;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates the region bounded by closed rings with the even-odd rule.
///
/// The first ring is normally the outline and the rest its holes, but any
/// nesting works: a face is inside when an odd number of ring edges
/// separate it from the unbounded face.
///
/// Returned indices address the rings concatenated in order. Every
/// triangle is counter-clockwise. Ring edges that would cross an already
/// inserted edge are skipped, so self-intersecting input degrades instead
/// of failing.
///
/// # Errors
///
/// Returns [`OperationError::InvalidInput`] if a ring has fewer than 3
/// points, or [`OperationError::Failed`] if a point cannot be inserted
/// (e.g. NaN coordinates).
pub fn triangulate_rings(rings: &[&[Point2]]) -> Result<Vec<[usize; 3]>> {
    let mut cdt = Cdt::new();
    // spade vertex index -> first ring vertex inserted at that position
    let mut vertex_map: HashMap<usize, usize> = HashMap::new();
    let mut base = 0;

    for ring in rings {
        insert_constraint_loop(&mut cdt, ring, base, &mut vertex_map)?;
        base += ring.len();
    }

    let interior = classify_interior_faces(&cdt);

    let triangles = cdt
        .inner_faces()
        .filter(|f| interior.contains(&f.fix().index()))
        .filter_map(|f| {
            let [a, b, c] = f.vertices().map(|v| vertex_map.get(&v.fix().index()).copied());
            Some([a?, b?, c?])
        })
        .collect();

    Ok(triangles)
}

fn insert_constraint_loop(
    cdt: &mut Cdt,
    points: &[Point2],
    base: usize,
    vertex_map: &mut HashMap<usize, usize>,
) -> Result<()> {
    if points.len() < 3 {
        return Err(OperationError::InvalidInput("constraint loop needs at least 3 points".into()).into());
    }

    let mut handles = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let h = cdt
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| OperationError::Failed(format!("CDT insert: {e}")))?;
        vertex_map.entry(h.index()).or_insert(base + i);
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from != to && cdt.can_add_constraint(from, to) {
            cdt.add_constraint(from, to);
        }
    }

    Ok(())
}

/// Classifies which inner faces of the CDT are inside the rings using a
/// flood fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each
/// time a constraint edge is crossed, depth increments. Odd depth = interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            if depth % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        for edge in cdt.face(face_fix).adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let new_depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(n_idx, new_depth);
            if new_depth % 2 == 1 {
                interior.insert(n_idx);
            }
            queue.push_back((neighbor.fix(), new_depth));
        }
    }

    interior
}
