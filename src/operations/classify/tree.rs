use slotmap::SlotMap;

use crate::geometry::Contour;
use crate::math::Space;

slotmap::new_key_type! {
    /// Unique identifier for a node in a [`ContourTree`].
    pub struct NodeId;
}

/// One contour's place in the nesting hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourNode {
    /// Index of the contour in the slice the tree was built from.
    pub index: usize,
    /// Absolute area of the contour.
    pub area: f64,
    /// Nearest enclosing contour, `None` for roots.
    pub parent: Option<NodeId>,
    /// Contours whose nearest enclosing contour is this one.
    pub children: Vec<NodeId>,
    /// Nesting depth; roots are at 0.
    pub depth: usize,
}

/// Containment hierarchy of a set of contours.
///
/// Contours are visited by descending absolute area. Each one takes as
/// parent the smallest already-visited contour that contains its first
/// vertex. Only that single representative point is tested, so heavily
/// overlapping input can be misclassified.
///
/// Nodes live in an arena and refer to each other by [`NodeId`].
#[derive(Debug, Default)]
pub struct ContourTree {
    nodes: SlotMap<NodeId, ContourNode>,
    by_index: Vec<Option<NodeId>>,
    roots: Vec<NodeId>,
}

impl ContourTree {
    /// Builds the hierarchy over every contour.
    #[must_use]
    pub fn build<S: Space>(contours: &[Contour<S>]) -> Self {
        Self::build_with(contours, |_| true)
    }

    /// Builds the hierarchy over the contours selected by `include`.
    ///
    /// Excluded contours get no node and cannot act as parents.
    #[must_use]
    pub fn build_with<S: Space>(contours: &[Contour<S>], include: impl Fn(usize) -> bool) -> Self {
        let mut order: Vec<(usize, f64)> = contours
            .iter()
            .enumerate()
            .filter(|(i, _)| include(*i))
            .map(|(i, c)| (i, c.area()))
            .collect();
        // Stable sort keeps input order between equal areas.
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut tree = Self {
            nodes: SlotMap::with_key(),
            by_index: vec![None; contours.len()],
            roots: Vec::new(),
        };
        let mut visited: Vec<NodeId> = Vec::with_capacity(order.len());

        for (index, area) in order {
            let parent = contours[index].points.first().and_then(|probe| {
                visited
                    .iter()
                    .copied()
                    .filter(|&id| contours[tree.nodes[id].index].contains(probe))
                    .min_by(|&a, &b| tree.nodes[a].area.total_cmp(&tree.nodes[b].area))
            });
            let depth = parent.map_or(0, |p| tree.nodes[p].depth + 1);

            let id = tree.nodes.insert(ContourNode {
                index,
                area,
                parent,
                children: Vec::new(),
                depth,
            });
            match parent {
                Some(p) => tree.nodes[p].children.push(id),
                None => tree.roots.push(id),
            }
            tree.by_index[index] = Some(id);
            visited.push(id);
        }

        tree
    }

    /// Returns the node built for contour `index`.
    #[must_use]
    pub fn node_of(&self, index: usize) -> Option<&ContourNode> {
        self.by_index
            .get(index)
            .copied()
            .flatten()
            .and_then(|id| self.nodes.get(id))
    }

    /// Contour index of the nearest enclosing contour.
    #[must_use]
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        let parent = self.node_of(index)?.parent?;
        self.nodes.get(parent).map(|n| n.index)
    }

    /// Nesting depth of contour `index`.
    #[must_use]
    pub fn depth_of(&self, index: usize) -> Option<usize> {
        self.node_of(index).map(|n| n.depth)
    }

    /// Contour indices of the immediate children of contour `index`.
    #[must_use]
    pub fn children_of(&self, index: usize) -> Vec<usize> {
        self.node_of(index)
            .map(|n| self.indices(&n.children))
            .unwrap_or_default()
    }

    /// Contour indices at `depth`, in input order.
    #[must_use]
    pub fn nodes_at_depth(&self, depth: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .nodes
            .values()
            .filter(|n| n.depth == depth)
            .map(|n| n.index)
            .collect();
        out.sort_unstable();
        out
    }

    /// Contour indices of the roots, largest first.
    #[must_use]
    pub fn roots(&self) -> Vec<usize> {
        self.indices(&self.roots)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn indices(&self, ids: &[NodeId]) -> Vec<usize> {
        ids.iter()
            .filter_map(|&id| self.nodes.get(id).map(|n| n.index))
            .collect()
    }
}
