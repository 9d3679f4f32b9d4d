pub mod contour;
pub mod curve;

pub use contour::{realign_node_types, realign_roles, Contour, ContourSet, NodeType, Role, Shape};
