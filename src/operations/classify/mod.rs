mod roles;
mod tree;

pub use roles::{resolve_roles, ResolvedRole};
pub use tree::{ContourNode, ContourTree, NodeId};
