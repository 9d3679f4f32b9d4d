mod engine;
mod intersect_op;
mod subtract;
mod union;

pub use engine::BooleanOp;
pub use intersect_op::Intersect;
pub use subtract::{Subtract, SubtractAll};
pub use union::{Union, UnionAll};
