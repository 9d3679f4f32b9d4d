pub mod boolean;
pub mod classify;
pub mod offset;
pub mod simplify;
