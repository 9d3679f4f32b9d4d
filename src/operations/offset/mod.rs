mod miter_offset;

pub use miter_offset::{offset, MiterOffset, MITER_CLAMP};
