pub mod error;
pub mod export;
pub mod generate;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod tessellation;
pub mod trace;

pub use error::{CutterError, Result};
pub use export::{export_stl, write_stl};
pub use generate::{CutterPart, CutterSettings, GenerateGeometry};
pub use geometry::{Contour, ContourSet, Role};
pub use trace::{TraceImage, TraceOptions, TraceResult};
