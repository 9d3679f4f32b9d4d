use thiserror::Error;

/// Top-level error type for the cutterkit geometry kernel.
#[derive(Debug, Error)]
pub enum CutterError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("ring mismatch: expected {expected} points, got {actual}")]
    RingMismatch { expected: usize, actual: usize },

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to polygon and mesh operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors raised while turning an image into contours.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("image has no pixels")]
    EmptyImage,

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("trace worker is not running")]
    WorkerUnavailable,

    #[error("trace worker failed: {0}")]
    Worker(String),
}

/// Errors raised while serializing meshes.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("mesh has {0} triangles, more than a binary STL can count")]
    TooManyTriangles(usize),
}

/// Convenience type alias for results using [`CutterError`].
pub type Result<T> = std::result::Result<T, CutterError>;
