use sand_geometry::{Rect, V2};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GridError {
    #[error("Local coordinate ({x}, {y}) is outside of the chunk")]
    OutOfRange { x: usize, y: usize },

    #[error("Chunk {chunk} is outside of the covered chunk rectangle {covered}; grow the grid first")]
    OutOfBounds { chunk: V2<i32>, covered: Rect<i32> },

    #[error("Covering the request needs a half size of {requested} chunks, but the grid may not exceed {max}")]
    Overflow { requested: i64, max: i32 },

    #[error("Expected {expected} cells but got {got}")]
    InvalidCellCount { expected: usize, got: usize },

    #[error("Invalid grid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unable to parse grid configuration: {}", _0)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = GridError> = std::result::Result<T, E>;
