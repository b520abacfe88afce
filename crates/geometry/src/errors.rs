#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RectError {
    #[error("Attempted to create a rectangle which would have a negative width or height")]
    InvalidDims,
}

pub type Result<T, E = RectError> = std::result::Result<T, E>;
