//! Integer geometry for the chunked cell grid: points, rectangles, and the power-of-two math used to quantize
//! rectangles.
pub mod errors;
pub mod pow2;
mod rect;
mod v2;

pub use errors::*;
pub use pow2::*;
pub use rect::*;
pub use v2::*;
