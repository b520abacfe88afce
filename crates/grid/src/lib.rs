//! Chunked cell storage for a falling-sand simulation.
//!
//! The [Grid] maps world cell coordinates to fixed-size [Chunk]s held in a flat arena, grows that arena outward from
//! the origin as content spreads, and keeps a per-chunk summary of which rows and columns hold active cells so that a
//! simulation tick can skip everything at rest.
mod activity;
mod chunk;
mod config;
mod destination;
mod errors;
mod grid;
mod stats;

#[cfg(test)]
mod reference_grid;
#[cfg(test)]
mod tests;

pub use activity::*;
pub use chunk::*;
pub use config::*;
pub use destination::*;
pub use errors::*;
pub use grid::*;
pub use stats::*;
