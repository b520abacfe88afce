use sand_geometry::Rect;

/// A snapshot of how big a grid is, for logging and for deciding whether to reset the world.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
#[display(
    fmt = "covered={} allocated_chunks={} active_chunks={} memory={}B",
    chunk_rect,
    allocated_chunks,
    active_chunks,
    memory_bytes
)]
pub struct GridStats {
    /// The covered rectangle, in chunks.
    pub chunk_rect: Rect<i32>,
    pub allocated_chunks: usize,
    pub active_chunks: usize,
    /// Approximate: the arena plus allocated chunks.
    pub memory_bytes: usize,
}
