//! Knows how to go from world cell coordinates to a chunk coordinate and an offset in that chunk.
use sand_geometry::{Rect, V2};

use crate::chunk::CHUNK_SIZE;

/// The coordinate of a chunk, in chunk units.  Chunk `(cx, cy)` holds cells `cx * CHUNK_SIZE ..` on each axis.
pub type ChunkCoord = V2<i32>;

const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

#[derive(Copy, Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct CellDestination {
    /// The chunk. Should be first, so that sorting destinations will sort by the chunk that they're for.
    pub chunk: ChunkCoord,
    /// Offset in the chunk, always within `[0, CHUNK_SIZE)`.
    pub local: V2<usize>,
}

impl CellDestination {
    /// Split a world coordinate.  Uses floor division so that cells left of or above the origin land in chunk `-1`
    /// with a positive offset, i.e. chunks always have the same orientation.
    pub fn from_world(world: V2<i32>) -> CellDestination {
        CellDestination {
            chunk: world.floor_div(CHUNK_SIZE_I32),
            local: world.floor_rem(CHUNK_SIZE_I32).map(|c| c as usize),
        }
    }

    pub fn world(&self) -> V2<i32> {
        chunk_origin(self.chunk) + self.local.map(|c| c as i32)
    }
}

/// The world coordinate of a chunk's first cell.
pub fn chunk_origin(chunk: ChunkCoord) -> V2<i32> {
    chunk.scale(CHUNK_SIZE_I32)
}

/// The chunks a chunk rectangle spans, in cell units.
pub fn chunk_rect_to_cells(chunks: &Rect<i32>) -> Rect<i32> {
    chunks.scale(CHUNK_SIZE_I32)
}

/// The smallest chunk rectangle holding every cell of `cells`.  Empty rectangles map to an empty rectangle.
pub fn chunks_covering(cells: &Rect<i32>) -> Rect<i32> {
    let p1 = cells.position().floor_div(CHUNK_SIZE_I32);
    if cells.is_empty() {
        return Rect::from_ranges(p1.x..p1.x, p1.y..p1.y);
    }

    // Go through i64 so that rectangles touching i32::MAX don't overflow on the way.
    let last = V2::new(
        cells.position().x as i64 + cells.width() as i64 - 1,
        cells.position().y as i64 + cells.height() as i64 - 1,
    )
    .floor_div(CHUNK_SIZE as i64);
    Rect::from_ranges(p1.x..last.x as i32 + 1, p1.y..last.y as i32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(cx: i32, cy: i32, x: usize, y: usize) -> CellDestination {
        CellDestination {
            chunk: V2::new(cx, cy),
            local: V2 { x, y },
        }
    }

    #[test]
    fn test_destination_simple() {
        assert_eq!(CellDestination::from_world(V2::new(0, 0)), dest(0, 0, 0, 0));
        assert_eq!(CellDestination::from_world(V2::new(0, 1)), dest(0, 0, 0, 1));
        assert_eq!(CellDestination::from_world(V2::new(5, 5)), dest(0, 0, 5, 5));
        assert_eq!(CellDestination::from_world(V2::new(33, 0)), dest(1, 0, 1, 0));
        assert_eq!(
            CellDestination::from_world(V2::new(1030, 65)),
            dest(32, 2, 6, 1)
        );
    }

    #[test]
    fn test_destination_negative() {
        assert_eq!(CellDestination::from_world(V2::new(-7, 0)), dest(-1, 0, 25, 0));
        assert_eq!(
            CellDestination::from_world(V2::new(-7, -33)),
            dest(-1, -2, 25, 31)
        );
        assert_eq!(CellDestination::from_world(V2::new(-32, -1)), dest(-1, -1, 0, 31));
        assert_eq!(
            CellDestination::from_world(V2::new(i32::MIN, i32::MAX)).world(),
            V2::new(i32::MIN, i32::MAX)
        );
    }

    #[test]
    fn test_chunks_covering() {
        assert_eq!(
            chunks_covering(&Rect::from_ranges(0..1, 0..1)),
            Rect::from_ranges(0..1, 0..1)
        );
        assert_eq!(
            chunks_covering(&Rect::from_ranges(-1..32, 31..33)),
            Rect::from_ranges(-1..1, 0..2)
        );
        assert!(chunks_covering(&Rect::from_ranges(5..5, 0..10)).is_empty());
        assert_eq!(
            chunks_covering(&Rect::from_ranges(i32::MAX - 3..i32::MAX, 0..1)),
            Rect::from_ranges(i32::MAX / 32..i32::MAX / 32 + 1, 0..1)
        );
        assert_eq!(
            chunk_rect_to_cells(&Rect::from_ranges(-1..1, -2..2)),
            Rect::from_ranges(-32..32, -64..64)
        );
    }
}
