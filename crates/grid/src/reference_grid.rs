//! A [ReferenceGrid] is a grid backed by a hashmap, for testing purposes.
//!
//! It has no redeeming features, save for being obviously correct.  The fuzz tests drive it and the real [Grid] with
//! the same writes and compare.  This grid is `O(n)` memory on number of non-empty cells and computes activity by
//! brute force.
use std::collections::{BTreeSet, HashMap};

use sand_geometry::V2;

use crate::*;

#[derive(Default)]
pub(crate) struct ReferenceGrid {
    cells: HashMap<V2<i32>, Cell>,
}

impl ReferenceGrid {
    pub(crate) fn new() -> ReferenceGrid {
        Default::default()
    }

    pub(crate) fn get(&self, coordinate: V2<i32>) -> Cell {
        self.cells.get(&coordinate).copied().unwrap_or(EMPTY_CELL)
    }

    /// Set a cell, returning the old value.
    pub(crate) fn set(&mut self, coordinate: V2<i32>, cell: Cell) -> Cell {
        let old = if cell == EMPTY_CELL {
            self.cells.remove(&coordinate)
        } else {
            self.cells.insert(coordinate, cell)
        };
        old.unwrap_or(EMPTY_CELL)
    }

    /// Chunks which hold at least one active cell.
    pub(crate) fn active_chunks(&self, predicate: &impl ActivePredicate) -> BTreeSet<ChunkCoord> {
        self.cells
            .iter()
            .filter(|(_, c)| predicate.is_active(**c))
            .map(|(p, _)| CellDestination::from_world(*p).chunk)
            .collect()
    }

    /// The `(active_rows, active_columns)` bitfields a chunk should have.
    pub(crate) fn expected_bits(&self, chunk: ChunkCoord, predicate: &impl ActivePredicate) -> (u32, u32) {
        let mut rows = 0;
        let mut columns = 0;
        for (p, c) in self.cells.iter() {
            let dest = CellDestination::from_world(*p);
            if dest.chunk == chunk && predicate.is_active(*c) {
                rows |= 1 << dest.local.y;
                columns |= 1 << dest.local.x;
            }
        }
        (rows, columns)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (V2<i32>, Cell)> + '_ {
        self.cells.iter().map(|(p, c)| (*p, *c))
    }
}
