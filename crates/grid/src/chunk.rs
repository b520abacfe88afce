//! A chunk, a fixed square block of the larger grid, plus a summary of where its active cells are.
//!
//! The summary is two bitfields: bit `r` of `active_rows` is set iff row `r` holds an active cell, and likewise for
//! `active_columns`.  A tick can then skip inactive rows outright and, within active rows, look only at active
//! columns.  The bitfields are derived from the cells and every mutation path here recomputes them; nothing is
//! counted incrementally.
use sand_geometry::{Rect, V2};

use crate::activity::ActivePredicate;
use crate::errors::*;

/// An opaque cell value.  Meaning is up to the rule engine.
pub type Cell = u32;

/// The value of cells nobody wrote to.
pub const EMPTY_CELL: Cell = 0;

/// Side length of a chunk.  Each row and column maps to one bit of a `u32`, so this can't exceed 32.
pub const CHUNK_SIZE: usize = 32;
pub const CHUNK_AREA: usize = CHUNK_SIZE * CHUNK_SIZE;

const _: () = assert!(CHUNK_SIZE <= u32::BITS as usize && CHUNK_SIZE.is_power_of_two());

// Don't derive debug because nothing good can ever come from printing a thousand cells.
#[derive(Clone)]
pub struct Chunk {
    /// Row-major: `y * CHUNK_SIZE + x`.
    cells: [Cell; CHUNK_AREA],
    active_rows: u32,
    active_columns: u32,
}

/// Iterate over the indices of the set bits, lowest first.
fn iter_bits(mut bits: u32) -> impl Iterator<Item = usize> {
    std::iter::from_fn(move || {
        if bits == 0 {
            return None;
        }
        let bit = bits.trailing_zeros() as usize;
        bits &= bits - 1;
        Some(bit)
    })
}

fn assign_bit(field: &mut u32, bit: usize, on: bool) {
    if on {
        *field |= 1 << bit;
    } else {
        *field &= !(1 << bit);
    }
}

fn check_local(x: usize, y: usize) -> Result<usize> {
    if x >= CHUNK_SIZE || y >= CHUNK_SIZE {
        return Err(GridError::OutOfRange { x, y });
    }
    Ok(y * CHUNK_SIZE + x)
}

impl Default for Chunk {
    fn default() -> Self {
        Chunk::new()
    }
}

impl Chunk {
    /// A chunk of empty cells.  Empty cells are never active, so both bitfields start at zero.
    pub fn new() -> Chunk {
        Chunk {
            cells: [EMPTY_CELL; CHUNK_AREA],
            active_rows: 0,
            active_columns: 0,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Cell> {
        Ok(self.cells[check_local(x, y)?])
    }

    /// Read without a bounds error, for callers which derived `local` from a floor division.
    pub(crate) fn read(&self, local: V2<usize>) -> Cell {
        debug_assert!(local.x < CHUNK_SIZE);
        debug_assert!(local.y < CHUNK_SIZE);
        self.cells[local.y * CHUNK_SIZE + local.x]
    }

    /// Write to the cell, returning the old value.
    ///
    /// Afterwards the touched row and column are rescanned, so their bits are exact whether this write activated
    /// or settled something.
    pub fn set(
        &mut self,
        x: usize,
        y: usize,
        value: Cell,
        predicate: &impl ActivePredicate,
    ) -> Result<Cell> {
        let ind = check_local(x, y)?;
        let old = std::mem::replace(&mut self.cells[ind], value);

        let row_active = self.row_has_active(y, predicate);
        let column_active = self.column_has_active(x, predicate);
        assign_bit(&mut self.active_rows, y, row_active);
        assign_bit(&mut self.active_columns, x, column_active);
        Ok(old)
    }

    fn row_has_active(&self, y: usize, predicate: &impl ActivePredicate) -> bool {
        self.cells[y * CHUNK_SIZE..(y + 1) * CHUNK_SIZE]
            .iter()
            .any(|c| predicate.is_active(*c))
    }

    fn column_has_active(&self, x: usize, predicate: &impl ActivePredicate) -> bool {
        self.cells
            .iter()
            .skip(x)
            .step_by(CHUNK_SIZE)
            .any(|c| predicate.is_active(*c))
    }

    /// True if no cell of this chunk is active.  The chunk may still hold settled cells.
    pub fn is_empty(&self) -> bool {
        self.active_rows == 0
    }

    pub fn active_rows(&self) -> u32 {
        self.active_rows
    }

    pub fn active_columns(&self) -> u32 {
        self.active_columns
    }

    pub fn is_row_active(&self, y: usize) -> bool {
        y < CHUNK_SIZE && self.active_rows & (1 << y) != 0
    }

    pub fn is_column_active(&self, x: usize) -> bool {
        x < CHUNK_SIZE && self.active_columns & (1 << x) != 0
    }

    /// The smallest local rectangle holding every active row and column, or an empty rectangle at the origin.
    pub fn active_rect(&self) -> Rect<i32> {
        if self.is_empty() {
            return Rect::default();
        }

        let rows = self.active_rows;
        let cols = self.active_columns;
        let bits = u32::BITS as i32;
        Rect::from_ranges(
            cols.trailing_zeros() as i32..bits - cols.leading_zeros() as i32,
            rows.trailing_zeros() as i32..bits - rows.leading_zeros() as i32,
        )
    }

    /// Rebuild both bitfields from the cells.
    pub fn recompute_activity(&mut self, predicate: &impl ActivePredicate) {
        let mut rows = 0;
        let mut columns = 0;
        for (ind, cell) in self.cells.iter().enumerate() {
            if predicate.is_active(*cell) {
                rows |= 1 << (ind / CHUNK_SIZE);
                columns |= 1 << (ind % CHUNK_SIZE);
            }
        }
        self.active_rows = rows;
        self.active_columns = columns;
    }

    /// Replace every cell from a row-major slice of exactly [CHUNK_AREA] cells.
    pub fn load(&mut self, cells: &[Cell], predicate: &impl ActivePredicate) -> Result<()> {
        if cells.len() != CHUNK_AREA {
            return Err(GridError::InvalidCellCount {
                expected: CHUNK_AREA,
                got: cells.len(),
            });
        }

        self.cells.copy_from_slice(cells);
        self.recompute_activity(predicate);
        Ok(())
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: Cell, predicate: &impl ActivePredicate) {
        self.cells.fill(value);
        let bits = if predicate.is_active(value) {
            u32::MAX >> (u32::BITS as usize - CHUNK_SIZE)
        } else {
            0
        };
        self.active_rows = bits;
        self.active_columns = bits;
    }

    /// Set every cell of a local rectangle to `value`.  The rectangle must lie within the chunk.
    pub fn fill_local_rect(
        &mut self,
        rect: Rect<i32>,
        value: Cell,
        predicate: &impl ActivePredicate,
    ) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }

        let p1 = rect.position();
        let p2 = rect.end();
        if p1.x < 0 || p1.y < 0 {
            return Err(GridError::OutOfRange {
                x: p1.x.max(0) as usize,
                y: p1.y.max(0) as usize,
            });
        }
        check_local(p2.x as usize - 1, p2.y as usize - 1)?;

        for y in p1.y as usize..p2.y as usize {
            let row = y * CHUNK_SIZE;
            self.cells[row + p1.x as usize..row + p2.x as usize].fill(value);
        }
        self.recompute_activity(predicate);
        Ok(())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Raw access for bulk mutation.  The caller must call [Chunk::recompute_activity] afterwards.
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Local coordinates of the active cells, by rows.
    ///
    /// Only active rows are visited, and within them only active columns, so this is cheap for chunks that are
    /// mostly at rest.
    pub fn iter_active_cells<'a, P: ActivePredicate>(
        &'a self,
        predicate: &'a P,
    ) -> impl Iterator<Item = V2<usize>> + 'a {
        let columns = self.active_columns;
        iter_bits(self.active_rows)
            .flat_map(move |y| iter_bits(columns).map(move |x| V2 { x, y }))
            .filter(move |p| predicate.is_active(self.read(*p)))
    }

    /// Bytes this chunk occupies.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Chunk>()
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("active_rows", &format_args!("{:#034b}", self.active_rows))
            .field("active_columns", &format_args!("{:#034b}", self.active_columns))
            .finish_non_exhaustive()
    }
}
