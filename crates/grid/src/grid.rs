//! A growable grid of cells.
//!
//! Chunks live in a flat arena with one slot per chunk coordinate of the covered rectangle, row-major.  The covered
//! rectangle is always centered on the origin with a power-of-two half extent per axis, so growing it is rare and the
//! coordinate-to-slot mapping is a single affine transform.  Growth builds a new arena and moves every allocated chunk
//! to the slot its coordinate maps to under the new rectangle; slots are never copied across positionally.
use std::collections::BTreeSet;

use log::*;
use sand_geometry::{signed_next_power_of_two, Rect, V2};

use crate::activity::{ActivePredicate, NonEmpty};
use crate::chunk::*;
use crate::config::*;
use crate::destination::*;
use crate::errors::*;
use crate::stats::GridStats;

// Don't derive debug because nothing good can ever come from printing gigabytes of text in the common case.
pub struct Grid<P = NonEmpty> {
    /// Covered rectangle, in chunks.
    chunk_rect: Rect<i32>,
    /// What [Grid::clear] goes back to.
    initial_rect: Rect<i32>,
    /// One slot per chunk of `chunk_rect`.  `None` is a chunk nobody wrote to.
    chunks: Vec<Option<Box<Chunk>>>,
    /// Chunks with at least one active cell.  Ordered, so ticks visit chunks deterministically.
    active_chunks: BTreeSet<ChunkCoord>,
    predicate: P,
    max_half_size: i32,
}

fn empty_arena(rect: &Rect<i32>) -> Vec<Option<Box<Chunk>>> {
    let slots = rect.width() as usize * rect.height() as usize;
    let mut arena = Vec::with_capacity(slots);
    arena.resize_with(slots, || None);
    arena
}

/// Slot of `chunk` in an arena laid out for `rect`, without checking that `rect` contains it.
fn linear_index(rect: &Rect<i32>, chunk: ChunkCoord) -> usize {
    let offset = chunk - rect.position();
    offset.y as usize * rect.width() as usize + offset.x as usize
}

fn index_in(rect: &Rect<i32>, chunk: ChunkCoord) -> Result<usize> {
    if !rect.contains_point(chunk) {
        return Err(GridError::OutOfBounds {
            chunk,
            covered: *rect,
        });
    }
    Ok(linear_index(rect, chunk))
}

/// Whether `outer` contains all of `inner`, which may end past `i32::MAX`.
fn covers(outer: &Rect<i32>, inner: &Rect<i32>) -> bool {
    let start = |r: &Rect<i32>| (r.position().x as i64, r.position().y as i64);
    let end = |r: &Rect<i32>| {
        let (x, y) = start(r);
        (x + r.width() as i64, y + r.height() as i64)
    };
    let (outer_start, outer_end) = (start(outer), end(outer));
    let (inner_start, inner_end) = (start(inner), end(inner));
    inner_start.0 >= outer_start.0
        && inner_start.1 >= outer_start.1
        && inner_end.0 <= outer_end.0
        && inner_end.1 <= outer_end.1
}

fn coord_in(rect: &Rect<i32>, index: usize) -> ChunkCoord {
    let width = rect.width() as usize;
    rect.position() + V2::new((index % width) as i32, (index / width) as i32)
}

/// Round one axis outward.  `lo..hi` must straddle the origin, which it does because the covered rectangle always
/// does and the request was merged into it.
fn quantize_half_extent(lo: i64, hi: i64, max_half_size: i32) -> Result<i32> {
    debug_assert!(lo < 0 && hi > 0);
    let requested = (-lo).max(hi);
    if requested > max_half_size as i64 {
        return Err(GridError::Overflow {
            requested,
            max: max_half_size,
        });
    }

    // Both fit comfortably now, and since the limit is a power of two rounding can't take them past it.
    let lo = signed_next_power_of_two(lo as i32);
    let hi = signed_next_power_of_two(hi as i32);
    Ok((-lo).max(hi))
}

fn sync_active(active_chunks: &mut BTreeSet<ChunkCoord>, coord: ChunkCoord, chunk: &Chunk) {
    if chunk.is_empty() {
        active_chunks.remove(&coord);
    } else {
        active_chunks.insert(coord);
    }
}

impl Grid<NonEmpty> {
    /// A grid covering `half_size` chunks in every direction from the origin, where every non-empty cell is active.
    ///
    /// `half_size` is clamped to `1..=DEFAULT_MAX_HALF_SIZE` and rounded up to a power of two.
    pub fn new(half_size: i32) -> Grid {
        Grid::with_predicate(half_size, NonEmpty)
    }
}

impl Default for Grid<NonEmpty> {
    fn default() -> Self {
        Grid::new(DEFAULT_INITIAL_HALF_SIZE)
    }
}

impl<P: ActivePredicate> Grid<P> {
    pub fn with_predicate(half_size: i32, predicate: P) -> Grid<P> {
        let half = signed_next_power_of_two(half_size.clamp(1, DEFAULT_MAX_HALF_SIZE));
        Grid::build(half, DEFAULT_MAX_HALF_SIZE, predicate)
    }

    pub fn from_config(config: &GridConfig, predicate: P) -> Result<Grid<P>> {
        config.validate()?;
        let half = signed_next_power_of_two(config.initial_half_size.max(1));
        Ok(Grid::build(half, config.max_half_size, predicate))
    }

    fn build(half: i32, max_half_size: i32, predicate: P) -> Grid<P> {
        let chunk_rect = Rect::centered(V2::splat(half));
        debug!("Creating grid covering chunks {}", chunk_rect);
        Grid {
            chunk_rect,
            initial_rect: chunk_rect,
            chunks: empty_arena(&chunk_rect),
            active_chunks: BTreeSet::new(),
            predicate,
            max_half_size,
        }
    }

    /// The covered rectangle, in cells.
    pub fn rect(&self) -> Rect<i32> {
        chunk_rect_to_cells(&self.chunk_rect)
    }

    /// The covered rectangle, in chunks.
    pub fn chunk_rect(&self) -> Rect<i32> {
        self.chunk_rect
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    /// The chunk holding a world cell.
    pub fn chunk_coord_of(&self, world: V2<i32>) -> ChunkCoord {
        CellDestination::from_world(world).chunk
    }

    /// The arena slot of a chunk.  Fails for chunks outside of the covered rectangle: grow first.
    pub fn index_of(&self, chunk: ChunkCoord) -> Result<usize> {
        index_in(&self.chunk_rect, chunk)
    }

    /// Get a chunk, if it was ever written to.
    pub fn chunk(&self, chunk: ChunkCoord) -> Option<&Chunk> {
        let index = self.index_of(chunk).ok()?;
        self.chunks[index].as_deref()
    }

    /// Read a cell of the grid.  Returns [EMPTY_CELL] for cells which don't contain data, including cells outside
    /// of the covered rectangle: reading never grows the grid.
    pub fn get_cell(&self, world: V2<i32>) -> Cell {
        let dest = CellDestination::from_world(world);
        self.chunk(dest.chunk)
            .map(|c| c.read(dest.local))
            .unwrap_or(EMPTY_CELL)
    }

    /// Write a cell of the grid, returning the old value.
    ///
    /// Grows the grid if the cell is outside of the covered rectangle and allocates its chunk on first write.  Writing
    /// [EMPTY_CELL] where there is no chunk changes nothing and neither grows nor allocates.
    pub fn set_cell(&mut self, world: V2<i32>, value: Cell) -> Result<Cell> {
        let dest = CellDestination::from_world(world);
        if value == EMPTY_CELL && self.chunk(dest.chunk).is_none() {
            return Ok(EMPTY_CELL);
        }

        self.ensure_covers(Rect::unit(dest.chunk))?;
        let index = self.index_of(dest.chunk)?;
        let chunk = self.chunks[index].get_or_insert_with(|| {
            debug!("Allocating chunk {}", dest.chunk);
            Box::new(Chunk::new())
        });

        let old = chunk.set(dest.local.x, dest.local.y, value, &self.predicate)?;
        sync_active(&mut self.active_chunks, dest.chunk, chunk);
        Ok(old)
    }

    /// Grow the grid so that it covers `wish`, in chunks.  Returns whether the grid grew.
    ///
    /// The new rectangle contains both the old one and `wish`, and is rounded outward so that every boundary is a
    /// signed power of two and the rectangle stays centered.  On error the grid is unchanged.
    pub fn ensure_covers(&mut self, wish: Rect<i32>) -> Result<bool> {
        if wish.is_empty() || covers(&self.chunk_rect, &wish) {
            return Ok(false);
        }

        let new_rect = match self.quantize(&wish) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    "Refusing to grow grid from {} to cover {}: {}",
                    self.chunk_rect, wish, e
                );
                return Err(e);
            }
        };
        if new_rect == self.chunk_rect {
            return Ok(false);
        }

        info!("Growing grid from {} to {}", self.chunk_rect, new_rect);

        let old_rect = self.chunk_rect;
        let mut new_chunks = empty_arena(&new_rect);
        for (old_index, slot) in std::mem::take(&mut self.chunks).into_iter().enumerate() {
            if let Some(chunk) = slot {
                let coord = coord_in(&old_rect, old_index);
                debug_assert!(new_rect.contains_point(coord));
                new_chunks[linear_index(&new_rect, coord)] = Some(chunk);
            }
        }

        self.chunk_rect = new_rect;
        self.chunks = new_chunks;
        debug_assert!(self
            .active_chunks
            .iter()
            .all(|c| self.chunk_rect.contains_point(*c)));
        Ok(true)
    }

    /// Like [Grid::ensure_covers], with `wish` in cells.
    pub fn ensure_covers_cells(&mut self, wish: Rect<i32>) -> Result<bool> {
        self.ensure_covers(chunks_covering(&wish))
    }

    /// The rectangle growth would produce for `wish`.
    fn quantize(&self, wish: &Rect<i32>) -> Result<Rect<i32>> {
        let current = self.chunk_rect;
        let merged = |cur_pos: i32, cur_len: i32, pos: i32, len: i32| {
            let lo = (cur_pos as i64).min(pos as i64);
            let hi = (cur_pos as i64 + cur_len as i64).max(pos as i64 + len as i64);
            quantize_half_extent(lo, hi, self.max_half_size)
        };

        let half_x = merged(
            current.position().x,
            current.width(),
            wish.position().x,
            wish.width(),
        )?;
        let half_y = merged(
            current.position().y,
            current.height(),
            wish.position().y,
            wish.height(),
        )?;
        Ok(Rect::centered(V2::new(half_x, half_y)))
    }

    /// Set every cell of `rect`, in cells, to `value`.
    ///
    /// Grows once for the whole rectangle rather than once per chunk.  Writing [EMPTY_CELL] only clears chunks which
    /// exist.
    pub fn fill_rect(&mut self, rect: Rect<i32>, value: Cell) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }

        let wanted = chunks_covering(&rect);
        if value != EMPTY_CELL {
            self.ensure_covers(wanted)?;
        }

        // Clearing never grows, so only the covered part of the request can hold anything.
        let span = match wanted.intersection(&self.chunk_rect) {
            Some(s) => s,
            None => return Ok(()),
        };

        trace!("Filling {} with {} across chunks {}", rect, value, span);
        for coord in span.iter_points() {
            let index = linear_index(&self.chunk_rect, coord);

            let chunk_cells = chunk_rect_to_cells(&Rect::unit(coord));
            let local = match rect.intersection(&chunk_cells) {
                Some(r) => r.translate(-chunk_origin(coord)),
                None => continue,
            };

            let slot = &mut self.chunks[index];
            if value == EMPTY_CELL && slot.is_none() {
                continue;
            }
            let chunk = slot.get_or_insert_with(|| Box::new(Chunk::new()));

            if local.area() as usize == CHUNK_AREA {
                chunk.fill(value, &self.predicate);
            } else {
                chunk.fill_local_rect(local, value, &self.predicate)?;
            }
            sync_active(&mut self.active_chunks, coord, chunk);
        }

        Ok(())
    }

    /// Mutate the cells of one chunk directly, e.g. to bulk-load generated terrain.
    ///
    /// The closure sees the row-major cells of the chunk, which is allocated (and the grid grown) as needed.  Activity
    /// is recomputed for the whole chunk afterwards.
    pub fn modify_chunk<R>(
        &mut self,
        coord: ChunkCoord,
        f: impl FnOnce(&mut [Cell]) -> R,
    ) -> Result<R> {
        self.ensure_covers(Rect::unit(coord))?;
        let index = self.index_of(coord)?;
        let chunk = self.chunks[index].get_or_insert_with(|| Box::new(Chunk::new()));

        let ret = f(chunk.cells_mut());
        chunk.recompute_activity(&self.predicate);
        sync_active(&mut self.active_chunks, coord, chunk);
        Ok(ret)
    }

    /// Recompute the activity of every chunk and rebuild the active set, e.g. after the meaning of cells changed.
    pub fn recompute_activity(&mut self) {
        self.active_chunks.clear();
        for (index, slot) in self.chunks.iter_mut().enumerate() {
            if let Some(chunk) = slot {
                chunk.recompute_activity(&self.predicate);
                if !chunk.is_empty() {
                    self.active_chunks.insert(coord_in(&self.chunk_rect, index));
                }
            }
        }
    }

    /// Every allocated chunk with its coordinate, by rows of the arena.  Includes chunks at rest.
    pub fn iter_chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> + '_ {
        let rect = self.chunk_rect;
        self.chunks
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| Some((coord_in(&rect, i), slot.as_deref()?)))
    }

    /// Coordinates of chunks with at least one active cell, ordered by `x` then `y`.
    pub fn active_chunks(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.active_chunks.iter().copied()
    }

    pub fn active_chunk_count(&self) -> usize {
        self.active_chunks.len()
    }

    pub fn is_chunk_active(&self, chunk: ChunkCoord) -> bool {
        self.active_chunks.contains(&chunk)
    }

    /// The rectangle, in world cells, spanned by a chunk's active rows and columns.  `None` for inactive chunks.
    pub fn chunk_active_rect(&self, chunk: ChunkCoord) -> Option<Rect<i32>> {
        let c = self.chunk(chunk)?;
        if c.is_empty() {
            return None;
        }
        Some(c.active_rect().translate(chunk_origin(chunk)))
    }

    /// World coordinates of every active cell.
    ///
    /// Walks active chunks only, and within them active rows and columns only.
    pub fn iter_active_cells(&self) -> impl Iterator<Item = V2<i32>> + '_ {
        self.active_chunks.iter().flat_map(move |&coord| {
            let origin = chunk_origin(coord);
            self.chunk(coord).into_iter().flat_map(move |chunk| {
                chunk
                    .iter_active_cells(&self.predicate)
                    .map(move |local| origin + local.map(|v| v as i32))
            })
        })
    }

    /// Copy out a rectangle of cells by rows, e.g. to upload as a texture.  Uncovered cells read as empty.
    pub fn cell_buffer(&self, rect: Rect<i32>) -> Vec<Cell> {
        rect.iter_points().map(|p| self.get_cell(p)).collect()
    }

    pub fn allocated_chunk_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_some()).count()
    }

    pub fn stats(&self) -> GridStats {
        let allocated_chunks = self.allocated_chunk_count();
        let arena = self.chunks.capacity() * std::mem::size_of::<Option<Box<Chunk>>>();
        GridStats {
            chunk_rect: self.chunk_rect,
            allocated_chunks,
            active_chunks: self.active_chunks.len(),
            memory_bytes: std::mem::size_of::<Self>()
                + arena
                + allocated_chunks * std::mem::size_of::<Chunk>(),
        }
    }

    /// Reset the world: drop every chunk and go back to the initial rectangle.
    pub fn clear(&mut self) {
        info!("Clearing grid; was {}", self.stats());
        self.chunk_rect = self.initial_rect;
        self.chunks = empty_arena(&self.chunk_rect);
        self.active_chunks.clear();
    }
}
