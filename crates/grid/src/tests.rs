use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::proptest;

use sand_geometry::{is_power_of_two_aligned, Rect, V2};

use crate::reference_grid::*;
use crate::*;

/// Check everything the grid promises against the reference.
fn check_against_reference<P: ActivePredicate>(
    grid: &Grid<P>,
    reference: &ReferenceGrid,
) -> proptest::test_runner::TestCaseResult {
    for (p, c) in reference.iter() {
        prop_assert_eq!(grid.get_cell(p), c);
    }

    let expected_active = reference.active_chunks(grid.predicate());
    let active: BTreeSet<_> = grid.active_chunks().collect();
    prop_assert_eq!(&active, &expected_active);

    for (coord, chunk) in grid.iter_chunks() {
        let (rows, columns) = reference.expected_bits(coord, grid.predicate());
        prop_assert_eq!(chunk.active_rows(), rows, "rows of chunk {}", coord);
        prop_assert_eq!(chunk.active_columns(), columns, "columns of chunk {}", coord);
        prop_assert_eq!(grid.is_chunk_active(coord), rows != 0);
    }

    let rect = grid.chunk_rect();

    // The rectangle stays centered on power-of-two boundaries.
    let (p1, p2) = (rect.position(), rect.end());
    prop_assert!(is_power_of_two_aligned(p1.x) && is_power_of_two_aligned(p1.y));
    prop_assert!(is_power_of_two_aligned(p2.x) && is_power_of_two_aligned(p2.y));
    prop_assert_eq!(-p1, p2);
    Ok(())
}

fn fuzz_grid_impl(half_size: i32, writes: Vec<(i32, i32, u32)>) -> proptest::test_runner::TestCaseResult {
    let mut reference = ReferenceGrid::new();
    let mut grid = Grid::new(half_size);

    for (x, y, v) in writes {
        let p = V2::new(x, y);
        let before = grid.chunk_rect();
        let expected_old = reference.set(p, v);
        prop_assert_eq!(grid.set_cell(p, v).unwrap(), expected_old);
        prop_assert_eq!(grid.get_cell(p), reference.get(p));

        // Neighbors across chunk boundaries, which may never have been written.
        for n in [V2::new(x - 1, y), V2::new(x + 1, y), V2::new(x, y - 1), V2::new(x, y + 1)] {
            prop_assert_eq!(grid.get_cell(n), reference.get(n));
        }
        prop_assert!(grid.chunk_rect().contains_rect(&before));
    }

    check_against_reference(&grid, &reference)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        ..Default::default()
    })]
    #[test]
    #[allow(unreachable_code)]
    fn fuzz_grid_small(
        half_size in 1..4i32,
        writes in prop::collection::vec((-100..100i32, -100..100i32, 0..3u32), 0..500usize),
    ) {
        return fuzz_grid_impl(half_size, writes);
    }
}

// Sparse writes far apart, so that nearly every write grows the grid.
proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..Default::default()
    })]
    #[test]
    #[allow(unreachable_code)]
    fn fuzz_grid_sparse(
        writes in prop::collection::vec((-4000..4000i32, -4000..4000i32, 0..5u32), 0..50usize),
    ) {
        return fuzz_grid_impl(1, writes);
    }
}

// Writes concentrated in one chunk, mostly toggling between empty and not, to stress clearing bits.
proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        ..Default::default()
    })]
    #[test]
    #[allow(unreachable_code)]
    fn fuzz_grid_one_chunk_binary(
        writes in prop::collection::vec((0..32i32, 0..32i32, 0..=1u32), 0..2000usize),
    ) {
        return fuzz_grid_impl(1, writes);
    }
}

proptest! {
    #[test]
    fn growth_contains_wish(
        initial in 1..64i32,
        x in -500..500i32,
        y in -500..500i32,
        w in 0..100i32,
        h in 0..100i32,
    ) {
        let mut grid = Grid::new(initial);
        let before = grid.chunk_rect();
        let wish = Rect::new(x, y, w, h).unwrap();
        let grew = grid.ensure_covers(wish).unwrap();

        let after = grid.chunk_rect();
        prop_assert!(after.contains_rect(&before));
        prop_assert!(after.contains_rect(&wish));
        prop_assert_eq!(grew, after != before);
        prop_assert!(is_power_of_two_aligned(after.position().x));
        prop_assert!(is_power_of_two_aligned(after.position().y));
        prop_assert!(is_power_of_two_aligned(after.end().x));
        prop_assert!(is_power_of_two_aligned(after.end().y));

        // A second call is always a no-op.
        prop_assert!(!grid.ensure_covers(wish).unwrap());
    }

    #[test]
    #[allow(unreachable_code)]
    fn fill_rect_matches_point_writes(
        x in -80..80i32,
        y in -80..80i32,
        w in 0..90i32,
        h in 0..90i32,
        v in 0..3u32,
        noise in prop::collection::vec((-100..100i32, -100..100i32, 0..3u32), 0..100usize),
    ) {
        let mut reference = ReferenceGrid::new();
        let mut grid = Grid::new(1);
        for (nx, ny, nv) in noise {
            reference.set(V2::new(nx, ny), nv);
            grid.set_cell(V2::new(nx, ny), nv).unwrap();
        }

        let rect = Rect::new(x, y, w, h).unwrap();
        for p in rect.iter_points() {
            reference.set(p, v);
        }
        grid.fill_rect(rect, v).unwrap();

        return check_against_reference(&grid, &reference);
    }
}
