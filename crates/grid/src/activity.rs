//! Which cells count as active.
//!
//! What a cell value means belongs to the rule engine.  The grid only needs to know whether a cell might still move,
//! and asks the predicate every time it rescans a row or column.
use crate::chunk::{Cell, EMPTY_CELL};

pub trait ActivePredicate {
    fn is_active(&self, cell: Cell) -> bool;
}

/// Every non-empty cell is active.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NonEmpty;

impl ActivePredicate for NonEmpty {
    fn is_active(&self, cell: Cell) -> bool {
        cell != EMPTY_CELL
    }
}

impl<F: Fn(Cell) -> bool> ActivePredicate for F {
    fn is_active(&self, cell: Cell) -> bool {
        self(cell)
    }
}
