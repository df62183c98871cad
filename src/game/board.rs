//! Board model: a fixed 3x3 grid of cells.

use serde::Serialize;

use crate::config::game::BOARD_CELLS;
use crate::game::error::GameError;
use crate::game::types::{Cell, Slot};

/// Ordered sequence of cells, row-major. Serializes as a 9-length array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// All-empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| *cell != Cell::Empty)
    }

    /// Returns a copy of the board with `index` marked by `slot`.
    ///
    /// Fails with `InvalidMove` when the index is off the board and with
    /// `CellOccupied` when the cell already carries a mark.
    pub fn place(&self, slot: Slot, index: usize) -> Result<Board, GameError> {
        match self.cells.get(index) {
            None => Err(GameError::InvalidMove(index.to_string())),
            Some(Cell::Mark(_)) => Err(GameError::CellOccupied(index)),
            Some(Cell::Empty) => {
                let mut next = *self;
                next.cells[index] = Cell::Mark(slot);
                Ok(next)
            }
        }
    }
}
