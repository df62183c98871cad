//! Win and draw evaluation over a board.

use crate::game::board::Board;
use crate::game::types::{Cell, Slot};

/// A winning line as three cell indices.
pub type Line = [usize; 3];

/// The 8 canonical lines, in evaluation order: rows, then columns, then diagonals.
pub const LINES: [Line; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win { slot: Slot, line: Line },
    Draw,
    Ongoing,
}

/// Every complete line on the board with the slot that owns it, in `LINES` order.
pub fn completed_lines(board: &Board) -> impl Iterator<Item = (Slot, Line)> + '_ {
    LINES.iter().filter_map(move |line| {
        let [a, b, c] = *line;
        match board.get(a)? {
            Cell::Mark(slot)
                if board.get(b) == Some(Cell::Mark(slot)) && board.get(c) == Some(Cell::Mark(slot)) =>
            {
                Some((slot, *line))
            }
            _ => None,
        }
    })
}

/// First complete line wins; a full board without one is a draw.
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((slot, line)) = completed_lines(board).next() {
        return Outcome::Win { slot, line };
    }
    if board.is_full() { Outcome::Draw } else { Outcome::Ongoing }
}
