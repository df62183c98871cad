/// Game configuration constants.
///
/// This module defines the board geometry and the bounds accepted for a
/// match's best-of setting.

/// Number of rows and columns of the board.
pub const BOARD_SIDE: usize = 3;

/// Number of cells on the board.
pub const BOARD_CELLS: usize = BOARD_SIDE * BOARD_SIDE;

/// Largest accepted `bestOf` value. Must be odd.
pub const MAX_BEST_OF: u32 = 9;
