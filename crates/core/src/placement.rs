//! Placement module - shape placement validation and atomic execution
//!
//! Validation walks every target cell and reports the first failure without
//! touching the board. Execution re-validates and then fills; if a fill is
//! rejected mid-way (which prior validation should make impossible), every
//! cell filled so far in that call is rolled back, so the caller always
//! observes all-or-nothing behavior.

use gridblocks_types::{CellOffset, CellState};

use crate::board::BoardState;

/// Why a placement was rejected.
///
/// Coordinates are widened to `i16` so cells far outside the board are
/// reported exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Some target cell lies outside the board.
    OutOfBounds { x: i16, y: i16 },
    /// Some target cell is already occupied.
    Collision { x: i16, y: i16 },
}

/// Check whether a shape fits at `(anchor_x, anchor_y)`.
///
/// Returns the first failing cell. Never mutates the board. Target
/// coordinates are computed in `i16`: anchor plus offset can exceed the
/// `i8` range, and an extreme anchor must be a typed rejection, not an
/// overflow.
pub fn can_place(
    board: &BoardState,
    anchor_x: i8,
    anchor_y: i8,
    offsets: &[CellOffset],
) -> Result<(), PlacementError> {
    for &(dx, dy) in offsets {
        let x = i16::from(anchor_x) + i16::from(dx);
        let y = i16::from(anchor_y) + i16::from(dy);
        if x < 0 || x >= i16::from(board.width()) || y < 0 || y >= i16::from(board.height()) {
            return Err(PlacementError::OutOfBounds { x, y });
        }
        // In bounds, so both fit in i8.
        if board.is_filled_at(x as i8, y as i8) {
            return Err(PlacementError::Collision { x, y });
        }
    }
    Ok(())
}

/// Place a shape, filling every target cell with `block_id`/`color_id`.
///
/// Re-validates before filling. If any individual fill is rejected after
/// partial application, all previously filled cells from this call are
/// cleared before the error is returned; the board is byte-identical to
/// its state before the call.
pub fn place_atomic(
    board: &mut BoardState,
    anchor_x: i8,
    anchor_y: i8,
    offsets: &[CellOffset],
    block_id: u32,
    color_id: u8,
) -> Result<(), PlacementError> {
    can_place(board, anchor_x, anchor_y, offsets)?;

    // Validation proved every target in bounds, so i8 arithmetic is safe
    // from here on.
    let cell = CellState::filled(block_id, color_id);
    for (i, &(dx, dy)) in offsets.iter().enumerate() {
        let x = anchor_x + dx;
        let y = anchor_y + dy;
        if !board.fill_cell(x, y, cell) {
            // Should not happen after validation; undo this call's fills.
            for &(rdx, rdy) in &offsets[..i] {
                board.clear_cell(anchor_x + rdx, anchor_y + rdy);
            }
            debug_assert!(false, "fill failed after successful validation");
            return Err(PlacementError::Collision {
                x: i16::from(x),
                y: i16::from(y),
            });
        }
    }

    board.validate_counts();
    Ok(())
}
