//! Search module - placement enumeration over the anchor space
//!
//! Each shape's bounding offsets restrict the anchor window to
//! `[-min_dx, W-1-max_dx] x [-min_dy, H-1-max_dy]`; shapes whose window is
//! empty cannot fit on the board at all and are skipped without scanning.
//!
//! Search order is deterministic: shapes in input order, anchors scanned
//! from the top row down, left to right within a row. Game-over and spawn
//! safety checks use the early-exit variant.

use gridblocks_types::Anchor;

use crate::board::BoardState;
use crate::placement::can_place;
use crate::shapes::ShapeDefinition;

/// Anchor window for a shape on a board, derived from its bounding offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeBounds {
    pub min_x: i8,
    pub max_x: i8,
    pub min_y: i8,
    pub max_y: i8,
}

impl ShapeBounds {
    /// Compute the valid anchor window, or `None` if the shape cannot fit
    /// on a board of these dimensions at any anchor.
    pub fn anchor_window(shape: &ShapeDefinition, board: &BoardState) -> Option<ShapeBounds> {
        let (min_dx, max_dx, min_dy, max_dy) = shape.bounds();
        let min_x = -min_dx;
        let max_x = board.width() as i8 - 1 - max_dx;
        let min_y = -min_dy;
        let max_y = board.height() as i8 - 1 - max_dy;
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(ShapeBounds {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }
}

/// Whether any of the given shapes has at least one valid placement.
/// Early-exits on the first success.
pub fn has_any_valid_placement(board: &BoardState, shapes: &[&ShapeDefinition]) -> bool {
    shapes
        .iter()
        .any(|shape| has_valid_placement(board, shape))
}

/// Whether one shape has at least one valid placement.
pub fn has_valid_placement(board: &BoardState, shape: &ShapeDefinition) -> bool {
    let Some(window) = ShapeBounds::anchor_window(shape, board) else {
        return false;
    };
    for y in (window.min_y..=window.max_y).rev() {
        for x in window.min_x..=window.max_x {
            if can_place(board, x, y, shape.offsets()).is_ok() {
                return true;
            }
        }
    }
    false
}

/// First valid placement in deterministic order: shapes in input order,
/// anchors from the top row down, left to right within a row. Returns the
/// index of the shape and the anchor.
pub fn find_first_valid_placement(
    board: &BoardState,
    shapes: &[&ShapeDefinition],
) -> Option<(usize, Anchor)> {
    for (i, shape) in shapes.iter().enumerate() {
        let Some(window) = ShapeBounds::anchor_window(shape, board) else {
            continue;
        };
        for y in (window.min_y..=window.max_y).rev() {
            for x in window.min_x..=window.max_x {
                if can_place(board, x, y, shape.offsets()).is_ok() {
                    return Some((i, (x, y)));
                }
            }
        }
    }
    None
}

/// Every valid anchor for one shape, in the deterministic scan order.
pub fn find_valid_placements(board: &BoardState, shape: &ShapeDefinition) -> Vec<Anchor> {
    let mut anchors = Vec::new();
    let Some(window) = ShapeBounds::anchor_window(shape, board) else {
        return anchors;
    };
    for y in (window.min_y..=window.max_y).rev() {
        for x in window.min_x..=window.max_x {
            if can_place(board, x, y, shape.offsets()).is_ok() {
                anchors.push((x, y));
            }
        }
    }
    anchors
}
