//! Lines module - full-line detection and atomic clearing
//!
//! Detection is O(W+H): each row/column is checked against the board's
//! cached fill counts first, then re-scanned cell by cell before being
//! declared full. The double-check costs one scan per *candidate* line
//! only and guards against count drift reaching the clear path.
//!
//! Clearing marks every cell covered by any full row or column in a
//! scratch grid, then clears each marked cell exactly once, so a cell at
//! a row/column intersection is neither double-counted nor double-cleared.

use crate::board::BoardState;

/// Reusable detection buffer. Caller-owned so repeated detection does not
/// allocate; [`detect_full_lines`] clears it before writing.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    /// Indices of full rows, ascending.
    pub rows: Vec<u8>,
    /// Indices of full columns, ascending.
    pub cols: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of full lines found.
    pub fn line_count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    fn reset(&mut self) {
        self.rows.clear();
        self.cols.clear();
    }
}

/// Find every full row and column, writing the indices into `buf`.
pub fn detect_full_lines(board: &BoardState, buf: &mut LineBuffer) {
    buf.reset();
    for y in 0..board.height() {
        if board.is_row_full(y) && board.scan_row_full(y) {
            buf.rows.push(y);
        }
    }
    for x in 0..board.width() {
        if board.is_col_full(x) && board.scan_col_full(x) {
            buf.cols.push(x);
        }
    }
}

/// Result of clearing a set of full lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearResult {
    /// Number of cells cleared (intersections counted once).
    pub cleared_cells: usize,
    /// Positions of every cleared cell, for presentation-side animation.
    /// The core does not interpret these.
    pub positions: Vec<(u8, u8)>,
}

/// Clear every cell covered by the given full rows and columns.
///
/// Each covered cell is cleared exactly once even when it sits at the
/// intersection of a full row and a full column.
pub fn clear_lines(board: &mut BoardState, full_rows: &[u8], full_cols: &[u8]) -> ClearResult {
    let width = board.width() as usize;
    let height = board.height() as usize;

    let mut marked = vec![false; width * height];
    for &y in full_rows {
        let start = y as usize * width;
        marked[start..start + width].fill(true);
    }
    for &x in full_cols {
        for y in 0..height {
            marked[y * width + x as usize] = true;
        }
    }

    let mut result = ClearResult::default();
    for (idx, &m) in marked.iter().enumerate() {
        if !m {
            continue;
        }
        let x = (idx % width) as i8;
        let y = (idx / width) as i8;
        if board.clear_cell(x, y) {
            result.cleared_cells += 1;
            result.positions.push((x as u8, y as u8));
        }
    }

    board.validate_counts();
    result
}
