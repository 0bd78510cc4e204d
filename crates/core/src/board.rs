//! Board module - the game grid and its invariant-preserving mutation API
//!
//! The board is a WxH grid where each cell is either empty or filled with a
//! block id and color id. Uses flat row-major storage for cache locality.
//! Coordinates: (x, y) with the origin at the bottom-left, x growing right
//! and y growing up.
//!
//! The board maintains per-row and per-column fill counts alongside the
//! cells, so full-line detection is O(W+H) instead of O(W*H). The counts
//! are kept in sync by routing every mutation through [`BoardState::fill_cell`]
//! and [`BoardState::clear_cell`].

use gridblocks_types::CellState;

/// The game board with maintained row/column fill counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x).
    cells: Vec<CellState>,
    /// Number of filled cells in each row.
    row_counts: Vec<u8>,
    /// Number of filled cells in each column.
    col_counts: Vec<u8>,
}

impl BoardState {
    /// Create a new empty board.
    ///
    /// Panics if either dimension is zero; a zero-area board is a
    /// programming error, not a runtime condition.
    pub fn new(width: u8, height: u8) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be non-zero");
        Self {
            width,
            height,
            cells: vec![CellState::EMPTY; width as usize * height as usize],
            row_counts: vec![0; height as usize],
            col_counts: vec![0; width as usize],
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Calculate the flat index for (x, y), or `None` if out of bounds.
    #[inline(always)]
    pub fn to_index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Convert a flat index back to (x, y). Inverse of [`Self::to_index`]
    /// for every in-bounds position.
    #[inline(always)]
    pub fn from_index(&self, index: usize) -> Option<(i8, i8)> {
        if index >= self.cells.len() {
            return None;
        }
        let x = (index % self.width as usize) as i8;
        let y = (index / self.width as usize) as i8;
        Some((x, y))
    }

    /// Get the cell at (x, y). Returns `None` if out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<CellState> {
        self.to_index(x, y).map(|idx| self.cells[idx])
    }

    /// Whether (x, y) is in bounds and empty.
    pub fn is_empty_at(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(cell) if cell.is_empty())
    }

    /// Whether (x, y) is in bounds and occupied.
    pub fn is_filled_at(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(cell) if cell.is_filled())
    }

    /// Whether (x, y) lies outside the board.
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8
    }

    /// Fill the cell at (x, y), keeping the row/column counts in sync.
    ///
    /// Returns `false` (without mutating) if the position is out of bounds
    /// or the cell is already occupied.
    pub fn fill_cell(&mut self, x: i8, y: i8, cell: CellState) -> bool {
        debug_assert!(cell.is_filled(), "fill_cell requires a filled value");
        let Some(idx) = self.to_index(x, y) else {
            return false;
        };
        if self.cells[idx].is_filled() {
            return false;
        }
        self.cells[idx] = cell;
        self.row_counts[y as usize] += 1;
        self.col_counts[x as usize] += 1;
        true
    }

    /// Clear the cell at (x, y), keeping the row/column counts in sync.
    ///
    /// Clearing an empty cell is a no-op. Returns `true` if a filled cell
    /// was actually cleared.
    pub fn clear_cell(&mut self, x: i8, y: i8) -> bool {
        let Some(idx) = self.to_index(x, y) else {
            return false;
        };
        if self.cells[idx].is_empty() {
            return false;
        }
        self.cells[idx] = CellState::EMPTY;
        self.row_counts[y as usize] -= 1;
        self.col_counts[x as usize] -= 1;
        true
    }

    /// Cached number of filled cells in row `y`.
    pub fn row_count(&self, y: u8) -> u8 {
        self.row_counts[y as usize]
    }

    /// Cached number of filled cells in column `x`.
    pub fn col_count(&self, x: u8) -> u8 {
        self.col_counts[x as usize]
    }

    /// Whether row `y` is completely filled, according to the cached count.
    pub fn is_row_full(&self, y: u8) -> bool {
        y < self.height && self.row_counts[y as usize] == self.width
    }

    /// Whether column `x` is completely filled, according to the cached count.
    pub fn is_col_full(&self, x: u8) -> bool {
        x < self.width && self.col_counts[x as usize] == self.height
    }

    /// Scan row `y` cell by cell, ignoring the cached count.
    pub fn scan_row_full(&self, y: u8) -> bool {
        if y >= self.height {
            return false;
        }
        let start = y as usize * self.width as usize;
        let end = start + self.width as usize;
        self.cells[start..end].iter().all(|cell| cell.is_filled())
    }

    /// Scan column `x` cell by cell, ignoring the cached count.
    pub fn scan_col_full(&self, x: u8) -> bool {
        if x >= self.width {
            return false;
        }
        (0..self.height)
            .all(|y| self.cells[y as usize * self.width as usize + x as usize].is_filled())
    }

    /// Total number of filled cells on the board.
    pub fn filled_count(&self) -> usize {
        self.row_counts.iter().map(|&c| c as usize).sum()
    }

    /// Whether the board has no filled cells.
    pub fn is_board_empty(&self) -> bool {
        self.row_counts.iter().all(|&c| c == 0)
    }

    /// Reset every cell to empty.
    pub fn clear_all(&mut self) {
        self.cells.fill(CellState::EMPTY);
        self.row_counts.fill(0);
        self.col_counts.fill(0);
    }

    /// Raw view of the cell array (row-major, bottom row first).
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Rebuild a board from a raw cell array, recomputing the counts.
    ///
    /// Returns `None` if the array length does not match the dimensions.
    /// Used by the persistence layer when restoring a saved game.
    pub fn from_cells(width: u8, height: u8, cells: Vec<CellState>) -> Option<Self> {
        if width == 0 || height == 0 || cells.len() != width as usize * height as usize {
            return None;
        }
        let mut row_counts = vec![0u8; height as usize];
        let mut col_counts = vec![0u8; width as usize];
        for (idx, cell) in cells.iter().enumerate() {
            if cell.is_filled() {
                row_counts[idx / width as usize] += 1;
                col_counts[idx % width as usize] += 1;
            }
        }
        Some(Self {
            width,
            height,
            cells,
            row_counts,
            col_counts,
        })
    }

    /// Debug-only invariant check: cached counts must match a full re-scan.
    ///
    /// Count drift indicates a logic bug (a mutation that bypassed
    /// `fill_cell`/`clear_cell`), so this panics rather than repairing.
    /// Compiled out of release builds.
    #[cfg(debug_assertions)]
    pub fn validate_counts(&self) {
        for y in 0..self.height {
            let scanned = (0..self.width)
                .filter(|&x| self.is_filled_at(x as i8, y as i8))
                .count() as u8;
            assert_eq!(
                self.row_counts[y as usize], scanned,
                "row {} count drifted: cached {} vs scanned {}",
                y, self.row_counts[y as usize], scanned
            );
        }
        for x in 0..self.width {
            let scanned = (0..self.height)
                .filter(|&y| self.is_filled_at(x as i8, y as i8))
                .count() as u8;
            assert_eq!(
                self.col_counts[x as usize], scanned,
                "col {} count drifted: cached {} vs scanned {}",
                x, self.col_counts[x as usize], scanned
            );
        }
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    pub fn validate_counts(&self) {}
}
