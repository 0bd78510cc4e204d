//! Shared types module - data structures and constants for the puzzle engine
//!
//! This crate defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core rules, persistence, presentation adapters).
//!
//! # Board Dimensions
//!
//! The default game board is square:
//!
//! - **Width**: 8 columns (indexed 0-7)
//! - **Height**: 8 rows (indexed 0-7)
//! - **Origin**: bottom-left, X grows right, Y grows up
//!
//! Boards of other sizes (e.g. 4x4 in tests) are created at runtime; the
//! constants here only describe the standard game.
//!
//! # Coordinate Conventions
//!
//! Shapes are sets of cell offsets relative to an anchor cell at `(0, 0)`.
//! A shape is placed by adding its anchor position to every offset. Offsets
//! may be negative; the anchor is not necessarily the bottom-left cell.
//!
//! # Examples
//!
//! ```
//! use gridblocks_types::{CellState, ShapeId, DEFAULT_BOARD_WIDTH, BLOCKS_PER_SET};
//!
//! let empty = CellState::EMPTY;
//! assert!(empty.is_empty());
//!
//! let filled = CellState::filled(7, 3);
//! assert!(!filled.is_empty());
//!
//! assert_eq!(DEFAULT_BOARD_WIDTH, 8);
//! assert_eq!(BLOCKS_PER_SET, 3);
//! assert_eq!(ShapeId::SINGLE, ShapeId(1));
//! ```

/// Default board width in cells (8 columns)
pub const DEFAULT_BOARD_WIDTH: u8 = 8;

/// Default board height in cells (8 rows)
pub const DEFAULT_BOARD_HEIGHT: u8 = 8;

/// Number of pending blocks offered to the player at a time
pub const BLOCKS_PER_SET: usize = 3;

/// Number of distinct block colors (color ids are 1-based; 0 is reserved
/// for empty cells)
pub const COLOR_COUNT: u8 = 6;

/// Offset of a single cell relative to a shape's anchor
pub type CellOffset = (i8, i8);

/// An anchor position on the board (may be temporarily out of bounds
/// during drag previews; the engine validates before placing)
pub type Anchor = (i8, i8);

/// State of one board cell.
///
/// `block_id == 0` means the cell is empty. Filled cells always carry a
/// non-zero `block_id` (unique per placement move) and a non-zero
/// `color_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellState {
    /// Placement id of the block occupying this cell (0 = empty).
    pub block_id: u32,
    /// Color id of the occupying block (0 = empty).
    pub color_id: u8,
}

impl CellState {
    /// The empty cell value.
    pub const EMPTY: CellState = CellState {
        block_id: 0,
        color_id: 0,
    };

    /// Create a filled cell value.
    ///
    /// Panics in debug builds if either id is zero; a filled cell must
    /// carry both a block id and a color id.
    pub fn filled(block_id: u32, color_id: u8) -> Self {
        debug_assert!(block_id > 0, "filled cell requires block_id > 0");
        debug_assert!(color_id > 0, "filled cell requires color_id > 0");
        Self { block_id, color_id }
    }

    /// Whether this cell is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.block_id == 0
    }

    /// Whether this cell is occupied.
    #[inline(always)]
    pub fn is_filled(&self) -> bool {
        self.block_id != 0
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Identifier of a shape in the shape catalog.
///
/// Ids are stable across versions so that persisted games can restore
/// their pending blocks. Id 0 is never used; unknown ids loaded from a
/// corrupt save are repaired to [`ShapeId::SINGLE`] by the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u16);

impl ShapeId {
    /// The single-cell shape, guaranteed to exist in every catalog and
    /// used as the repair fallback for unknown ids.
    pub const SINGLE: ShapeId = ShapeId(1);

    /// Raw id value.
    pub fn raw(self) -> u16 {
        self.0
    }
}

/// Rounding mode applied to the final score of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    /// Round half away from zero (the default).
    #[default]
    Nearest,
    /// Round toward negative infinity.
    Floor,
    /// Round toward positive infinity.
    Ceiling,
    /// Drop the fractional part.
    Truncate,
}

impl RoundingMode {
    /// Apply this rounding mode to a raw score value.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingMode::Nearest => value.round(),
            RoundingMode::Floor => value.floor(),
            RoundingMode::Ceiling => value.ceil(),
            RoundingMode::Truncate => value.trunc(),
        }
    }

    /// Stable name used by the persistence layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::Nearest => "nearest",
            RoundingMode::Floor => "floor",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::Truncate => "truncate",
        }
    }

    /// Parse a mode from its stable name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "nearest" => Some(RoundingMode::Nearest),
            "floor" => Some(RoundingMode::Floor),
            "ceiling" => Some(RoundingMode::Ceiling),
            "truncate" => Some(RoundingMode::Truncate),
            _ => None,
        }
    }
}
