//! Game-state module - the aggregate state of one game in progress
//!
//! [`ActiveBlocks`] holds the three blocks currently offered to the
//! player in fixed slots: placing a block empties its slot, the other
//! slots keep their indices. A fresh set arrives only after all three
//! slots are empty.
//!
//! [`GameState`] bundles the board, score, active blocks, combo, and the
//! bookkeeping counters. It is `Clone` so callers can run what-if
//! previews on a scratch copy without disturbing the live game.

use gridblocks_types::ShapeId;
use gridblocks_types::BLOCKS_PER_SET;

use crate::board::BoardState;
use crate::combo::ComboState;
use crate::search::has_valid_placement;
use crate::shapes::ShapeLibrary;

/// One block sitting in a slot, waiting to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBlock {
    pub shape: ShapeId,
    pub color_id: u8,
}

/// The player's current block offer: three fixed slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActiveBlocks {
    slots: [Option<PendingBlock>; BLOCKS_PER_SET],
}

impl ActiveBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill all slots from a spawned set.
    pub fn refill(&mut self, blocks: [PendingBlock; BLOCKS_PER_SET]) {
        for (slot, block) in self.slots.iter_mut().zip(blocks) {
            *slot = Some(block);
        }
    }

    /// The block in `slot`, if any. Out-of-range slots read as empty.
    pub fn get(&self, slot: usize) -> Option<PendingBlock> {
        self.slots.get(slot).copied().flatten()
    }

    /// Remove and return the block in `slot`. Slot indices of the other
    /// blocks are unaffected.
    pub fn take(&mut self, slot: usize) -> Option<PendingBlock> {
        self.slots.get_mut(slot).and_then(|s| s.take())
    }

    /// Restore a slot layout from persistence.
    pub fn from_slots(slots: [Option<PendingBlock>; BLOCKS_PER_SET]) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Option<PendingBlock>; BLOCKS_PER_SET] {
        &self.slots
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn is_full(&self) -> bool {
        self.count() == BLOCKS_PER_SET
    }

    /// Whether any remaining block has at least one valid placement.
    ///
    /// Blocks whose shape is missing from the library are skipped; the
    /// spawner repairs those before they ever reach a slot.
    pub fn has_placeable_blocks(&self, board: &BoardState, library: &ShapeLibrary) -> bool {
        self.slots.iter().flatten().any(|block| {
            library
                .get(block.shape)
                .is_some_and(|shape| has_valid_placement(board, shape))
        })
    }
}

/// Everything that defines one game in progress.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: BoardState,
    pub active_blocks: ActiveBlocks,
    pub combo: ComboState,
    pub score: u32,
    pub best_score: u32,
    pub is_game_over: bool,
    pub move_count: u64,
    pub total_lines_cleared: u64,
    /// Wall-clock millis when the game started.
    pub started_at_ms: u64,
    /// Wall-clock millis of the last accepted move.
    pub last_move_at_ms: u64,
}

impl GameState {
    pub fn new(width: u8, height: u8, best_score: u32, now_ms: u64) -> Self {
        Self {
            board: BoardState::new(width, height),
            active_blocks: ActiveBlocks::new(),
            combo: ComboState::new(),
            score: 0,
            best_score,
            is_game_over: false,
            move_count: 0,
            total_lines_cleared: 0,
            started_at_ms: now_ms,
            last_move_at_ms: now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridblocks_types::CellState;

    fn block(shape: ShapeId) -> PendingBlock {
        PendingBlock { shape, color_id: 1 }
    }

    #[test]
    fn test_slots_start_empty() {
        let blocks = ActiveBlocks::new();
        assert!(blocks.is_empty());
        assert!(!blocks.is_full());
        assert_eq!(blocks.get(0), None);
    }

    #[test]
    fn test_refill_fills_all_slots() {
        let mut blocks = ActiveBlocks::new();
        blocks.refill([block(ShapeId(1)), block(ShapeId(2)), block(ShapeId(3))]);
        assert!(blocks.is_full());
        assert_eq!(blocks.get(1).map(|b| b.shape), Some(ShapeId(2)));
    }

    #[test]
    fn test_take_preserves_other_slot_indices() {
        let mut blocks = ActiveBlocks::new();
        blocks.refill([block(ShapeId(1)), block(ShapeId(2)), block(ShapeId(3))]);

        let taken = blocks.take(1);
        assert_eq!(taken.map(|b| b.shape), Some(ShapeId(2)));
        assert_eq!(blocks.get(0).map(|b| b.shape), Some(ShapeId(1)));
        assert_eq!(blocks.get(1), None);
        assert_eq!(blocks.get(2).map(|b| b.shape), Some(ShapeId(3)));
        assert_eq!(blocks.count(), 2);

        // Taking the same slot again is a no-op.
        assert_eq!(blocks.take(1), None);
    }

    #[test]
    fn test_out_of_range_slot_reads_empty() {
        let mut blocks = ActiveBlocks::new();
        blocks.refill([block(ShapeId(1)), block(ShapeId(2)), block(ShapeId(3))]);
        assert_eq!(blocks.get(99), None);
        assert_eq!(blocks.take(99), None);
    }

    #[test]
    fn test_has_placeable_blocks() {
        let library = ShapeLibrary::standard();
        let mut board = BoardState::new(4, 4);
        let mut blocks = ActiveBlocks::new();
        blocks.refill([
            block(ShapeId::SINGLE),
            block(ShapeId::SINGLE),
            block(ShapeId::SINGLE),
        ]);
        assert!(blocks.has_placeable_blocks(&board, &library));

        for y in 0..4 {
            for x in 0..4 {
                board.fill_cell(x, y, CellState::filled(1, 1));
            }
        }
        assert!(!blocks.has_placeable_blocks(&board, &library));
    }

    #[test]
    fn test_empty_slots_have_nothing_placeable() {
        let library = ShapeLibrary::standard();
        let board = BoardState::new(4, 4);
        let blocks = ActiveBlocks::new();
        assert!(!blocks.has_placeable_blocks(&board, &library));
    }

    #[test]
    fn test_new_game_state_defaults() {
        let state = GameState::new(8, 8, 500, 1234);
        assert_eq!(state.score, 0);
        assert_eq!(state.best_score, 500);
        assert!(!state.is_game_over);
        assert_eq!(state.move_count, 0);
        assert_eq!(state.started_at_ms, 1234);
        assert!(state.board.is_board_empty());
        assert!(state.active_blocks.is_empty());
    }
}
