//! Save-data module - the serializable snapshot of a game session
//!
//! [`GameData`] is a plain DTO decoupled from the live engine types, so
//! the on-disk schema can stay stable while the engine evolves. Capture
//! copies everything needed to resume play mid-session, including the raw
//! RNG state and the difficulty aggregates; restore rebuilds a
//! [`GameEngine`] that continues the exact random stream it was saved on.
//!
//! Restore is defensive: malformed cell arrays fail the load, while
//! unknown shape ids in the pending slots are repaired to the single-cell
//! shape so one corrupt id does not cost the player their save.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use gridblocks_core::engine::{EngineConfig, GameEngine};
use gridblocks_core::game_state::{ActiveBlocks, GameState, PendingBlock};
use gridblocks_core::scoring::CURRENT_FORMULA_VERSION;
use gridblocks_core::shapes::ShapeLibrary;
use gridblocks_core::difficulty::DifficultyModel;
use gridblocks_core::spawner::{BlockSpawner, SpawnerStats};
use gridblocks_core::BoardState;
use gridblocks_core::ComboState;
use gridblocks_types::{CellState, ShapeId, BLOCKS_PER_SET};

/// Version of the save schema itself (not the scoring formula).
pub const SAVE_SCHEMA_VERSION: u32 = 1;

/// One saved board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCell {
    pub block_id: u32,
    pub color_id: u8,
}

/// One saved pending block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBlock {
    pub shape_id: u16,
    pub color_id: u8,
}

/// Complete serializable snapshot of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub schema_version: u32,
    pub board_width: u8,
    pub board_height: u8,
    /// Row-major, bottom row first; length must equal width * height.
    pub cells: Vec<SavedCell>,
    /// Pending block slots; `None` marks an already-spent slot.
    pub blocks: Vec<Option<SavedBlock>>,
    pub score: u32,
    pub best_score: u32,
    pub combo_streak: u32,
    pub move_count: u64,
    pub total_lines_cleared: u64,
    pub is_game_over: bool,
    pub rng_state: u32,
    pub next_block_id: u32,
    pub difficulty_level: f32,
    pub total_placements: u64,
    pub total_successes: u64,
    /// Rolling outcome window of the difficulty model, in storage order.
    /// Persisted so the restored session reproduces the exact spawn
    /// stream: the challenge gate reads this window and draws extra
    /// randomness when armed.
    #[serde(default)]
    pub difficulty_history: Vec<bool>,
    #[serde(default)]
    pub difficulty_cursor: usize,
    pub score_formula_version: u32,
    pub started_at_ms: u64,
    pub last_move_at_ms: u64,
}

impl GameData {
    /// Capture a snapshot of a live engine.
    pub fn capture(engine: &GameEngine) -> Self {
        let state = engine.state();
        let spawner = engine.spawner();
        let cells = state
            .board
            .cells()
            .iter()
            .map(|c| SavedCell {
                block_id: c.block_id,
                color_id: c.color_id,
            })
            .collect();
        let blocks = state
            .active_blocks
            .slots()
            .iter()
            .map(|slot| {
                slot.map(|b| SavedBlock {
                    shape_id: b.shape.raw(),
                    color_id: b.color_id,
                })
            })
            .collect();
        Self {
            schema_version: SAVE_SCHEMA_VERSION,
            board_width: state.board.width(),
            board_height: state.board.height(),
            cells,
            blocks,
            score: state.score,
            best_score: state.best_score,
            combo_streak: state.combo.streak(),
            move_count: state.move_count,
            total_lines_cleared: state.total_lines_cleared,
            is_game_over: state.is_game_over,
            rng_state: spawner.rng_state(),
            next_block_id: engine.next_block_id(),
            difficulty_level: spawner.difficulty().level(),
            total_placements: spawner.difficulty().total_placements(),
            total_successes: spawner.difficulty().total_successes(),
            difficulty_history: spawner.difficulty().history().to_vec(),
            difficulty_cursor: spawner.difficulty().history_cursor(),
            score_formula_version: engine.config().scoring.formula_version(),
            started_at_ms: state.started_at_ms,
            last_move_at_ms: state.last_move_at_ms,
        }
    }

    /// Rebuild a live engine from this snapshot.
    ///
    /// Fails on structural corruption (cell array length mismatch, zero
    /// dimensions). Unknown shape ids in the pending slots are repaired
    /// to the single-cell shape rather than failing the restore.
    pub fn restore(&self, config: EngineConfig, library: ShapeLibrary) -> Result<GameEngine> {
        let cells: Vec<CellState> = self
            .cells
            .iter()
            .map(|c| CellState {
                block_id: c.block_id,
                color_id: c.color_id,
            })
            .collect();
        let board = BoardState::from_cells(self.board_width, self.board_height, cells)
            .ok_or_else(|| {
                anyhow!(
                    "saved cell array does not match {}x{} board",
                    self.board_width,
                    self.board_height
                )
            })?;

        let mut slots = [None; BLOCKS_PER_SET];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = self.blocks.get(i).copied().flatten().map(|b| {
                let id = ShapeId(b.shape_id);
                let shape = if library.contains(id) {
                    id
                } else {
                    ShapeId::SINGLE
                };
                PendingBlock {
                    shape,
                    color_id: b.color_id.max(1),
                }
            });
        }

        let mut state = GameState::new(self.board_width, self.board_height, self.best_score, 0);
        state.board = board;
        state.active_blocks = ActiveBlocks::from_slots(slots);
        state.combo = ComboState::from_streak(self.combo_streak);
        state.score = self.score;
        state.is_game_over = self.is_game_over;
        state.move_count = self.move_count;
        state.total_lines_cleared = self.total_lines_cleared;
        state.started_at_ms = self.started_at_ms;
        state.last_move_at_ms = self.last_move_at_ms;

        let difficulty = DifficultyModel::restore(
            config.spawner.difficulty,
            self.difficulty_level,
            self.total_placements,
            self.total_successes,
            self.difficulty_history.clone(),
            self.difficulty_cursor,
        );
        let spawner = BlockSpawner::restore(
            self.rng_state,
            config.spawner,
            difficulty,
            SpawnerStats::default(),
        );

        Ok(GameEngine::from_parts(
            config,
            library,
            state,
            spawner,
            self.next_block_id,
        ))
    }

    /// Whether this snapshot was written under an older scoring formula.
    pub fn needs_formula_migration(&self) -> bool {
        self.score_formula_version < CURRENT_FORMULA_VERSION
    }
}
