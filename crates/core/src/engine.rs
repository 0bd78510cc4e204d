//! Engine module - the game-session state machine and move pipeline
//!
//! A session moves through three phases: `NotStarted` until the first
//! [`GameEngine::new_game`], `Playing` while moves are accepted, and
//! `GameOver` once no remaining block fits anywhere. Every accepted move
//! runs the same pipeline: validate, place atomically, record the outcome
//! for difficulty adaptation, detect and clear full lines, update combo
//! and score, refill the block slots when all three are spent, then check
//! for game over.
//!
//! State changes are reported through a drained event queue
//! ([`GameEngine::take_events`]); presentation layers poll it instead of
//! registering callbacks, so the core stays free of observer plumbing.
//!
//! [`GameEngine::preview_move_score`] answers "what would this move
//! score?" on a scratch copy of the board. It draws no randomness and
//! touches no live state, so previewing then placing yields exactly the
//! score previewed.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use gridblocks_types::{Anchor, ShapeId, BLOCKS_PER_SET, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};

use crate::game_state::{GameState, PendingBlock};
use crate::lines::{clear_lines, detect_full_lines, ClearResult, LineBuffer};
use crate::placement::{can_place, place_atomic, PlacementError};
use crate::scoring::{calculate_score, MoveScore, ScoreConfig};
use crate::search::find_valid_placements;
use crate::shapes::ShapeLibrary;
use crate::spawner::{BlockSpawner, SpawnerConfig, SpawnerStats};

/// Lifecycle phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    NotStarted,
    Playing,
    GameOver,
}

/// Why a move was rejected. Rejected moves never change any state except
/// the difficulty history (placement failures count as outcomes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// No game has been started yet.
    NotStarted,
    /// The game has ended; start a new one.
    GameOver,
    /// Slot index outside `0..BLOCKS_PER_SET`.
    InvalidSlot { slot: usize },
    /// The slot exists but holds no block.
    EmptySlot { slot: usize },
    /// The slot's shape id is missing from the catalog.
    UnknownShape { id: ShapeId },
    /// Some target cell lies outside the board.
    OutOfBounds { x: i16, y: i16 },
    /// Some target cell is already occupied.
    CellsOccupied { x: i16, y: i16 },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::NotStarted => write!(f, "game not started"),
            MoveError::GameOver => write!(f, "game is over"),
            MoveError::InvalidSlot { slot } => write!(f, "invalid block slot {}", slot),
            MoveError::EmptySlot { slot } => write!(f, "block slot {} is empty", slot),
            MoveError::UnknownShape { id } => write!(f, "unknown shape id {}", id.raw()),
            MoveError::OutOfBounds { x, y } => {
                write!(f, "target cell ({}, {}) is out of bounds", x, y)
            }
            MoveError::CellsOccupied { x, y } => {
                write!(f, "target cell ({}, {}) is occupied", x, y)
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// State-change notification drained via [`GameEngine::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    BoardChanged,
    BlocksChanged,
    ScoreChanged {
        current: u32,
        best: u32,
        is_new_best: bool,
    },
    GameOver {
        final_score: u32,
    },
    /// A spawned shape id was not in the catalog and was repaired to the
    /// single-cell shape. Indicates save corruption or a catalog mismatch.
    ShapeRepaired {
        requested: ShapeId,
    },
}

/// Everything that happened in one accepted move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub score: MoveScore,
    /// Total score after this move.
    pub total_score: u32,
    pub cleared: ClearResult,
    pub combo_streak: u32,
    /// Whether this move spent the last slot and a new set was spawned.
    pub spawned_new_set: bool,
    pub is_game_over: bool,
}

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub board_width: u8,
    pub board_height: u8,
    pub seed: u32,
    pub spawner: SpawnerConfig,
    pub scoring: ScoreConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            seed: 1,
            spawner: SpawnerConfig::default(),
            scoring: ScoreConfig::default(),
        }
    }
}

/// Aggregate session statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStats {
    pub score: u32,
    pub best_score: u32,
    pub move_count: u64,
    pub total_lines_cleared: u64,
    /// Millis between game start and the last accepted move.
    pub elapsed_ms: u64,
    pub difficulty_level: f32,
    pub overall_success_rate: f32,
    pub spawner: SpawnerStats,
}

/// The game engine: one session at a time, deterministic for a given
/// seed and move sequence.
#[derive(Debug)]
pub struct GameEngine {
    config: EngineConfig,
    library: ShapeLibrary,
    state: GameState,
    spawner: BlockSpawner,
    phase: GamePhase,
    /// Scratch buffer reused across moves so detection never allocates.
    line_buffer: LineBuffer,
    /// Next placement id; monotonically increasing, saturating.
    next_block_id: u32,
    events: Vec<GameEvent>,
}

impl GameEngine {
    pub fn new(config: EngineConfig, library: ShapeLibrary) -> Self {
        let state = GameState::new(config.board_width, config.board_height, 0, now_ms());
        let spawner = BlockSpawner::new(config.seed, config.spawner);
        Self {
            config,
            library,
            state,
            spawner,
            phase: GamePhase::NotStarted,
            line_buffer: LineBuffer::new(),
            next_block_id: 1,
            events: Vec::new(),
        }
    }

    /// Reassemble an engine from persisted parts. The phase is derived
    /// from the restored state.
    pub fn from_parts(
        config: EngineConfig,
        library: ShapeLibrary,
        state: GameState,
        spawner: BlockSpawner,
        next_block_id: u32,
    ) -> Self {
        let phase = if state.is_game_over {
            GamePhase::GameOver
        } else if state.move_count > 0 || !state.active_blocks.is_empty() {
            GamePhase::Playing
        } else {
            GamePhase::NotStarted
        };
        Self {
            config,
            library,
            state,
            spawner,
            phase,
            line_buffer: LineBuffer::new(),
            next_block_id: next_block_id.max(1),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn library(&self) -> &ShapeLibrary {
        &self.library
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn spawner(&self) -> &BlockSpawner {
        &self.spawner
    }

    pub fn next_block_id(&self) -> u32 {
        self.next_block_id
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            score: self.state.score,
            best_score: self.state.best_score,
            elapsed_ms: self
                .state
                .last_move_at_ms
                .saturating_sub(self.state.started_at_ms),
            move_count: self.state.move_count,
            total_lines_cleared: self.state.total_lines_cleared,
            difficulty_level: self.spawner.difficulty().level(),
            overall_success_rate: self.spawner.difficulty().overall_success_rate(),
            spawner: self.spawner.stats(),
        }
    }

    /// Drain the pending event queue.
    ///
    /// Events are change signals, not change payloads: per-move detail
    /// (cleared cell positions, line count, score breakdown) is returned
    /// on the [`MoveOutcome`] of the move that caused them, and the
    /// current board/slots are readable through [`Self::state`].
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a fresh game. The best score carries over; everything else
    /// resets. Spawns the first block set.
    pub fn new_game(&mut self) {
        let best = self.state.best_score;
        self.state = GameState::new(self.config.board_width, self.config.board_height, best, now_ms());
        self.next_block_id = 1;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::GameStarted);
        self.refill_blocks();
    }

    /// Start a fresh game on a new random stream. Difficulty history and
    /// aggregates reset along with the stream.
    pub fn new_game_seeded(&mut self, seed: u32) {
        self.spawner = BlockSpawner::new(seed, self.config.spawner);
        self.new_game();
    }

    /// Attempt to place the block in `slot` at `anchor`.
    ///
    /// Placement failures (out of bounds, occupied cells) are recorded as
    /// unsuccessful outcomes in the difficulty model; slot and phase
    /// errors are not, since no placement was attempted.
    pub fn try_place_block(&mut self, slot: usize, anchor: Anchor) -> Result<MoveOutcome, MoveError> {
        match self.phase {
            GamePhase::NotStarted => return Err(MoveError::NotStarted),
            GamePhase::GameOver => return Err(MoveError::GameOver),
            GamePhase::Playing => {}
        }
        if slot >= BLOCKS_PER_SET {
            return Err(MoveError::InvalidSlot { slot });
        }
        let block = self
            .state
            .active_blocks
            .get(slot)
            .ok_or(MoveError::EmptySlot { slot })?;
        let shape = self
            .library
            .get(block.shape)
            .ok_or(MoveError::UnknownShape { id: block.shape })?;

        let (ax, ay) = anchor;
        let block_id = self.next_block_id;
        if let Err(err) = place_atomic(
            &mut self.state.board,
            ax,
            ay,
            shape.offsets(),
            block_id,
            block.color_id,
        ) {
            self.spawner.record_placement(false);
            return Err(match err {
                PlacementError::OutOfBounds { x, y } => MoveError::OutOfBounds { x, y },
                PlacementError::Collision { x, y } => MoveError::CellsOccupied { x, y },
            });
        }

        // The move is committed from here on.
        self.next_block_id = self.next_block_id.saturating_add(1);
        self.state.active_blocks.take(slot);
        self.spawner.record_placement(true);
        self.events.push(GameEvent::BoardChanged);
        self.events.push(GameEvent::BlocksChanged);

        detect_full_lines(&self.state.board, &mut self.line_buffer);
        let lines = self.line_buffer.line_count() as u32;

        let (score, cleared) = if lines > 0 {
            self.state.combo = self.state.combo.incremented();
            let score = calculate_score(lines, self.state.combo, &self.config.scoring);
            let cleared = clear_lines(
                &mut self.state.board,
                &self.line_buffer.rows,
                &self.line_buffer.cols,
            );
            self.state.total_lines_cleared =
                self.state.total_lines_cleared.saturating_add(lines as u64);
            self.events.push(GameEvent::BoardChanged);
            (score, cleared)
        } else {
            self.state.combo = self.state.combo.reset();
            let score = calculate_score(0, self.state.combo, &self.config.scoring);
            (score, ClearResult::default())
        };

        if score.score_delta > 0 {
            self.state.score = self.state.score.saturating_add(score.score_delta);
            let is_new_best = self.state.score > self.state.best_score;
            if is_new_best {
                self.state.best_score = self.state.score;
            }
            self.events.push(GameEvent::ScoreChanged {
                current: self.state.score,
                best: self.state.best_score,
                is_new_best,
            });
        }

        self.state.move_count = self.state.move_count.saturating_add(1);
        self.state.last_move_at_ms = now_ms();

        let spawned_new_set = self.state.active_blocks.is_empty();
        if spawned_new_set {
            self.refill_blocks();
        }

        let is_game_over = !self
            .state
            .active_blocks
            .has_placeable_blocks(&self.state.board, &self.library);
        if is_game_over {
            self.state.is_game_over = true;
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver {
                final_score: self.state.score,
            });
        }

        Ok(MoveOutcome {
            score,
            total_score: self.state.score,
            cleared,
            combo_streak: self.state.combo.streak(),
            spawned_new_set,
            is_game_over,
        })
    }

    /// Score the move would earn, computed on a scratch board. Consumes
    /// no randomness and changes no live state, so the preview matches
    /// the subsequent [`Self::try_place_block`] exactly.
    pub fn preview_move_score(&self, slot: usize, anchor: Anchor) -> Result<MoveScore, MoveError> {
        match self.phase {
            GamePhase::NotStarted => return Err(MoveError::NotStarted),
            GamePhase::GameOver => return Err(MoveError::GameOver),
            GamePhase::Playing => {}
        }
        if slot >= BLOCKS_PER_SET {
            return Err(MoveError::InvalidSlot { slot });
        }
        let block = self
            .state
            .active_blocks
            .get(slot)
            .ok_or(MoveError::EmptySlot { slot })?;
        let shape = self
            .library
            .get(block.shape)
            .ok_or(MoveError::UnknownShape { id: block.shape })?;

        let (ax, ay) = anchor;
        let mut scratch = self.state.board.clone();
        if let Err(err) = place_atomic(
            &mut scratch,
            ax,
            ay,
            shape.offsets(),
            self.next_block_id,
            block.color_id,
        ) {
            return Err(match err {
                PlacementError::OutOfBounds { x, y } => MoveError::OutOfBounds { x, y },
                PlacementError::Collision { x, y } => MoveError::CellsOccupied { x, y },
            });
        }

        let mut buf = LineBuffer::new();
        detect_full_lines(&scratch, &mut buf);
        let lines = buf.line_count() as u32;
        let combo = if lines > 0 {
            self.state.combo.incremented()
        } else {
            self.state.combo.reset()
        };
        Ok(calculate_score(lines, combo, &self.config.scoring))
    }

    /// Whether placing the block in `slot` at `anchor` would be accepted.
    pub fn is_valid_move(&self, slot: usize, anchor: Anchor) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(block) = self.state.active_blocks.get(slot) else {
            return false;
        };
        let Some(shape) = self.library.get(block.shape) else {
            return false;
        };
        can_place(&self.state.board, anchor.0, anchor.1, shape.offsets()).is_ok()
    }

    /// Every valid anchor for the block in `slot`, in deterministic scan
    /// order. Empty when the slot is empty or nothing fits.
    pub fn valid_placements(&self, slot: usize) -> Vec<Anchor> {
        let Some(block) = self.state.active_blocks.get(slot) else {
            return Vec::new();
        };
        let Some(shape) = self.library.get(block.shape) else {
            return Vec::new();
        };
        find_valid_placements(&self.state.board, shape)
    }

    fn refill_blocks(&mut self) {
        let result = self.spawner.spawn_block_set(&self.state.board, &self.library);
        for &requested in &result.repaired {
            self.events.push(GameEvent::ShapeRepaired { requested });
        }
        let blocks = result.blocks.map(|b| PendingBlock {
            shape: b.shape,
            color_id: b.color_id,
        });
        self.state.active_blocks.refill(blocks);
        self.events.push(GameEvent::BlocksChanged);
    }
}

/// Wall-clock millis since the Unix epoch; 0 if the clock is before it.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
