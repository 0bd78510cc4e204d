//! Core rules module - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and the move
//! pipeline. It has **zero dependencies** on UI, storage, or I/O, making it:
//!
//! - **Deterministic**: Same seed and move sequence produce identical games
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//! - **Fast**: Cached line counts and reusable buffers on the hot paths
//!
//! # Module Structure
//!
//! - [`board`]: WxH game board with maintained row/column fill counts
//! - [`shapes`]: Polyomino definitions and the 21-shape standard catalog
//! - [`placement`]: Placement validation and atomic execution
//! - [`lines`]: Full-line detection and intersection-safe clearing
//! - [`search`]: Deterministic enumeration of valid placements
//! - [`rng`]: Seeded LCG and weighted sampling
//! - [`difficulty`]: Adaptive difficulty from rolling placement history
//! - [`spawner`]: Safe block-set generation with challenge injection
//! - [`combo`]: Consecutive line-clear streak tracking
//! - [`scoring`]: Curve-driven score computation
//! - [`game_state`]: The aggregate state of one game in progress
//! - [`engine`]: The session state machine tying it all together
//!
//! # Game Rules
//!
//! - **Placement**: Blocks are placed anywhere they fit; there is no
//!   gravity and pieces never move after placement
//! - **Line clears**: Full rows *and* full columns clear simultaneously;
//!   a cell at an intersection clears exactly once
//! - **Block sets**: Three blocks at a time in fixed slots; a new set
//!   arrives only after all three are placed
//! - **Safety**: Every spawned set contains at least one placeable block
//!   unless nothing in the catalog fits anywhere
//! - **Game over**: When no remaining block has any valid placement
//!
//! # Example
//!
//! ```
//! use gridblocks_core::engine::{EngineConfig, GameEngine, GamePhase};
//! use gridblocks_core::shapes::ShapeLibrary;
//!
//! let mut engine = GameEngine::new(EngineConfig::default(), ShapeLibrary::standard());
//! engine.new_game();
//! assert_eq!(engine.phase(), GamePhase::Playing);
//!
//! // Place the first offered block at its first valid anchor.
//! let anchor = engine.valid_placements(0)[0];
//! let outcome = engine.try_place_block(0, anchor).unwrap();
//! assert!(!outcome.is_game_over);
//! ```

pub mod board;
pub mod combo;
pub mod difficulty;
pub mod engine;
pub mod game_state;
pub mod lines;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod search;
pub mod shapes;
pub mod spawner;

pub use gridblocks_types as types;

// Re-export commonly used types for convenience
pub use board::BoardState;
pub use combo::ComboState;
pub use difficulty::{DifficultyConfig, DifficultyModel};
pub use engine::{EngineConfig, GameEngine, GameEvent, GamePhase, MoveError, MoveOutcome};
pub use game_state::{ActiveBlocks, GameState, PendingBlock};
pub use lines::{clear_lines, detect_full_lines, ClearResult, LineBuffer};
pub use placement::{can_place, place_atomic, PlacementError};
pub use rng::{SeededRng, WeightedPicker};
pub use scoring::{calculate_score, Curve, MoveScore, ScoreConfig};
pub use search::{find_first_valid_placement, find_valid_placements, has_valid_placement};
pub use shapes::{ShapeDefinition, ShapeLibrary};
pub use spawner::{BlockSpawner, SpawnerConfig, SpawnerStats};
