//! Spawner module - adaptive random block-set generation
//!
//! Each set of three blocks is sampled from difficulty-adjusted weights:
//! fewer cells means a heavier base weight, and the difficulty level
//! up-weights larger/irregular shapes. When the player over-performs, the
//! last slot may be replaced with a "challenge" shape of four or more
//! cells.
//!
//! Safety contract: every generated set contains at least one shape
//! placeable on the current board, unless no shape in the library fits
//! anywhere at all. The weighted sampler retries a bounded number of
//! times, then a deterministic fallback forces slot 0 to a known-safe
//! shape. If literally nothing fits, the set degrades to three
//! single-cell blocks.
//!
//! Every emitted shape id is re-validated against the library; unknown
//! ids are repaired to the single-cell shape (and reported, so the engine
//! can surface the diagnostic) rather than failing the spawn.

use arrayvec::ArrayVec;
use gridblocks_types::{ShapeId, BLOCKS_PER_SET, COLOR_COUNT};

use crate::board::BoardState;
use crate::difficulty::{DifficultyConfig, DifficultyModel};
use crate::rng::{SeededRng, WeightedPicker};
use crate::search::has_valid_placement;
use crate::shapes::ShapeLibrary;

/// Cells at or above this count qualify a shape as a challenge shape.
const CHALLENGE_MIN_CELLS: usize = 4;

/// Share of fallback filler slots drawn from the safe pool.
const SAFE_FILL_BIAS: f32 = 0.7;

/// One block offered to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedBlock {
    pub shape: ShapeId,
    pub color_id: u8,
}

/// A complete spawned set plus diagnostics about how it was produced.
#[derive(Debug, Clone)]
pub struct SpawnResult {
    pub blocks: [SpawnedBlock; BLOCKS_PER_SET],
    /// Whether the guaranteed-safe fallback generator produced this set.
    pub used_fallback: bool,
    /// Whether a challenge shape was injected into the last slot.
    pub challenge_injected: bool,
    /// Ids that were generated but missing from the library and repaired
    /// to the single-cell shape. Non-empty only on data corruption.
    pub repaired: Vec<ShapeId>,
}

/// Spawner tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnerConfig {
    /// Weighted-sampling attempts before the safe fallback takes over.
    pub safety_attempts: u32,
    pub difficulty: DifficultyConfig,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            safety_attempts: 8,
            difficulty: DifficultyConfig::default(),
        }
    }
}

/// Aggregate spawner counters, exposed through the engine's stats query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnerStats {
    pub sets_spawned: u64,
    pub safety_fallbacks: u64,
    pub challenges_injected: u64,
    pub repairs: u64,
}

/// Adaptive random block spawner.
#[derive(Debug, Clone)]
pub struct BlockSpawner {
    rng: SeededRng,
    difficulty: DifficultyModel,
    config: SpawnerConfig,
    stats: SpawnerStats,
}

impl BlockSpawner {
    pub fn new(seed: u32, config: SpawnerConfig) -> Self {
        Self {
            rng: SeededRng::new(seed),
            difficulty: DifficultyModel::new(config.difficulty),
            config,
            stats: SpawnerStats::default(),
        }
    }

    /// Restore a spawner from persisted state. The difficulty model must
    /// carry its restored rolling window, or the challenge gate (and with
    /// it the RNG stream) diverges from the saved session.
    pub fn restore(
        rng_state: u32,
        config: SpawnerConfig,
        difficulty: DifficultyModel,
        stats: SpawnerStats,
    ) -> Self {
        Self {
            rng: SeededRng::from_state(rng_state),
            difficulty,
            config,
            stats,
        }
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn difficulty(&self) -> &DifficultyModel {
        &self.difficulty
    }

    pub fn stats(&self) -> SpawnerStats {
        self.stats
    }

    /// Feed a placement outcome into the difficulty model.
    pub fn record_placement(&mut self, success: bool) {
        self.difficulty.record_placement(success);
    }

    /// Per-shape sampling weight at the current difficulty level.
    ///
    /// Base weight favors small shapes; the difficulty term up-weights
    /// complex shapes as the level rises.
    fn shape_weight(&self, cell_count: usize, complexity: u32) -> f32 {
        let base = 1.0 / cell_count as f32;
        let level = self.difficulty.normalized_level();
        let complexity_factor = complexity as f32 / 9.0;
        base * (1.0 + level * complexity_factor * 3.0)
    }

    fn random_color(&mut self) -> u8 {
        1 + self.rng.next_range(COLOR_COUNT as u32) as u8
    }

    /// Whether a candidate set satisfies the safety contract on `board`.
    pub fn is_block_set_safe(
        &self,
        board: &BoardState,
        library: &ShapeLibrary,
        shapes: &[ShapeId],
    ) -> bool {
        shapes.iter().any(|&id| {
            library
                .get(id)
                .is_some_and(|shape| has_valid_placement(board, shape))
        })
    }

    /// Produce the next set of three blocks.
    pub fn spawn_block_set(&mut self, board: &BoardState, library: &ShapeLibrary) -> SpawnResult {
        let picker = WeightedPicker::new(
            library
                .iter()
                .map(|s| (s.id(), self.shape_weight(s.cell_count(), s.complexity()))),
        )
        .expect("library invariant: at least the single-cell shape is pickable");

        let mut used_fallback = false;
        let mut challenge_injected = false;
        let mut candidate: Vec<ShapeId> = Vec::with_capacity(BLOCKS_PER_SET);

        let mut attempt = 0;
        loop {
            candidate.clear();
            for _ in 0..BLOCKS_PER_SET {
                candidate.push(*picker.pick(&mut self.rng));
            }

            // Over-performing players get a harder shape in the last slot.
            if self.difficulty.wants_challenge() {
                if let Some(id) = self.pick_challenge_shape(library) {
                    candidate[BLOCKS_PER_SET - 1] = id;
                    challenge_injected = true;
                }
            }

            if self.is_block_set_safe(board, library, &candidate) {
                break;
            }

            attempt += 1;
            if attempt >= self.config.safety_attempts {
                candidate = self.spawn_guaranteed_safe(board, library);
                used_fallback = true;
                challenge_injected = false;
                break;
            }
        }

        let mut repaired = Vec::new();
        let mut blocks: ArrayVec<SpawnedBlock, BLOCKS_PER_SET> = ArrayVec::new();
        for &id in candidate.iter().take(BLOCKS_PER_SET) {
            // Unknown ids indicate generator/library desync; repair to the
            // single-cell shape instead of failing the spawn.
            let shape = if library.contains(id) {
                id
            } else {
                debug_assert!(false, "spawner produced unknown shape id {:?}", id);
                repaired.push(id);
                ShapeId::SINGLE
            };
            blocks.push(SpawnedBlock {
                shape,
                color_id: self.random_color(),
            });
        }
        // Force the output length to exactly one set, whatever happened above.
        while blocks.len() < BLOCKS_PER_SET {
            repaired.push(ShapeId(0));
            blocks.push(SpawnedBlock {
                shape: ShapeId::SINGLE,
                color_id: self.random_color(),
            });
        }

        self.stats.sets_spawned = self.stats.sets_spawned.saturating_add(1);
        if used_fallback {
            self.stats.safety_fallbacks = self.stats.safety_fallbacks.saturating_add(1);
        }
        if challenge_injected {
            self.stats.challenges_injected = self.stats.challenges_injected.saturating_add(1);
        }
        self.stats.repairs = self.stats.repairs.saturating_add(repaired.len() as u64);

        SpawnResult {
            blocks: blocks
                .into_inner()
                .expect("block set filled to exactly BLOCKS_PER_SET"),
            used_fallback,
            challenge_injected,
            repaired,
        }
    }

    /// Uniform pick among shapes large enough to qualify as a challenge.
    fn pick_challenge_shape(&mut self, library: &ShapeLibrary) -> Option<ShapeId> {
        let pool: Vec<ShapeId> = library
            .iter()
            .filter(|s| s.cell_count() >= CHALLENGE_MIN_CELLS)
            .map(|s| s.id())
            .collect();
        if pool.is_empty() {
            return None;
        }
        let idx = self.rng.next_range(pool.len() as u32) as usize;
        Some(pool[idx])
    }

    /// Deterministic fallback: force slot 0 to a shape with a valid
    /// placement, fill the rest with a safe/random mix. Degrades to three
    /// single-cell blocks when nothing in the library fits anywhere.
    fn spawn_guaranteed_safe(&mut self, board: &BoardState, library: &ShapeLibrary) -> Vec<ShapeId> {
        let safe_pool: Vec<ShapeId> = library
            .iter()
            .filter(|s| has_valid_placement(board, s))
            .map(|s| s.id())
            .collect();

        if safe_pool.is_empty() {
            return vec![ShapeId::SINGLE; BLOCKS_PER_SET];
        }

        let all_ids = library.ids();
        let mut set = Vec::with_capacity(BLOCKS_PER_SET);
        let first = safe_pool[self.rng.next_range(safe_pool.len() as u32) as usize];
        set.push(first);
        for _ in 1..BLOCKS_PER_SET {
            let id = if self.rng.next_f32() < SAFE_FILL_BIAS {
                safe_pool[self.rng.next_range(safe_pool.len() as u32) as usize]
            } else {
                all_ids[self.rng.next_range(all_ids.len() as u32) as usize]
            };
            set.push(id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridblocks_types::CellState;

    fn full_board(width: u8, height: u8) -> BoardState {
        let mut board = BoardState::new(width, height);
        for y in 0..height as i8 {
            for x in 0..width as i8 {
                board.fill_cell(x, y, CellState::filled(1, 1));
            }
        }
        board
    }

    #[test]
    fn test_spawn_produces_exactly_one_set() {
        let mut spawner = BlockSpawner::new(42, SpawnerConfig::default());
        let board = BoardState::new(8, 8);
        let library = ShapeLibrary::standard();
        let result = spawner.spawn_block_set(&board, &library);
        assert_eq!(result.blocks.len(), BLOCKS_PER_SET);
        for block in &result.blocks {
            assert!(library.contains(block.shape));
            assert!(block.color_id >= 1 && block.color_id <= COLOR_COUNT);
        }
    }

    #[test]
    fn test_spawn_deterministic_for_same_seed() {
        let board = BoardState::new(8, 8);
        let library = ShapeLibrary::standard();
        let mut a = BlockSpawner::new(777, SpawnerConfig::default());
        let mut b = BlockSpawner::new(777, SpawnerConfig::default());
        for _ in 0..20 {
            let ra = a.spawn_block_set(&board, &library);
            let rb = b.spawn_block_set(&board, &library);
            assert_eq!(ra.blocks, rb.blocks);
        }
    }

    #[test]
    fn test_safety_on_nearly_full_board() {
        let library = ShapeLibrary::standard();
        // Only one open cell: every safe set must include the single.
        let mut board = full_board(4, 4);
        board.clear_cell(2, 2);

        for seed in 0..50 {
            let mut spawner = BlockSpawner::new(seed, SpawnerConfig::default());
            let result = spawner.spawn_block_set(&board, &library);
            let ids: Vec<ShapeId> = result.blocks.iter().map(|b| b.shape).collect();
            assert!(
                spawner.is_block_set_safe(&board, &library, &ids),
                "unsafe set {:?} from seed {}",
                ids,
                seed
            );
        }
    }

    #[test]
    fn test_completely_full_board_degrades_to_singles() {
        let library = ShapeLibrary::standard();
        let board = full_board(4, 4);
        let mut spawner = BlockSpawner::new(3, SpawnerConfig::default());
        let result = spawner.spawn_block_set(&board, &library);
        assert!(result.used_fallback);
        for block in &result.blocks {
            assert_eq!(block.shape, ShapeId::SINGLE);
        }
    }

    #[test]
    fn test_fallback_counted_in_stats() {
        let library = ShapeLibrary::standard();
        let board = full_board(4, 4);
        let mut spawner = BlockSpawner::new(3, SpawnerConfig::default());
        spawner.spawn_block_set(&board, &library);
        assert_eq!(spawner.stats().sets_spawned, 1);
        assert_eq!(spawner.stats().safety_fallbacks, 1);
    }

    #[test]
    fn test_challenge_injected_when_over_performing() {
        let library = ShapeLibrary::standard();
        let board = BoardState::new(8, 8);
        let mut spawner = BlockSpawner::new(11, SpawnerConfig::default());
        for _ in 0..10 {
            spawner.record_placement(true);
        }
        assert!(spawner.difficulty().wants_challenge());

        // On an empty board every set is safe, so the challenge survives.
        let mut saw_challenge = false;
        for _ in 0..10 {
            let result = spawner.spawn_block_set(&board, &library);
            if result.challenge_injected {
                let last = result.blocks[BLOCKS_PER_SET - 1];
                let cells = library.get(last.shape).unwrap().cell_count();
                assert!(cells >= CHALLENGE_MIN_CELLS);
                saw_challenge = true;
            }
        }
        assert!(saw_challenge);
    }

    #[test]
    fn test_no_challenge_without_history() {
        let library = ShapeLibrary::standard();
        let board = BoardState::new(8, 8);
        let mut spawner = BlockSpawner::new(11, SpawnerConfig::default());
        let result = spawner.spawn_block_set(&board, &library);
        assert!(!result.challenge_injected);
    }

    #[test]
    fn test_difficulty_shifts_weights_toward_complex_shapes() {
        let easy = BlockSpawner::new(1, SpawnerConfig::default());
        let mut hard = BlockSpawner::new(1, SpawnerConfig::default());
        for _ in 0..200 {
            hard.record_placement(true);
        }
        // square3: 9 cells, complexity 9.
        let easy_w = easy.shape_weight(9, 9);
        let hard_w = hard.shape_weight(9, 9);
        assert!(hard_w > easy_w);
        // The single keeps its base weight advantage either way.
        assert!(easy.shape_weight(1, 1) > easy_w);
    }

    fn restore_from(original: &BlockSpawner) -> BlockSpawner {
        let d = original.difficulty();
        BlockSpawner::restore(
            original.rng_state(),
            SpawnerConfig::default(),
            DifficultyModel::restore(
                *d.config(),
                d.level(),
                d.total_placements(),
                d.total_successes(),
                d.history().to_vec(),
                d.history_cursor(),
            ),
            original.stats(),
        )
    }

    #[test]
    fn test_restore_round_trip() {
        let library = ShapeLibrary::standard();
        let board = BoardState::new(8, 8);
        let mut original = BlockSpawner::new(555, SpawnerConfig::default());
        original.record_placement(true);
        original.spawn_block_set(&board, &library);

        let mut restored = restore_from(&original);
        let a = original.spawn_block_set(&board, &library);
        let b = restored.spawn_block_set(&board, &library);
        assert_eq!(a.blocks, b.blocks);
    }

    #[test]
    fn test_restore_with_hot_challenge_window_stays_in_lockstep() {
        let library = ShapeLibrary::standard();
        let board = BoardState::new(8, 8);
        let mut original = BlockSpawner::new(808, SpawnerConfig::default());
        // A full-success window arms the challenge gate, which draws
        // extra randomness on every spawn. The restored spawner must
        // reproduce those draws exactly.
        for _ in 0..10 {
            original.record_placement(true);
        }
        assert!(original.difficulty().wants_challenge());

        let mut restored = restore_from(&original);
        assert!(restored.difficulty().wants_challenge());
        for _ in 0..20 {
            let a = original.spawn_block_set(&board, &library);
            let b = restored.spawn_block_set(&board, &library);
            assert_eq!(a.blocks, b.blocks);
            assert_eq!(a.challenge_injected, b.challenge_injected);
            assert_eq!(original.rng_state(), restored.rng_state());
        }
    }

    #[test]
    fn test_no_repairs_with_consistent_library() {
        let library = ShapeLibrary::standard();
        let board = BoardState::new(8, 8);
        let mut spawner = BlockSpawner::new(21, SpawnerConfig::default());
        for _ in 0..50 {
            let result = spawner.spawn_block_set(&board, &library);
            assert!(result.repaired.is_empty());
        }
        assert_eq!(spawner.stats().repairs, 0);
    }
}
