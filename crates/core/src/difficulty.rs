//! Difficulty module - adaptive difficulty from rolling placement history
//!
//! The model tracks recent placement outcomes in a fixed-capacity circular
//! window. Once the window holds at least [`MIN_SAMPLES`] outcomes, each
//! new outcome nudges the difficulty level by
//! `(recent_success_rate - target) * adaptation_rate`, clamped to the
//! configured range. Players who keep succeeding drift toward harder
//! shape mixes; players who keep failing drift toward easier ones.

/// Minimum window occupancy before the level starts adapting.
pub const MIN_SAMPLES: usize = 5;

/// Tuning for the difficulty model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    pub min_level: f32,
    pub max_level: f32,
    pub initial_level: f32,
    /// Success rate the model steers toward.
    pub target_success_rate: f32,
    /// Damping factor on each adjustment step.
    pub adaptation_rate: f32,
    /// Capacity of the rolling outcome window.
    pub history_capacity: usize,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            min_level: 0.0,
            max_level: 1.0,
            initial_level: 0.3,
            target_success_rate: 0.7,
            adaptation_rate: 0.1,
            history_capacity: 20,
        }
    }
}

/// Adaptive difficulty model.
#[derive(Debug, Clone)]
pub struct DifficultyModel {
    config: DifficultyConfig,
    level: f32,
    /// Circular outcome window.
    history: Vec<bool>,
    cursor: usize,
    filled: usize,
    total_placements: u64,
    total_successes: u64,
}

impl DifficultyModel {
    pub fn new(config: DifficultyConfig) -> Self {
        assert!(
            config.min_level <= config.max_level,
            "difficulty range inverted"
        );
        assert!(config.history_capacity > 0, "history capacity must be > 0");
        let level = config
            .initial_level
            .clamp(config.min_level, config.max_level);
        Self {
            config,
            level,
            history: Vec::with_capacity(config.history_capacity),
            cursor: 0,
            filled: 0,
            total_placements: 0,
            total_successes: 0,
        }
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Current difficulty level, always within `[min_level, max_level]`.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Normalized level in `[0, 1]` across the configured range.
    pub fn normalized_level(&self) -> f32 {
        let span = self.config.max_level - self.config.min_level;
        if span <= 0.0 {
            return 0.0;
        }
        (self.level - self.config.min_level) / span
    }

    /// Success rate over the rolling window; 0 when the window is empty.
    pub fn recent_success_rate(&self) -> f32 {
        if self.filled == 0 {
            return 0.0;
        }
        let successes = self.history.iter().filter(|&&s| s).count();
        successes as f32 / self.filled as f32
    }

    /// Success rate over every recorded placement.
    pub fn overall_success_rate(&self) -> f32 {
        if self.total_placements == 0 {
            return 0.0;
        }
        self.total_successes as f32 / self.total_placements as f32
    }

    pub fn sample_count(&self) -> usize {
        self.filled
    }

    pub fn total_placements(&self) -> u64 {
        self.total_placements
    }

    pub fn total_successes(&self) -> u64 {
        self.total_successes
    }

    /// Raw rolling window, in storage order. Persisted together with
    /// [`Self::history_cursor`] so a restored model keeps adapting (and
    /// gating challenges) exactly where the original left off.
    pub fn history(&self) -> &[bool] {
        &self.history
    }

    /// Write position inside the rolling window.
    pub fn history_cursor(&self) -> usize {
        self.cursor
    }

    /// Record one placement outcome and adapt the level.
    pub fn record_placement(&mut self, success: bool) {
        if self.history.len() < self.config.history_capacity {
            self.history.push(success);
        } else {
            self.history[self.cursor] = success;
        }
        self.cursor = (self.cursor + 1) % self.config.history_capacity;
        self.filled = self.filled.max(self.history.len());

        self.total_placements = self.total_placements.saturating_add(1);
        if success {
            self.total_successes = self.total_successes.saturating_add(1);
        }

        if self.filled >= MIN_SAMPLES {
            let delta = (self.recent_success_rate() - self.config.target_success_rate)
                * self.config.adaptation_rate;
            self.level =
                (self.level + delta).clamp(self.config.min_level, self.config.max_level);
        }
    }

    /// Whether the player is over-performing enough to warrant a challenge
    /// shape (recent success rate above target by a fixed margin).
    pub fn wants_challenge(&self) -> bool {
        self.filled >= MIN_SAMPLES
            && self.recent_success_rate() > self.config.target_success_rate + 0.15
    }

    /// Restore persisted state: level, totals, and the rolling window.
    ///
    /// The window must round-trip exactly, otherwise a restored model
    /// would adapt (and gate challenge shapes) differently from the live
    /// one and desynchronize the spawn stream. Oversized histories are
    /// truncated to the configured capacity and the cursor re-bounded.
    pub fn restore(
        config: DifficultyConfig,
        level: f32,
        placements: u64,
        successes: u64,
        mut history: Vec<bool>,
        cursor: usize,
    ) -> Self {
        let mut model = Self::new(config);
        model.level = level.clamp(config.min_level, config.max_level);
        model.total_placements = placements;
        model.total_successes = successes.min(placements);
        history.truncate(config.history_capacity);
        model.cursor = if history.len() < config.history_capacity {
            history.len()
        } else {
            cursor % config.history_capacity
        };
        model.filled = history.len();
        model.history = history;
        model
    }
}

impl Default for DifficultyModel {
    fn default() -> Self {
        Self::new(DifficultyConfig::default())
    }
}
