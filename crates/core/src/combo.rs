//! Combo module - consecutive line-clear streak tracking
//!
//! A streak counts moves that cleared at least one line with no
//! intervening line-less move. The multiplier applied to scores is read
//! from [`ScoreConfig::combo_multiplier_curve`] as a function of the
//! streak; [`ComboState`] only carries the streak itself.
//!
//! `ComboState` is a plain value: `incremented`/`reset` return new values
//! rather than mutating in place.

use crate::scoring::ScoreConfig;

/// Current combo streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboState {
    streak: u32,
}

impl ComboState {
    pub fn new() -> Self {
        Self { streak: 0 }
    }

    /// Restore from a persisted streak.
    pub fn from_streak(streak: u32) -> Self {
        Self { streak }
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// The streak after a move that cleared at least one line.
    #[must_use]
    pub fn incremented(self) -> Self {
        Self {
            streak: self.streak.saturating_add(1),
        }
    }

    /// The streak after a move that cleared nothing.
    #[must_use]
    pub fn reset(self) -> Self {
        Self { streak: 0 }
    }

    /// Multiplier for this streak under the given scoring config.
    pub fn multiplier(&self, config: &ScoreConfig) -> f32 {
        config.combo_multiplier_curve().evaluate(self.streak as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(ComboState::new().streak(), 0);
        assert_eq!(ComboState::default().streak(), 0);
    }

    #[test]
    fn test_increment_and_reset_are_values() {
        let combo = ComboState::new();
        let after = combo.incremented().incremented();
        assert_eq!(after.streak(), 2);
        // Original is untouched.
        assert_eq!(combo.streak(), 0);
        assert_eq!(after.reset().streak(), 0);
    }

    #[test]
    fn test_increment_saturates() {
        let combo = ComboState::from_streak(u32::MAX);
        assert_eq!(combo.incremented().streak(), u32::MAX);
    }

    #[test]
    fn test_multiplier_follows_default_curve() {
        let config = ScoreConfig::default();
        let one = ComboState::from_streak(1);
        let two = ComboState::from_streak(2);
        assert!((one.multiplier(&config) - 1.0).abs() < 1e-6);
        assert!((two.multiplier(&config) - 1.1).abs() < 1e-6);
    }
}
