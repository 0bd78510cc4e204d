//! Repository module - saved-game storage policy over a key-value store
//!
//! The repository owns the key layout and the JSON encoding. Saves go
//! under a single fixed key; the best score is duplicated under its own
//! key so it survives save deletion and corrupt saves.
//!
//! Load is lenient by policy: a missing key, unreadable JSON, or a failed
//! store read all surface as "no save" rather than an error, so a corrupt
//! save never blocks starting a fresh game. Writes still propagate
//! errors; losing a save silently is not acceptable.

use anyhow::{Context, Result};

use crate::data::GameData;
use crate::migration::migrate_formula;
use crate::store::KeyValueStore;

const SAVE_KEY: &str = "gridblocks.save";
const BEST_SCORE_KEY: &str = "gridblocks.best_score";

/// Saved-game repository over any [`KeyValueStore`].
#[derive(Debug)]
pub struct SaveRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SaveRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist a snapshot, updating the standalone best-score key too.
    pub fn save(&mut self, data: &GameData) -> Result<()> {
        let json = serde_json::to_string(data).context("serializing saved game")?;
        self.store
            .set_string(SAVE_KEY, &json)
            .context("writing saved game")?;
        let known_best = self.load_best_score().max(data.best_score);
        self.store
            .set_i64(BEST_SCORE_KEY, i64::from(known_best))
            .context("writing best score")?;
        self.store.flush().context("flushing store")
    }

    /// Load the saved snapshot, if a readable one exists.
    ///
    /// Snapshots written under an older scoring formula are migrated in
    /// memory before being returned.
    pub fn load(&self) -> Option<GameData> {
        let json = self.store.get_string(SAVE_KEY).ok().flatten()?;
        let mut data: GameData = serde_json::from_str(&json).ok()?;
        migrate_formula(&mut data);
        Some(data)
    }

    /// Whether a save exists, readable or not.
    pub fn has_save(&self) -> bool {
        self.store.contains(SAVE_KEY).unwrap_or(false)
    }

    /// Remove the saved game. The best score is kept.
    pub fn clear_save(&mut self) -> Result<()> {
        self.store.delete(SAVE_KEY).context("deleting saved game")?;
        self.store.flush().context("flushing store")
    }

    /// Best score on record; 0 when none has been written.
    pub fn load_best_score(&self) -> u32 {
        self.store
            .get_i64(BEST_SCORE_KEY)
            .ok()
            .flatten()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0)
    }

    /// Record a best score if it beats the stored one.
    pub fn update_best_score(&mut self, score: u32) -> Result<()> {
        if score > self.load_best_score() {
            self.store
                .set_i64(BEST_SCORE_KEY, i64::from(score))
                .context("writing best score")?;
            self.store.flush().context("flushing store")?;
        }
        Ok(())
    }
}
