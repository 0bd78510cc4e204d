//! Persistence module - saving and restoring game sessions
//!
//! This crate turns a live [`gridblocks_core::GameEngine`] into a stable
//! JSON snapshot and back. It is split along three seams:
//!
//! - [`data`]: the [`GameData`](data::GameData) DTO and its
//!   capture/restore conversions
//! - [`store`]: the [`KeyValueStore`](store::KeyValueStore) abstraction
//!   platform adapters implement, plus the in-memory test store
//! - [`repository`]: key layout, JSON encoding, and the lenient-load
//!   policy (a corrupt save reads as "no save")
//! - [`migration`]: scoring-formula version upgrades applied on load
//!
//! # Example
//!
//! ```
//! use gridblocks_core::engine::{EngineConfig, GameEngine};
//! use gridblocks_core::shapes::ShapeLibrary;
//! use gridblocks_persist::{GameData, MemoryStore, SaveRepository};
//!
//! let mut engine = GameEngine::new(EngineConfig::default(), ShapeLibrary::standard());
//! engine.new_game();
//!
//! let mut repo = SaveRepository::new(MemoryStore::new());
//! repo.save(&GameData::capture(&engine)).unwrap();
//!
//! let data = repo.load().unwrap();
//! let restored = data.restore(engine.config().clone(), ShapeLibrary::standard()).unwrap();
//! assert_eq!(restored.state().score, engine.state().score);
//! ```

pub mod data;
pub mod migration;
pub mod repository;
pub mod store;

pub use data::{GameData, SavedBlock, SavedCell, SAVE_SCHEMA_VERSION};
pub use migration::migrate_formula;
pub use repository::SaveRepository;
pub use store::{KeyValueStore, MemoryStore};
