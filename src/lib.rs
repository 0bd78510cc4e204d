//! Gridblocks (workspace facade crate).
//!
//! This package keeps the public `gridblocks::{core,persist,types}` API in one
//! place while the implementation lives in dedicated crates under `crates/`.

pub use gridblocks_core as core;
pub use gridblocks_persist as persist;
pub use gridblocks_types as types;
