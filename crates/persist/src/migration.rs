//! Migration module - scoring-formula version upgrades on load
//!
//! Scores already earned are historical facts; a formula change only
//! affects moves made after it ships. A migration therefore bumps the
//! recorded version and leaves every score field untouched.

use gridblocks_core::scoring::CURRENT_FORMULA_VERSION;

use crate::data::GameData;

/// Bring a snapshot up to the current scoring-formula version.
///
/// Returns `true` if the snapshot was changed.
pub fn migrate_formula(data: &mut GameData) -> bool {
    if data.score_formula_version >= CURRENT_FORMULA_VERSION {
        return false;
    }
    data.score_formula_version = CURRENT_FORMULA_VERSION;
    true
}
