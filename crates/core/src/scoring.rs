//! Scoring module - data-driven score computation
//!
//! The score of a move is a pure function of lines cleared and the combo
//! streak, shaped by two independent piecewise-linear curves:
//!
//! ```text
//! base        = lines_cleared * base_points_per_line          (saturating)
//! final_score = round(base * line_mult(lines) * combo_mult(streak))
//! ```
//!
//! Curves are defined by sorted `(x, y)` control points, linearly
//! interpolated between neighbors and clamped flat beyond the ends. The
//! config carries a formula version so persisted games can detect and
//! migrate stale scoring rules without touching already-earned scores.

use gridblocks_types::RoundingMode;

use crate::combo::ComboState;

/// Formula version produced by current builds.
pub const CURRENT_FORMULA_VERSION: u32 = 2;

/// A piecewise-linear curve over sorted control points.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: Vec<(f32, f32)>,
}

impl Curve {
    /// Build a curve. Panics if there are no points or the x values are
    /// not strictly ascending; a malformed curve is a config bug.
    pub fn new(points: Vec<(f32, f32)>) -> Self {
        assert!(!points.is_empty(), "curve requires at least one point");
        for pair in points.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "curve x values must be strictly ascending"
            );
        }
        Self { points }
    }

    /// Evaluate the curve at `x`: flat beyond the first/last point, linear
    /// interpolation between neighbors.
    pub fn evaluate(&self, x: f32) -> f32 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }
        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if x <= x1 {
                let t = (x - x0) / (x1 - x0);
                return y0 + t * (y1 - y0);
            }
        }
        last.1
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }
}

/// Data-driven scoring configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreConfig {
    base_points_per_line: u32,
    line_multiplier_curve: Curve,
    combo_multiplier_curve: Curve,
    rounding: RoundingMode,
    formula_version: u32,
}

impl ScoreConfig {
    pub fn new(
        base_points_per_line: u32,
        line_multiplier_curve: Curve,
        combo_multiplier_curve: Curve,
        rounding: RoundingMode,
        formula_version: u32,
    ) -> Self {
        Self {
            base_points_per_line,
            line_multiplier_curve,
            combo_multiplier_curve,
            rounding,
            formula_version,
        }
    }

    pub fn base_points_per_line(&self) -> u32 {
        self.base_points_per_line
    }

    pub fn line_multiplier_curve(&self) -> &Curve {
        &self.line_multiplier_curve
    }

    pub fn combo_multiplier_curve(&self) -> &Curve {
        &self.combo_multiplier_curve
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    pub fn formula_version(&self) -> u32 {
        self.formula_version
    }
}

impl Default for ScoreConfig {
    /// The standard ruleset: 10 points per line, multi-line bonuses up to
    /// 4x at five lines, combo bonus of +10% per streak step from the
    /// second consecutive clear, flat beyond streak 10.
    fn default() -> Self {
        Self {
            base_points_per_line: 10,
            line_multiplier_curve: Curve::new(vec![
                (1.0, 1.0),
                (2.0, 1.5),
                (3.0, 2.0),
                (4.0, 3.0),
                (5.0, 4.0),
            ]),
            combo_multiplier_curve: Curve::new(vec![
                (0.0, 1.0),
                (1.0, 1.0),
                (2.0, 1.1),
                (10.0, 1.9),
            ]),
            rounding: RoundingMode::Nearest,
            formula_version: CURRENT_FORMULA_VERSION,
        }
    }
}

/// Score breakdown for one move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveScore {
    /// Lines cleared by the move.
    pub lines_cleared: u32,
    /// `lines * base_points_per_line`, before multipliers.
    pub base_score: u32,
    pub line_multiplier: f32,
    pub combo_multiplier: f32,
    /// Final rounded, clamped score added to the total.
    pub score_delta: u32,
}

/// Compute the score for a move.
///
/// A move that cleared no lines yields the zero result with the current
/// combo multiplier reported; the caller is responsible for resetting the
/// combo in that case.
pub fn calculate_score(lines_cleared: u32, combo: ComboState, config: &ScoreConfig) -> MoveScore {
    let combo_multiplier = combo.multiplier(config);
    if lines_cleared == 0 {
        return MoveScore {
            lines_cleared: 0,
            base_score: 0,
            line_multiplier: 0.0,
            combo_multiplier,
            score_delta: 0,
        };
    }

    let base_score = lines_cleared.saturating_mul(config.base_points_per_line());
    let line_multiplier = config.line_multiplier_curve().evaluate(lines_cleared as f32);

    let raw = base_score as f64 * line_multiplier as f64 * combo_multiplier as f64;
    let rounded = config.rounding().apply(raw);
    let score_delta = if rounded <= 0.0 {
        0
    } else if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    };

    MoveScore {
        lines_cleared,
        base_score,
        line_multiplier,
        combo_multiplier,
        score_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_interpolation() {
        let curve = Curve::new(vec![(0.0, 0.0), (10.0, 100.0)]);
        assert_eq!(curve.evaluate(5.0), 50.0);
        assert_eq!(curve.evaluate(2.5), 25.0);
    }

    #[test]
    fn test_curve_flat_beyond_ends() {
        let curve = Curve::new(vec![(1.0, 1.0), (4.0, 3.0)]);
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert_eq!(curve.evaluate(-5.0), 1.0);
        assert_eq!(curve.evaluate(100.0), 3.0);
    }

    #[test]
    fn test_curve_single_point() {
        let curve = Curve::new(vec![(3.0, 7.0)]);
        assert_eq!(curve.evaluate(0.0), 7.0);
        assert_eq!(curve.evaluate(3.0), 7.0);
        assert_eq!(curve.evaluate(9.0), 7.0);
    }

    #[test]
    #[should_panic(expected = "strictly ascending")]
    fn test_curve_rejects_unsorted_points() {
        let _ = Curve::new(vec![(2.0, 1.0), (1.0, 2.0)]);
    }

    #[test]
    fn test_zero_lines_zero_score() {
        let result = calculate_score(0, ComboState::new(), &ScoreConfig::default());
        assert_eq!(result.score_delta, 0);
        assert_eq!(result.base_score, 0);
        assert_eq!(result.lines_cleared, 0);
        // Multiplier is still reported for UI feedback.
        assert!((result.combo_multiplier - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_line_first_clear_scores_ten() {
        let combo = ComboState::new().incremented(); // streak 1
        let result = calculate_score(1, combo, &ScoreConfig::default());
        assert_eq!(result.base_score, 10);
        assert_eq!(result.score_delta, 10);
    }

    #[test]
    fn test_second_consecutive_clear_scores_eleven() {
        let combo = ComboState::from_streak(2);
        let result = calculate_score(1, combo, &ScoreConfig::default());
        assert!((result.combo_multiplier - 1.1).abs() < 1e-6);
        assert_eq!(result.score_delta, 11);
    }

    #[test]
    fn test_multi_line_multiplier() {
        let combo = ComboState::from_streak(1);
        let result = calculate_score(2, combo, &ScoreConfig::default());
        // 2 lines * 10 * 1.5 * 1.0 = 30.
        assert_eq!(result.base_score, 20);
        assert_eq!(result.score_delta, 30);
    }

    #[test]
    fn test_five_lines_max_multiplier() {
        let combo = ComboState::from_streak(1);
        let result = calculate_score(5, combo, &ScoreConfig::default());
        // 5 * 10 * 4.0 = 200.
        assert_eq!(result.score_delta, 200);
    }

    #[test]
    fn test_score_clamps_at_u32_max() {
        let config = ScoreConfig::new(
            u32::MAX,
            Curve::new(vec![(1.0, 1000.0)]),
            Curve::new(vec![(0.0, 1000.0)]),
            RoundingMode::Nearest,
            CURRENT_FORMULA_VERSION,
        );
        let result = calculate_score(5, ComboState::from_streak(1), &config);
        assert_eq!(result.base_score, u32::MAX);
        assert_eq!(result.score_delta, u32::MAX);
    }

    #[test]
    fn test_rounding_modes_change_delta() {
        // 1 line * 10 * 1.0 * 1.05 = 10.5
        let combo_curve = Curve::new(vec![(0.0, 1.05)]);
        let make = |mode| {
            ScoreConfig::new(
                10,
                Curve::new(vec![(1.0, 1.0)]),
                combo_curve.clone(),
                mode,
                CURRENT_FORMULA_VERSION,
            )
        };
        let combo = ComboState::from_streak(1);
        assert_eq!(calculate_score(1, combo, &make(RoundingMode::Nearest)).score_delta, 11);
        assert_eq!(calculate_score(1, combo, &make(RoundingMode::Floor)).score_delta, 10);
        assert_eq!(calculate_score(1, combo, &make(RoundingMode::Ceiling)).score_delta, 11);
        assert_eq!(calculate_score(1, combo, &make(RoundingMode::Truncate)).score_delta, 10);
    }

    #[test]
    fn test_default_config_version_is_current() {
        assert_eq!(
            ScoreConfig::default().formula_version(),
            CURRENT_FORMULA_VERSION
        );
    }
}
