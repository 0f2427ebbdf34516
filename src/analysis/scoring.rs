//! Technical-debt scoring
//!
//! A file's score is the sum of its smells' severity weights, capped:
//!
//! ```text
//! score = min(max_file_score, 100, Σ weight(severity))
//! weights: CRITICAL 10, MAJOR 5, MINOR 2, INFO 0.5   (configurable)
//! ```

use crate::config::ScoringConfig;
use crate::models::Severity;

/// Debt score for a set of severities, always within `0..=100`
pub fn debt_score<I>(severities: I, config: &ScoringConfig) -> f64
where
    I: IntoIterator<Item = Severity>,
{
    let total: f64 = severities
        .into_iter()
        .map(|s| config.weights.weight(s))
        .sum();
    let cap = if config.max_file_score.is_finite() {
        config.max_file_score.clamp(0.0, 100.0)
    } else {
        100.0
    };
    if total.is_finite() {
        total.clamp(0.0, cap)
    } else {
        cap
    }
}
