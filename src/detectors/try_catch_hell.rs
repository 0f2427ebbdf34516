//! Try-catch hell detector
//!
//! Flags methods whose error handling has taken over: deeply nested `try`
//! blocks, or a large number of `catch` clauses. Either pattern buries the
//! happy path and usually means exceptions are being used for control flow.
//!
//! Severity is the worse of the two measurements. Thresholds are configured
//! with the `nesting_` and `catches_` key prefixes.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::{body_lines, method_pointer, word_positions};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{count_word, MethodDecl, SourceFile};
use anyhow::Result;

/// Default nesting tiers: more than 2 / 3 / 4 nested try blocks
const NESTING_TIERS: SeverityTiers = SeverityTiers::above(2.0, 3.0, 4.0);
/// Default catch tiers: more than 5 / 8 / 12 catch clauses
const CATCH_TIERS: SeverityTiers = SeverityTiers::above(5.0, 8.0, 12.0);

pub struct TryCatchHellDetector {
    nesting: SeverityTiers,
    catches: SeverityTiers,
}

impl TryCatchHellDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            nesting: NESTING_TIERS.configured(&config, "nesting_"),
            catches: CATCH_TIERS.configured(&config, "catches_"),
        }
    }
}

impl Default for TryCatchHellDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Deepest `try` nesting and number of `catch` clauses in a method body
fn measure(file: &SourceFile, method: &MethodDecl) -> (usize, usize) {
    let mut depth = 0usize;
    let mut try_depths: Vec<usize> = Vec::new();
    let mut pending_try = 0usize;
    let mut max_nesting = 0usize;
    let mut catches = 0usize;

    for (_, line) in body_lines(file, method) {
        catches += count_word(line, "catch");
        let tries = word_positions(line, "try");
        for (pos, c) in line.char_indices() {
            if tries.contains(&pos) {
                pending_try += 1;
            }
            match c {
                '{' => {
                    depth += 1;
                    if pending_try > 0 {
                        pending_try -= 1;
                        try_depths.push(depth);
                        max_nesting = max_nesting.max(try_depths.len());
                    }
                }
                '}' => {
                    if try_depths.last() == Some(&depth) {
                        try_depths.pop();
                    }
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
        }
    }

    (max_nesting, catches)
}

impl Detector for TryCatchHellDetector {
    fn id(&self) -> &'static str {
        "error-handling.try-catch-hell"
    }

    fn description(&self) -> &'static str {
        "Detects deeply nested try blocks and excessive catch clauses"
    }

    fn category(&self) -> Category {
        Category::ErrorHandling
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for (class, method) in file.structure().methods() {
            if !method.has_body() {
                continue;
            }
            let (nesting, catches) = measure(file, method);
            let severity = self
                .nesting
                .classify(nesting as f64)
                .max(self.catches.classify(catches as f64));
            let Some(severity) = severity else {
                continue;
            };

            evidence.push(
                Evidence::new(
                    self.id(),
                    method_pointer(file, class, method),
                    severity,
                    format!(
                        "Method '{}' nests try blocks {} deep with {} catch clauses",
                        method.name, nesting, catches
                    ),
                )
                .with_metric("maxTryNesting", nesting)
                .with_metric("catchCount", catches),
            );
        }

        Ok(evidence)
    }
}
