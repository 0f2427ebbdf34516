//! Switch statement abuse detector
//!
//! Large `switch` statements (and switch expressions) dispatching on a type
//! code tend to be copied around the codebase, and every new case has to be
//! added in each copy. Polymorphism or a lookup table usually fits better.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::{block_from, line_pointer, word_positions};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{count_word, SourceFile};
use anyhow::Result;

/// Default tiers: more than 7 / 12 / 20 case labels
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(7.0, 12.0, 20.0);

/// Lines scanned for the end of one switch block
const SWITCH_SCAN_LINES: usize = 400;

pub struct SwitchStatementDetector {
    tiers: SeverityTiers,
}

impl SwitchStatementDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for SwitchStatementDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// `case` labels plus a `default` label, if present
fn count_labels(block: &str) -> usize {
    let defaults = block
        .lines()
        .flat_map(|line| {
            word_positions(line, "default")
                .into_iter()
                .map(move |pos| line[pos + "default".len()..].trim_start())
        })
        .filter(|rest| rest.starts_with(':') || rest.starts_with("->"))
        .count();
    count_word(block, "case") + defaults
}

impl Detector for SwitchStatementDetector {
    fn id(&self) -> &'static str {
        "design.switch-statement-abuse"
    }

    fn description(&self) -> &'static str {
        "Detects switch statements with too many cases"
    }

    fn category(&self) -> Category {
        Category::ObjectOrientationAbuser
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for (i, line) in file.code_lines().iter().enumerate() {
            for pos in word_positions(line, "switch") {
                if !line[pos + "switch".len()..].trim_start().starts_with('(') {
                    continue;
                }
                let Some(block) = block_from(file, i, pos, SWITCH_SCAN_LINES) else {
                    continue;
                };
                let cases = count_labels(&block.inner_code);
                let Some(severity) = self.tiers.classify(cases as f64) else {
                    continue;
                };
                let mut pointer = line_pointer(file, (i + 1) as u32);
                pointer.end_line = block.close_line;

                evidence.push(
                    Evidence::new(
                        self.id(),
                        pointer,
                        severity,
                        format!("switch with {} cases", cases),
                    )
                    .with_metric("caseCount", cases)
                    .with_metric("threshold", self.tiers.threshold_for(severity) as i64),
                );
            }
        }

        Ok(evidence)
    }
}
