//! Long method detector
//!
//! Flags methods whose span, from signature line to closing brace, is too
//! long to read in one pass. Long methods usually:
//! - mix several levels of abstraction
//! - hide reusable steps that deserve their own name
//! - are hard to test in isolation
//!
//! Bodiless declarations (abstract and interface methods) are skipped.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::method_pointer;
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::SourceFile;
use anyhow::Result;

/// Default tiers: more than 20 / 50 / 100 lines
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(20.0, 50.0, 100.0);

pub struct LongMethodDetector {
    tiers: SeverityTiers,
}

impl LongMethodDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for LongMethodDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for LongMethodDetector {
    fn id(&self) -> &'static str {
        "design.long-method"
    }

    fn description(&self) -> &'static str {
        "Detects methods that are too long"
    }

    fn category(&self) -> Category {
        Category::Bloater
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for (class, method) in file.structure().methods() {
            if !method.has_body() {
                continue;
            }
            let lines = method.line_count();
            let Some(severity) = self.tiers.classify(f64::from(lines)) else {
                continue;
            };
            let threshold = self.tiers.threshold_for(severity);

            evidence.push(
                Evidence::new(
                    self.id(),
                    method_pointer(file, class, method),
                    severity,
                    format!(
                        "Method '{}' is {} lines long (threshold {})",
                        method.name, lines, threshold
                    ),
                )
                .with_metric("lineCount", lines)
                .with_metric("threshold", threshold as i64),
            );
        }

        Ok(evidence)
    }
}
