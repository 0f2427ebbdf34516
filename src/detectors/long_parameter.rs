//! Long parameter list detector
//!
//! Detects methods and constructors with too many parameters, which is a
//! code smell indicating:
//! - The method is doing too much
//! - Related parameters should be grouped into a parameter object
//! - Callers are forced to know too many details

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::method_pointer;
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::SourceFile;
use anyhow::Result;

/// Default tiers: more than 7 / 8 / 9 parameters
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(7.0, 8.0, 9.0);

/// Detects methods with too many parameters
pub struct LongParameterListDetector {
    tiers: SeverityTiers,
}

impl LongParameterListDetector {
    /// Create a new detector with default thresholds
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    /// Create with custom config
    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for LongParameterListDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for LongParameterListDetector {
    fn id(&self) -> &'static str {
        "design.long-parameter-list"
    }

    fn description(&self) -> &'static str {
        "Detects methods with too many parameters"
    }

    fn category(&self) -> Category {
        Category::Bloater
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for (class, method) in file.structure().methods() {
            let count = method.parameters.len();
            let Some(severity) = self.tiers.classify(count as f64) else {
                continue;
            };
            let threshold = self.tiers.threshold_for(severity);
            // Signature line only; the body is irrelevant here
            let mut pointer = method_pointer(file, class, method);
            pointer.end_line = pointer.start_line;

            evidence.push(
                Evidence::new(
                    self.id(),
                    pointer,
                    severity,
                    format!(
                        "'{}' takes {} parameters (threshold {})",
                        method.name, count, threshold
                    ),
                )
                .with_metric("parameterCount", count)
                .with_metric("threshold", threshold as i64),
            );
        }

        Ok(evidence)
    }
}
