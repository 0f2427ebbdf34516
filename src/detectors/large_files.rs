//! Large file detector

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, CodePointer, Evidence};
use crate::scanner::SourceFile;
use anyhow::Result;

/// Default tiers: more than 500 / 1000 / 2000 lines
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(500.0, 1000.0, 2000.0);

pub struct LargeFileDetector {
    tiers: SeverityTiers,
}

impl LargeFileDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for LargeFileDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for LargeFileDetector {
    fn id(&self) -> &'static str {
        "size.large-file"
    }

    fn description(&self) -> &'static str {
        "Detects source files with too many lines"
    }

    fn category(&self) -> Category {
        Category::Bloater
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let lines = file.line_count();
        let Some(severity) = self.tiers.classify(lines as f64) else {
            return Ok(vec![]);
        };
        let threshold = self.tiers.threshold_for(severity);

        Ok(vec![Evidence::new(
            self.id(),
            CodePointer::lines(file.path(), 1, lines as u32),
            severity,
            format!("File has {} lines (threshold {})", lines, threshold),
        )
        .with_metric("lineCount", lines)
        .with_metric("codeLines", file.code_line_count())
        .with_metric("threshold", threshold as i64)])
    }
}
