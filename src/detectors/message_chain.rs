//! Message chain detector
//!
//! Detects long call chains such as `a.getB().getC().getD().run()`. Each
//! link couples the caller to the structure of another object, so one
//! change in the middle of the chain breaks every caller.
//!
//! Chain length is the number of calls chained on one line.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::line_pointer;
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::SourceFile;
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

/// Default tiers: more than 3 / 5 / 7 chained calls
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(3.0, 5.0, 7.0);

static CHAINED_CALL: OnceLock<Regex> = OnceLock::new();

/// `).name(` or `).<T>name(`: one call chained onto the previous one
fn chained_call_pattern() -> &'static Regex {
    CHAINED_CALL.get_or_init(|| {
        Regex::new(r"\)\s*\.\s*(?:<[^>]*>\s*)?[A-Za-z_$][\w$]*\s*\(").expect("valid regex")
    })
}

/// Calls chained on `line` (0 without any chaining) and the byte offset of the first link
pub fn chain_length(line: &str) -> (usize, usize) {
    let links: Vec<_> = chained_call_pattern().find_iter(line).collect();
    match links.first() {
        Some(first) => (links.len() + 1, first.start()),
        None => (0, 0),
    }
}

pub struct MessageChainDetector {
    tiers: SeverityTiers,
}

impl MessageChainDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for MessageChainDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for MessageChainDetector {
    fn id(&self) -> &'static str {
        "coupling.message-chain"
    }

    fn description(&self) -> &'static str {
        "Detects long chains of method calls"
    }

    fn category(&self) -> Category {
        Category::Coupler
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for (i, line) in file.code_lines().iter().enumerate() {
            let (length, offset) = chain_length(line);
            let Some(severity) = self.tiers.classify(length as f64) else {
                continue;
            };
            let line_no = (i + 1) as u32;
            let column = line[..offset].chars().count() as u32 + 1;
            let end_column = (line.trim_end().chars().count() as u32).max(column);

            evidence.push(
                Evidence::new(
                    self.id(),
                    line_pointer(file, line_no).with_columns(column, end_column),
                    severity,
                    format!("Chain of {} method calls", length),
                )
                .with_metric("chainLength", length)
                .with_metric("threshold", self.tiers.threshold_for(severity) as i64),
            );
        }

        Ok(evidence)
    }
}
