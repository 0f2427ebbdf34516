//! Duplicate code detector
//!
//! Uses the workspace window index: every run of N consecutive significant
//! lines (whitespace-normalized, trivial lines dropped) is hashed once per
//! run. A window of this file is duplicated when the same hash appears in
//! another file, or elsewhere in this file without overlapping it.
//! Consecutive duplicated windows merge into one block, reported once.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::line_pointer;
use crate::detectors::index::{file_windows, Window, WindowLocation, WorkspaceIndex};
use crate::models::{Category, Evidence};
use crate::scanner::SourceFile;
use anyhow::Result;

/// Default tiers: blocks longer than 5 / 15 / 30 significant lines
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(5.0, 15.0, 30.0);

pub struct DuplicateCodeDetector {
    tiers: SeverityTiers,
}

impl DuplicateCodeDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for DuplicateCodeDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Locations of `window` other than the window itself
fn other_locations<'a>(
    file: &SourceFile,
    window: &Window,
    index: &'a WorkspaceIndex,
) -> Vec<&'a WindowLocation> {
    index
        .window_locations(window.hash)
        .iter()
        .filter(|loc| {
            loc.file != file.path()
                || loc.end_line < window.start_line
                || loc.start_line > window.end_line
        })
        .collect()
}

struct DuplicateBlock<'a> {
    start_line: u32,
    end_line: u32,
    windows: usize,
    first_copy: &'a WindowLocation,
    copies: usize,
}

impl Detector for DuplicateCodeDetector {
    fn id(&self) -> &'static str {
        "duplication.duplicate-code"
    }

    fn description(&self) -> &'static str {
        "Detects blocks of code repeated within or across files"
    }

    fn category(&self) -> Category {
        Category::Dispensable
    }

    fn detect(&self, file: &SourceFile, index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let window_lines = index.window_lines();
        let windows = file_windows(file, window_lines);
        let mut blocks: Vec<DuplicateBlock> = Vec::new();
        let mut extending = false;

        for window in &windows {
            let others = other_locations(file, window, index);
            let Some(first_copy) = others.first().copied() else {
                extending = false;
                continue;
            };
            match blocks.last_mut() {
                Some(block) if extending => {
                    block.end_line = window.end_line;
                    block.windows += 1;
                }
                _ => blocks.push(DuplicateBlock {
                    start_line: window.start_line,
                    end_line: window.end_line,
                    windows: 1,
                    first_copy,
                    copies: others.len(),
                }),
            }
            extending = true;
        }

        let mut evidence = Vec::new();
        for block in blocks {
            let lines = block.windows + window_lines - 1;
            let Some(severity) = self.tiers.classify(lines as f64) else {
                continue;
            };
            let mut pointer = line_pointer(file, block.start_line);
            pointer.end_line = block.end_line;

            evidence.push(
                Evidence::new(
                    self.id(),
                    pointer,
                    severity,
                    format!(
                        "{} duplicated lines also found in {}:{}",
                        lines, block.first_copy.file, block.first_copy.start_line
                    ),
                )
                .with_metric("duplicatedLines", lines)
                .with_metric("occurrences", block.copies + 1)
                .with_metric(
                    "duplicateOf",
                    format!("{}:{}", block.first_copy.file, block.first_copy.start_line),
                ),
            );
        }

        Ok(evidence)
    }
}
