//! Empty catch block detector
//!
//! A `catch` block without statements silently swallows the failure. A
//! block that holds only a comment at least documents the intent, so it is
//! reported one level lower.

use crate::detectors::base::{Detector, DetectorConfig};
use crate::detectors::common::{block_from, line_pointer, word_positions};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence, Severity};
use crate::scanner::SourceFile;
use anyhow::Result;

/// Lines scanned for the end of one catch block
const CATCH_SCAN_LINES: usize = 50;

pub struct EmptyCatchDetector {
    severity: Severity,
    commented_severity: Severity,
}

impl EmptyCatchDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        let parse = |key: &str, default: Severity| {
            config
                .get_option::<String>(key)
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };
        Self {
            severity: parse("severity", Severity::Major),
            commented_severity: parse("commented_severity", Severity::Minor),
        }
    }
}

impl Default for EmptyCatchDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Exception type named in a catch clause header
fn caught_type(header: &str) -> String {
    let inner = header
        .split_once('(')
        .map(|(_, rest)| rest)
        .unwrap_or("")
        .split(')')
        .next()
        .unwrap_or("")
        .trim();
    let inner = inner.strip_prefix("final ").unwrap_or(inner).trim();
    match inner.rsplit_once(char::is_whitespace) {
        Some((types, _)) => types.split_whitespace().collect::<Vec<_>>().join(""),
        None => inner.to_string(),
    }
}

impl Detector for EmptyCatchDetector {
    fn id(&self) -> &'static str {
        "error-handling.empty-catch"
    }

    fn description(&self) -> &'static str {
        "Detects catch blocks that swallow exceptions"
    }

    fn category(&self) -> Category {
        Category::ErrorHandling
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for (i, line) in file.code_lines().iter().enumerate() {
            for pos in word_positions(line, "catch") {
                if !line[pos + "catch".len()..].trim_start().starts_with('(') {
                    continue;
                }
                let Some(block) = block_from(file, i, pos, CATCH_SCAN_LINES) else {
                    continue;
                };
                if !block.inner_code.trim().is_empty() {
                    continue;
                }
                let commented = !block.inner_comment.trim().is_empty();
                let severity = if commented {
                    self.commented_severity
                } else {
                    self.severity
                };
                let exception = caught_type(&line[pos..]);
                let mut pointer = line_pointer(file, (i + 1) as u32);
                pointer.end_line = block.close_line;

                let summary = if commented {
                    format!("catch of {} contains only a comment", exception)
                } else {
                    format!("Empty catch block swallows {}", exception)
                };
                evidence.push(
                    Evidence::new(self.id(), pointer, severity, summary)
                        .with_metric("exceptionType", exception)
                        .with_metric("commented", usize::from(commented)),
                );
            }
        }

        Ok(evidence)
    }
}
