//! Null abuse detector
//!
//! Counts null-handling constructs per method: explicit `== null` and
//! `!= null` comparisons, `Objects` null helpers, `Optional` plumbing and
//! negated-flag guards. A method that needs many of them is defending
//! against an API that lets `null` leak everywhere.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::{body_lines, method_pointer};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::SourceFile;
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

/// Default tiers: more than 5 / 10 / 15 null checks in one method
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(5.0, 10.0, 15.0);

static NULL_CHECK: OnceLock<Regex> = OnceLock::new();

fn null_check_pattern() -> &'static Regex {
    NULL_CHECK.get_or_init(|| {
        Regex::new(
            r"[!=]=\s*null\b|\bnull\s*[!=]=|\bObjects\s*\.\s*(?:isNull|nonNull|requireNonNull\w*)\b|\bOptional\s*\.\s*\w+|\bif\s*\(\s*!\s*[A-Za-z_$][\w$]*\s*\)",
        )
        .expect("valid regex")
    })
}

/// Number of null-handling constructs on one line of code
pub fn count_null_checks(line: &str) -> usize {
    null_check_pattern().find_iter(line).count()
}

pub struct NullAbuseDetector {
    tiers: SeverityTiers,
}

impl NullAbuseDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for NullAbuseDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for NullAbuseDetector {
    fn id(&self) -> &'static str {
        "error-handling.null-abuse"
    }

    fn description(&self) -> &'static str {
        "Detects methods crowded with null checks"
    }

    fn category(&self) -> Category {
        Category::ErrorHandling
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for (class, method) in file.structure().methods() {
            let checks: usize = body_lines(file, method)
                .map(|(_, line)| count_null_checks(line))
                .sum();
            let Some(severity) = self.tiers.classify(checks as f64) else {
                continue;
            };

            evidence.push(
                Evidence::new(
                    self.id(),
                    method_pointer(file, class, method),
                    severity,
                    format!("Method '{}' performs {} null checks", method.name, checks),
                )
                .with_metric("nullChecks", checks)
                .with_metric("threshold", self.tiers.threshold_for(severity) as i64),
            );
        }

        Ok(evidence)
    }
}
