//! Base detector trait and types
//!
//! This module defines the core abstractions for smell detection:
//! - `Detector` trait that all detectors implement
//! - `DetectorConfig` carrying per-detector options from project config
//! - `SeverityTiers`, the shared three-threshold severity shape
//! - `DetectorResult` / `DetectionSummary` for execution bookkeeping

use crate::config::ProjectConfig;
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence, ProjectContext, Severity};
use crate::scanner::SourceFile;
use anyhow::Result;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// Result from running a single detector over one file
#[derive(Debug, Clone)]
pub struct DetectorResult {
    pub detector_id: String,
    pub evidence: Vec<Evidence>,
    pub duration_ms: u64,
    pub success: bool,
    pub error: Option<String>,
}

impl DetectorResult {
    pub fn success(detector_id: String, evidence: Vec<Evidence>, duration_ms: u64) -> Self {
        Self {
            detector_id,
            evidence,
            duration_ms,
            success: true,
            error: None,
        }
    }

    pub fn failure(detector_id: String, error: String, duration_ms: u64) -> Self {
        Self {
            detector_id,
            evidence: Vec::new(),
            duration_ms,
            success: false,
            error: Some(error),
        }
    }
}

/// Configuration options for detectors
#[derive(Debug, Clone, Default)]
pub struct DetectorConfig {
    /// Detector-specific thresholds and options
    pub options: HashMap<String, serde_json::Value>,
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the threshold overrides configured for `detector_id`
    pub fn from_project_config(detector_id: &str, config: &ProjectConfig) -> Self {
        let options = config
            .detector_override(detector_id)
            .map(|o| {
                o.thresholds
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect()
            })
            .unwrap_or_default();
        Self { options }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Get a typed option value
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get an option with a default value
    pub fn get_option_or<T: serde::de::DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_option(key).unwrap_or(default)
    }
}

/// How a metric is compared against the tier thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Fires when metric > threshold
    Above,
    /// Fires when metric >= threshold
    AtLeast,
    /// Fires when metric < threshold
    Below,
    /// Fires when metric <= threshold
    AtMost,
}

/// Three monotonic thresholds mapping a metric to MINOR < MAJOR < CRITICAL.
///
/// For `Above`/`AtLeast` the thresholds ascend, for `Below`/`AtMost` they
/// descend. An infinite threshold disables its tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityTiers {
    pub comparison: Comparison,
    pub minor: f64,
    pub major: f64,
    pub critical: f64,
}

impl SeverityTiers {
    pub const fn above(minor: f64, major: f64, critical: f64) -> Self {
        Self {
            comparison: Comparison::Above,
            minor,
            major,
            critical,
        }
    }

    pub const fn at_least(minor: f64, major: f64, critical: f64) -> Self {
        Self {
            comparison: Comparison::AtLeast,
            minor,
            major,
            critical,
        }
    }

    pub const fn below(minor: f64, major: f64, critical: f64) -> Self {
        Self {
            comparison: Comparison::Below,
            minor,
            major,
            critical,
        }
    }

    pub const fn at_most(minor: f64, major: f64, critical: f64) -> Self {
        Self {
            comparison: Comparison::AtMost,
            minor,
            major,
            critical,
        }
    }

    /// Override thresholds from config keys `<prefix>minor`, `<prefix>major`, `<prefix>critical`
    pub fn configured(self, config: &DetectorConfig, prefix: &str) -> Self {
        Self {
            comparison: self.comparison,
            minor: config.get_option_or(&format!("{prefix}minor"), self.minor),
            major: config.get_option_or(&format!("{prefix}major"), self.major),
            critical: config.get_option_or(&format!("{prefix}critical"), self.critical),
        }
    }

    fn passes(&self, metric: f64, threshold: f64) -> bool {
        match self.comparison {
            Comparison::Above => metric > threshold,
            Comparison::AtLeast => metric >= threshold,
            Comparison::Below => metric < threshold,
            Comparison::AtMost => metric <= threshold,
        }
    }

    /// Highest severity whose threshold the metric passes
    pub fn classify(&self, metric: f64) -> Option<Severity> {
        if metric.is_nan() {
            return None;
        }
        if self.passes(metric, self.critical) {
            Some(Severity::Critical)
        } else if self.passes(metric, self.major) {
            Some(Severity::Major)
        } else if self.passes(metric, self.minor) {
            Some(Severity::Minor)
        } else {
            None
        }
    }

    /// Threshold that the reported severity crossed
    pub fn threshold_for(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            _ => self.minor,
        }
    }

    /// Thresholds ordered consistently with the comparison direction
    pub fn is_monotonic(&self) -> bool {
        match self.comparison {
            Comparison::Above | Comparison::AtLeast => {
                self.minor <= self.major && self.major <= self.critical
            }
            Comparison::Below | Comparison::AtMost => {
                self.minor >= self.major && self.major >= self.critical
            }
        }
    }
}

/// Trait for all smell detectors
///
/// A detector is a pure function of one file's content plus the read-only
/// workspace index. It must not keep state between calls, so the same input
/// always yields the same evidence.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyDetector {
///     tiers: SeverityTiers,
/// }
///
/// impl Detector for MyDetector {
///     fn id(&self) -> &'static str {
///         "design.my-smell"
///     }
///
///     fn description(&self) -> &'static str {
///         "Detects my specific code smell"
///     }
///
///     fn category(&self) -> Category {
///         Category::Bloater
///     }
///
///     fn detect(&self, file: &SourceFile, index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Detector: Send + Sync {
    /// Stable namespaced identifier (e.g. "design.long-method")
    fn id(&self) -> &'static str;

    /// Human-readable description of what this detector finds
    fn description(&self) -> &'static str;

    /// Category of the smells this detector reports
    fn category(&self) -> Category;

    /// Whether this detector should run at all for the project
    ///
    /// Default: any project with source files.
    fn is_applicable(&self, context: &ProjectContext) -> bool {
        !context.source_files.is_empty()
    }

    /// Scan one file and return its evidence
    fn detect(&self, file: &SourceFile, index: &WorkspaceIndex) -> Result<Vec<Evidence>>;
}

/// Summary statistics from running detectors over a batch of files
#[derive(Debug, Clone, Default)]
pub struct DetectionSummary {
    pub detectors_run: usize,
    pub detectors_succeeded: usize,
    pub detectors_failed: usize,
    pub total_evidence: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub total_duration_ms: u64,
}

impl DetectionSummary {
    pub fn add_result(&mut self, result: &DetectorResult) {
        self.detectors_run += 1;
        self.total_duration_ms += result.duration_ms;

        if result.success {
            self.detectors_succeeded += 1;
            self.total_evidence += result.evidence.len();
            for e in &result.evidence {
                *self.by_severity.entry(e.severity).or_insert(0) += 1;
            }
        } else {
            self.detectors_failed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CodePointer;

    #[test]
    fn test_detector_config() {
        let config = DetectorConfig::new().with_option("minor", serde_json::json!(10));
        assert_eq!(config.get_option::<i32>("minor"), Some(10));
        assert_eq!(config.get_option_or("missing", 5), 5);
        // Integers widen into float thresholds
        assert_eq!(config.get_option_or("minor", 0.0f64), 10.0);
    }

    #[test]
    fn test_detector_config_from_project_config() {
        let project: ProjectConfig =
            toml::from_str("[detectors.long-method]\nthresholds = { major = 60 }\n")
                .expect("valid toml");
        let config = DetectorConfig::from_project_config("design.long-method", &project);
        assert_eq!(config.get_option::<f64>("major"), Some(60.0));
        let other = DetectorConfig::from_project_config("design.god-class", &project);
        assert!(other.options.is_empty());
    }

    #[test]
    fn test_above_tiers_are_strict() {
        let tiers = SeverityTiers::above(20.0, 50.0, 100.0);
        assert_eq!(tiers.classify(20.0), None);
        assert_eq!(tiers.classify(21.0), Some(Severity::Minor));
        assert_eq!(tiers.classify(50.0), Some(Severity::Minor));
        assert_eq!(tiers.classify(60.0), Some(Severity::Major));
        assert_eq!(tiers.classify(101.0), Some(Severity::Critical));
        assert_eq!(tiers.threshold_for(Severity::Major), 50.0);
    }

    #[test]
    fn test_below_and_at_most_tiers() {
        let below = SeverityTiers::below(0.3, 0.25, 0.1);
        assert_eq!(below.classify(0.3), None);
        assert_eq!(below.classify(0.28), Some(Severity::Minor));
        assert_eq!(below.classify(0.2), Some(Severity::Major));
        assert_eq!(below.classify(0.05), Some(Severity::Critical));

        let at_most = SeverityTiers::at_most(0.3, 0.2, 0.0);
        assert_eq!(at_most.classify(0.3), Some(Severity::Minor));
        assert_eq!(at_most.classify(0.0), Some(Severity::Critical));
        assert_eq!(at_most.classify(0.31), None);
    }

    #[test]
    fn test_infinite_threshold_disables_tier() {
        let tiers = SeverityTiers::above(1.0, 8.0, f64::INFINITY);
        assert_eq!(tiers.classify(1e9), Some(Severity::Major));
        assert_eq!(tiers.classify(f64::NAN), None);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let sets = [
            SeverityTiers::above(20.0, 50.0, 100.0),
            SeverityTiers::at_least(5.0, 20.0, 50.0),
            SeverityTiers::below(0.3, 0.25, 0.1),
            SeverityTiers::at_most(0.3, 0.2, 0.0),
        ];
        for tiers in sets {
            assert!(tiers.is_monotonic());
            let ascending = matches!(tiers.comparison, Comparison::Above | Comparison::AtLeast);
            let mut previous: Option<Severity> = None;
            for step in 0..=400 {
                let raw = step as f64 / 2.0;
                let metric = if ascending { raw } else { 1.0 - raw / 200.0 };
                let severity = tiers.classify(metric);
                assert!(severity >= previous, "severity decreased at {}", metric);
                previous = severity;
            }
        }
    }

    #[test]
    fn test_configured_tiers() {
        let config = DetectorConfig::new()
            .with_option("nesting_minor", serde_json::json!(1))
            .with_option("nesting_critical", serde_json::json!(9));
        let tiers = SeverityTiers::above(2.0, 3.0, 4.0).configured(&config, "nesting_");
        assert_eq!(tiers.minor, 1.0);
        assert_eq!(tiers.major, 3.0);
        assert_eq!(tiers.critical, 9.0);
    }

    #[test]
    fn test_detection_summary() {
        let e = Evidence::new(
            "design.long-method",
            CodePointer::lines("A.java", 1, 1),
            Severity::Major,
            "x",
        );
        let mut summary = DetectionSummary::default();
        summary.add_result(&DetectorResult::success("a".into(), vec![e], 10));
        summary.add_result(&DetectorResult::failure("b".into(), "err".into(), 5));
        assert_eq!(summary.detectors_run, 2);
        assert_eq!(summary.detectors_failed, 1);
        assert_eq!(summary.total_evidence, 1);
        assert_eq!(summary.by_severity.get(&Severity::Major), Some(&1));
        assert_eq!(summary.total_duration_ms, 15);
    }
}
