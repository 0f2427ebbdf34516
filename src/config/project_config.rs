//! Project-level configuration support
//!
//! Loads per-project configuration from `debtradar.toml` or
//! `.debtradarrc.json` in the project root.
//!
//! # Configuration Format
//!
//! ```toml
//! # debtradar.toml
//!
//! [detectors.long-method]
//! thresholds = { minor = 30, major = 60, critical = 120 }
//!
//! [detectors."style.magic-number"]
//! enabled = false
//!
//! [detectors.god-class]
//! severity = "critical"  # Override the computed severity
//!
//! [scoring.weights]
//! critical = 10.0
//! major = 5.0
//!
//! [analysis]
//! workers = 8
//! file_timeout_ms = 10000
//!
//! [exclude]
//! paths = ["generated/", "**/build/**"]
//! ```

use crate::error::AnalysisError;
use crate::models::Severity;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const TOML_CONFIG_FILE: &str = "debtradar.toml";
pub const JSON_CONFIG_FILE: &str = ".debtradarrc.json";

/// Project-level configuration loaded from debtradar.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Per-detector configuration overrides, keyed by full id or short name
    #[serde(default)]
    pub detectors: HashMap<String, DetectorConfigOverride>,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Path exclusion patterns
    #[serde(default)]
    pub exclude: ExcludeConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Configuration override for a specific detector
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DetectorConfigOverride {
    /// Whether the detector is enabled (default: true)
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Force every evidence of this detector to one severity
    #[serde(default)]
    pub severity: Option<String>,

    /// Detector-specific threshold overrides (`minor`, `major`, `critical`, ...)
    #[serde(default)]
    pub thresholds: HashMap<String, ThresholdValue>,
}

/// A threshold value can be an integer, float, boolean or string
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ThresholdValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl ThresholdValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ThresholdValue::Integer(v) => Some(*v),
            ThresholdValue::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ThresholdValue::Integer(v) => Some(*v as f64),
            ThresholdValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ThresholdValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ThresholdValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// JSON form, used to seed `DetectorConfig` options
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ThresholdValue::Integer(v) => serde_json::json!(v),
            ThresholdValue::Float(v) => serde_json::json!(v),
            ThresholdValue::Boolean(v) => serde_json::json!(v),
            ThresholdValue::String(v) => serde_json::json!(v),
        }
    }
}

/// Technical-debt scoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: SeverityWeights,

    /// Upper bound of a file's debt score (default: 100)
    #[serde(default = "default_max_file_score")]
    pub max_file_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: SeverityWeights::default(),
            max_file_score: default_max_file_score(),
        }
    }
}

fn default_max_file_score() -> f64 {
    100.0
}

impl ScoringConfig {
    /// The cap has to stay inside the 0..=100 score range
    pub fn max_score_is_valid(&self) -> bool {
        self.max_file_score.is_finite() && (0.0..=100.0).contains(&self.max_file_score)
    }
}

/// Debt points contributed by one smell of each severity
#[derive(Debug, Clone, Deserialize)]
pub struct SeverityWeights {
    #[serde(default = "default_critical_weight")]
    pub critical: f64,
    #[serde(default = "default_major_weight")]
    pub major: f64,
    #[serde(default = "default_minor_weight")]
    pub minor: f64,
    #[serde(default = "default_info_weight")]
    pub info: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            critical: default_critical_weight(),
            major: default_major_weight(),
            minor: default_minor_weight(),
            info: default_info_weight(),
        }
    }
}

fn default_critical_weight() -> f64 {
    10.0
}
fn default_major_weight() -> f64 {
    5.0
}
fn default_minor_weight() -> f64 {
    2.0
}
fn default_info_weight() -> f64 {
    0.5
}

impl SeverityWeights {
    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
            Severity::Info => self.info,
        }
    }

    /// Negative weights make no sense for a debt score
    pub fn is_valid(&self) -> bool {
        [self.critical, self.major, self.minor, self.info]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// Upper bound on worker threads, explicit or automatic
pub const MAX_WORKERS: usize = 16;

/// Scan limits and parallelism
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Worker threads (0 = auto, capped at 16)
    #[serde(default)]
    pub workers: usize,

    /// Cooperative per-file deadline in milliseconds (0 disables it)
    #[serde(default = "default_file_timeout_ms")]
    pub file_timeout_ms: u64,

    /// Files above this size are error-tagged without scanning
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// Fallback span for methods whose closing brace is never found
    #[serde(default = "default_method_body_cap")]
    pub method_body_cap: usize,

    /// Window size used by duplicate-code detection
    #[serde(default = "default_duplicate_min_lines")]
    pub duplicate_min_lines: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            workers: 0,
            file_timeout_ms: default_file_timeout_ms(),
            max_file_bytes: default_max_file_bytes(),
            method_body_cap: default_method_body_cap(),
            duplicate_min_lines: default_duplicate_min_lines(),
        }
    }
}

fn default_file_timeout_ms() -> u64 {
    10_000
}
fn default_max_file_bytes() -> u64 {
    2 * 1024 * 1024
}
fn default_method_body_cap() -> usize {
    crate::scanner::DEFAULT_METHOD_BODY_CAP
}
fn default_duplicate_min_lines() -> usize {
    6
}

impl AnalysisSettings {
    /// Resolve the worker count (0 = available parallelism), capped at [`MAX_WORKERS`]
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(MAX_WORKERS)
        } else {
            self.workers.min(MAX_WORKERS)
        }
    }
}

/// Path exclusion configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExcludeConfig {
    /// Paths/patterns to exclude from analysis
    #[serde(default)]
    pub paths: Vec<String>,
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json)
    #[serde(default)]
    pub format: Option<String>,

    /// Skip detectors by default
    #[serde(default)]
    pub skip_detectors: Vec<String>,
}

/// Load project configuration from the project root.
///
/// Searches for `debtradar.toml`, then `.debtradarrc.json`. A missing or
/// invalid file falls back to defaults with a warning.
pub fn load_project_config(root: &Path) -> ProjectConfig {
    for name in [TOML_CONFIG_FILE, JSON_CONFIG_FILE] {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("{}; using defaults", e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load one config file, choosing the format from its extension
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, AnalysisError> {
    let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let parsed = if is_json {
        serde_json::from_str::<ProjectConfig>(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str::<ProjectConfig>(&content).map_err(|e| e.to_string())
    };
    let config = parsed.map_err(|message| AnalysisError::Config {
        path: path.to_path_buf(),
        message,
    })?;

    if !config.scoring.weights.is_valid() {
        return Err(AnalysisError::Config {
            path: path.to_path_buf(),
            message: "scoring weights must be finite and non-negative".to_string(),
        });
    }
    if !config.scoring.max_score_is_valid() {
        return Err(AnalysisError::Config {
            path: path.to_path_buf(),
            message: format!(
                "max_file_score must be between 0 and 100, got {}",
                config.scoring.max_file_score
            ),
        });
    }
    Ok(config)
}

impl ProjectConfig {
    /// Override block for a detector: full id first, then the short name
    /// after the namespace, then any key that normalizes to the short name
    pub fn detector_override(&self, id: &str) -> Option<&DetectorConfigOverride> {
        if let Some(found) = self.detectors.get(id) {
            return Some(found);
        }
        let short = short_detector_name(id);
        self.detectors.get(short).or_else(|| {
            self.detectors
                .iter()
                .find(|(key, _)| normalize_detector_name(short_detector_name(key)) == short)
                .map(|(_, value)| value)
        })
    }

    /// Check if a detector is enabled (defaults to true if not specified)
    pub fn is_detector_enabled(&self, id: &str) -> bool {
        let short = short_detector_name(id);
        let skipped = self
            .defaults
            .skip_detectors
            .iter()
            .any(|s| s == id || normalize_detector_name(short_detector_name(s)) == short);
        !skipped
            && self
                .detector_override(id)
                .and_then(|c| c.enabled)
                .unwrap_or(true)
    }

    /// Severity override for a detector, if one is set and parses
    pub fn severity_override(&self, id: &str) -> Option<Severity> {
        let raw = self.detector_override(id)?.severity.as_deref()?;
        match raw.parse::<Severity>() {
            Ok(severity) => Some(severity),
            Err(e) => {
                warn!("Ignoring severity override for {}: {}", id, e);
                None
            }
        }
    }

    pub fn threshold(&self, id: &str, name: &str) -> Option<&ThresholdValue> {
        self.detector_override(id)
            .and_then(|c| c.thresholds.get(name))
    }

    pub fn threshold_f64(&self, id: &str, name: &str) -> Option<f64> {
        self.threshold(id, name).and_then(|v| v.as_f64())
    }

    /// Check if a relative path should be excluded
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.exclude
            .paths
            .iter()
            .any(|pattern| glob_match(pattern, &path_str))
    }

    /// Ids or names of every detector switched off in config
    pub fn disabled_detectors(&self) -> Vec<String> {
        let mut disabled: Vec<String> = self
            .detectors
            .iter()
            .filter(|(_, c)| c.enabled == Some(false))
            .map(|(name, _)| name.clone())
            .collect();
        disabled.extend(self.defaults.skip_detectors.iter().cloned());
        disabled.sort();
        disabled
    }
}

/// Part of a detector id after its namespace (`long-method` for `design.long-method`)
pub fn short_detector_name(id: &str) -> &str {
    id.rsplit('.').next().unwrap_or(id)
}

/// Normalize detector name for config lookup
/// Converts various formats to kebab-case for matching
pub fn normalize_detector_name(name: &str) -> String {
    // LongMethodDetector -> long-method
    // long_method -> long-method
    let mut result = String::new();
    let chars: Vec<char> = name.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_is_lower = i > 0 && chars[i - 1].is_lowercase();
            let is_acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && i + 1 < chars.len()
                && chars[i + 1].is_lowercase();

            if prev_is_lower || is_acronym_end {
                result.push('-');
            }
            result.extend(c.to_lowercase());
        } else if *c == '_' {
            result.push('-');
        } else {
            result.push(*c);
        }
    }

    result.trim_end_matches("-detector").to_string()
}

/// Simple glob pattern matching over forward-slash paths
pub fn glob_match(pattern: &str, path: &str) -> bool {
    // **/X/** matches X as any directory
    if pattern.starts_with("**/") && pattern.ends_with("/**") {
        let middle = pattern.trim_start_matches("**/").trim_end_matches("/**");
        return path.contains(&format!("/{}/", middle)) || path.starts_with(&format!("{}/", middle));
    }

    if pattern.contains("**") {
        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');
            if !prefix.is_empty() && !path.starts_with(prefix) {
                return false;
            }
            if !suffix.is_empty() && !path.ends_with(suffix) {
                return false;
            }
            return true;
        }
    }

    if pattern.contains('*') {
        let parts: Vec<&str> = pattern.split('*').collect();
        if parts.len() == 2 {
            return path.starts_with(parts[0]) && path.ends_with(parts[1]);
        }
    }

    // Exact match or directory prefix
    path.starts_with(pattern)
}

/// Commented template written by `debtradar init`
pub const CONFIG_TEMPLATE: &str = r#"# debtradar configuration
#
# Detector keys accept the full id (quoted, e.g. "design.long-method")
# or the short name after the namespace (long-method).

# [detectors.long-method]
# enabled = true
# severity = "major"          # force one severity for every hit
# thresholds = { minor = 20, major = 50, critical = 100 }

# [detectors.try-catch-hell]
# thresholds = { nesting_minor = 2, catches_minor = 5 }

# [detectors."style.magic-number"]
# enabled = false

[scoring]
max_file_score = 100.0

[scoring.weights]
critical = 10.0
major = 5.0
minor = 2.0
info = 0.5

[analysis]
workers = 0                   # 0 = auto
file_timeout_ms = 10000
max_file_bytes = 2097152
method_body_cap = 50
duplicate_min_lines = 6

[exclude]
paths = ["**/generated/**"]

[defaults]
# format = "text"
# skip_detectors = ["todo-comment"]
"#;

/// Write the template to `<root>/debtradar.toml`; refuses to overwrite unless `force`
pub fn write_config_template(root: &Path, force: bool) -> anyhow::Result<PathBuf> {
    use anyhow::Context;

    let path = root.join(TOML_CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
