//! Configuration module for debtradar
//!
//! This module handles:
//! - Project-level configuration (debtradar.toml)
//! - Detector threshold and severity overrides
//! - Scoring weights and scan limits

mod project_config;

pub use project_config::{
    glob_match, load_config_file, load_project_config, normalize_detector_name,
    short_detector_name, write_config_template, AnalysisSettings, CliDefaults,
    DetectorConfigOverride, ExcludeConfig, ProjectConfig, ScoringConfig, SeverityWeights,
    ThresholdValue, CONFIG_TEMPLATE, JSON_CONFIG_FILE, MAX_WORKERS, TOML_CONFIG_FILE,
};
