//! Code smell detectors
//!
//! This module provides the detector framework and the built-in detectors
//! for Java sources.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     DetectorEngine                          │
//! │  - Holds the registry built from project config             │
//! │  - Runs every detector over one file, fail-soft             │
//! │  - Validates pointers, applies severity overrides           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Detector Trait                         │
//! │  - id(): Stable namespaced identifier                       │
//! │  - category(): Smell category                               │
//! │  - detect(file, index): Evidence for one file               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//! ┌──────────────────┐ ┌──────────────┐ ┌──────────────────┐
//! │ Structural       │ │ Workspace    │ │ Line rules       │
//! │ (LongMethod,     │ │ (Duplicate,  │ │ (magic numbers,  │
//! │  GodClass, etc.) │ │  Refused     │ │  TODOs, etc.)    │
//! │                  │ │  Bequest)    │ │                  │
//! └──────────────────┘ └──────────────┘ └──────────────────┘
//! ```
//!
//! Structural detectors read the lexical structure of one file. Workspace
//! detectors also consult the read-only [`WorkspaceIndex`]. Line rules are
//! table rows in [`line_rules`], one detector each.
//!
//! # Usage
//!
//! ```ignore
//! use debtradar::detectors::{DetectorEngine, WorkspaceIndex};
//!
//! let engine = DetectorEngine::from_config(&config);
//! let evidence = engine.run_file(&file, &WorkspaceIndex::empty())?;
//! ```

mod base;
mod common;
mod engine;
pub mod file_provider;
mod index;

// Structural detectors
mod cyclomatic;
mod data_class;
mod deep_nesting;
mod empty_catch;
mod god_class;
mod large_files;
mod lazy_class;
mod long_methods;
mod long_parameter;
mod message_chain;
mod middle_man;
mod null_abuse;
mod switch_statement;
mod temporary_field;
mod try_catch_hell;

// Workspace detectors
mod duplicate_code;
mod refused_bequest;

pub mod line_rules;

pub use base::{
    Comparison, DetectionSummary, Detector, DetectorConfig, DetectorResult, SeverityTiers,
};
pub use engine::DetectorEngine;
pub use file_provider::{load_sources, FileProvider, LoadedFile, MemoryFiles, SourceFiles};
pub use index::{
    file_windows, significant_lines, ClassSummary, Window, WindowLocation, WorkspaceIndex,
    DEFAULT_WINDOW_LINES,
};

pub use cyclomatic::CyclomaticComplexityDetector;
pub use data_class::DataClassDetector;
pub use deep_nesting::DeepNestingDetector;
pub use duplicate_code::DuplicateCodeDetector;
pub use empty_catch::EmptyCatchDetector;
pub use god_class::GodClassDetector;
pub use large_files::LargeFileDetector;
pub use lazy_class::LazyClassDetector;
pub use line_rules::{LineRule, LineRuleDetector, LINE_RULES};
pub use long_methods::LongMethodDetector;
pub use long_parameter::LongParameterListDetector;
pub use message_chain::MessageChainDetector;
pub use middle_man::MiddleManDetector;
pub use null_abuse::NullAbuseDetector;
pub use refused_bequest::RefusedBequestDetector;
pub use switch_statement::SwitchStatementDetector;
pub use temporary_field::TemporaryFieldDetector;
pub use try_catch_hell::TryCatchHellDetector;

use crate::config::ProjectConfig;
use std::sync::Arc;

/// Create the default set of detectors, with thresholds from project config
///
/// Order is stable and determines evidence order within a file.
pub fn default_detectors(config: &ProjectConfig) -> Vec<Arc<dyn Detector>> {
    let cfg = |id: &str| DetectorConfig::from_project_config(id, config);

    let mut detectors: Vec<Arc<dyn Detector>> = vec![
        // Bloaters
        Arc::new(LongMethodDetector::with_config(cfg("design.long-method"))),
        Arc::new(LongParameterListDetector::with_config(cfg("design.long-parameter-list"))),
        Arc::new(GodClassDetector::with_config(cfg("design.god-class"))),
        Arc::new(LargeFileDetector::with_config(cfg("size.large-file"))),
        // Object-orientation abusers
        Arc::new(RefusedBequestDetector::with_config(cfg("design.refused-bequest"))),
        Arc::new(TemporaryFieldDetector::with_config(cfg("design.temporary-field"))),
        Arc::new(SwitchStatementDetector::with_config(cfg("design.switch-statement-abuse"))),
        // Dispensables
        Arc::new(DataClassDetector::with_config(cfg("design.data-class"))),
        Arc::new(LazyClassDetector::with_config(cfg("design.lazy-class"))),
        Arc::new(DuplicateCodeDetector::with_config(cfg("duplication.duplicate-code"))),
        // Couplers
        Arc::new(MessageChainDetector::with_config(cfg("coupling.message-chain"))),
        Arc::new(MiddleManDetector::with_config(cfg("coupling.middle-man"))),
        // Complexity
        Arc::new(DeepNestingDetector::with_config(cfg("complexity.deep-nesting"))),
        Arc::new(CyclomaticComplexityDetector::with_config(cfg(
            "complexity.cyclomatic-complexity",
        ))),
        // Error handling
        Arc::new(TryCatchHellDetector::with_config(cfg("error-handling.try-catch-hell"))),
        Arc::new(NullAbuseDetector::with_config(cfg("error-handling.null-abuse"))),
        Arc::new(EmptyCatchDetector::with_config(cfg("error-handling.empty-catch"))),
    ];

    // Line-pattern rules
    for rule in LINE_RULES {
        detectors.push(Arc::new(LineRuleDetector::with_config(rule, cfg(rule.id))));
    }

    detectors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_detector_ids_are_unique_and_namespaced() {
        let detectors = default_detectors(&ProjectConfig::default());
        let ids: HashSet<_> = detectors.iter().map(|d| d.id()).collect();
        assert_eq!(ids.len(), detectors.len());
        for id in ids {
            assert!(id.contains('.'), "{} is not namespaced", id);
        }
    }

    #[test]
    fn test_registry_passes_configured_thresholds() {
        let config: ProjectConfig =
            toml::from_str("[detectors.long-method]\nthresholds = { minor = 2 }\n")
                .expect("valid toml");
        let file = crate::scanner::SourceFile::parse(
            "A.java",
            "class A {\n    void f() {\n        a();\n        b();\n    }\n}\n",
        );
        let detectors = default_detectors(&config);
        let long_method = detectors
            .iter()
            .find(|d| d.id() == "design.long-method")
            .expect("registered");
        let evidence = long_method
            .detect(&file, &WorkspaceIndex::empty())
            .expect("detect");
        assert_eq!(evidence.len(), 1);
    }
}
