//! Detector execution engine
//!
//! The DetectorEngine runs every registered detector over one file:
//! - detectors run in registry order, so output is deterministic
//! - a detector that returns `Err` or panics contributes no evidence
//! - evidence whose pointer falls outside the file is dropped
//! - severity overrides from config are applied last
//! - a cooperative per-file deadline is checked between detectors
//!
//! Parallelism lives one level up: the aggregator fans files out over a
//! rayon pool and calls `run_file` from each worker.

use crate::config::ProjectConfig;
use crate::detectors::base::{DetectionSummary, Detector, DetectorResult};
use crate::detectors::index::WorkspaceIndex;
use crate::error::AnalysisError;
use crate::models::{Evidence, ProjectContext, Severity};
use crate::scanner::SourceFile;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Runs registered detectors over single files
pub struct DetectorEngine {
    detectors: Vec<Arc<dyn Detector>>,
    severity_overrides: HashMap<&'static str, Severity>,
    file_timeout: Option<Duration>,
}

impl DetectorEngine {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            severity_overrides: HashMap::new(),
            file_timeout: None,
        }
    }

    /// Engine with the default registry, minus detectors disabled in config
    pub fn from_config(config: &ProjectConfig) -> Self {
        let mut engine = Self::new();
        for detector in crate::detectors::default_detectors(config) {
            if !config.is_detector_enabled(detector.id()) {
                debug!("Detector {} disabled by config", detector.id());
                continue;
            }
            if let Some(severity) = config.severity_override(detector.id()) {
                engine.severity_overrides.insert(detector.id(), severity);
            }
            engine.register(detector);
        }
        let timeout_ms = config.analysis.file_timeout_ms;
        engine.file_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        engine
    }

    pub fn with_file_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.file_timeout = timeout;
        self
    }

    pub fn with_severity_override(mut self, id: &'static str, severity: Severity) -> Self {
        self.severity_overrides.insert(id, severity);
        self
    }

    pub fn register(&mut self, detector: Arc<dyn Detector>) {
        self.detectors.push(detector);
    }

    pub fn register_all(&mut self, detectors: impl IntoIterator<Item = Arc<dyn Detector>>) {
        self.detectors.extend(detectors);
    }

    pub fn detector_count(&self) -> usize {
        self.detectors.len()
    }

    pub fn detector_ids(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.id()).collect()
    }

    pub fn detectors(&self) -> &[Arc<dyn Detector>] {
        &self.detectors
    }

    /// Drop detectors that do not apply to this project
    pub fn retain_applicable(&mut self, context: &ProjectContext) {
        self.detectors.retain(|d| {
            let applicable = d.is_applicable(context);
            if !applicable {
                debug!("Detector {} not applicable, skipping", d.id());
            }
            applicable
        });
    }

    /// Run every detector over one file.
    ///
    /// Only the per-file deadline is an error; detector failures are
    /// recovered here and logged.
    pub fn run_file(
        &self,
        file: &SourceFile,
        index: &WorkspaceIndex,
    ) -> Result<Vec<Evidence>, AnalysisError> {
        let start = Instant::now();
        let mut summary = DetectionSummary::default();
        let mut evidence = Vec::new();

        for detector in &self.detectors {
            if let Some(limit) = self.file_timeout {
                if start.elapsed() > limit {
                    warn!(
                        "Scan of {} exceeded {}ms before {}",
                        file.path(),
                        limit.as_millis(),
                        detector.id()
                    );
                    return Err(AnalysisError::Timeout {
                        path: file.path().to_string(),
                        timeout_ms: limit.as_millis() as u64,
                    });
                }
            }

            let result = self.run_single_detector(detector, file, index);
            summary.add_result(&result);
            if let Some(err) = &result.error {
                warn!("Detector {} failed on {}: {}", result.detector_id, file.path(), err);
            }
            evidence.extend(self.accept(file, detector.id(), result.evidence));
        }

        debug!(
            "{}: {} evidence from {}/{} detectors in {}ms",
            file.path(),
            evidence.len(),
            summary.detectors_succeeded,
            summary.detectors_run,
            summary.total_duration_ms
        );
        Ok(evidence)
    }

    /// Filter malformed evidence and apply the configured severity override
    fn accept(
        &self,
        file: &SourceFile,
        id: &'static str,
        evidence: Vec<Evidence>,
    ) -> Vec<Evidence> {
        let line_count = file.line_count();
        let forced = self.severity_overrides.get(id).copied();
        evidence
            .into_iter()
            .filter(|e| {
                let valid = e.pointer.is_within(line_count)
                    && e.pointer.relative_file_path == file.path()
                    && e.pointer.start_column >= 1;
                if !valid {
                    warn!(
                        "Dropping evidence from {} with invalid pointer {}:{}-{}",
                        id, e.pointer.relative_file_path, e.pointer.start_line, e.pointer.end_line
                    );
                }
                valid
            })
            .map(|mut e| {
                if let Some(severity) = forced {
                    e.severity = severity;
                }
                e
            })
            .collect()
    }

    /// Run a single detector with error handling and timing
    fn run_single_detector(
        &self,
        detector: &Arc<dyn Detector>,
        file: &SourceFile,
        index: &WorkspaceIndex,
    ) -> DetectorResult {
        let id = detector.id().to_string();
        let start = Instant::now();

        // Wrap in catch_unwind to handle panics
        let detect_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            detector.detect(file, index)
        }));
        let duration = start.elapsed().as_millis() as u64;

        match detect_result {
            Ok(Ok(evidence)) => DetectorResult::success(id, evidence, duration),
            Ok(Err(e)) => DetectorResult::failure(id, format!("{:#}", e), duration),
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!("Detector {} panicked on {}: {}", id, file.path(), panic_msg);
                DetectorResult::failure(id, format!("Panic: {}", panic_msg), duration)
            }
        }
    }
}

impl Default for DetectorEngine {
    fn default() -> Self {
        Self::from_config(&ProjectConfig::default())
    }
}
