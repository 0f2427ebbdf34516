//! God class detector
//!
//! Detects classes that have grown too large, either in raw size or in the
//! number of methods they expose. A god class typically:
//! - Knows too much and does too much
//! - Is changed for many unrelated reasons
//! - Becomes a merge-conflict hotspot
//!
//! Size and method count are measured independently and the worse of the
//! two decides severity. Thresholds use the `lines_` and `methods_` key
//! prefixes.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::class_pointer;
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{ClassKind, SourceFile};
use anyhow::Result;

/// Default size tiers: more than 300 / 600 / 1000 lines
const LINE_TIERS: SeverityTiers = SeverityTiers::above(300.0, 600.0, 1000.0);
/// Default method tiers: more than 20 / 35 / 50 methods
const METHOD_TIERS: SeverityTiers = SeverityTiers::above(20.0, 35.0, 50.0);

/// Detects oversized classes
pub struct GodClassDetector {
    lines: SeverityTiers,
    methods: SeverityTiers,
}

impl GodClassDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            lines: LINE_TIERS.configured(&config, "lines_"),
            methods: METHOD_TIERS.configured(&config, "methods_"),
        }
    }
}

impl Default for GodClassDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for GodClassDetector {
    fn id(&self) -> &'static str {
        "design.god-class"
    }

    fn description(&self) -> &'static str {
        "Detects classes with too many lines or methods"
    }

    fn category(&self) -> Category {
        Category::Bloater
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for class in &file.structure().classes {
            if !matches!(class.kind, ClassKind::Class | ClassKind::Enum) {
                continue;
            }
            let lines = class.line_count();
            let methods = class.regular_methods().count();
            let severity = self
                .lines
                .classify(f64::from(lines))
                .max(self.methods.classify(methods as f64));
            let Some(severity) = severity else {
                continue;
            };

            evidence.push(
                Evidence::new(
                    self.id(),
                    class_pointer(file, class),
                    severity,
                    format!(
                        "Class '{}' spans {} lines with {} methods",
                        class.name, lines, methods
                    ),
                )
                .with_metric("lineCount", lines)
                .with_metric("methodCount", methods),
            );
        }

        Ok(evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricValue, Severity};

    fn class_with_methods(n: usize) -> SourceFile {
        let mut text = String::from("public class Hub {\n");
        for i in 0..n {
            text.push_str(&format!("    void m{}() {{\n        run();\n    }}\n", i));
        }
        text.push_str("}\n");
        SourceFile::parse("Hub.java", &text)
    }

    #[test]
    fn test_method_count_drives_severity() {
        let detector = GodClassDetector::new();
        let index = WorkspaceIndex::empty();
        assert!(detector.detect(&class_with_methods(20), &index).expect("detect").is_empty());

        let evidence = detector.detect(&class_with_methods(36), &index).expect("detect");
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].severity, Severity::Major);
        assert_eq!(evidence[0].metric("methodCount"), Some(&MetricValue::Integer(36)));
        assert_eq!(evidence[0].metric("lineCount"), Some(&MetricValue::Integer(110)));
    }

    #[test]
    fn test_size_drives_severity() {
        let mut text = String::from("public class Blob {\n    void m() {\n");
        for _ in 0..700 {
            text.push_str("        x++;\n");
        }
        text.push_str("    }\n}\n");
        let file = SourceFile::parse("Blob.java", &text);
        let evidence = GodClassDetector::new()
            .detect(&file, &WorkspaceIndex::empty())
            .expect("detect");
        assert_eq!(evidence[0].severity, Severity::Major);
    }

    #[test]
    fn test_interfaces_are_skipped() {
        let mut text = String::from("public interface Api {\n");
        for i in 0..60 {
            text.push_str(&format!("    void m{}();\n", i));
        }
        text.push_str("}\n");
        let file = SourceFile::parse("Api.java", &text);
        let evidence = GodClassDetector::new()
            .detect(&file, &WorkspaceIndex::empty())
            .expect("detect");
        assert!(evidence.is_empty());
    }
}
