//! Lazy class detector
//!
//! Detects small concrete classes that do too little to justify their
//! existence. Only top-level classes of at most 30 lines are considered;
//! abstract classes, interfaces, enums, records and exception types have
//! legitimate reasons to be small and are skipped.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::{class_pointer, is_exception_type};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{ClassKind, SourceFile};
use anyhow::Result;

/// Default tiers: fewer than 3 / 1 methods, never critical
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::below(3.0, 1.0, f64::NEG_INFINITY);

const MAX_LINES: u32 = 30;

pub struct LazyClassDetector {
    tiers: SeverityTiers,
    max_lines: u32,
}

impl LazyClassDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
            max_lines: config.get_option_or("max_lines", MAX_LINES),
        }
    }
}

impl Default for LazyClassDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for LazyClassDetector {
    fn id(&self) -> &'static str {
        "design.lazy-class"
    }

    fn description(&self) -> &'static str {
        "Detects small classes that do too little"
    }

    fn category(&self) -> Category {
        Category::Dispensable
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for class in &file.structure().classes {
            if class.kind != ClassKind::Class
                || class.is_abstract
                || class.parent.is_some()
                || class.line_count() > self.max_lines
                || is_exception_type(&class.name)
                || class.superclass.as_deref().is_some_and(is_exception_type)
            {
                continue;
            }
            let methods = class.regular_methods().count();
            let Some(severity) = self.tiers.classify(methods as f64) else {
                continue;
            };

            evidence.push(
                Evidence::new(
                    self.id(),
                    class_pointer(file, class),
                    severity,
                    format!(
                        "Class '{}' has only {} methods in {} lines",
                        class.name,
                        methods,
                        class.line_count()
                    ),
                )
                .with_metric("methodCount", methods)
                .with_metric("lineCount", class.line_count()),
            );
        }

        Ok(evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn detect(text: &str) -> Vec<Evidence> {
        let file = SourceFile::parse("Small.java", text);
        LazyClassDetector::new()
            .detect(&file, &WorkspaceIndex::empty())
            .expect("detect")
    }

    #[test]
    fn test_severity_by_method_count() {
        let empty = detect("public class Holder {\n    private int x;\n}\n");
        assert_eq!(empty[0].severity, Severity::Major);

        let one = detect("public class Once {\n    void run() {\n    }\n}\n");
        assert_eq!(one[0].severity, Severity::Minor);

        let three = detect(
            "public class Busy {\n    void a() {\n    }\n    void b() {\n    }\n    void c() {\n    }\n}\n",
        );
        assert!(three.is_empty());
    }

    #[test]
    fn test_exempt_kinds() {
        assert!(detect("public abstract class Base {\n}\n").is_empty());
        assert!(detect("public interface Marker {\n}\n").is_empty());
        assert!(detect("public class NotFound extends RuntimeException {\n}\n").is_empty());
        assert!(detect("public enum Color {\n    RED, GREEN\n}\n").is_empty());
    }

    #[test]
    fn test_large_class_skipped() {
        let mut text = String::from("public class Long {\n    void run() {\n");
        for _ in 0..40 {
            text.push_str("        step();\n");
        }
        text.push_str("    }\n}\n");
        assert!(detect(&text).is_empty());
    }
}
