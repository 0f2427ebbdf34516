//! Refused bequest detector
//!
//! A subclass that ignores most of what it inherits probably should not be
//! a subclass at all. For each class with a superclass declared somewhere in
//! the workspace, the usage ratio is the share of the parent's methods the
//! child either overrides or calls. A low ratio suggests replacing
//! inheritance with delegation.
//!
//! Parents with fewer than three methods carry too little signal and are
//! skipped, as are parents outside the analyzed sources.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::{calls_method, class_pointer};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{ClassKind, SourceFile};
use anyhow::Result;
use std::collections::BTreeSet;

/// Default tiers: usage below 30% / 25% / 10%
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::below(0.3, 0.25, 0.1);

const MIN_PARENT_METHODS: usize = 3;

pub struct RefusedBequestDetector {
    tiers: SeverityTiers,
    min_parent_methods: usize,
}

impl RefusedBequestDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
            min_parent_methods: config.get_option_or("min_parent_methods", MIN_PARENT_METHODS),
        }
    }
}

impl Default for RefusedBequestDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for RefusedBequestDetector {
    fn id(&self) -> &'static str {
        "design.refused-bequest"
    }

    fn description(&self) -> &'static str {
        "Detects subclasses that use little of their inheritance"
    }

    fn category(&self) -> Category {
        Category::ObjectOrientationAbuser
    }

    fn detect(&self, file: &SourceFile, index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let structure = file.structure();
        let mut evidence = Vec::new();

        for class in &structure.classes {
            let Some(superclass) = class.superclass.as_deref() else {
                continue;
            };
            let Some(parent) = index.class(superclass, structure.package.as_deref()) else {
                continue;
            };
            if parent.kind != ClassKind::Class {
                continue;
            }
            let inherited = parent.distinct_methods();
            if inherited.len() < self.min_parent_methods {
                continue;
            }

            let overridden: BTreeSet<&str> =
                class.regular_methods().map(|m| m.name.as_str()).collect();
            let body: Vec<&str> = file
                .code_range(class.start_line, class.end_line)
                .map(|(_, line)| line)
                .collect();
            let used = inherited
                .iter()
                .filter(|name| {
                    overridden.contains(*name) || body.iter().any(|line| calls_method(line, name))
                })
                .count();

            let ratio = used as f64 / inherited.len() as f64;
            let Some(severity) = self.tiers.classify(ratio) else {
                continue;
            };

            evidence.push(
                Evidence::new(
                    self.id(),
                    class_pointer(file, class),
                    severity,
                    format!(
                        "'{}' uses {} of {} methods inherited from '{}'",
                        class.name,
                        used,
                        inherited.len(),
                        parent.name
                    ),
                )
                .with_metric("usageRatio", ratio)
                .with_metric("usedMethods", used)
                .with_metric("parentMethods", inherited.len())
                .with_metric("parentClass", parent.name.as_str()),
            );
        }

        Ok(evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricValue, Severity};
    use std::sync::Arc;

    fn parent_source(methods: usize) -> String {
        let mut text = String::from("package shapes;\n\npublic class Base {\n");
        for i in 0..methods {
            text.push_str(&format!("    public void op{}() {{\n        work();\n    }}\n", i));
        }
        text.push_str("}\n");
        text
    }

    fn analyze(child: &str, parent_methods: usize) -> Vec<Evidence> {
        let files = vec![
            Arc::new(SourceFile::parse("shapes/Base.java", &parent_source(parent_methods))),
            Arc::new(SourceFile::parse("shapes/Child.java", child)),
        ];
        let index = WorkspaceIndex::build(&files, 6);
        RefusedBequestDetector::new()
            .detect(&files[1], &index)
            .expect("detect")
    }

    #[test]
    fn test_low_usage_is_major() {
        let child = "package shapes;\n\npublic class Child extends Base {\n    @Override\n    public void op0() {\n        op1();\n    }\n}\n";
        let evidence = analyze(child, 10);
        assert_eq!(evidence.len(), 1);
        let e = &evidence[0];
        assert_eq!(e.severity, Severity::Major);
        assert_eq!(e.metric("usageRatio"), Some(&MetricValue::Float(0.2)));
        assert_eq!(e.metric("usedMethods"), Some(&MetricValue::Integer(2)));
        assert_eq!(e.metric("parentClass"), Some(&MetricValue::Text("Base".into())));
    }

    #[test]
    fn test_high_usage_is_clean() {
        let child = "package shapes;\n\npublic class Child extends Base {\n    void run() {\n        op0();\n        op1();\n        super.op2();\n    }\n}\n";
        assert!(analyze(child, 4).is_empty());
    }

    #[test]
    fn test_small_or_unknown_parent_skipped() {
        let child = "package shapes;\n\npublic class Child extends Base {\n}\n";
        assert!(analyze(child, 2).is_empty());

        let stranger = "package shapes;\n\npublic class Child extends java.util.ArrayList {\n}\n";
        assert!(analyze(stranger, 10).is_empty());
    }

    #[test]
    fn test_unused_inheritance_is_critical() {
        let child = "package shapes;\n\npublic class Child extends Base {\n    void other() {\n    }\n}\n";
        let evidence = analyze(child, 5);
        assert_eq!(evidence[0].severity, Severity::Critical);
    }
}
