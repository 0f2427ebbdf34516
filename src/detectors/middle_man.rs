//! Middle man detector
//!
//! Detects classes where most methods simply forward to a field:
//!
//! ```java
//! int size() { return items.size(); }
//! void clear() { this.items.clear(); }
//! ```
//!
//! When delegation is all a class does, callers could talk to the delegate
//! directly.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::class_pointer;
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{ClassDecl, MethodDecl, SourceFile};
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

/// Default tiers: at least 50% / 75% / 100% delegating methods
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::at_least(0.5, 0.75, 1.0);

const MIN_METHODS: usize = 3;

static DELEGATION: OnceLock<Regex> = OnceLock::new();

fn delegation_pattern() -> &'static Regex {
    DELEGATION.get_or_init(|| {
        Regex::new(
            r"^(?:return\s+)?(?:this\s*\.\s*)?([A-Za-z_$][\w$]*)\s*\.\s*[A-Za-z_$][\w$]*\s*\([^;]*\)\s*;$",
        )
        .expect("valid regex")
    })
}

/// The single statement of a method body, if it has exactly one
fn single_statement(file: &SourceFile, method: &MethodDecl) -> Option<String> {
    let start = method.body_start_line?;
    let text = file
        .code_range(start, method.end_line)
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join(" ");
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    let body = text.get(open + 1..close)?.trim();
    (body.matches(';').count() == 1 && !body.contains('{')).then(|| body.to_string())
}

/// Whether the method only forwards to one of the class's fields
fn is_delegating(file: &SourceFile, class: &ClassDecl, method: &MethodDecl) -> bool {
    let Some(statement) = single_statement(file, method) else {
        return false;
    };
    let statement = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    delegation_pattern()
        .captures(&statement)
        .and_then(|caps| caps.get(1))
        .is_some_and(|receiver| class.fields.iter().any(|f| f.name == receiver.as_str()))
}

pub struct MiddleManDetector {
    tiers: SeverityTiers,
    min_methods: usize,
}

impl MiddleManDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
            min_methods: config.get_option_or("min_methods", MIN_METHODS),
        }
    }
}

impl Default for MiddleManDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for MiddleManDetector {
    fn id(&self) -> &'static str {
        "coupling.middle-man"
    }

    fn description(&self) -> &'static str {
        "Detects classes that mostly delegate to another object"
    }

    fn category(&self) -> Category {
        Category::Coupler
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for class in &file.structure().classes {
            let methods: Vec<_> = class.regular_methods().filter(|m| m.has_body()).collect();
            if methods.len() < self.min_methods {
                continue;
            }
            let delegating = methods
                .iter()
                .filter(|m| is_delegating(file, class, m))
                .count();
            let ratio = delegating as f64 / methods.len() as f64;
            let Some(severity) = self.tiers.classify(ratio) else {
                continue;
            };

            evidence.push(
                Evidence::new(
                    self.id(),
                    class_pointer(file, class),
                    severity,
                    format!(
                        "{} of {} methods in '{}' only delegate",
                        delegating,
                        methods.len(),
                        class.name
                    ),
                )
                .with_metric("delegationRatio", ratio)
                .with_metric("delegatingMethods", delegating)
                .with_metric("totalMethods", methods.len()),
            );
        }

        Ok(evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricValue, Severity};

    const WRAPPER: &str = r#"public class Inbox {
    private final List<String> items = new ArrayList<>();

    public int size() { return items.size(); }

    public void clear() {
        this.items.clear();
    }

    public boolean add(String s) {
        return items.add(s);
    }

    public String first() {
        String head = items.get(0);
        return head.trim();
    }
}
"#;

    #[test]
    fn test_mostly_delegating_class() {
        let file = SourceFile::parse("Inbox.java", WRAPPER);
        let evidence = MiddleManDetector::new()
            .detect(&file, &WorkspaceIndex::empty())
            .expect("detect");
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].severity, Severity::Major);
        assert_eq!(evidence[0].metric("delegatingMethods"), Some(&MetricValue::Integer(3)));
        assert_eq!(evidence[0].metric("delegationRatio"), Some(&MetricValue::Float(0.75)));
    }

    #[test]
    fn test_calls_on_locals_are_not_delegation() {
        let file = SourceFile::parse(
            "Calc.java",
            "class Calc {\n    int a(Other o) { return o.a(); }\n    int b(Other o) { return o.b(); }\n    int c() { return 3; }\n}\n",
        );
        let evidence = MiddleManDetector::new()
            .detect(&file, &WorkspaceIndex::empty())
            .expect("detect");
        assert!(evidence.is_empty());
    }
}
