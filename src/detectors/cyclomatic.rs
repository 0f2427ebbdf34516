//! Cyclomatic complexity detector
//!
//! Approximates McCabe complexity per method from the code view: one plus
//! the number of decision points (`if`, `for`, `while`, `case`, `catch`,
//! `&&`, `||` and the ternary `?`).

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::{body_lines, method_pointer};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{count_word, MethodDecl, SourceFile};
use anyhow::Result;

/// Default tiers: complexity above 10 / 20 / 40
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(10.0, 20.0, 40.0);

const BRANCH_KEYWORDS: &[&str] = &["if", "for", "while", "case", "catch"];

pub struct CyclomaticComplexityDetector {
    tiers: SeverityTiers,
}

impl CyclomaticComplexityDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for CyclomaticComplexityDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Ternary `?` operators, ignoring generic wildcards like `<?>` and `<? extends T>`
fn count_ternaries(line: &str) -> usize {
    let chars: Vec<char> = line.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            if **c != '?' {
                return false;
            }
            let before = chars[..*i].iter().rev().find(|c| !c.is_whitespace());
            let after: String = chars[i + 1..].iter().collect();
            let after = after.trim_start();
            before != Some(&'<')
                && before != Some(&',')
                && !after.starts_with('>')
                && !after.starts_with(',')
                && !after.starts_with("extends ")
                && !after.starts_with("super ")
        })
        .count()
}

/// Decision points on one line of code
pub fn decision_points(line: &str) -> usize {
    let keywords: usize = BRANCH_KEYWORDS.iter().map(|kw| count_word(line, kw)).sum();
    keywords + line.matches("&&").count() + line.matches("||").count() + count_ternaries(line)
}

/// Complexity of one method
pub fn method_complexity(file: &SourceFile, method: &MethodDecl) -> usize {
    1 + body_lines(file, method)
        .map(|(_, line)| decision_points(line))
        .sum::<usize>()
}

impl Detector for CyclomaticComplexityDetector {
    fn id(&self) -> &'static str {
        "complexity.cyclomatic-complexity"
    }

    fn description(&self) -> &'static str {
        "Detects methods with high cyclomatic complexity"
    }

    fn category(&self) -> Category {
        Category::Complexity
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for (class, method) in file.structure().methods() {
            if !method.has_body() {
                continue;
            }
            let complexity = method_complexity(file, method);
            let Some(severity) = self.tiers.classify(complexity as f64) else {
                continue;
            };

            evidence.push(
                Evidence::new(
                    self.id(),
                    method_pointer(file, class, method),
                    severity,
                    format!(
                        "Method '{}' has cyclomatic complexity {}",
                        method.name, complexity
                    ),
                )
                .with_metric("complexity", complexity)
                .with_metric("threshold", self.tiers.threshold_for(severity) as i64),
            );
        }

        Ok(evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricValue, Severity};

    #[test]
    fn test_decision_points() {
        assert_eq!(decision_points("if (a && b || c) {"), 3);
        assert_eq!(decision_points("} else if (x) {"), 1);
        assert_eq!(decision_points("return ok ? 1 : 2;"), 1);
        assert_eq!(decision_points("List<? extends Number> xs = f();"), 0);
        assert_eq!(decision_points("Map<?, ?> m = g();"), 0);
        assert_eq!(decision_points("for (int i = 0; i < n; i++) {"), 1);
        assert_eq!(decision_points("notify();"), 0);
    }

    #[test]
    fn test_complex_method_flagged() {
        let mut text = String::from("class Rules {\n    int score(int x) {\n        int s = 0;\n");
        for i in 0..11 {
            text.push_str(&format!("        if (x > {}) s++;\n", i));
        }
        text.push_str("        return s;\n    }\n}\n");
        let file = SourceFile::parse("Rules.java", &text);
        let method = &file.structure().classes[0].methods[0];
        assert_eq!(method_complexity(&file, method), 12);

        let evidence = CyclomaticComplexityDetector::new()
            .detect(&file, &WorkspaceIndex::empty())
            .expect("detect");
        assert_eq!(evidence[0].severity, Severity::Minor);
        assert_eq!(evidence[0].metric("complexity"), Some(&MetricValue::Integer(12)));
    }

    #[test]
    fn test_simple_method_is_clean() {
        let file = SourceFile::parse(
            "Simple.java",
            "class Simple {\n    int one() {\n        return 1;\n    }\n}\n",
        );
        let evidence = CyclomaticComplexityDetector::new()
            .detect(&file, &WorkspaceIndex::empty())
            .expect("detect");
        assert!(evidence.is_empty());
    }
}
