//! Deep nesting detector
//!
//! Measures how deeply control structures nest inside each method body.
//! Only braces opened by a control statement (`if`, `else`, loops, `switch`,
//! `try`/`catch`/`finally`, `synchronized`) add a level; lambda bodies and
//! anonymous classes do not. `else if` chains stay at one level.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::{body_lines, method_pointer};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{MethodDecl, SourceFile};
use anyhow::Result;

/// Default tiers: nesting deeper than 3 / 5 / 7 levels
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(3.0, 5.0, 7.0);

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "try", "catch", "finally", "synchronized",
];

pub struct DeepNestingDetector {
    tiers: SeverityTiers,
}

impl DeepNestingDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for DeepNestingDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Deepest control nesting inside a method body, with the line it occurs on
pub fn max_control_depth(file: &SourceFile, method: &MethodDecl) -> (usize, u32) {
    // One entry per open brace: whether a control statement opened it
    let mut stack: Vec<bool> = Vec::new();
    let mut in_body = false;
    let mut pending_control = false;
    let mut word = String::new();
    let mut max_depth = 0usize;
    let mut max_line = method.signature_line;

    for (index, line) in body_lines(file, method) {
        for c in line.chars().chain(std::iter::once(' ')) {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                word.push(c);
                continue;
            }
            if in_body && CONTROL_KEYWORDS.contains(&word.as_str()) {
                pending_control = true;
            }
            word.clear();

            match c {
                '{' => {
                    if in_body {
                        stack.push(pending_control);
                    } else {
                        in_body = true;
                    }
                    pending_control = false;
                    let depth = stack.iter().filter(|opened| **opened).count();
                    if depth > max_depth {
                        max_depth = depth;
                        max_line = (index + 1) as u32;
                    }
                }
                '}' => {
                    if stack.pop().is_none() {
                        return (max_depth, max_line);
                    }
                    pending_control = false;
                }
                ';' => pending_control = false,
                _ => {}
            }
        }
    }

    (max_depth, max_line)
}

impl Detector for DeepNestingDetector {
    fn id(&self) -> &'static str {
        "complexity.deep-nesting"
    }

    fn description(&self) -> &'static str {
        "Detects deeply nested control structures"
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
            let (depth, line) = max_control_depth(file, method);
            let Some(severity) = self.tiers.classify(depth as f64) else {
                continue;
            };

            evidence.push(
                Evidence::new(
                    self.id(),
                    method_pointer(file, class, method),
                    severity,
                    format!(
                        "Method '{}' nests control flow {} levels deep",
                        method.name, depth
                    ),
                )
                .with_metric("maxNesting", depth)
                .with_metric("deepestLine", line)
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

    const NESTED: &str = r#"class Walker {
    void walk(List<Node> nodes) {
        for (Node n : nodes) {
            if (n.ok()) {
                while (n.more()) {
                    if (n.next()) {
                        try {
                            n.visit();
                        } catch (Exception e) {
                            log(e);
                        }
                    }
                }
            }
        }
    }
}
"#;

    #[test]
    fn test_nesting_depth() {
        let file = SourceFile::parse("Walker.java", NESTED);
        let method = &file.structure().classes[0].methods[0];
        assert_eq!(max_control_depth(&file, method), (5, 7));

        let evidence = DeepNestingDetector::new()
            .detect(&file, &WorkspaceIndex::empty())
            .expect("detect");
        assert_eq!(evidence[0].severity, Severity::Minor);
        assert_eq!(evidence[0].metric("maxNesting"), Some(&MetricValue::Integer(5)));
    }

    #[test]
    fn test_else_if_chain_and_lambdas_stay_flat() {
        let file = SourceFile::parse(
            "Flat.java",
            "class Flat {\n    synchronized void f() {\n        if (a) {\n            x();\n        } else if (b) {\n            y();\n        } else {\n            items.forEach(i -> {\n                use(i);\n            });\n        }\n    }\n}\n",
        );
        let method = &file.structure().classes[0].methods[0];
        assert_eq!(max_control_depth(&file, method).0, 1);
    }
}
