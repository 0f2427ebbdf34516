//! Temporary field detector
//!
//! An instance field that only a small share of the class's methods touch
//! is usually state for one algorithm parked on the object. Such fields
//! make the object's valid states hard to reason about.
//!
//! Constants (`static final`) are not state and are ignored. Constructors
//! do not count as users, since they touch every field they initialize.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::class_pointer;
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{contains_word, ClassKind, SourceFile};
use anyhow::Result;

/// Default tiers: used by at most 30% / 20% / 0% of methods
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::at_most(0.3, 0.2, 0.0);

const MIN_METHODS: usize = 3;

pub struct TemporaryFieldDetector {
    tiers: SeverityTiers,
    min_methods: usize,
}

impl TemporaryFieldDetector {
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

impl Default for TemporaryFieldDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for TemporaryFieldDetector {
    fn id(&self) -> &'static str {
        "design.temporary-field"
    }

    fn description(&self) -> &'static str {
        "Detects fields used by only a few methods"
    }

    fn category(&self) -> Category {
        Category::ObjectOrientationAbuser
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for class in &file.structure().classes {
            if !matches!(class.kind, ClassKind::Class | ClassKind::Enum) {
                continue;
            }
            let methods: Vec<_> = class.regular_methods().filter(|m| m.has_body()).collect();
            if methods.len() < self.min_methods {
                continue;
            }

            for field in class.fields.iter().filter(|f| !f.is_constant()) {
                let users = methods
                    .iter()
                    .filter(|m| {
                        file.code_range(m.signature_line, m.end_line)
                            .any(|(_, line)| contains_word(line, &field.name))
                    })
                    .count();
                let ratio = users as f64 / methods.len() as f64;
                let Some(severity) = self.tiers.classify(ratio) else {
                    continue;
                };

                let mut pointer = class_pointer(file, class);
                pointer.start_line = field.line;
                pointer.end_line = field.line;

                evidence.push(
                    Evidence::new(
                        self.id(),
                        pointer.in_member(field.name.clone()),
                        severity,
                        format!(
                            "Field '{}' is used by {} of {} methods in '{}'",
                            field.name,
                            users,
                            methods.len(),
                            class.name
                        ),
                    )
                    .with_metric("usageRatio", ratio)
                    .with_metric("referencingMethods", users)
                    .with_metric("totalMethods", methods.len()),
                );
            }
        }

        Ok(evidence)
    }
}
