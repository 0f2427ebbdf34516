//! Data class detector
//!
//! A class made of fields plus getters and setters holds data that other
//! classes operate on. Behavior that belongs with the data lives elsewhere.
//!
//! A class qualifies when every method it declares is an accessor
//! (`getX`, `setX`, `isX`, `hasX`) or one of the `Object` housekeeping
//! methods. Records, abstract classes and exceptions are skipped.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::{class_pointer, is_exception_type};
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::{ClassKind, SourceFile};
use anyhow::Result;

/// Default tiers: more than 1 / 8 fields, never critical
const DEFAULT_TIERS: SeverityTiers = SeverityTiers::above(1.0, 8.0, f64::INFINITY);

const HOUSEKEEPING: &[&str] = &["equals", "hashCode", "toString"];

/// Whether a method name reads as a plain accessor
pub fn is_accessor(name: &str) -> bool {
    ["get", "set", "is", "has"].iter().any(|prefix| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
    })
}

pub struct DataClassDetector {
    tiers: SeverityTiers,
}

impl DataClassDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::new())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self {
            tiers: DEFAULT_TIERS.configured(&config, ""),
        }
    }
}

impl Default for DataClassDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DataClassDetector {
    fn id(&self) -> &'static str {
        "design.data-class"
    }

    fn description(&self) -> &'static str {
        "Detects classes that only hold data behind accessors"
    }

    fn category(&self) -> Category {
        Category::Dispensable
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut evidence = Vec::new();

        for class in &file.structure().classes {
            if class.kind != ClassKind::Class || class.is_abstract || is_exception_type(&class.name)
            {
                continue;
            }
            if class.superclass.as_deref().is_some_and(is_exception_type) {
                continue;
            }
            let only_accessors = class
                .regular_methods()
                .all(|m| is_accessor(&m.name) || HOUSEKEEPING.contains(&m.name.as_str()));
            if !only_accessors {
                continue;
            }

            let fields = class.fields.iter().filter(|f| !f.is_constant()).count();
            let Some(severity) = self.tiers.classify(fields as f64) else {
                continue;
            };
            let accessors = class.regular_methods().filter(|m| is_accessor(&m.name)).count();

            evidence.push(
                Evidence::new(
                    self.id(),
                    class_pointer(file, class),
                    severity,
                    format!(
                        "Class '{}' has {} fields and only accessor methods",
                        class.name, fields
                    ),
                )
                .with_metric("fieldCount", fields)
                .with_metric("accessorCount", accessors),
            );
        }

        Ok(evidence)
    }
}
