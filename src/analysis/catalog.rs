//! Smell catalog
//!
//! Static table mapping a detector id to its smell type, category and
//! refactoring recommendation. Lookup tries the exact id, then the longest
//! matching namespace prefix, then a generic fallback, so evidence from an
//! unknown detector still gets a sensible classification.

use crate::models::Category;

/// Catalog row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmellInfo {
    pub smell_type: &'static str,
    pub category: Category,
    pub recommendation: &'static str,
}

const fn info(
    smell_type: &'static str,
    category: Category,
    recommendation: &'static str,
) -> SmellInfo {
    SmellInfo {
        smell_type,
        category,
        recommendation,
    }
}

static CATALOG: &[(&str, SmellInfo)] = &[
    (
        "design.long-method",
        info(
            "Long Method",
            Category::Bloater,
            "Extract Method: split the body into smaller, well-named methods",
        ),
    ),
    (
        "design.long-parameter-list",
        info(
            "Long Parameter List",
            Category::Bloater,
            "Introduce Parameter Object or Preserve Whole Object",
        ),
    ),
    (
        "design.god-class",
        info(
            "God Class",
            Category::Bloater,
            "Extract Class: move cohesive groups of fields and methods into their own classes",
        ),
    ),
    (
        "size.large-file",
        info(
            "Large File",
            Category::Bloater,
            "Split the file so each top-level type lives in its own file",
        ),
    ),
    (
        "design.refused-bequest",
        info(
            "Refused Bequest",
            Category::ObjectOrientationAbuser,
            "Replace Inheritance with Delegation, or Push Down Method into the subclasses that use it",
        ),
    ),
    (
        "design.temporary-field",
        info(
            "Temporary Field",
            Category::ObjectOrientationAbuser,
            "Extract Class for the field and the code that uses it, or pass the value as a parameter",
        ),
    ),
    (
        "design.switch-statement-abuse",
        info(
            "Switch Statements",
            Category::ObjectOrientationAbuser,
            "Replace Conditional with Polymorphism or a lookup table",
        ),
    ),
    (
        "design.data-class",
        info(
            "Data Class",
            Category::Dispensable,
            "Move Method: bring the behavior that uses this data into the class",
        ),
    ),
    (
        "design.lazy-class",
        info(
            "Lazy Class",
            Category::Dispensable,
            "Inline Class into its main user, or Collapse Hierarchy",
        ),
    ),
    (
        "duplication.duplicate-code",
        info(
            "Duplicate Code",
            Category::Dispensable,
            "Extract Method for the shared block, or Pull Up Method into a common parent",
        ),
    ),
    (
        "coupling.message-chain",
        info(
            "Message Chains",
            Category::Coupler,
            "Hide Delegate: give the first object a method that returns what the caller needs",
        ),
    ),
    (
        "coupling.middle-man",
        info(
            "Middle Man",
            Category::Coupler,
            "Remove Middle Man: let callers use the delegate directly",
        ),
    ),
    (
        "complexity.deep-nesting",
        info(
            "Deep Nesting",
            Category::Complexity,
            "Replace Nested Conditional with Guard Clauses, or Extract Method for inner blocks",
        ),
    ),
    (
        "complexity.cyclomatic-complexity",
        info(
            "High Cyclomatic Complexity",
            Category::Complexity,
            "Decompose Conditional and Extract Method to reduce branching",
        ),
    ),
    (
        "error-handling.try-catch-hell",
        info(
            "Try-Catch Hell",
            Category::ErrorHandling,
            "Extract the guarded work into methods and handle exceptions at one level",
        ),
    ),
    (
        "error-handling.null-abuse",
        info(
            "Null Abuse",
            Category::ErrorHandling,
            "Introduce Null Object, or validate once at the boundary instead of in every method",
        ),
    ),
    (
        "error-handling.empty-catch",
        info(
            "Empty Catch Block",
            Category::ErrorHandling,
            "Handle, log or rethrow the exception; never swallow it silently",
        ),
    ),
    (
        "error-handling.print-stack-trace",
        info(
            "printStackTrace Usage",
            Category::ErrorHandling,
            "Log the exception through the project's logger instead",
        ),
    ),
    (
        "error-handling.generic-catch",
        info(
            "Generic Exception Catch",
            Category::ErrorHandling,
            "Catch the specific exception types the guarded code can throw",
        ),
    ),
    (
        "style.magic-number",
        info(
            "Magic Number",
            Category::Style,
            "Replace Magic Number with Symbolic Constant",
        ),
    ),
    (
        "style.hardcoded-string",
        info(
            "Hardcoded String",
            Category::Style,
            "Move literals into named constants or resource bundles",
        ),
    ),
    (
        "style.console-output",
        info(
            "Console Output",
            Category::Style,
            "Use a logger instead of System.out/System.err",
        ),
    ),
    (
        "style.todo-comment",
        info(
            "TODO Comment",
            Category::Style,
            "Resolve the marker or track it in the issue tracker",
        ),
    ),
    (
        "style.wildcard-import",
        info(
            "Wildcard Import",
            Category::Style,
            "Import the specific types that are used",
        ),
    ),
    (
        "style.long-line",
        info(
            "Long Line",
            Category::Style,
            "Wrap the line or extract sub-expressions into named variables",
        ),
    ),
    (
        "concurrency.thread-sleep",
        info(
            "Thread.sleep Usage",
            Category::Concurrency,
            "Use a scheduler, a latch or another explicit synchronization primitive",
        ),
    ),
];

/// Namespace-level defaults for detectors missing from the table
static NAMESPACES: &[(&str, SmellInfo)] = &[
    (
        "design.",
        info("Design Smell", Category::ObjectOrientationAbuser, "Review the class design"),
    ),
    (
        "size.",
        info("Size Smell", Category::Bloater, "Split the code into smaller units"),
    ),
    (
        "duplication.",
        info("Duplication", Category::Dispensable, "Remove the duplication"),
    ),
    (
        "coupling.",
        info("Coupling Smell", Category::Coupler, "Reduce coupling between the classes involved"),
    ),
    (
        "complexity.",
        info("Complexity Smell", Category::Complexity, "Simplify the control flow"),
    ),
    (
        "error-handling.",
        info("Error Handling Smell", Category::ErrorHandling, "Review the error handling"),
    ),
    (
        "style.",
        info("Style Issue", Category::Style, "Follow the project's coding conventions"),
    ),
    (
        "concurrency.",
        info("Concurrency Smell", Category::Concurrency, "Review the thread interaction"),
    ),
];

const FALLBACK: SmellInfo = info("Code Smell", Category::Style, "Review and refactor");

/// Catalog entry for a detector id
pub fn lookup(detector_id: &str) -> SmellInfo {
    if let Some((_, found)) = CATALOG.iter().find(|(id, _)| *id == detector_id) {
        return *found;
    }
    NAMESPACES
        .iter()
        .filter(|(prefix, _)| detector_id.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, found)| *found)
        .unwrap_or(FALLBACK)
}

/// Every catalogued detector id
pub fn known_ids() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::detectors::default_detectors;

    #[test]
    fn test_exact_prefix_and_fallback() {
        assert_eq!(lookup("design.long-method").smell_type, "Long Method");
        let prefixed = lookup("coupling.feature-envy");
        assert_eq!(prefixed.smell_type, "Coupling Smell");
        assert_eq!(prefixed.category, Category::Coupler);
        assert_eq!(lookup("unknown").smell_type, "Code Smell");
    }

    #[test]
    fn test_every_detector_is_catalogued_with_matching_category() {
        for detector in default_detectors(&ProjectConfig::default()) {
            let entry = CATALOG.iter().find(|(id, _)| *id == detector.id());
            let (_, entry) = entry.unwrap_or_else(|| panic!("{} missing", detector.id()));
            assert_eq!(entry.category, detector.category(), "{}", detector.id());
        }
        assert_eq!(known_ids().count(), CATALOG.len());
    }
}
