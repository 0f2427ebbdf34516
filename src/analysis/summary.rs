//! Workspace-level summaries
//!
//! Count maps from parallel workers are merged by summing on key collision,
//! so the fold order never matters. Workspace recommendations are derived
//! from how often each smell type occurs across all files.

use crate::models::{CodeAnalysisResult, FileAnalysis};
use std::collections::BTreeMap;

/// Merge `other` into `into`, summing counts of shared keys
pub fn merge_counts(into: &mut BTreeMap<String, usize>, other: &BTreeMap<String, usize>) {
    for (key, count) in other {
        *into.entry(key.clone()).or_insert(0) += count;
    }
}

/// Per-file counts by smell type, category and severity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub smells: BTreeMap<String, usize>,
    pub categories: BTreeMap<String, usize>,
    pub severities: BTreeMap<String, usize>,
}

impl Tally {
    pub fn of_file(file: &FileAnalysis) -> Self {
        let mut tally = Self::default();
        for smell in &file.smells {
            *tally.smells.entry(smell.smell_type.clone()).or_insert(0) += 1;
            *tally
                .categories
                .entry(smell.category.as_str().to_string())
                .or_insert(0) += 1;
            *tally
                .severities
                .entry(smell.evidence.severity.as_str().to_string())
                .or_insert(0) += 1;
        }
        tally
    }

    pub fn merge(mut self, other: Self) -> Self {
        merge_counts(&mut self.smells, &other.smells);
        merge_counts(&mut self.categories, &other.categories);
        merge_counts(&mut self.severities, &other.severities);
        self
    }
}

/// Frequency rules: (smell type, minimum occurrences, recommendation)
const SYSTEMIC_RULES: &[(&str, usize, &str)] = &[
    (
        "Long Method",
        5,
        "Long methods are widespread: schedule a systematic Extract Method pass",
    ),
    (
        "God Class",
        2,
        "Several god classes found: plan Extract Class refactorings around their responsibilities",
    ),
    (
        "Duplicate Code",
        3,
        "Duplication recurs across files: extract shared helpers or a common base class",
    ),
    (
        "Empty Catch Block",
        3,
        "Exceptions are swallowed in several places: agree on an error-handling policy",
    ),
    (
        "Long Parameter List",
        5,
        "Many methods take long parameter lists: introduce parameter objects for recurring groups",
    ),
    (
        "Deep Nesting",
        5,
        "Deeply nested control flow is common: adopt guard clauses and early returns",
    ),
    (
        "Magic Number",
        10,
        "Magic numbers appear in many files: collect them into named constants",
    ),
    (
        "Null Abuse",
        5,
        "Null checks dominate many methods: consider Optional at API boundaries or Null Objects",
    ),
];

/// Recommendations for the whole workspace, strongest signal first
pub fn workspace_recommendations(result: &CodeAnalysisResult) -> Vec<String> {
    let mut hits: Vec<(usize, &str)> = SYSTEMIC_RULES
        .iter()
        .filter_map(|(smell, min, text)| {
            let count = result.smell_counts.get(*smell).copied().unwrap_or(0);
            (count > *min).then_some((count, *text))
        })
        .collect();
    hits.sort_by(|a, b| b.0.cmp(&a.0));
    let mut recommendations: Vec<String> = hits.into_iter().map(|(_, t)| t.to_string()).collect();

    if result.errored_file_count > 0 {
        recommendations.push(format!(
            "{} files could not be analyzed; check the per-file errors",
            result.errored_file_count
        ));
    }
    if let Some((category, _)) = result
        .category_counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
    {
        if result.total_smells >= 10 {
            recommendations.push(format!(
                "Most smells fall in the {} category; prioritize it",
                category
            ));
        }
    }
    recommendations
}
