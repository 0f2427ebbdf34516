//! Core data models for debtradar
//!
//! These models are shared by the detectors, the aggregator, the dependency
//! graph and the impact analyzer. Everything here is plain data that
//! serializes cleanly to JSON: string-keyed maps, enums as their symbolic
//! names, pointers as integers plus path/name strings.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// Generate a deterministic evidence ID based on content hash.
///
/// The ID is a 16-character hex string derived from the detector id, the
/// file, the start line and the summary, so the same issue keeps the same
/// ID across runs on unchanged content.
pub fn deterministic_evidence_id(detector: &str, file: &str, line: u32, summary: &str) -> String {
    let input = format!("{detector}\n{file}\n{line}\n{summary}");
    format!("{:016x}", xxh3_64(input.as_bytes()))
}

/// Severity levels for evidence
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    Info,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Minor,
        Severity::Major,
        Severity::Critical,
    ];

    /// Symbolic name used as a map key in summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Minor => "MINOR",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "minor" | "low" => Ok(Severity::Minor),
            "major" | "medium" | "high" => Ok(Severity::Major),
            "critical" => Ok(Severity::Critical),
            other => Err(format!(
                "unknown severity '{}' (expected info, minor, major or critical)",
                other
            )),
        }
    }
}

/// Smell category used for grouping counts and refactoring plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Code that has grown too large to work with comfortably
    Bloater,
    /// Incomplete or incorrect use of object-oriented mechanisms
    ObjectOrientationAbuser,
    /// Code that adds nothing and could be removed
    Dispensable,
    /// Excessive coupling between classes
    Coupler,
    Complexity,
    ErrorHandling,
    Style,
    Concurrency,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bloater => "BLOATER",
            Category::ObjectOrientationAbuser => "OBJECT_ORIENTATION_ABUSER",
            Category::Dispensable => "DISPENSABLE",
            Category::Coupler => "COUPLER",
            Category::Complexity => "COMPLEXITY",
            Category::ErrorHandling => "ERROR_HANDLING",
            Category::Style => "STYLE",
            Category::Concurrency => "CONCURRENCY",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A precise location reference inside one source file.
///
/// Lines and columns are 1-based. A well-formed pointer satisfies
/// `1 <= start_line <= end_line <= line_count` for its file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodePointer {
    pub relative_file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing_member: Option<String>,
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl CodePointer {
    /// Pointer spanning whole lines `start_line..=end_line`
    pub fn lines(path: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            relative_file_path: path.into(),
            enclosing_class: None,
            enclosing_member: None,
            start_line,
            end_line,
            start_column: 1,
            end_column: 1,
        }
    }

    pub fn in_class(mut self, class: impl Into<String>) -> Self {
        self.enclosing_class = Some(class.into());
        self
    }

    pub fn in_member(mut self, member: impl Into<String>) -> Self {
        self.enclosing_member = Some(member.into());
        self
    }

    pub fn with_columns(mut self, start_column: u32, end_column: u32) -> Self {
        self.start_column = start_column.max(1);
        self.end_column = end_column.max(self.start_column);
        self
    }

    /// Whether the pointer respects the line invariant for a file of `line_count` lines
    pub fn is_within(&self, line_count: usize) -> bool {
        self.start_line >= 1
            && self.start_line <= self.end_line
            && (self.end_line as usize) <= line_count
    }

    /// Number of lines covered (inclusive)
    pub fn span(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// A metric attached to evidence: numeric or textual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(v) => Some(*v as f64),
            MetricValue::Float(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetricValue::Integer(v) => Some(*v),
            MetricValue::Float(v) => Some(*v as i64),
            MetricValue::Text(_) => None,
        }
    }
}

impl From<usize> for MetricValue {
    fn from(v: usize) -> Self {
        MetricValue::Integer(v as i64)
    }
}

impl From<u32> for MetricValue {
    fn from(v: u32) -> Self {
        MetricValue::Integer(i64::from(v))
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Integer(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        // Keep ratios readable in JSON output
        MetricValue::Float((v * 1000.0).round() / 1000.0)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Text(v.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        MetricValue::Text(v)
    }
}

/// Ordered metric map (insertion order is kept in JSON output)
pub type Metrics = IndexMap<String, MetricValue>;

/// One detected issue instance, produced by one detector over one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: String,
    pub detector_id: String,
    pub pointer: CodePointer,
    #[serde(default)]
    pub metrics: Metrics,
    pub summary: String,
    pub severity: Severity,
}

impl Evidence {
    pub fn new(
        detector_id: &str,
        pointer: CodePointer,
        severity: Severity,
        summary: impl Into<String>,
    ) -> Self {
        let summary = summary.into();
        Self {
            id: deterministic_evidence_id(
                detector_id,
                &pointer.relative_file_path,
                pointer.start_line,
                &summary,
            ),
            detector_id: detector_id.to_string(),
            pointer,
            metrics: Metrics::new(),
            summary,
            severity,
        }
    }

    /// Attach a metric while the evidence is being built
    pub fn with_metric(mut self, key: &str, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(key.to_string(), value.into());
        self
    }

    pub fn metric(&self, key: &str) -> Option<&MetricValue> {
        self.metrics.get(key)
    }
}

/// Evidence enriched with its smell type, category and recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSmell {
    #[serde(flatten)]
    pub evidence: Evidence,
    pub smell_type: String,
    pub category: Category,
    pub recommendation: String,
}

/// Refactoring suggestions grouped by category, insertion-ordered and de-duplicated
pub type RefactoringPlan = IndexMap<String, IndexSet<String>>;

/// Result of analyzing one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub file_path: String,
    pub smells: Vec<CodeSmell>,
    pub metrics: Metrics,
    pub technical_debt_score: f64,
    pub refactoring_plan: RefactoringPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileAnalysis {
    /// An error-tagged analysis: no smells, zero score, the failure message
    pub fn errored(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            smells: Vec::new(),
            metrics: Metrics::new(),
            technical_debt_score: 0.0,
            refactoring_plan: RefactoringPlan::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }
}

/// Workspace-level analysis result, recomputed on every run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeAnalysisResult {
    pub workspace_id: String,
    pub files: Vec<FileAnalysis>,
    pub smell_counts: BTreeMap<String, usize>,
    pub category_counts: BTreeMap<String, usize>,
    pub severity_counts: BTreeMap<String, usize>,
    pub total_smells: usize,
    pub total_technical_debt: f64,
    pub analyzed_file_count: usize,
    pub errored_file_count: usize,
    pub recommendations: Vec<String>,
    /// True when the batch was cancelled and `files` holds partial results
    #[serde(default)]
    pub cancelled: bool,
}

impl CodeAnalysisResult {
    /// Average debt score over successfully analyzed files
    pub fn average_debt(&self) -> f64 {
        if self.analyzed_file_count == 0 {
            0.0
        } else {
            self.total_technical_debt / self.analyzed_file_count as f64
        }
    }
}

/// Build system tag supplied by the ingestion layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildSystem {
    Maven,
    Gradle,
    Ant,
    #[default]
    Unknown,
}

/// Project description handed to the core by the ingestion layer.
///
/// The core only reads it; discovery of files happens elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub source_files: Vec<PathBuf>,
    #[serde(default)]
    pub test_files: Vec<PathBuf>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub build_system: BuildSystem,
}

impl ProjectContext {
    pub fn new(root: impl Into<PathBuf>, source_files: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source_files,
            ..Default::default()
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|s| s.as_str())
    }

    pub fn is_test_file(&self, path: &Path) -> bool {
        self.test_files.iter().any(|t| t == path)
    }

    /// Path relative to the project root with forward slashes
    pub fn relative_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Stable workspace identifier derived from the root path
    pub fn workspace_id(&self) -> String {
        format!(
            "{:016x}",
            xxh3_64(self.root.to_string_lossy().as_bytes())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_id_is_deterministic() {
        let a = deterministic_evidence_id("design.long-method", "A.java", 3, "too long");
        let b = deterministic_evidence_id("design.long-method", "A.java", 3, "too long");
        let c = deterministic_evidence_id("design.long-method", "A.java", 4, "too long");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn test_severity_ordering_and_names() {
        assert!(Severity::Critical > Severity::Major);
        assert!(Severity::Major > Severity::Minor);
        assert!(Severity::Minor > Severity::Info);
        assert_eq!(
            serde_json::to_string(&Severity::Major).expect("serialize"),
            "\"MAJOR\""
        );
        assert_eq!("high".parse::<Severity>(), Ok(Severity::Major));
        assert!("bogus".parse::<Severity>().is_err());
    }

    #[test]
    fn test_pointer_invariant() {
        let p = CodePointer::lines("A.java", 2, 5);
        assert!(p.is_within(5));
        assert!(!p.is_within(4));
        assert_eq!(p.span(), 4);
        assert!(!CodePointer::lines("A.java", 0, 1).is_within(3));
        assert!(!CodePointer::lines("A.java", 3, 2).is_within(3));
    }

    #[test]
    fn test_pointer_serializes_flat() {
        let p = CodePointer::lines("src/A.java", 1, 2)
            .in_class("A")
            .in_member("run");
        let json = serde_json::to_value(&p).expect("serialize");
        assert_eq!(json["relative_file_path"], "src/A.java");
        assert_eq!(json["enclosing_member"], "run");
        assert_eq!(json["start_line"], 1);
        assert_eq!(json["end_column"], 1);
    }

    #[test]
    fn test_metric_order_is_preserved() {
        let e = Evidence::new(
            "design.long-method",
            CodePointer::lines("A.java", 1, 1),
            Severity::Minor,
            "x",
        )
        .with_metric("lineCount", 60usize)
        .with_metric("threshold", 20usize)
        .with_metric("ratio", 0.2);
        let keys: Vec<_> = e.metrics.keys().cloned().collect();
        assert_eq!(keys, vec!["lineCount", "threshold", "ratio"]);
        assert_eq!(e.metric("ratio").and_then(|m| m.as_f64()), Some(0.2));
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let ctx = ProjectContext::new("/repo", vec![]);
        assert_eq!(
            ctx.relative_path(Path::new("/repo/src/main/java/A.java")),
            "src/main/java/A.java"
        );
    }
}
