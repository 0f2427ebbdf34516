//! Per-file and workspace aggregation
//!
//! `analyze_file` turns the evidence of one file into smells, a debt score
//! and a refactoring plan. `analyze_workspace` runs the whole pipeline:
//!
//! 1. Load and parse every source file in parallel
//! 2. Build the workspace index from the parsed files
//! 3. Analyze each file in parallel
//! 4. Fold the per-file counts and derive workspace recommendations
//!
//! Read failures and per-file timeouts produce error-tagged entries; they
//! never abort the batch.

use crate::analysis::cancel::CancellationToken;
use crate::analysis::catalog;
use crate::analysis::scoring::debt_score;
use crate::analysis::summary::{workspace_recommendations, Tally};
use crate::config::ProjectConfig;
use crate::detectors::{load_sources, DetectorEngine, FileProvider, LoadedFile, WorkspaceIndex};
use crate::models::{
    CodeAnalysisResult, CodeSmell, FileAnalysis, Metrics, ProjectContext, RefactoringPlan,
};
use crate::scanner::{ScanOptions, SourceFile};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct Aggregator {
    engine: DetectorEngine,
    config: ProjectConfig,
}

impl Aggregator {
    /// Aggregator running the default detector set configured by `config`
    pub fn new(config: ProjectConfig) -> Self {
        let engine = DetectorEngine::from_config(&config);
        Self { engine, config }
    }

    /// Aggregator with a caller-assembled engine
    pub fn with_engine(engine: DetectorEngine, config: ProjectConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &DetectorEngine {
        &self.engine
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            method_body_cap: self.config.analysis.method_body_cap,
        }
    }

    /// Analyze one parsed file against a prepared index.
    ///
    /// Deterministic for identical inputs.
    pub fn analyze_file(&self, file: &SourceFile, index: &WorkspaceIndex) -> FileAnalysis {
        let evidence = match self.engine.run_file(file, index) {
            Ok(evidence) => evidence,
            Err(e) => return FileAnalysis::errored(file.path(), e.to_string()),
        };

        let mut plan = RefactoringPlan::new();
        let smells: Vec<CodeSmell> = evidence
            .into_iter()
            .map(|evidence| {
                let info = catalog::lookup(&evidence.detector_id);
                plan.entry(info.category.as_str().to_string())
                    .or_default()
                    .insert(info.recommendation.to_string());
                CodeSmell {
                    evidence,
                    smell_type: info.smell_type.to_string(),
                    category: info.category,
                    recommendation: info.recommendation.to_string(),
                }
            })
            .collect();

        let score = debt_score(
            smells.iter().map(|s| s.evidence.severity),
            &self.config.scoring,
        );

        FileAnalysis {
            file_path: file.path().to_string(),
            metrics: file_metrics(file, smells.len()),
            smells,
            technical_debt_score: score,
            refactoring_plan: plan,
            error: None,
        }
    }

    /// Analyze a parsed file in isolation, indexing only that file
    pub fn analyze_single(&self, file: Arc<SourceFile>) -> FileAnalysis {
        let index = WorkspaceIndex::build(
            std::slice::from_ref(&file),
            self.config.analysis.duplicate_min_lines,
        );
        self.analyze_file(&file, &index)
    }

    /// Analyze `path` against an index of every file `provider` knows, so
    /// workspace detectors see its supertypes and duplicate partners
    pub fn analyze_in_workspace(&self, provider: &dyn FileProvider, path: &Path) -> FileAnalysis {
        let options = self.scan_options();
        let target = provider.relative_path(path);
        let workers = self.config.analysis.effective_workers();

        self.install(workers, || {
            let mut parsed: Vec<Arc<SourceFile>> =
                load_sources(provider, provider.files(), &options)
                    .into_iter()
                    .filter_map(|l| l.source.ok())
                    .collect();

            let source = match parsed.iter().find(|s| s.path() == target) {
                Some(source) => Arc::clone(source),
                None => match load_sources(provider, &[path.to_path_buf()], &options).pop() {
                    Some(LoadedFile { source: Ok(source), .. }) => {
                        parsed.push(Arc::clone(&source));
                        source
                    }
                    Some(LoadedFile { path, source: Err(e) }) => {
                        warn!("Skipping {}: {}", path, e);
                        return FileAnalysis::errored(path, e.to_string());
                    }
                    None => return FileAnalysis::errored(target, "file not loaded"),
                },
            };

            let index = WorkspaceIndex::build(&parsed, self.config.analysis.duplicate_min_lines);
            self.analyze_file(&source, &index)
        })
    }

    /// Analyze every source file of the project.
    ///
    /// When `token` fires, files not yet finished are discarded and the
    /// result is marked cancelled.
    pub fn analyze_workspace(
        &self,
        context: &ProjectContext,
        provider: &dyn FileProvider,
        token: &CancellationToken,
    ) -> CodeAnalysisResult {
        let start = Instant::now();
        let workers = self.config.analysis.effective_workers();
        let files = &context.source_files;

        let entries = self.install(workers, || {
            let loaded = load_sources(provider, files, &self.scan_options());
            let parsed: Vec<Arc<SourceFile>> = loaded
                .iter()
                .filter_map(|l| l.source.as_ref().ok().cloned())
                .collect();
            info!("Parsed {}/{} files", parsed.len(), loaded.len());

            let index = WorkspaceIndex::build(&parsed, self.config.analysis.duplicate_min_lines);
            debug!("Indexed {} classes", index.class_count());

            loaded
                .into_par_iter()
                .filter_map(|entry| {
                    if token.is_cancelled() {
                        return None;
                    }
                    let analysis = match entry.source {
                        Ok(source) => self.analyze_file(&source, &index),
                        Err(e) => {
                            warn!("Skipping {}: {}", entry.path, e);
                            FileAnalysis::errored(entry.path, e.to_string())
                        }
                    };
                    // A file finishing after cancellation is discarded too
                    (!token.is_cancelled()).then_some(analysis)
                })
                .collect::<Vec<FileAnalysis>>()
        });

        let mut result = summarize(entries);
        result.workspace_id = context.workspace_id();
        result.cancelled = token.is_cancelled();
        result.recommendations = workspace_recommendations(&result);

        info!(
            "Analyzed {} files ({} errored, {} smells) in {}ms{}",
            result.analyzed_file_count,
            result.errored_file_count,
            result.total_smells,
            start.elapsed().as_millis(),
            if result.cancelled { " [cancelled]" } else { "" }
        );
        result
    }

    /// Run `op` on a dedicated pool of `workers` threads
    fn install<R: Send>(&self, workers: usize, op: impl FnOnce() -> R + Send) -> R {
        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(op),
            Err(e) => {
                warn!("Could not build a {}-thread pool, using the global pool: {}", workers, e);
                op()
            }
        }
    }
}

/// Size and structure metrics recorded for every analyzed file
fn file_metrics(file: &SourceFile, evidence: usize) -> Metrics {
    let structure = file.structure();
    let mut metrics = Metrics::new();
    metrics.insert("lines".into(), file.line_count().into());
    metrics.insert("code_lines".into(), file.code_line_count().into());
    metrics.insert("comment_lines".into(), file.comment_line_count().into());
    metrics.insert("blank_lines".into(), file.blank_line_count().into());
    metrics.insert("classes".into(), structure.classes.len().into());
    metrics.insert("methods".into(), structure.methods().count().into());
    metrics.insert("evidence".into(), evidence.into());
    metrics
}

/// Fold per-file analyses into the workspace totals, ordered by path
fn summarize(mut files: Vec<FileAnalysis>) -> CodeAnalysisResult {
    files.sort_by(|a, b| a.file_path.cmp(&b.file_path));

    let tally = files
        .par_iter()
        .map(Tally::of_file)
        .reduce(Tally::default, Tally::merge);

    let errored = files.iter().filter(|f| f.is_errored()).count();
    CodeAnalysisResult {
        total_smells: files.iter().map(|f| f.smells.len()).sum(),
        total_technical_debt: files.iter().map(|f| f.technical_debt_score).sum(),
        analyzed_file_count: files.len() - errored,
        errored_file_count: errored,
        smell_counts: tally.smells,
        category_counts: tally.categories,
        severity_counts: tally.severities,
        files,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{MemoryFiles, SourceFiles};
    use crate::models::{MetricValue, Severity};

    fn long_method_source(name: &str, lines: usize) -> String {
        let mut text = format!("public class {name} {{\n    void run() {{\n");
        for i in 0..lines - 2 {
            text.push_str(&format!("        step{i}();\n"));
        }
        text.push_str("    }\n}\n");
        text
    }

    #[test]
    fn test_analyze_file_builds_smells_and_plan() {
        let aggregator = Aggregator::new(ProjectConfig::default());
        let file = Arc::new(SourceFile::parse("Job.java", &long_method_source("Job", 60)));
        let analysis = aggregator.analyze_single(file);

        let smell = analysis
            .smells
            .iter()
            .find(|s| s.evidence.detector_id == "design.long-method")
            .expect("long method smell");
        assert_eq!(smell.smell_type, "Long Method");
        assert_eq!(smell.evidence.severity, Severity::Major);
        assert!(analysis.refactoring_plan.contains_key(smell.category.as_str()));
        assert_eq!(analysis.metrics.get("methods"), Some(&MetricValue::Integer(1)));
        assert_eq!(
            analysis.metrics.get("evidence"),
            Some(&MetricValue::Integer(analysis.smells.len() as i64))
        );
        assert!(analysis.technical_debt_score >= 5.0);
        assert!(analysis.technical_debt_score <= 100.0);
    }

    #[test]
    fn test_analyze_file_is_deterministic() {
        let aggregator = Aggregator::new(ProjectConfig::default());
        let file = Arc::new(SourceFile::parse("Job.java", &long_method_source("Job", 30)));
        let a = aggregator.analyze_single(Arc::clone(&file));
        let b = aggregator.analyze_single(file);
        let ids = |f: &FileAnalysis| {
            f.smells
                .iter()
                .map(|s| s.evidence.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(a.technical_debt_score, b.technical_debt_score);
    }

    #[test]
    fn test_refactoring_plan_drops_duplicate_suggestions() {
        let aggregator = Aggregator::new(ProjectConfig::default());
        let mut text = String::from("public class Two {\n");
        for name in ["a", "b"] {
            text.push_str(&format!("    void {name}() {{\n"));
            for i in 0..25 {
                text.push_str(&format!("        call{i}();\n"));
            }
            text.push_str("    }\n");
        }
        text.push_str("}\n");
        let analysis = aggregator.analyze_single(Arc::new(SourceFile::parse("Two.java", &text)));

        let long_methods = analysis
            .smells
            .iter()
            .filter(|s| s.evidence.detector_id == "design.long-method")
            .count();
        assert_eq!(long_methods, 2);
        let info = catalog::lookup("design.long-method");
        let suggestions = &analysis.refactoring_plan[info.category.as_str()];
        assert_eq!(
            suggestions.iter().filter(|s| s.as_str() == info.recommendation).count(),
            1
        );
    }

    #[test]
    fn test_workspace_continues_past_unreadable_file() {
        let a = long_method_source("A", 60);
        let provider = MemoryFiles::new(vec![
            ("src/B.java", "public class B {\n    int x() { return 1; }\n}\n"),
            ("src/A.java", &a),
        ])
        .with_unreadable("src/Broken.java");
        let context = provider.context();
        let aggregator = Aggregator::new(ProjectConfig::default());

        let result = aggregator.analyze_workspace(&context, &provider, &CancellationToken::new());

        let paths: Vec<_> = result.files.iter().map(|f| f.file_path.as_str()).collect();
        assert_eq!(paths, vec!["src/A.java", "src/B.java", "src/Broken.java"]);
        assert_eq!(result.errored_file_count, 1);
        assert_eq!(result.analyzed_file_count, 2);
        let broken = &result.files[2];
        assert!(broken.is_errored());
        assert!(broken.smells.is_empty());
        assert_eq!(broken.technical_debt_score, 0.0);
        assert!(!result.cancelled);
        assert_eq!(result.smell_counts.get("Long Method"), Some(&1));
        assert_eq!(
            result.total_smells,
            result.files.iter().map(|f| f.smells.len()).sum::<usize>()
        );
        assert_eq!(
            result.severity_counts.values().sum::<usize>(),
            result.total_smells
        );
    }

    #[test]
    fn test_single_file_sees_workspace_supertypes() {
        let mut base = String::from("package shapes;\n\npublic class Base {\n");
        for i in 0..10 {
            base.push_str(&format!("    public void op{i}() {{\n        work();\n    }}\n"));
        }
        base.push_str("}\n");
        let child = "package shapes;\n\npublic class Child extends Base {\n    @Override\n    public void op0() {\n        op1();\n    }\n}\n";
        let provider =
            MemoryFiles::new(vec![("shapes/Base.java", &base), ("shapes/Child.java", child)]);
        let aggregator = Aggregator::new(ProjectConfig::default());

        let path = provider.repo_path().join("shapes/Child.java");
        let analysis = aggregator.analyze_in_workspace(&provider, &path);
        assert_eq!(analysis.file_path, "shapes/Child.java");
        assert!(analysis
            .smells
            .iter()
            .any(|s| s.evidence.detector_id == "design.refused-bequest"));

        let missing =
            aggregator.analyze_in_workspace(&provider, &provider.repo_path().join("Nope.java"));
        assert!(missing.is_errored());
    }

    #[test]
    fn test_cancelled_before_start_yields_no_files() {
        let a = long_method_source("A", 60);
        let provider = MemoryFiles::new(vec![("A.java", &a)]);
        let context = provider.context();
        let token = CancellationToken::new();
        token.cancel();

        let result =
            Aggregator::new(ProjectConfig::default()).analyze_workspace(&context, &provider, &token);
        assert!(result.cancelled);
        assert!(result.files.is_empty());
        assert_eq!(result.total_smells, 0);
    }

    #[test]
    fn test_oversized_file_is_error_tagged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Big.java");
        std::fs::write(&path, long_method_source("Big", 30)).expect("write");
        let mut config = ProjectConfig::default();
        config.analysis.max_file_bytes = 16;
        let context = ProjectContext::new(dir.path(), vec![path]);
        let provider = SourceFiles::for_project(&context, config.analysis.max_file_bytes);

        let token = CancellationToken::new();
        let result = Aggregator::new(config).analyze_workspace(&context, &provider, &token);
        assert_eq!(result.errored_file_count, 1);
        assert_eq!(result.files[0].file_path, "Big.java");
        assert!(result.files[0].error.as_deref().is_some_and(|e| e.contains("byte limit")));
    }
}
