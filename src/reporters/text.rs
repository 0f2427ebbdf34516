//! Text (terminal) reporter
//!
//! Styling goes through `console`, which drops colors when stdout is not a
//! terminal.

use crate::graph::DependencyGraph;
use crate::impact::{RippleImpactAnalysis, RiskLevel};
use crate::models::{CodeAnalysisResult, CodeSmell, FileAnalysis, Severity};
use crate::reporters::RippleReport;
use console::{style, StyledObject};
use std::fmt::Write;

/// Smells listed per file before truncating
const SMELLS_PER_FILE: usize = 10;

/// Files listed in the workspace summary
const TOP_FILES: usize = 10;

const RULE: &str = "──────────────────────────────────────";

fn severity_tag(severity: Severity) -> StyledObject<&'static str> {
    match severity {
        Severity::Critical => style("[C]").red().bold(),
        Severity::Major => style("[M]").yellow(),
        Severity::Minor => style("[m]").blue(),
        Severity::Info => style("[i]").dim(),
    }
}

fn score_style(score: f64) -> StyledObject<String> {
    let text = format!("{:.1}", score);
    if score >= 50.0 {
        style(text).red()
    } else if score >= 20.0 {
        style(text).yellow()
    } else {
        style(text).green()
    }
}

fn risk_style(risk: RiskLevel) -> StyledObject<&'static str> {
    match risk {
        RiskLevel::High => style(risk.as_str()).red().bold(),
        RiskLevel::Medium => style(risk.as_str()).yellow().bold(),
        RiskLevel::Low => style(risk.as_str()).green().bold(),
    }
}

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", style(title).bold());
    let _ = writeln!(out, "{}", style(RULE).dim());
}

/// Shorten long paths from the left, keeping the file name visible
fn short_path(path: &str, max: usize) -> String {
    let count = path.chars().count();
    if count <= max {
        return path.to_string();
    }
    let skip = count - (max - 3);
    format!("...{}", path.chars().skip(skip).collect::<String>())
}

fn smell_line(out: &mut String, smell: &CodeSmell) {
    let pointer = &smell.evidence.pointer;
    let location = match &pointer.enclosing_member {
        Some(member) => format!("{}:{} ({})", pointer.start_line, pointer.end_line, member),
        None => format!("{}:{}", pointer.start_line, pointer.end_line),
    };
    let _ = writeln!(
        out,
        "  {}  {:<24} {}  {}",
        severity_tag(smell.evidence.severity),
        smell.smell_type,
        style(location).dim(),
        smell.evidence.summary
    );
}

pub fn render_file(file: &FileAnalysis) -> String {
    let mut out = String::new();
    header(&mut out, &file.file_path);

    if let Some(error) = &file.error {
        let _ = writeln!(out, "  {} {}", style("error:").red().bold(), error);
        return out;
    }

    let _ = writeln!(
        out,
        "Debt score: {}/100  Smells: {}",
        score_style(file.technical_debt_score),
        file.smells.len()
    );
    for smell in file.smells.iter().take(SMELLS_PER_FILE) {
        smell_line(&mut out, smell);
    }
    let remaining = file.smells.len().saturating_sub(SMELLS_PER_FILE);
    if remaining > 0 {
        let more = format!("...and {} more (use --format json)", remaining);
        let _ = writeln!(out, "  {}", style(more).dim());
    }

    if !file.refactoring_plan.is_empty() {
        let _ = writeln!(out, "\n{}", style("Refactoring plan").bold());
        for (category, suggestions) in &file.refactoring_plan {
            let _ = writeln!(out, "  {}", style(category).cyan());
            for suggestion in suggestions {
                let _ = writeln!(out, "    - {}", suggestion);
            }
        }
    }
    out
}

pub fn render_analysis(result: &CodeAnalysisResult) -> String {
    let mut out = String::new();
    header(&mut out, "debtradar analysis");

    let _ = writeln!(
        out,
        "Files: {}  Errored: {}  Smells: {}  Total debt: {:.1}  Average: {}",
        result.analyzed_file_count,
        result.errored_file_count,
        result.total_smells,
        result.total_technical_debt,
        score_style(result.average_debt())
    );
    if result.cancelled {
        let _ = writeln!(out, "{}", style("Analysis was cancelled; results are partial").yellow());
    }

    if !result.severity_counts.is_empty() {
        let parts: Vec<String> = Severity::ALL
            .iter()
            .rev()
            .filter_map(|s| {
                result
                    .severity_counts
                    .get(s.as_str())
                    .map(|n| format!("{} {}", n, s.as_str().to_lowercase()))
            })
            .collect();
        let _ = writeln!(out, "  {}", parts.join(" | "));
    }

    if !result.smell_counts.is_empty() {
        let _ = writeln!(out, "\n{}", style("SMELLS").bold());
        let mut counts: Vec<_> = result.smell_counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (smell, count) in counts {
            let _ = writeln!(out, "  {:>5}  {}", count, smell);
        }
    }

    let mut worst: Vec<&FileAnalysis> = result
        .files
        .iter()
        .filter(|f| !f.smells.is_empty())
        .collect();
    worst.sort_by(|a, b| {
        b.technical_debt_score
            .total_cmp(&a.technical_debt_score)
            .then_with(|| a.file_path.cmp(&b.file_path))
    });
    if !worst.is_empty() {
        let _ = writeln!(out, "\n{}", style("MOST INDEBTED FILES").bold());
        for file in worst.iter().take(TOP_FILES) {
            let _ = writeln!(
                out,
                "  {:>6}  {:<50} {} smells",
                score_style(file.technical_debt_score),
                short_path(&file.file_path, 50),
                file.smells.len()
            );
        }
    }

    let errored: Vec<&FileAnalysis> = result.files.iter().filter(|f| f.is_errored()).collect();
    if !errored.is_empty() {
        let _ = writeln!(out, "\n{}", style("ERRORS").bold());
        for file in errored {
            let _ = writeln!(
                out,
                "  {}  {}",
                file.file_path,
                style(file.error.as_deref().unwrap_or_default()).red()
            );
        }
    }

    if !result.recommendations.is_empty() {
        let _ = writeln!(out, "\n{}", style("RECOMMENDATIONS").bold());
        for rec in &result.recommendations {
            let _ = writeln!(out, "  - {}", rec);
        }
    }
    out
}

pub fn render_graph(graph: &DependencyGraph) -> String {
    let metrics = &graph.metrics;
    let mut out = String::new();
    header(&mut out, "Dependency graph");
    let _ = writeln!(
        out,
        "Files: {}  Edges: {}  External nodes: {}  Avg out-degree: {:.2}",
        metrics.total_files, metrics.total_edges, metrics.external_nodes, metrics.avg_out_degree
    );
    if let Some(file) = &metrics.most_coupled_file {
        let degree = graph.dependencies(file).map_or(0, |d| d.len());
        let _ = writeln!(out, "Most coupled:      {} ({} dependencies)", file, degree);
    }
    if let Some(file) = &metrics.most_depended_on_file {
        let degree = graph.dependents(file).map_or(0, |d| d.len());
        let _ = writeln!(out, "Most depended on:  {} ({} dependents)", file, degree);
    }

    if !metrics.degree_distribution.is_empty() {
        let _ = writeln!(out, "\n{}", style("OUT-DEGREE").bold());
        for (degree, files) in &metrics.degree_distribution {
            let _ = writeln!(out, "  {:>3}: {}", degree, files);
        }
    }

    if !metrics.cycles.is_empty() {
        let _ = writeln!(out, "\n{}", style("CYCLES").bold());
        for cycle in &metrics.cycles {
            let _ = writeln!(out, "  {}", style(cycle.join(" → ")).yellow());
        }
    }
    out
}

pub fn render_ripple(report: &RippleReport) -> String {
    let mut out = String::new();
    header(&mut out, &format!("Ripple effect of {}", report.file));
    let _ = writeln!(out, "{} files affected", report.ripple_files.len());
    for file in &report.ripple_files {
        if file == &report.file {
            let _ = writeln!(out, "  {} {}", file, style("(changed)").dim());
        } else {
            let _ = writeln!(out, "  {}", file);
        }
    }
    out
}

pub fn render_impact(analysis: &RippleImpactAnalysis) -> String {
    let mut out = String::new();
    header(
        &mut out,
        &format!(
            "Impact of {} on {}",
            analysis.operation.kind(),
            analysis.operation.element()
        ),
    );
    let _ = writeln!(
        out,
        "Risk: {}  Impacts: {}  Files: {}  Ripple: {} files",
        risk_style(analysis.risk_level),
        analysis.impacted_files.len(),
        analysis.affected_files().len(),
        analysis.ripple_files.len()
    );

    let mut current: Option<&str> = None;
    for impact in &analysis.impacted_files {
        if current != Some(impact.file.as_str()) {
            let _ = writeln!(out, "\n  {}", style(&impact.file).cyan());
            current = Some(impact.file.as_str());
        }
        let _ = writeln!(
            out,
            "    {:>5}  {:<15} {}",
            impact.line,
            impact.impact_type.as_str(),
            impact.description
        );
    }
    out
}
