//! Table-driven line-pattern detectors
//!
//! Each rule matches a pattern against one view of every line (code,
//! comments or raw text), counts matches across the file, and reports one
//! evidence per file when the count reaches the rule's tiers. Every rule is
//! registered as its own detector, so each can be disabled or re-tiered
//! independently.

use crate::detectors::base::{Detector, DetectorConfig, SeverityTiers};
use crate::detectors::common::line_pointer;
use crate::detectors::index::WorkspaceIndex;
use crate::models::{Category, Evidence};
use crate::scanner::SourceFile;
use anyhow::Result;
use regex::Regex;

/// Which line view a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineView {
    Code,
    Comment,
    Raw,
}

#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    Pattern(&'static str),
    /// Lines longer than the given number of characters (option `max_length`)
    LongerThan(usize),
}

/// One row of the rule table
pub struct LineRule {
    pub id: &'static str,
    pub description: &'static str,
    /// Plural noun used in summaries
    pub label: &'static str,
    pub category: Category,
    pub view: LineView,
    pub matcher: Matcher,
    pub tiers: SeverityTiers,
    /// Lines for which the rule never fires
    pub skip_line: Option<fn(&str) -> bool>,
    /// Filter on the matched text
    pub accept: Option<fn(&str) -> bool>,
}

/// Numbers that need no name
const ACCEPTABLE_NUMBERS: &[f64] = &[
    0.0, 1.0, 2.0, 10.0, 100.0, 1000.0, 60.0, 24.0, 365.0, 360.0, 180.0, 90.0, 255.0, 256.0,
    1024.0,
];

fn is_declaration_or_annotation(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('@')
        || trimmed.starts_with("import ")
        || trimmed.starts_with("package ")
        || line.contains("static final")
        || line.contains("final static")
}

fn is_magic_number(text: &str) -> bool {
    let digits = text.trim_end_matches(['f', 'F', 'd', 'D', 'l', 'L']);
    match digits.parse::<f64>() {
        Ok(value) => !ACCEPTABLE_NUMBERS.contains(&value),
        Err(_) => false,
    }
}

pub const LINE_RULES: &[LineRule] = &[
    LineRule {
        id: "style.magic-number",
        description: "Detects unexplained numeric literals",
        label: "magic numbers",
        category: Category::Style,
        view: LineView::Code,
        matcher: Matcher::Pattern(r"\b\d+(?:\.\d+)?[fFdDlL]?\b"),
        tiers: SeverityTiers::at_least(5.0, 20.0, 50.0),
        skip_line: Some(is_declaration_or_annotation),
        accept: Some(is_magic_number),
    },
    LineRule {
        id: "style.hardcoded-string",
        description: "Detects string literals embedded in logic",
        label: "hardcoded strings",
        category: Category::Style,
        view: LineView::Code,
        matcher: Matcher::Pattern(r#""[ \t]{2,}""#),
        tiers: SeverityTiers::at_least(10.0, 30.0, 60.0),
        skip_line: Some(is_declaration_or_annotation),
        accept: None,
    },
    LineRule {
        id: "style.console-output",
        description: "Detects System.out/System.err printing",
        label: "console writes",
        category: Category::Style,
        view: LineView::Code,
        matcher: Matcher::Pattern(
            r"\bSystem\s*\.\s*(?:out|err)\s*\.\s*(?:print|println|printf|format)\b",
        ),
        tiers: SeverityTiers::at_least(1.0, 5.0, 15.0),
        skip_line: None,
        accept: None,
    },
    LineRule {
        id: "error-handling.print-stack-trace",
        description: "Detects printStackTrace calls",
        label: "printStackTrace calls",
        category: Category::ErrorHandling,
        view: LineView::Code,
        matcher: Matcher::Pattern(r"\.\s*printStackTrace\s*\("),
        tiers: SeverityTiers::at_least(1.0, 3.0, 10.0),
        skip_line: None,
        accept: None,
    },
    LineRule {
        id: "error-handling.generic-catch",
        description: "Detects catching Exception, RuntimeException or Throwable",
        label: "generic catch clauses",
        category: Category::ErrorHandling,
        view: LineView::Code,
        matcher: Matcher::Pattern(
            r"\bcatch\s*\(\s*(?:final\s+)?(?:java\.lang\.)?(?:Exception|RuntimeException|Throwable)\s+[A-Za-z_$][\w$]*\s*\)",
        ),
        tiers: SeverityTiers::at_least(1.0, 3.0, 8.0),
        skip_line: None,
        accept: None,
    },
    LineRule {
        id: "style.todo-comment",
        description: "Detects TODO, FIXME, XXX and HACK markers",
        label: "TODO/FIXME markers",
        category: Category::Style,
        view: LineView::Comment,
        matcher: Matcher::Pattern(r"\b(?:TODO|FIXME|XXX|HACK)\b"),
        tiers: SeverityTiers::at_least(1.0, 5.0, 15.0),
        skip_line: None,
        accept: None,
    },
    LineRule {
        id: "style.wildcard-import",
        description: "Detects on-demand (wildcard) imports",
        label: "wildcard imports",
        category: Category::Style,
        view: LineView::Code,
        matcher: Matcher::Pattern(r"^\s*import\s+(?:static\s+)?[\w$.]+\.\*\s*;"),
        tiers: SeverityTiers::at_least(1.0, 3.0, 6.0),
        skip_line: None,
        accept: None,
    },
    LineRule {
        id: "style.long-line",
        description: "Detects lines longer than 120 characters",
        label: "long lines",
        category: Category::Style,
        view: LineView::Raw,
        matcher: Matcher::LongerThan(120),
        tiers: SeverityTiers::at_least(5.0, 20.0, 50.0),
        skip_line: None,
        accept: None,
    },
    LineRule {
        id: "concurrency.thread-sleep",
        description: "Detects Thread.sleep calls",
        label: "Thread.sleep calls",
        category: Category::Concurrency,
        view: LineView::Code,
        matcher: Matcher::Pattern(r"\bThread\s*\.\s*sleep\s*\("),
        tiers: SeverityTiers::at_least(1.0, 3.0, 6.0),
        skip_line: None,
        accept: None,
    },
];

/// Look up a rule by id
pub fn line_rule(id: &str) -> Option<&'static LineRule> {
    LINE_RULES.iter().find(|r| r.id == id)
}

enum CompiledMatcher {
    Pattern(Regex),
    LongerThan(usize),
}

/// Detector running one row of [`LINE_RULES`]
pub struct LineRuleDetector {
    rule: &'static LineRule,
    matcher: CompiledMatcher,
    tiers: SeverityTiers,
}

impl LineRuleDetector {
    pub fn new(rule: &'static LineRule) -> Self {
        Self::with_config(rule, DetectorConfig::new())
    }

    pub fn with_config(rule: &'static LineRule, config: DetectorConfig) -> Self {
        let matcher = match rule.matcher {
            Matcher::Pattern(pattern) => {
                CompiledMatcher::Pattern(Regex::new(pattern).expect("valid regex"))
            }
            Matcher::LongerThan(limit) => {
                CompiledMatcher::LongerThan(config.get_option_or("max_length", limit))
            }
        };
        Self {
            rule,
            matcher,
            tiers: rule.tiers.configured(&config, ""),
        }
    }

    /// Matches on one line of the rule's view
    fn count_matches(&self, line: &str) -> usize {
        if self.rule.skip_line.is_some_and(|skip| skip(line)) {
            return 0;
        }
        match &self.matcher {
            CompiledMatcher::Pattern(regex) => regex
                .find_iter(line)
                .filter(|m| self.rule.accept.map_or(true, |accept| accept(m.as_str())))
                .count(),
            CompiledMatcher::LongerThan(limit) => usize::from(line.chars().count() > *limit),
        }
    }

    fn view<'a>(&self, file: &'a SourceFile, index: usize) -> &'a str {
        match self.rule.view {
            LineView::Code => file.code(index),
            LineView::Comment => file.comment(index),
            LineView::Raw => file.raw(index),
        }
    }
}

impl Detector for LineRuleDetector {
    fn id(&self) -> &'static str {
        self.rule.id
    }

    fn description(&self) -> &'static str {
        self.rule.description
    }

    fn category(&self) -> Category {
        self.rule.category
    }

    fn detect(&self, file: &SourceFile, _index: &WorkspaceIndex) -> Result<Vec<Evidence>> {
        let mut total = 0usize;
        let mut hit_lines: Vec<u32> = Vec::new();

        for index in 0..file.line_count() {
            let count = self.count_matches(self.view(file, index));
            if count > 0 {
                total += count;
                hit_lines.push((index + 1) as u32);
            }
        }

        let (Some(&first), Some(&last)) = (hit_lines.first(), hit_lines.last()) else {
            return Ok(vec![]);
        };
        let Some(severity) = self.tiers.classify(total as f64) else {
            return Ok(vec![]);
        };

        let mut pointer = line_pointer(file, first);
        pointer.end_line = last;
        if last != first {
            pointer.enclosing_member = None;
        }
        let listed: Vec<String> = hit_lines.iter().take(20).map(|l| l.to_string()).collect();

        Ok(vec![Evidence::new(
            self.id(),
            pointer,
            severity,
            format!("{} {} in file", total, self.rule.label),
        )
        .with_metric("occurrences", total)
        .with_metric("firstLine", first)
        .with_metric("lines", listed.join(","))
        .with_metric("threshold", self.tiers.threshold_for(severity) as i64)])
    }
}
