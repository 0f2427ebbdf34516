//! Output reporters for debtradar results
//!
//! Supports two output formats:
//! - `text` - Terminal output styled with `console`
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::graph::DependencyGraph;
use crate::impact::RippleImpactAnalysis;
use crate::models::{CodeAnalysisResult, FileAnalysis};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Result of a ripple query for one file
#[derive(Debug, Clone, Serialize)]
pub struct RippleReport {
    pub file: String,
    pub ripple_files: BTreeSet<String>,
}

/// Anything the CLI can print
pub trait Report: Serialize {
    fn render_text(&self) -> String;
}

impl Report for CodeAnalysisResult {
    fn render_text(&self) -> String {
        text::render_analysis(self)
    }
}

impl Report for FileAnalysis {
    fn render_text(&self) -> String {
        text::render_file(self)
    }
}

impl Report for DependencyGraph {
    fn render_text(&self) -> String {
        text::render_graph(self)
    }
}

impl Report for RippleReport {
    fn render_text(&self) -> String {
        text::render_ripple(self)
    }
}

impl Report for RippleImpactAnalysis {
    fn render_text(&self) -> String {
        text::render_impact(self)
    }
}

/// Render `value` in the requested format
pub fn render<R: Report>(value: &R, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(value.render_text()),
        OutputFormat::Json => json::render(value),
    }
}
