//! Graph and ripple commands

use super::{spinner, Session};
use crate::detectors::{FileProvider, SourceFiles};
use crate::graph::{DependencyGraph, GraphBuilder};
use crate::impact::ripple_effect;
use crate::ingest::all_files;
use crate::reporters::RippleReport;
use crate::scanner::ScanOptions;
use anyhow::Result;
use std::path::Path;
use tracing::warn;

/// Provider over production and test sources; tests depend on code too
pub(super) fn project_files(session: &Session) -> Result<SourceFiles> {
    let context = session.discover()?;
    Ok(SourceFiles::new(
        all_files(&context),
        context.root.clone(),
        session.config.analysis.max_file_bytes,
    ))
}

pub(super) fn scan_options(session: &Session) -> ScanOptions {
    ScanOptions {
        method_body_cap: session.config.analysis.method_body_cap,
    }
}

fn build_graph(session: &Session, provider: &SourceFiles) -> DependencyGraph {
    let progress = spinner(&format!("Linking {} files...", provider.files().len()));
    let graph = GraphBuilder::new(scan_options(session)).build(provider);
    progress.finish_and_clear();
    graph
}

pub(super) fn run(session: Session) -> Result<()> {
    let provider = project_files(&session)?;
    let graph = build_graph(&session, &provider);
    session.print(&graph)
}

pub(super) fn run_ripple(session: Session, file: &Path) -> Result<()> {
    let path = session.resolve_file(file)?;
    let provider = project_files(&session)?;
    let graph = build_graph(&session, &provider);

    let relative = provider.relative_path(&path);
    if !graph.contains(&relative) {
        warn!("{} is not part of the dependency graph", relative);
    }
    let report = RippleReport {
        ripple_files: ripple_effect(&graph, &relative),
        file: relative,
    };
    session.print(&report)
}
