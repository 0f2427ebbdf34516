//! Analyze commands: whole project and single file

use super::{spinner, Session};
use crate::analysis::{Aggregator, CancellationToken};
use crate::detectors::{DetectorEngine, SourceFiles};
use crate::ingest::all_files;
use anyhow::Result;
use console::style;
use std::path::Path;
use tracing::info;

pub(super) fn run(mut session: Session, skip_detectors: Vec<String>) -> Result<()> {
    session.config.defaults.skip_detectors.extend(skip_detectors);
    let context = session.discover()?;

    if context.source_files.is_empty() {
        eprintln!(
            "{} No Java source files found under {}",
            style("!").yellow(),
            session.root.display()
        );
    }

    let provider = SourceFiles::for_project(&context, session.config.analysis.max_file_bytes);
    let mut engine = DetectorEngine::from_config(&session.config);
    engine.retain_applicable(&context);
    info!("Running {} detectors", engine.detector_count());
    let aggregator = Aggregator::with_engine(engine, session.config.clone());

    let progress = spinner(&format!("Analyzing {} files...", context.source_files.len()));
    let result = aggregator.analyze_workspace(&context, &provider, &CancellationToken::new());
    progress.finish_and_clear();

    session.print(&result)
}

pub(super) fn run_file(session: Session, file: &Path) -> Result<()> {
    let path = session.resolve_file(file)?;
    let context = session.discover()?;
    let provider = SourceFiles::new(
        all_files(&context),
        context.root.clone(),
        session.config.analysis.max_file_bytes,
    );

    let aggregator = Aggregator::new(session.config.clone());
    let analysis = aggregator.analyze_in_workspace(&provider, &path);
    session.print(&analysis)
}
