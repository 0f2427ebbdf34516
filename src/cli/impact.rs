//! Impact command

use super::graph::{project_files, scan_options};
use super::Session;
use crate::detectors::FileProvider;
use crate::impact::{ImpactAnalyzer, OperationRequest, RefactoringOperation};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Load a request from a JSON file
pub(super) fn read_request(path: &Path) -> Result<OperationRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request {}", path.display()))?;
    OperationRequest::from_json(&text)
        .with_context(|| format!("Invalid request in {}", path.display()))
}

pub(super) fn run(session: Session, mut request: OperationRequest) -> Result<()> {
    // Target files given on the command line become project-relative
    if let Some(target) = request.target_file.as_deref() {
        if let Ok(path) = session.resolve_file(Path::new(target)) {
            if let Ok(rel) = path.strip_prefix(&session.root) {
                let rel = rel.to_string_lossy().replace('\\', "/");
                debug!("Target file {} resolved to {}", target, rel);
                request.target_file = Some(rel);
            }
        }
    }

    let operation = RefactoringOperation::try_from(&request)?;
    let provider = project_files(&session)?;
    info!(
        "Analyzing {} over {} files",
        operation.kind(),
        provider.files().len()
    );

    let progress = super::spinner("Building dependency graph...");
    let analyzer = ImpactAnalyzer::from_provider(&provider, &scan_options(&session));
    progress.finish_and_clear();

    let analysis = analyzer.analyze(&operation);
    session.print(&analysis)
}
