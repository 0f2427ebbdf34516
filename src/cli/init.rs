//! Init command - write a starter config file

use crate::config::write_config_template;
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

pub(super) fn run(path: &Path, force: bool) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let written = write_config_template(&root, force)?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(written.display()).cyan()
    );
    println!(
        "  Edit thresholds and excludes, then run {}",
        style("debtradar analyze").bold()
    );
    Ok(())
}
