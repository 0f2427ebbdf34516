//! debtradar - technical debt radar for Java code bases
//!
//! Detects code smells, scores technical debt per file and predicts the
//! ripple impact of refactorings over the file dependency graph.

use anyhow::Result;
use clap::Parser;
use debtradar::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("debtradar={}", cli.log_level)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
