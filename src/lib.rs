//! debtradar - lexical code-smell detection, technical-debt scoring and
//! refactoring ripple-impact analysis for Java code bases.
//!
//! The pipeline:
//!
//! 1. [`ingest`] discovers sources and builds a [`models::ProjectContext`]
//! 2. [`scanner`] turns each file into lines and a lexical structure
//! 3. [`detectors`] produce evidence per file
//! 4. [`analysis`] scores files and folds a workspace result
//! 5. [`graph`] links files through imports, inheritance and type usage
//! 6. [`impact`] predicts what a refactoring touches
//!
//! ```ignore
//! use debtradar::analysis::{Aggregator, CancellationToken};
//! use debtradar::config::load_project_config;
//! use debtradar::detectors::SourceFiles;
//!
//! let config = load_project_config(root);
//! let context = debtradar::ingest::discover(root, &config)?;
//! let provider = SourceFiles::for_project(&context, config.analysis.max_file_bytes);
//! let token = CancellationToken::new();
//! let result = Aggregator::new(config).analyze_workspace(&context, &provider, &token);
//! ```

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod detectors;
pub mod error;
pub mod graph;
pub mod impact;
pub mod ingest;
pub mod models;
pub mod reporters;
pub mod scanner;
