//! CLI command definitions and handlers

mod analyze;
mod graph;
mod impact;
mod init;

use crate::config::{load_project_config, ProjectConfig, MAX_WORKERS};
use crate::models::ProjectContext;
use crate::reporters::{self, OutputFormat, Report};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parse and validate workers count (1-16)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > MAX_WORKERS {
        Err(format!("workers cannot exceed {}", MAX_WORKERS))
    } else {
        Ok(n)
    }
}

/// debtradar - technical debt radar for Java code bases
#[derive(Parser, Debug)]
#[command(name = "debtradar")]
#[command(
    version,
    about = "Detect code smells, score technical debt and predict the ripple impact of refactorings in Java projects",
    after_help = "\
Examples:
  debtradar analyze                          Analyze the current directory
  debtradar -p ../shop analyze --format json JSON output for scripting
  debtradar file src/main/java/a/Order.java  Smells and plan for one file
  debtradar graph                            Dependency graph metrics and cycles
  debtradar ripple src/main/java/a/Money.java
  debtradar impact rename-class --target-class Money --new-name Amount"
)]
pub struct Cli {
    /// Project root (default: current directory)
    #[arg(long, short = 'p', global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    /// Number of parallel workers (1-16, default from config or CPU count)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Output format: text or json (default from config, else text)
    #[arg(long, short = 'f', global = true, value_parser = ["text", "json"])]
    pub format: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a commented debtradar.toml into the project root
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Analyze every source file of the project (default command)
    Analyze {
        /// Skip specific detectors (full id or short name)
        #[arg(long)]
        skip_detector: Vec<String>,
    },

    /// Analyze one file in the context of its project
    File {
        /// File to analyze (absolute, or relative to the project root)
        file: PathBuf,
    },

    /// Build the file dependency graph and print its metrics
    Graph,

    /// List every file that transitively depends on FILE
    Ripple {
        /// Changed file (absolute, or relative to the project root)
        file: PathBuf,
    },

    /// Predict the files a refactoring touches and its risk
    #[command(after_help = "\
Operations: extract-method, rename-method, rename-class, move-method, extract-class

Examples:
  debtradar impact rename-method --target-class Order --old-name total --new-name sum
  debtradar impact extract-class --source-class Order --extracted-class Address
  debtradar impact --request op.json")]
    Impact {
        /// Operation type
        #[arg(required_unless_present = "request")]
        operation: Option<String>,

        /// Read the whole request from a JSON file instead of flags
        #[arg(long, conflicts_with = "operation")]
        request: Option<PathBuf>,

        #[arg(long)]
        target_file: Option<String>,

        #[arg(long)]
        target_class: Option<String>,

        #[arg(long)]
        target_method: Option<String>,

        #[arg(long)]
        old_name: Option<String>,

        #[arg(long)]
        new_name: Option<String>,

        #[arg(long)]
        source_class: Option<String>,

        #[arg(long)]
        extracted_class: Option<String>,
    },
}

/// Settings shared by every command after config and flags are merged
pub(crate) struct Session {
    pub root: PathBuf,
    pub config: ProjectConfig,
    pub format: OutputFormat,
}

impl Session {
    fn open(cli: &Cli) -> Result<Self> {
        let root = cli
            .path
            .canonicalize()
            .with_context(|| format!("Path does not exist: {}", cli.path.display()))?;
        if !root.is_dir() {
            anyhow::bail!("Path is not a directory: {}", root.display());
        }

        let mut config = load_project_config(&root);
        if let Some(workers) = cli.workers {
            config.analysis.workers = workers;
        }
        let format = match cli.format.as_deref().or(config.defaults.format.as_deref()) {
            Some(name) => name.parse::<OutputFormat>()?,
            None => OutputFormat::Text,
        };

        Ok(Self { root, config, format })
    }

    /// Discover the project's files, with a spinner while walking
    pub fn discover(&self) -> Result<ProjectContext> {
        let spinner = spinner("Discovering Java sources...");
        let context = crate::ingest::discover(&self.root, &self.config)?;
        spinner.finish_and_clear();
        Ok(context)
    }

    /// Resolve a user-supplied file path against the project root
    pub fn resolve_file(&self, file: &Path) -> Result<PathBuf> {
        let candidate = if file.is_absolute() || file.exists() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        };
        candidate
            .canonicalize()
            .with_context(|| format!("File does not exist: {}", file.display()))
    }

    pub fn print<R: Report>(&self, value: &R) -> Result<()> {
        println!("{}", reporters::render(value, self.format)?);
        Ok(())
    }
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn run(cli: Cli) -> Result<()> {
    if let Some(Commands::Init { force }) = &cli.command {
        return init::run(&cli.path, *force);
    }

    let session = Session::open(&cli)?;
    match cli.command {
        None => analyze::run(session, Vec::new()),
        Some(Commands::Analyze { skip_detector }) => analyze::run(session, skip_detector),
        Some(Commands::File { file }) => analyze::run_file(session, &file),
        Some(Commands::Graph) => graph::run(session),
        Some(Commands::Ripple { file }) => graph::run_ripple(session, &file),
        Some(Commands::Impact {
            operation,
            request,
            target_file,
            target_class,
            target_method,
            old_name,
            new_name,
            source_class,
            extracted_class,
        }) => {
            let request = match request {
                Some(path) => impact::read_request(&path)?,
                None => crate::impact::OperationRequest {
                    operation: operation.unwrap_or_default(),
                    target_file,
                    target_class,
                    target_method,
                    old_name,
                    new_name,
                    source_class,
                    extracted_class,
                },
            };
            impact::run(session, request)
        }
        Some(Commands::Init { .. }) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_workers_bounds() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert_eq!(parse_workers("16"), Ok(16));
        assert!(parse_workers("17").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_impact_flags_parse() {
        let cli = Cli::try_parse_from([
            "debtradar",
            "impact",
            "rename-class",
            "--target-class",
            "Foo",
            "--new-name",
            "Bar",
            "--format",
            "json",
        ])
        .expect("parse");
        assert_eq!(cli.format.as_deref(), Some("json"));
        match cli.command {
            Some(Commands::Impact {
                operation,
                target_class,
                new_name,
                ..
            }) => {
                assert_eq!(operation.as_deref(), Some("rename-class"));
                assert_eq!(target_class.as_deref(), Some("Foo"));
                assert_eq!(new_name.as_deref(), Some("Bar"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_impact_requires_operation_or_request() {
        assert!(Cli::try_parse_from(["debtradar", "impact"]).is_err());
        assert!(Cli::try_parse_from(["debtradar", "impact", "--request", "op.json"]).is_ok());
    }
}
