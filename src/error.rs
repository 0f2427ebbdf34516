//! Typed errors surfaced at the library boundary
//!
//! Most failures inside the core are recovered locally (a file is marked
//! errored, a detector yields no evidence). Only the conditions below are
//! reported to callers as values.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or scanning a single file
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("{path} looks like a binary file")]
    Binary { path: PathBuf },

    #[error("scan of {path} exceeded {timeout_ms}ms")]
    Timeout { path: String, timeout_ms: u64 },

    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

/// Validation errors for refactoring-operation requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("unknown refactoring operation '{0}' (expected extract-method, rename-method, rename-class, move-method or extract-class)")]
    UnknownOperation(String),

    #[error("{operation} requires the '{field}' field")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("'{value}' is not a valid Java identifier for '{field}'")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("{operation}: '{field}' must differ from the current name '{value}'")]
    UnchangedName {
        operation: &'static str,
        field: &'static str,
        value: String,
    },
}

pub type OperationResult<T> = Result<T, OperationError>;
