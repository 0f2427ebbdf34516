//! File content caching
//!
//! A thread-safe content cache shared by every consumer of one run (the
//! aggregator, the dependency graph builder and the impact analyzer), so each
//! file is read and validated from disk at most once.

use crate::error::AnalysisError;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Thread-safe file content cache
#[derive(Clone)]
pub struct FileCache {
    /// Cached file contents: path -> content
    contents: Arc<DashMap<PathBuf, Arc<String>>>,
    /// Files above this size are rejected before reading
    max_file_bytes: u64,
}

impl FileCache {
    pub fn new(max_file_bytes: u64) -> Self {
        Self {
            contents: Arc::new(DashMap::new()),
            max_file_bytes,
        }
    }

    /// Get file content (cached), enforcing the size limit and the text-only rule
    pub fn content(&self, path: &Path) -> Result<Arc<String>, AnalysisError> {
        if let Some(content) = self.contents.get(path) {
            return Ok(Arc::clone(&content));
        }

        let io_err = |source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        };
        let size = std::fs::metadata(path).map_err(io_err)?.len();
        if size > self.max_file_bytes {
            return Err(AnalysisError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_file_bytes,
            });
        }

        let bytes = std::fs::read(path).map_err(io_err)?;
        if crate::ingest::is_probably_binary(&bytes) {
            return Err(AnalysisError::Binary {
                path: path.to_path_buf(),
            });
        }

        let arc = Arc::new(String::from_utf8_lossy(&bytes).into_owned());
        self.contents.insert(path.to_path_buf(), Arc::clone(&arc));
        Ok(arc)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}
