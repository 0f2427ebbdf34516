//! Centralized file provider abstraction.
//!
//! Instead of each stage independently reading files, the aggregator, graph
//! builder and impact analyzer receive a `FileProvider` that supplies the file
//! list and cached content. This enables in-memory sources in tests and a
//! single point of control for file I/O.

use crate::cache::FileCache;
use crate::error::AnalysisError;
use crate::models::ProjectContext;
use crate::scanner::{ScanOptions, SourceFile};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Trait for providing source files and their contents.
///
/// Implementations must be `Send + Sync` so they can be shared across
/// rayon's parallel per-file work.
pub trait FileProvider: Send + Sync {
    /// All source files known to this provider (absolute paths).
    fn files(&self) -> &[PathBuf];

    /// Read (or return cached) file content.
    fn content(&self, path: &Path) -> Result<Arc<String>, AnalysisError>;

    /// The project root path.
    fn repo_path(&self) -> &Path;

    /// Path relative to the root with forward slashes
    fn relative_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(self.repo_path()).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Files whose extension matches `ext` (without the leading dot).
    fn files_with_extension(&self, ext: &str) -> Vec<&Path> {
        self.files()
            .iter()
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ext))
            .map(|p| p.as_path())
            .collect()
    }
}

/// One file read and parsed through a provider
pub struct LoadedFile {
    /// Path relative to the provider root
    pub path: String,
    pub source: Result<Arc<SourceFile>, AnalysisError>,
}

/// Read and parse `paths` in parallel, keeping per-file failures.
///
/// Output order matches `paths`.
pub fn load_sources(
    provider: &dyn FileProvider,
    paths: &[PathBuf],
    options: &ScanOptions,
) -> Vec<LoadedFile> {
    paths
        .par_iter()
        .map(|path| {
            let rel = provider.relative_path(path);
            let source = provider
                .content(path)
                .map(|text| Arc::new(SourceFile::parse_with(rel.clone(), &text, options)));
            LoadedFile { path: rel, source }
        })
        .collect()
}

/// Real implementation backed by a [`FileCache`].
pub struct SourceFiles {
    files: Vec<PathBuf>,
    repo_path: PathBuf,
    cache: FileCache,
}

impl SourceFiles {
    /// Create a new `SourceFiles` from an already-collected file list.
    pub fn new(files: Vec<PathBuf>, repo_path: PathBuf, max_file_bytes: u64) -> Self {
        Self {
            files,
            repo_path,
            cache: FileCache::new(max_file_bytes),
        }
    }

    /// Provider over the source files of a project context
    pub fn for_project(context: &ProjectContext, max_file_bytes: u64) -> Self {
        Self::new(
            context.source_files.clone(),
            context.root.clone(),
            max_file_bytes,
        )
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }
}

impl FileProvider for SourceFiles {
    fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn content(&self, path: &Path) -> Result<Arc<String>, AnalysisError> {
        self.cache.content(path)
    }

    fn repo_path(&self) -> &Path {
        &self.repo_path
    }
}

/// In-memory provider, used by tests and by callers that already hold sources.
///
/// Paths are joined onto a virtual root so nothing touches real files.
pub struct MemoryFiles {
    files: Vec<PathBuf>,
    contents: HashMap<PathBuf, Arc<String>>,
    repo_path: PathBuf,
}

impl MemoryFiles {
    /// Build from `(relative_path, content)` pairs under the root `/workspace`.
    pub fn new(entries: Vec<(&str, &str)>) -> Self {
        Self::with_root("/workspace", entries)
    }

    pub fn with_root(root: impl Into<PathBuf>, entries: Vec<(&str, &str)>) -> Self {
        let repo_path = root.into();
        let mut files = Vec::with_capacity(entries.len());
        let mut contents = HashMap::with_capacity(entries.len());

        for (rel, body) in entries {
            let full = repo_path.join(rel);
            files.push(full.clone());
            contents.insert(full, Arc::new(body.to_string()));
        }

        Self {
            files,
            contents,
            repo_path,
        }
    }

    /// Register a path in the file list without content, so reading it fails
    pub fn with_unreadable(mut self, rel: &str) -> Self {
        self.files.push(self.repo_path.join(rel));
        self
    }

    /// A project context describing exactly these files
    pub fn context(&self) -> ProjectContext {
        ProjectContext::new(self.repo_path.clone(), self.files.clone())
    }
}

impl FileProvider for MemoryFiles {
    fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn content(&self, path: &Path) -> Result<Arc<String>, AnalysisError> {
        self.contents
            .get(path)
            .cloned()
            .ok_or_else(|| AnalysisError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
    }

    fn repo_path(&self) -> &Path {
        &self.repo_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_files_basics() {
        let provider = MemoryFiles::new(vec![
            ("src/A.java", "class A {}"),
            ("src/B.java", "class B {}"),
            ("pom.xml", "<project/>"),
        ]);

        assert_eq!(provider.files().len(), 3);
        assert_eq!(provider.files_with_extension("java").len(), 2);

        let a = PathBuf::from("/workspace/src/A.java");
        assert_eq!(provider.content(&a).expect("content").as_str(), "class A {}");
        assert_eq!(provider.relative_path(&a), "src/A.java");
        assert!(provider.content(Path::new("/elsewhere/C.java")).is_err());
        assert_eq!(provider.repo_path(), Path::new("/workspace"));
    }

    #[test]
    fn test_unreadable_entry_and_context() {
        let provider =
            MemoryFiles::new(vec![("A.java", "class A {}")]).with_unreadable("Gone.java");
        let ctx = provider.context();
        assert_eq!(ctx.source_files.len(), 2);
        assert!(provider
            .content(Path::new("/workspace/Gone.java"))
            .is_err());
    }

    #[test]
    fn test_load_sources_keeps_order_and_failures() {
        let provider = MemoryFiles::new(vec![
            ("b/B.java", "class B {}\n"),
            ("A.java", "class A {}\n"),
        ])
        .with_unreadable("Gone.java");
        let loaded = load_sources(&provider, provider.files(), &ScanOptions::default());
        let paths: Vec<_> = loaded.iter().map(|l| l.path.as_str()).collect();
        assert_eq!(paths, vec!["b/B.java", "A.java", "Gone.java"]);
        let b = loaded[0].source.as_ref().expect("parsed");
        assert_eq!(b.path(), "b/B.java");
        assert_eq!(b.structure().classes[0].name, "B");
        assert!(loaded[2].source.is_err());
    }

    #[test]
    fn test_source_files_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("A.java");
        std::fs::write(&path, "class A {}\n").expect("write");
        let provider = SourceFiles::new(vec![path.clone()], dir.path().to_path_buf(), 1024);
        assert_eq!(provider.content(&path).expect("read").as_str(), "class A {}\n");
        assert_eq!(provider.relative_path(&path), "A.java");
        assert_eq!(provider.cache().len(), 1);
    }
}
