//! Read-only workspace index shared by all detectors
//!
//! Built once per run from every parsed file, before detection starts:
//! - a class table (simple name -> declaring file, methods, parent)
//! - a duplicate-window index (hash of N normalized code lines -> locations)

use crate::scanner::{ClassKind, SourceFile};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use xxhash_rust::xxh3::xxh3_64;

/// Default number of significant lines per duplicate window
pub const DEFAULT_WINDOW_LINES: usize = 6;

/// What the index knows about one declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSummary {
    pub name: String,
    pub file: String,
    pub package: Option<String>,
    /// Non-constructor method names in declaration order (overloads repeat)
    pub methods: Vec<String>,
    /// Simple name of the superclass, if any
    pub parent: Option<String>,
    pub kind: ClassKind,
}

impl ClassSummary {
    /// Distinct method names
    pub fn distinct_methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.iter().map(|m| m.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// One occurrence of a duplicate window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowLocation {
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
}

/// A window of consecutive significant lines in one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub hash: u64,
    pub start_line: u32,
    pub end_line: u32,
}

/// Index over all files of a run
#[derive(Debug, Default)]
pub struct WorkspaceIndex {
    classes: BTreeMap<String, Vec<ClassSummary>>,
    windows: HashMap<u64, Vec<WindowLocation>>,
    window_lines: usize,
    file_count: usize,
}

impl WorkspaceIndex {
    pub fn empty() -> Self {
        Self {
            window_lines: DEFAULT_WINDOW_LINES,
            ..Default::default()
        }
    }

    /// Build the index from every parsed file (per-file work runs in parallel)
    pub fn build(files: &[Arc<SourceFile>], window_lines: usize) -> Self {
        let window_lines = window_lines.max(2);
        let per_file: Vec<(Vec<ClassSummary>, Vec<(u64, WindowLocation)>)> = files
            .par_iter()
            .map(|file| {
                let classes = summarize_classes(file);
                let windows = file_windows(file, window_lines)
                    .into_iter()
                    .map(|w| {
                        (
                            w.hash,
                            WindowLocation {
                                file: file.path().to_string(),
                                start_line: w.start_line,
                                end_line: w.end_line,
                            },
                        )
                    })
                    .collect();
                (classes, windows)
            })
            .collect();

        let mut index = Self {
            window_lines,
            file_count: files.len(),
            ..Default::default()
        };
        for (classes, windows) in per_file {
            for class in classes {
                index.classes.entry(class.name.clone()).or_default().push(class);
            }
            for (hash, location) in windows {
                index.windows.entry(hash).or_default().push(location);
            }
        }
        for entries in index.classes.values_mut() {
            entries.sort_by(|a, b| a.file.cmp(&b.file));
        }
        for locations in index.windows.values_mut() {
            locations.sort_by(|a, b| (&a.file, a.start_line).cmp(&(&b.file, b.start_line)));
        }
        index
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn window_lines(&self) -> usize {
        self.window_lines
    }

    /// A class by simple name, preferring one declared in `package`
    pub fn class(&self, name: &str, package: Option<&str>) -> Option<&ClassSummary> {
        let simple = name.rsplit('.').next().unwrap_or(name);
        let candidates = self.classes.get(simple)?;
        candidates
            .iter()
            .find(|c| c.package.as_deref() == package)
            .or_else(|| candidates.first())
    }

    pub fn class_count(&self) -> usize {
        self.classes.values().map(|v| v.len()).sum()
    }

    /// Every location of a window hash
    pub fn window_locations(&self, hash: u64) -> &[WindowLocation] {
        self.windows.get(&hash).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

fn summarize_classes(file: &SourceFile) -> Vec<ClassSummary> {
    let structure = file.structure();
    structure
        .classes
        .iter()
        .map(|c| ClassSummary {
            name: c.name.clone(),
            file: file.path().to_string(),
            package: structure.package.clone(),
            methods: c.regular_methods().map(|m| m.name.clone()).collect(),
            parent: c
                .superclass
                .as_ref()
                .map(|s| s.rsplit('.').next().unwrap_or(s).to_string()),
            kind: c.kind,
        })
        .collect()
}

/// Lines that carry no duplication signal on their own
fn is_trivial(normalized: &str) -> bool {
    matches!(normalized, "{" | "}" | "};" | ")" | ");" | "})" | "});" | "} else {" | "@Override")
        || normalized.starts_with("import ")
        || normalized.starts_with("package ")
}

/// Significant code lines of a file as `(1-based line, normalized text)`
pub fn significant_lines(file: &SourceFile) -> Vec<(u32, String)> {
    file.code_lines()
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let normalized = line.split_whitespace().collect::<Vec<_>>().join(" ");
            if normalized.is_empty() || is_trivial(&normalized) {
                None
            } else {
                Some(((i + 1) as u32, normalized))
            }
        })
        .collect()
}

/// Every sliding window of `size` consecutive significant lines
pub fn file_windows(file: &SourceFile, size: usize) -> Vec<Window> {
    let lines = significant_lines(file);
    if size == 0 || lines.len() < size {
        return Vec::new();
    }
    lines
        .windows(size)
        .map(|chunk| {
            let joined = chunk
                .iter()
                .map(|(_, text)| text.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            Window {
                hash: xxh3_64(joined.as_bytes()),
                start_line: chunk[0].0,
                end_line: chunk[chunk.len() - 1].0,
            }
        })
        .collect()
}
