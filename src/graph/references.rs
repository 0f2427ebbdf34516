//! Per-file reference extraction
//!
//! Collects the type names a Java file refers to: imports, supertypes,
//! annotations and capitalized identifiers that may name a type in the same
//! package. Nothing is resolved here.

use crate::scanner::java::is_keyword;
use crate::scanner::{ClassKind, ImportDecl, SourceFile};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// How a file refers to a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceKind {
    Import,
    StaticImport,
    Extends,
    Implements,
    Annotation,
    TypeUsage,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Import => "IMPORT",
            ReferenceKind::StaticImport => "STATIC_IMPORT",
            ReferenceKind::Extends => "EXTENDS",
            ReferenceKind::Implements => "IMPLEMENTS",
            ReferenceKind::Annotation => "ANNOTATION",
            ReferenceKind::TypeUsage => "TYPE_USAGE",
        }
    }

    /// Whether an unresolved name of this kind still becomes an external node.
    ///
    /// Bare capitalized words are only candidates; they create an edge
    /// when they name a project type and are dropped otherwise.
    pub fn records_external(&self) -> bool {
        !matches!(self, ReferenceKind::TypeUsage)
    }
}

/// One referenced type name, simple (`Foo`) or qualified (`a.b.Foo`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeReference {
    pub name: String,
    pub kind: ReferenceKind,
    pub line: u32,
}

/// Everything the resolver needs to know about one file
#[derive(Debug, Clone, Default)]
pub struct FileReferences {
    /// Path relative to the project root
    pub file: String,
    pub package: Option<String>,
    pub imports: Vec<ImportDecl>,
    /// Qualified names of every type declared in the file, nested ones included
    pub declared: Vec<String>,
    pub references: Vec<TypeReference>,
}

impl FileReferences {
    /// Packages pulled in with non-static wildcard imports
    pub fn wildcard_packages(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .filter(|i| i.is_wildcard && !i.is_static)
            .map(|i| i.path.as_str())
    }

    /// The single-type import whose simple name is `simple`
    pub fn single_import(&self, simple: &str) -> Option<&ImportDecl> {
        self.imports
            .iter()
            .filter(|i| !i.is_wildcard)
            .find(|i| {
                let path = i.type_path();
                path.rsplit('.').next() == Some(simple)
            })
    }
}

static ANNOTATION: OnceLock<Regex> = OnceLock::new();
static CAPITALIZED: OnceLock<Regex> = OnceLock::new();

fn annotation_pattern() -> &'static Regex {
    ANNOTATION.get_or_init(|| {
        Regex::new(r"@\s*([A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)").expect("valid regex")
    })
}

fn capitalized_pattern() -> &'static Regex {
    CAPITALIZED.get_or_init(|| Regex::new(r"\b[A-Z][\w$]*\b").expect("valid regex"))
}

/// Extract the references of one parsed file
pub fn extract_references(file: &SourceFile) -> FileReferences {
    let structure = file.structure();
    let mut references = Vec::new();

    for import in &structure.imports {
        if import.is_wildcard && !import.is_static {
            continue;
        }
        let kind = if import.is_static {
            ReferenceKind::StaticImport
        } else {
            ReferenceKind::Import
        };
        references.push(TypeReference {
            name: import.type_path().to_string(),
            kind,
            line: import.line,
        });
    }

    for class in &structure.classes {
        if let Some(parent) = &class.superclass {
            references.push(TypeReference {
                name: parent.clone(),
                kind: ReferenceKind::Extends,
                line: class.start_line,
            });
        }
        let interface_kind = match class.kind {
            // Interfaces extend other interfaces
            ClassKind::Interface => ReferenceKind::Extends,
            _ => ReferenceKind::Implements,
        };
        for interface in &class.interfaces {
            references.push(TypeReference {
                name: interface.clone(),
                kind: interface_kind,
                line: class.start_line,
            });
        }
    }

    let declared_simple: BTreeSet<&str> =
        structure.classes.iter().map(|c| c.name.as_str()).collect();
    let mut seen_usages = BTreeSet::new();

    for (i, line) in file.code_lines().iter().enumerate() {
        let line_no = (i + 1) as u32;
        let trimmed = line.trim_start();
        if trimmed.starts_with("import ") || trimmed.starts_with("package ") {
            continue;
        }

        for caps in annotation_pattern().captures_iter(line) {
            let name = &caps[1];
            if name == "interface" {
                continue;
            }
            references.push(TypeReference {
                name: name.to_string(),
                kind: ReferenceKind::Annotation,
                line: line_no,
            });
        }

        for word in capitalized_pattern().find_iter(line) {
            let name = word.as_str();
            let preceded_by_at = line[..word.start()].trim_end().ends_with('@');
            let qualified = line[..word.start()].ends_with('.');
            if preceded_by_at
                || qualified
                || is_keyword(name)
                || declared_simple.contains(name)
                || !seen_usages.insert(name.to_string())
            {
                continue;
            }
            references.push(TypeReference {
                name: name.to_string(),
                kind: ReferenceKind::TypeUsage,
                line: line_no,
            });
        }
    }

    FileReferences {
        file: file.path().to_string(),
        package: structure.package.clone(),
        imports: structure.imports.clone(),
        declared: structure.qualified_names(),
        references,
    }
}
