//! Type name resolution against the project's source files
//!
//! A simple name is tried, in order, as:
//!
//! 1. an explicit single-type import
//! 2. a type of the referring file's own package
//! 3. a type of a wildcard-imported project package
//! 4. a type of the default package
//!
//! A qualified name is tried as a fully-qualified name, then as a path
//! suffix (`a.b.C` → `a/b/C.java`), then by stripping nested-type segments
//! (`a.b.Outer.Inner` → `a.b.Outer`). Anything else is external and lands
//! in the `external/<SimpleName>.java` bucket.

use crate::graph::references::FileReferences;
use std::collections::HashMap;

/// Directory prefix of external nodes
pub const EXTERNAL_PREFIX: &str = "external/";

/// Node name for a type outside the project
pub fn external_node(name: &str) -> String {
    let simple = name.rsplit('.').next().unwrap_or(name);
    format!("{EXTERNAL_PREFIX}{simple}.java")
}

pub fn is_external(node: &str) -> bool {
    node.starts_with(EXTERNAL_PREFIX)
}

/// Where a referenced name points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A project file, by relative path
    Project(String),
    /// No project file declares it
    External(String),
}

impl Resolution {
    /// The graph node this resolution maps to
    pub fn node(&self) -> &str {
        match self {
            Resolution::Project(file) | Resolution::External(file) => file,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Resolution::External(_))
    }
}

/// Lookup tables over every declared type of the project
#[derive(Debug, Default)]
pub struct TypeResolver {
    /// Fully-qualified type name → declaring file
    by_name: HashMap<String, String>,
    files: Vec<String>,
}

impl TypeResolver {
    pub fn new(files: &[FileReferences]) -> Self {
        let mut by_name = HashMap::new();
        let mut paths = Vec::with_capacity(files.len());
        for refs in files {
            paths.push(refs.file.clone());
            for name in &refs.declared {
                // First declaration wins on duplicate names
                by_name.entry(name.clone()).or_insert_with(|| refs.file.clone());
            }
        }
        paths.sort();
        Self {
            by_name,
            files: paths,
        }
    }

    pub fn type_count(&self) -> usize {
        self.by_name.len()
    }

    /// Resolve `name` as written in the file described by `from`
    pub fn resolve(&self, name: &str, from: &FileReferences) -> Resolution {
        let found = if name.contains('.') {
            self.resolve_qualified(name, from)
        } else {
            self.resolve_simple(name, from)
        };
        match found {
            Some(file) => Resolution::Project(file.to_string()),
            None => Resolution::External(external_node(name)),
        }
    }

    fn resolve_simple(&self, name: &str, from: &FileReferences) -> Option<&str> {
        if let Some(import) = from.single_import(name) {
            // An explicit import shadows every other candidate
            return self.resolve_fully_qualified(import.type_path());
        }
        if let Some(found) = self.in_package(from.package.as_deref(), name) {
            return Some(found);
        }
        if let Some(found) = from
            .wildcard_packages()
            .find_map(|pkg| self.in_package(Some(pkg), name))
        {
            return Some(found);
        }
        self.in_package(None, name)
    }

    fn resolve_qualified(&self, name: &str, from: &FileReferences) -> Option<&str> {
        let starts_with_type = name.chars().next().is_some_and(|c| c.is_ascii_uppercase());
        if starts_with_type {
            // `Outer.Inner` lives in the file declaring `Outer`
            let (outer, _) = name.split_once('.')?;
            return self.resolve_simple(outer, from);
        }
        self.resolve_fully_qualified(name)
    }

    fn resolve_fully_qualified(&self, name: &str) -> Option<&str> {
        if let Some(file) = self.by_name.get(name) {
            return Some(file);
        }
        if let Some(file) = self.by_path_suffix(name) {
            return Some(file);
        }
        // Nested type: drop trailing segments until a declared type matches
        let mut prefix = name;
        while let Some((outer, _)) = prefix.rsplit_once('.') {
            if let Some(file) = self.by_name.get(outer) {
                return Some(file);
            }
            prefix = outer;
        }
        None
    }

    /// A file whose path ends with the name's segments as directories
    fn by_path_suffix(&self, name: &str) -> Option<&str> {
        let suffix = format!("{}.java", name.replace('.', "/"));
        self.files
            .iter()
            .find(|f| *f == &suffix || f.ends_with(&format!("/{suffix}")))
            .map(|f| f.as_str())
    }

    fn in_package(&self, package: Option<&str>, simple: &str) -> Option<&str> {
        let fqn = match package {
            Some(pkg) => format!("{pkg}.{simple}"),
            None => simple.to_string(),
        };
        self.by_name.get(&fqn).map(|f| f.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::references::extract_references;
    use crate::scanner::SourceFile;

    fn refs(path: &str, text: &str) -> FileReferences {
        extract_references(&SourceFile::parse(path, text))
    }

    fn project() -> Vec<FileReferences> {
        vec![
            refs(
                "src/com/a/Foo.java",
                "package com.a;\npublic class Foo {\n    public static class Inner {}\n}\n",
            ),
            refs("src/com/a/Helper.java", "package com.a;\nclass Helper {}\n"),
            refs("src/com/b/Bar.java", "package com.b;\npublic class Bar {}\n"),
            refs("src/com/b/Helper.java", "package com.b;\npublic class Helper {}\n"),
            refs("Loose.java", "public class Loose {}\n"),
            refs("gen/org/x/Generated.java", "public class Generated {}\n"),
        ]
    }

    #[test]
    fn test_single_import_beats_same_package() {
        let files = project();
        let resolver = TypeResolver::new(&files);
        let from = refs(
            "src/com/a/User.java",
            "package com.a;\nimport com.b.Helper;\nclass User {}\n",
        );
        assert_eq!(
            resolver.resolve("Helper", &from),
            Resolution::Project("src/com/b/Helper.java".into())
        );
        assert_eq!(
            resolver.resolve("Foo", &from),
            Resolution::Project("src/com/a/Foo.java".into())
        );
    }

    #[test]
    fn test_wildcard_then_default_package() {
        let files = project();
        let resolver = TypeResolver::new(&files);
        let from = refs(
            "src/com/c/User.java",
            "package com.c;\nimport com.b.*;\nclass User {}\n",
        );
        assert_eq!(
            resolver.resolve("Bar", &from),
            Resolution::Project("src/com/b/Bar.java".into())
        );
        assert_eq!(resolver.resolve("Loose", &from), Resolution::Project("Loose.java".into()));
        assert_eq!(
            resolver.resolve("Foo", &from),
            Resolution::External("external/Foo.java".into())
        );
    }

    #[test]
    fn test_qualified_names() {
        let files = project();
        let resolver = TypeResolver::new(&files);
        let from = refs("src/com/c/User.java", "package com.c;\nclass User {}\n");
        assert_eq!(
            resolver.resolve("com.b.Bar", &from),
            Resolution::Project("src/com/b/Bar.java".into())
        );
        // Path suffix for a file that declares no package
        assert_eq!(
            resolver.resolve("org.x.Generated", &from),
            Resolution::Project("gen/org/x/Generated.java".into())
        );
        // Nested type through its outer class
        assert_eq!(
            resolver.resolve("com.a.Foo.Inner", &from),
            Resolution::Project("src/com/a/Foo.java".into())
        );
        assert_eq!(
            resolver.resolve("java.util.List", &from),
            Resolution::External("external/List.java".into())
        );
    }

    #[test]
    fn test_outer_dot_inner_relative_to_file() {
        let files = project();
        let resolver = TypeResolver::new(&files);
        let from = refs("src/com/a/User.java", "package com.a;\nclass User {}\n");
        assert_eq!(
            resolver.resolve("Foo.Inner", &from),
            Resolution::Project("src/com/a/Foo.java".into())
        );
    }

    #[test]
    fn test_external_bucket_uses_simple_name() {
        assert_eq!(external_node("java.util.List"), "external/List.java");
        assert_eq!(external_node("Override"), "external/Override.java");
        assert!(is_external("external/List.java"));
        assert!(!is_external("src/List.java"));
    }
}
