//! Local project discovery
//!
//! Builds a [`ProjectContext`] from a directory: walks `.java` files while
//! honoring `.gitignore` and `.debtradarignore`, applies the configured
//! excludes, skips binary content and splits test sources from production
//! sources.

use crate::config::ProjectConfig;
use crate::models::{BuildSystem, ProjectContext};
use anyhow::{bail, Result};
use ignore::WalkBuilder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extensions treated as Java sources
pub const SOURCE_EXTENSIONS: &[&str] = &["java"];

/// Per-project ignore file, read like `.gitignore`
pub const IGNORE_FILE: &str = ".debtradarignore";

/// Bytes inspected by the binary check
const SNIFF_BYTES: u64 = 8192;

/// Build markers checked at the project root, in priority order
const BUILD_MARKERS: &[(&str, BuildSystem)] = &[
    ("pom.xml", BuildSystem::Maven),
    ("build.gradle", BuildSystem::Gradle),
    ("build.gradle.kts", BuildSystem::Gradle),
    ("settings.gradle", BuildSystem::Gradle),
    ("settings.gradle.kts", BuildSystem::Gradle),
    ("build.xml", BuildSystem::Ant),
];

/// Whether `bytes` look like binary content: more than 5% NUL bytes or
/// more than 30% non-printable bytes
pub fn is_probably_binary(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    let total = bytes.len() as f64;
    let nul = bytes.iter().filter(|&&b| b == 0).count() as f64;
    if nul / total > 0.05 {
        return true;
    }
    let non_printable = bytes
        .iter()
        .filter(|&&b| (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c)) || b == 0x7f)
        .count() as f64;
    non_printable / total > 0.30
}

/// Whether a relative path names a test source
pub fn is_test_path(relative: &str) -> bool {
    let file_name = relative.rsplit('/').next().unwrap_or(relative);
    relative.starts_with("test/")
        || relative.contains("/test/")
        || relative.starts_with("tests/")
        || relative.contains("/tests/")
        || file_name.ends_with("Test.java")
        || file_name.ends_with("Tests.java")
        || file_name.ends_with("IT.java")
}

/// Build system declared by marker files in `root`
pub fn detect_build_system(root: &Path) -> (BuildSystem, Option<&'static str>) {
    BUILD_MARKERS
        .iter()
        .find(|(marker, _)| root.join(marker).is_file())
        .map(|(marker, system)| (*system, Some(*marker)))
        .unwrap_or((BuildSystem::Unknown, None))
}

fn sniff_binary(path: &Path) -> bool {
    let mut buf = Vec::new();
    match File::open(path).and_then(|f| f.take(SNIFF_BYTES).read_to_end(&mut buf)) {
        Ok(_) => is_probably_binary(&buf),
        // Unreadable files are left for the analysis to report
        Err(_) => false,
    }
}

/// Discover the Java sources under `root`
pub fn discover(root: &Path, config: &ProjectConfig) -> Result<ProjectContext> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(IGNORE_FILE);

    let mut context = ProjectContext::new(root, Vec::new());
    let mut excluded = 0usize;
    let mut binary = 0usize;

    for entry in builder.build().flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_source = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if !is_source {
            continue;
        }

        let relative = context.relative_path(path);
        if config.should_exclude(Path::new(&relative)) {
            excluded += 1;
            continue;
        }
        if sniff_binary(path) {
            debug!("Skipping binary file {}", relative);
            binary += 1;
            continue;
        }

        if is_test_path(&relative) {
            context.test_files.push(path.to_path_buf());
        } else {
            context.source_files.push(path.to_path_buf());
        }
    }

    context.source_files.sort();
    context.test_files.sort();

    let (build_system, marker) = detect_build_system(root);
    context.build_system = build_system;
    if let Some(marker) = marker {
        context.properties.insert("build.file".into(), marker.into());
    }
    context
        .properties
        .insert("source.count".into(), context.source_files.len().to_string());
    context
        .properties
        .insert("test.count".into(), context.test_files.len().to_string());

    info!(
        "Discovered {} source and {} test files under {} ({} excluded, {} binary, build {:?})",
        context.source_files.len(),
        context.test_files.len(),
        root.display(),
        excluded,
        binary,
        build_system
    );
    Ok(context)
}

/// Every discovered file, production sources first
pub fn all_files(context: &ProjectContext) -> Vec<PathBuf> {
    context
        .source_files
        .iter()
        .chain(&context.test_files)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, content).expect("write");
    }

    #[test]
    fn test_binary_heuristic() {
        assert!(!is_probably_binary(b""));
        assert!(!is_probably_binary(b"class A {\n\tint x;\r\n}\n"));
        let mut nul_heavy = vec![b'a'; 90];
        nul_heavy.extend([0u8; 10]);
        assert!(is_probably_binary(&nul_heavy));
        let mut control_heavy = vec![b'a'; 60];
        control_heavy.extend([0x01u8; 40]);
        assert!(is_probably_binary(&control_heavy));
        // UTF-8 text is printable
        assert!(!is_probably_binary("String s = \"Grüße\";".as_bytes()));
    }

    #[test]
    fn test_test_path_split() {
        assert!(is_test_path("src/test/java/a/FooTest.java"));
        assert!(is_test_path("module/OrderTests.java"));
        assert!(is_test_path("it/CheckoutIT.java"));
        assert!(!is_test_path("src/main/java/a/Foo.java"));
        assert!(!is_test_path("src/main/java/a/Contest.java"));
    }

    #[test]
    fn test_discover_walks_and_classifies() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "pom.xml", b"<project/>");
        write(root, "src/main/java/a/Foo.java", b"package a;\nclass Foo {}\n");
        write(root, "src/test/java/a/FooTest.java", b"package a;\nclass FooTest {}\n");
        write(root, "generated/Gen.java", b"class Gen {}\n");
        write(root, "lib/Blob.java", &[0u8; 64]);
        write(root, "ignored/Skip.java", b"class Skip {}\n");
        write(root, "README.md", b"# readme\n");
        write(root, IGNORE_FILE, b"ignored/\n");

        let mut config = ProjectConfig::default();
        config.exclude.paths = vec!["generated/**".into()];
        let context = discover(root, &config).expect("discover");

        let rel: Vec<String> = context
            .source_files
            .iter()
            .map(|p| context.relative_path(p))
            .collect();
        assert_eq!(rel, vec!["src/main/java/a/Foo.java"]);
        assert_eq!(context.test_files.len(), 1);
        assert_eq!(context.build_system, BuildSystem::Maven);
        assert_eq!(context.property("build.file"), Some("pom.xml"));
        assert_eq!(all_files(&context).len(), 2);
    }

    #[test]
    fn test_discover_rejects_missing_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(discover(&dir.path().join("nope"), &ProjectConfig::default()).is_err());
    }
}
