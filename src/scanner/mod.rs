//! Source scanner primitives
//!
//! Line iteration, comment/blank filtering, brace-depth block resolution and
//! a lexical (not AST) view of Java structure. Everything downstream, the
//! detectors, the dependency graph and the impact analyzer, reads source
//! through these types.

mod blocks;
pub mod java;
mod source;

pub use blocks::{brace_delta, resolve_block_end, resolve_method_body, DEFAULT_METHOD_BODY_CAP};
pub use java::{ClassDecl, ClassKind, FieldDecl, ImportDecl, JavaStructure, MethodDecl, Parameter};
pub use source::SourceFile;

/// Options controlling lexical scanning
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Fallback span for method bodies with no closing brace
    pub method_body_cap: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            method_body_cap: DEFAULT_METHOD_BODY_CAP,
        }
    }
}

/// Whether `word` occurs in `line` delimited by non-identifier characters
pub fn contains_word(line: &str, word: &str) -> bool {
    find_word(line, word, 0).is_some()
}

/// Byte offset of the first whole-word occurrence of `word` at or after `from`
pub fn find_word(line: &str, word: &str, from: usize) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let bytes = line.as_bytes();
    let mut start = from;
    while let Some(pos) = line.get(start..).and_then(|s| s.find(word)) {
        let abs = start + pos;
        let before_ok = abs == 0 || !is_ident_byte(bytes[abs - 1]);
        let after = abs + word.len();
        let after_ok = after >= bytes.len() || !is_ident_byte(bytes[after]);
        if before_ok && after_ok {
            return Some(abs);
        }
        start = abs + word.len();
    }
    None
}

/// Count whole-word occurrences of `word` in `line`
pub fn count_word(line: &str, word: &str) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = find_word(line, word, from) {
        count += 1;
        from = pos + word.len();
    }
    count
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Whether `s` is a syntactically valid Java identifier
pub fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') && !java::is_keyword(s)
}
