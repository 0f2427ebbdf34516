//! Lexical view of Java structure
//!
//! This is deliberately not a parser. Package, imports, type declarations,
//! methods and fields are recognized line by line with regexes over the code
//! view, and members only count when they sit directly at a class-body brace
//! depth. Malformed input degrades to missing or truncated declarations,
//! never to an error.

use super::blocks::{brace_delta, resolve_block_end, resolve_method_body};
use super::source::SourceFile;
use super::{find_word, ScanOptions};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

static PACKAGE: OnceLock<Regex> = OnceLock::new();
static IMPORT: OnceLock<Regex> = OnceLock::new();
static CLASS: OnceLock<Regex> = OnceLock::new();
static CONSTRUCTOR: OnceLock<Regex> = OnceLock::new();
static METHOD: OnceLock<Regex> = OnceLock::new();
static FIELD: OnceLock<Regex> = OnceLock::new();

fn package_pattern() -> &'static Regex {
    PACKAGE.get_or_init(|| Regex::new(r"^\s*package\s+([\w$.]+)\s*;").expect("valid regex"))
}

fn import_pattern() -> &'static Regex {
    IMPORT.get_or_init(|| {
        Regex::new(r"^\s*import\s+(static\s+)?([\w$]+(?:\s*\.\s*[\w$]+)*)(\s*\.\s*\*)?\s*;")
            .expect("valid regex")
    })
}

fn class_pattern() -> &'static Regex {
    CLASS.get_or_init(|| {
        Regex::new(
            r"^\s*(?:@[\w$.]+(?:\([^)]*\))?\s+)*((?:(?:public|protected|private|abstract|final|static|sealed|non-sealed|strictfp)\s+)*)(class|interface|enum|record|@interface)\s+([A-Za-z_$][\w$]*)",
        )
        .expect("valid regex")
    })
}

fn constructor_pattern() -> &'static Regex {
    CONSTRUCTOR.get_or_init(|| {
        Regex::new(
            r"^\s*(?:@[\w$.]+(?:\([^)]*\))?\s+)*(?:(?:public|protected|private)\s+)?(?:<[^()]*>\s+)?([A-Za-z_$][\w$]*)\s*\(",
        )
        .expect("valid regex")
    })
}

fn method_pattern() -> &'static Regex {
    METHOD.get_or_init(|| {
        Regex::new(
            r"^\s*(?:@[\w$.]+(?:\([^)]*\))?\s+)*((?:(?:public|protected|private|static|final|abstract|synchronized|native|default|strictfp)\s+)*)(?:<[^()]*>\s+)?([\w$.]+(?:\s*<[^()]*>)?(?:\s*\[\s*\])*)\s+([A-Za-z_$][\w$]*)\s*\(",
        )
        .expect("valid regex")
    })
}

fn field_pattern() -> &'static Regex {
    FIELD.get_or_init(|| {
        Regex::new(
            r"^\s*(?:@[\w$.]+(?:\([^)]*\))?\s+)*((?:(?:public|protected|private|static|final|transient|volatile)\s+)*)([\w$.]+(?:\s*<[^;=()]*>)?(?:\s*\[\s*\])*)\s+([A-Za-z_$][\w$]*)\s*(?:=|;|,|\[)",
        )
        .expect("valid regex")
    })
}

const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

/// Words that can precede a `name(` at class-body depth without declaring a member
const NON_TYPE_WORDS: &[&str] = &[
    "return", "new", "else", "throw", "case", "package", "import", "assert", "break", "continue",
    "do", "goto", "public", "protected", "private", "static", "final", "abstract",
    "synchronized", "native", "default", "strictfp", "transient", "volatile", "extends",
    "implements", "throws", "instanceof",
];

/// Whether `word` is a reserved Java word (keywords plus boolean/null literals)
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Kind of a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl ClassKind {
    fn from_keyword(kw: &str) -> Self {
        match kw {
            "interface" => ClassKind::Interface,
            "enum" => ClassKind::Enum,
            "record" => ClassKind::Record,
            "@interface" => ClassKind::Annotation,
            _ => ClassKind::Class,
        }
    }
}

/// One `import` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportDecl {
    /// Dotted path without a trailing `.*`
    pub path: String,
    pub line: u32,
    pub is_static: bool,
    pub is_wildcard: bool,
}

impl ImportDecl {
    /// Last segment of the path (`Foo` for `a.b.Foo`)
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    /// The type the import refers to: the member's owner for static member imports
    pub fn type_path(&self) -> &str {
        if self.is_static && !self.is_wildcard {
            self.path.rsplit_once('.').map(|(owner, _)| owner).unwrap_or(&self.path)
        } else {
            &self.path
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDecl {
    pub name: String,
    pub signature_line: u32,
    /// Line holding the opening brace; `None` for bodiless declarations
    pub body_start_line: Option<u32>,
    pub end_line: u32,
    pub parameters: Vec<Parameter>,
    pub is_constructor: bool,
    pub is_abstract: bool,
    pub is_static: bool,
}

impl MethodDecl {
    /// Lines from signature to closing brace, inclusive
    pub fn line_count(&self) -> u32 {
        self.end_line.saturating_sub(self.signature_line) + 1
    }

    pub fn has_body(&self) -> bool {
        self.body_start_line.is_some()
    }

    pub fn contains_line(&self, line: u32) -> bool {
        line >= self.signature_line && line <= self.end_line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDecl {
    pub name: String,
    pub type_name: String,
    pub line: u32,
    pub is_static: bool,
    pub is_final: bool,
}

impl FieldDecl {
    /// `static final` fields are constants, not state
    pub fn is_constant(&self) -> bool {
        self.is_static && self.is_final
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDecl {
    pub name: String,
    pub kind: ClassKind,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub is_abstract: bool,
    pub start_line: u32,
    pub end_line: u32,
    pub methods: Vec<MethodDecl>,
    pub fields: Vec<FieldDecl>,
    /// Index of the enclosing class for nested declarations
    pub parent: Option<usize>,
}

impl ClassDecl {
    pub fn line_count(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    pub fn contains_line(&self, line: u32) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Methods excluding constructors
    pub fn regular_methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| !m.is_constructor)
    }

    pub fn method_named(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Lexical structure of one Java file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JavaStructure {
    pub package: Option<String>,
    pub imports: Vec<ImportDecl>,
    pub classes: Vec<ClassDecl>,
}

struct OpenClass {
    index: usize,
    body_depth: i64,
    end_line: u32,
}

impl JavaStructure {
    pub fn extract(file: &SourceFile, options: &ScanOptions) -> Self {
        let code = file.code_lines();
        let brace = file.brace_lines();
        let mut out = JavaStructure::default();
        let mut stack: Vec<OpenClass> = Vec::new();
        let mut depth: i64 = 0;
        let mut resume_at = 0usize;

        for (i, line) in code.iter().enumerate() {
            let line_no = (i + 1) as u32;
            while stack.last().is_some_and(|c| c.end_line < line_no) {
                stack.pop();
            }

            if i >= resume_at && !line.trim().is_empty() {
                if let Some(caps) = class_pattern().captures(line) {
                    let modifiers = caps.get(1).map_or("", |m| m.as_str());
                    let kind = ClassKind::from_keyword(&caps[2]);
                    let name = caps[3].to_string();
                    let header = collect_header(code, i, caps.get(3).map_or(0, |m| m.end()));
                    let (superclass, interfaces) = parse_supertypes(&header, kind);
                    let end_line = resolve_block_end(brace, i);
                    let parent = stack.last().map(|c| c.index);
                    out.classes.push(ClassDecl {
                        name,
                        kind,
                        superclass,
                        interfaces,
                        is_abstract: find_word(modifiers, "abstract", 0).is_some(),
                        start_line: line_no,
                        end_line: end_line.max(line_no),
                        methods: Vec::new(),
                        fields: Vec::new(),
                        parent,
                    });
                    stack.push(OpenClass {
                        index: out.classes.len() - 1,
                        body_depth: depth + 1,
                        end_line: end_line.max(line_no),
                    });
                } else if stack.is_empty() {
                    if let Some(caps) = package_pattern().captures(line) {
                        out.package = Some(caps[1].to_string());
                    } else if let Some(caps) = import_pattern().captures(line) {
                        out.imports.push(ImportDecl {
                            path: caps[2].split_whitespace().collect::<String>(),
                            line: line_no,
                            is_static: caps.get(1).is_some(),
                            is_wildcard: caps.get(3).is_some(),
                        });
                    }
                } else if let Some(top) = stack.last() {
                    if depth == top.body_depth {
                        let class_index = top.index;
                        let class_name = out.classes[class_index].name.clone();
                        let class_kind = out.classes[class_index].kind;
                        if let Some((method, last_index)) =
                            match_method(code, brace, i, &class_name, class_kind, options)
                        {
                            resume_at = last_index + 1;
                            out.classes[class_index].methods.push(method);
                        } else if let Some(field) = match_field(line, line_no, class_kind) {
                            out.classes[class_index].fields.push(field);
                        }
                    }
                }
            }

            depth += brace_delta(line);
        }

        out
    }

    /// Innermost class whose range contains `line`
    pub fn class_at(&self, line: u32) -> Option<&ClassDecl> {
        self.classes
            .iter()
            .filter(|c| c.contains_line(line))
            .min_by_key(|c| c.line_count())
    }

    /// Method (with its class) whose range contains `line`
    pub fn method_at(&self, line: u32) -> Option<(&ClassDecl, &MethodDecl)> {
        self.methods()
            .filter(|(_, m)| m.contains_line(line))
            .min_by_key(|(_, m)| m.line_count())
    }

    /// Every method of every class, in declaration order
    pub fn methods(&self) -> impl Iterator<Item = (&ClassDecl, &MethodDecl)> {
        self.classes
            .iter()
            .flat_map(|c| c.methods.iter().map(move |m| (c, m)))
    }

    pub fn class_named(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Dotted name of a class within its file (`Outer.Inner`)
    pub fn nested_name(&self, index: usize) -> String {
        let mut parts = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            match self.classes.get(i) {
                Some(c) => {
                    parts.push(c.name.as_str());
                    current = c.parent;
                }
                None => break,
            }
        }
        parts.reverse();
        parts.join(".")
    }

    /// Fully-qualified names of every declared type
    pub fn qualified_names(&self) -> Vec<String> {
        (0..self.classes.len())
            .map(|i| match &self.package {
                Some(pkg) => format!("{}.{}", pkg, self.nested_name(i)),
                None => self.nested_name(i),
            })
            .collect()
    }

    /// Names of the top-level types declared in the file
    pub fn top_level_names(&self) -> impl Iterator<Item = &str> {
        self.classes
            .iter()
            .filter(|c| c.parent.is_none())
            .map(|c| c.name.as_str())
    }
}

/// Text of a type header from after the name up to its opening brace
fn collect_header(code: &[String], start: usize, name_end: usize) -> String {
    let mut header = String::new();
    for (offset, line) in code.iter().enumerate().skip(start).take(8) {
        let text = if offset == start {
            line.get(name_end..).unwrap_or("")
        } else {
            line.as_str()
        };
        if let Some(pos) = text.find(['{', ';']) {
            header.push_str(&text[..pos]);
            return header;
        }
        header.push_str(text);
        header.push(' ');
    }
    header
}

/// Remove `<...>` generic arguments, including nested ones
pub fn strip_generics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Split on `sep` outside of `<>`, `()` and `[]` nesting
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            _ if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn type_list(segment: &str) -> Vec<String> {
    segment
        .split(',')
        .map(|t| strip_annotations(t).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_supertypes(header: &str, kind: ClassKind) -> (Option<String>, Vec<String>) {
    let flat = strip_generics(header);
    // Record components sit in parentheses before the clauses
    let flat = match kind {
        ClassKind::Record => match flat.rfind(')') {
            Some(pos) => flat[pos + 1..].to_string(),
            None => flat,
        },
        _ => flat,
    };

    let keyword_positions: Vec<(usize, &str)> = ["extends", "implements", "permits"]
        .iter()
        .filter_map(|kw| find_word(&flat, kw, 0).map(|p| (p, *kw)))
        .collect();

    let clause = |kw: &str| -> Option<&str> {
        let (pos, _) = keyword_positions.iter().find(|(_, k)| *k == kw)?;
        let start = pos + kw.len();
        let end = keyword_positions
            .iter()
            .map(|(p, _)| *p)
            .filter(|p| *p > *pos)
            .min()
            .unwrap_or(flat.len());
        flat.get(start..end)
    };

    let extends = clause("extends").map(type_list).unwrap_or_default();
    let implements = clause("implements").map(type_list).unwrap_or_default();

    match kind {
        ClassKind::Interface => (None, extends),
        _ => (extends.into_iter().next(), implements),
    }
}

/// Strip leading annotations (`@Name` or `@Name(...)`) from a declaration fragment
fn strip_annotations(text: &str) -> &str {
    let mut rest = text.trim_start();
    while let Some(after_at) = rest.strip_prefix('@') {
        let name_len = after_at
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$' || c == '.'))
            .unwrap_or(after_at.len());
        let mut tail = after_at[name_len..].trim_start();
        if tail.starts_with('(') {
            let mut depth = 0i32;
            let mut close = tail.len();
            for (i, c) in tail.char_indices() {
                match c {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            close = i + 1;
                            break;
                        }
                    }
                    _ => {}
                }
            }
            tail = &tail[close..];
        }
        rest = tail.trim_start();
    }
    rest
}

/// Parse the parenthesized parameter list of a signature.
///
/// Accepts either a full signature (`void f(int a, Map<K, V> b)`) or the bare
/// list. Commas inside generic arguments and annotations do not split.
pub fn parse_parameters(signature: &str) -> Vec<Parameter> {
    let list = match signature.find('(') {
        Some(open) => {
            let mut depth = 0i32;
            let mut close = signature.len();
            for (i, c) in signature[open..].char_indices() {
                match c {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            close = open + i;
                            break;
                        }
                    }
                    _ => {}
                }
            }
            &signature[open + 1..close]
        }
        None => signature,
    };
    parse_parameter_list(list)
}

/// Parse a bare parameter list (the text between the parentheses)
fn parse_parameter_list(list: &str) -> Vec<Parameter> {
    split_top_level(list, ',')
        .into_iter()
        .filter_map(|raw| {
            let mut text = strip_annotations(raw);
            while let Some(rest) = text.strip_prefix("final") {
                if !rest.starts_with(char::is_whitespace) {
                    break;
                }
                text = strip_annotations(rest);
            }
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            let split_at = text
                .rfind(|c: char| c.is_whitespace() || c == '.')
                .map(|p| p + 1)
                .unwrap_or(0);
            let name = text[split_at..].trim().to_string();
            let type_name = text[..split_at].trim().to_string();
            Some(Parameter { type_name, name })
        })
        .collect()
}

#[derive(Clone, Copy)]
enum Terminator {
    Body(usize),
    Semicolon(usize),
}

/// Collect the parameter text starting at the `(` at byte `open` of line
/// `start`, then find whether a body `{` or a `;` follows the closing paren.
fn scan_signature(code: &[String], start: usize, open: usize) -> (String, Option<Terminator>) {
    let mut params = String::new();
    let mut depth = 0i32;
    let mut closed = false;

    for (index, line) in code.iter().enumerate().skip(start).take(16) {
        let text = if index == start {
            line.get(open..).unwrap_or("")
        } else {
            line.as_str()
        };
        for c in text.chars() {
            if !closed {
                match c {
                    '(' => {
                        depth += 1;
                        if depth == 1 {
                            continue;
                        }
                    }
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            closed = true;
                            continue;
                        }
                    }
                    _ => {}
                }
                params.push(c);
            } else {
                match c {
                    '{' => return (params, Some(Terminator::Body(index))),
                    ';' => return (params, Some(Terminator::Semicolon(index))),
                    _ => {}
                }
            }
        }
        if !closed {
            params.push(' ');
        }
    }
    (params, None)
}

fn match_method(
    code: &[String],
    brace: &[String],
    index: usize,
    class_name: &str,
    class_kind: ClassKind,
    options: &ScanOptions,
) -> Option<(MethodDecl, usize)> {
    let line = &code[index];

    let (name, open, prefix, is_constructor) = match constructor_pattern().captures(line) {
        Some(caps) if &caps[1] == class_name => {
            let whole = caps.get(0)?;
            (caps[1].to_string(), whole.end() - 1, "", true)
        }
        _ => {
            let caps = method_pattern().captures(line)?;
            let type_name = caps.get(2)?.as_str();
            let name = caps.get(3)?.as_str();
            let base_type = type_name.split(['<', '[', ' ']).next().unwrap_or(type_name);
            if NON_TYPE_WORDS.contains(&base_type) || is_keyword(name) {
                return None;
            }
            let whole = caps.get(0)?;
            (
                name.to_string(),
                whole.end() - 1,
                caps.get(1).map_or("", |m| m.as_str()),
                false,
            )
        }
    };

    let (param_text, terminator) = scan_signature(code, index, open);
    let parameters = parse_parameter_list(&param_text);
    let signature_line = (index + 1) as u32;

    let (body_start_line, end_line, last_index) = match terminator {
        Some(Terminator::Semicolon(at)) => (None, (at + 1) as u32, at),
        Some(Terminator::Body(at)) => {
            let end = resolve_method_body(brace, index, options.method_body_cap);
            (Some((at + 1) as u32), end.max(signature_line), at)
        }
        None => {
            let end = resolve_method_body(brace, index, options.method_body_cap);
            (None, end.max(signature_line), index)
        }
    };

    let in_interface = matches!(class_kind, ClassKind::Interface | ClassKind::Annotation);
    let is_abstract = find_word(prefix, "abstract", 0).is_some()
        || (body_start_line.is_none() && in_interface)
        || matches!(terminator, Some(Terminator::Semicolon(_)));

    Some((
        MethodDecl {
            name,
            signature_line,
            body_start_line,
            end_line,
            parameters,
            is_constructor,
            is_abstract,
            is_static: find_word(prefix, "static", 0).is_some(),
        },
        last_index,
    ))
}

fn match_field(line: &str, line_no: u32, class_kind: ClassKind) -> Option<FieldDecl> {
    let caps = field_pattern().captures(line)?;
    let modifiers = caps.get(1).map_or("", |m| m.as_str());
    let type_name = caps.get(2)?.as_str();
    let name = caps.get(3)?.as_str();
    let base_type = type_name.split(['<', '[', ' ']).next().unwrap_or(type_name);
    if NON_TYPE_WORDS.contains(&base_type) || is_keyword(name) {
        return None;
    }
    let implicit_constant = matches!(class_kind, ClassKind::Interface | ClassKind::Annotation);
    Some(FieldDecl {
        name: name.to_string(),
        type_name: type_name.split_whitespace().collect::<String>(),
        line: line_no,
        is_static: implicit_constant || find_word(modifiers, "static", 0).is_some(),
        is_final: implicit_constant || find_word(modifiers, "final", 0).is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"package com.acme.orders;

import java.util.List;
import java.util.*;
import static org.junit.Assert.assertEquals;

/**
 * Order service { not a brace }
 */
public abstract class OrderService extends BaseService<Order> implements Auditable, Closeable {
    private static final int LIMIT = 10;
    private final List<Order> orders = new ArrayList<>();
    protected String name;

    public OrderService(String name) {
        this.name = name;
    }

    @Override
    public <T extends Order> List<T> find(Map<String, Integer> filter,
                                         @Nullable String sort, int... ids) {
        if (filter == null) {
            return List.of();
        }
        return List.of();
    }

    protected abstract void audit(String event);

    static class Inner implements Runnable {
        int count;
        public void run() {
            count++;
        }
    }
}
"#;

    fn sample() -> JavaStructure {
        SourceFile::parse("OrderService.java", SAMPLE).structure().clone()
    }

    #[test]
    fn test_package_and_imports() {
        let s = sample();
        assert_eq!(s.package.as_deref(), Some("com.acme.orders"));
        assert_eq!(s.imports.len(), 3);
        assert_eq!(s.imports[0].simple_name(), "List");
        assert!(s.imports[1].is_wildcard);
        assert_eq!(s.imports[1].path, "java.util");
        assert!(s.imports[2].is_static);
        assert_eq!(s.imports[2].type_path(), "org.junit.Assert");
    }

    #[test]
    fn test_class_header() {
        let s = sample();
        let c = &s.classes[0];
        assert_eq!(c.name, "OrderService");
        assert_eq!(c.kind, ClassKind::Class);
        assert!(c.is_abstract);
        assert_eq!(c.superclass.as_deref(), Some("BaseService"));
        assert_eq!(c.interfaces, vec!["Auditable", "Closeable"]);
        assert_eq!(c.start_line, 10);
        assert_eq!(c.end_line, 36);
    }

    #[test]
    fn test_members_at_class_depth_only() {
        let s = sample();
        let c = &s.classes[0];
        let names: Vec<_> = c.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["OrderService", "find", "audit"]);
        assert!(c.methods[0].is_constructor);

        let find = &c.methods[1];
        assert_eq!(find.signature_line, 20);
        assert_eq!(find.body_start_line, Some(21));
        assert_eq!(find.end_line, 26);
        assert_eq!(find.parameters.len(), 3);
        assert_eq!(find.parameters[0].type_name, "Map<String, Integer>");
        assert_eq!(find.parameters[1].name, "sort");

        let audit = &c.methods[2];
        assert!(audit.is_abstract);
        assert!(!audit.has_body());

        let fields: Vec<_> = c.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["LIMIT", "orders", "name"]);
        assert!(c.fields[0].is_constant());
        assert!(!c.fields[1].is_constant());
    }

    #[test]
    fn test_nested_class() {
        let s = sample();
        let inner = s.class_named("Inner").expect("inner class");
        assert_eq!(inner.parent, Some(0));
        assert_eq!(inner.interfaces, vec!["Runnable"]);
        assert_eq!(inner.methods.len(), 1);
        assert_eq!(inner.fields[0].name, "count");
        assert_eq!(s.nested_name(1), "OrderService.Inner");
        assert_eq!(s.qualified_names()[1], "com.acme.orders.OrderService.Inner");
        assert_eq!(s.class_at(33).map(|c| c.name.as_str()), Some("Inner"));
        assert_eq!(s.method_at(33).map(|(_, m)| m.name.as_str()), Some("run"));
    }

    #[test]
    fn test_interface_extends_list() {
        let f = SourceFile::parse(
            "Repo.java",
            "public interface Repo<T> extends Reader<T>, Writer<T> {\n    T load(long id);\n    int SIZE = 3;\n}\n",
        );
        let c = &f.structure().classes[0];
        assert_eq!(c.kind, ClassKind::Interface);
        assert_eq!(c.superclass, None);
        assert_eq!(c.interfaces, vec!["Reader", "Writer"]);
        assert!(c.methods[0].is_abstract);
        assert!(c.fields[0].is_constant());
    }

    #[test]
    fn test_record_and_enum() {
        let f = SourceFile::parse(
            "Shapes.java",
            "record Point(int x, int y) implements Shape {}\nenum Color {\n    RED, GREEN;\n    String label() { return name(); }\n}\n",
        );
        let s = f.structure();
        assert_eq!(s.classes[0].kind, ClassKind::Record);
        assert_eq!(s.classes[0].interfaces, vec!["Shape"]);
        assert_eq!(s.classes[1].kind, ClassKind::Enum);
        assert_eq!(s.classes[1].methods.len(), 1);
        assert!(s.classes[1].fields.is_empty());
    }

    #[test]
    fn test_parse_parameters() {
        assert!(parse_parameters("void f()").is_empty());
        let params = parse_parameters(
            "void f(final int a, @Ann(x = \"a,b\") Map<K, List<V>> m, String... rest)",
        );
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].type_name, "int");
        assert_eq!(params[1].type_name, "Map<K, List<V>>");
        assert_eq!(params[2].name, "rest");
        assert_eq!(params[2].type_name, "String...");
    }

    #[test]
    fn test_strip_generics() {
        assert_eq!(strip_generics("Map<String, List<Integer>> m"), "Map m");
    }
}
