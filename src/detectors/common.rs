//! Helpers shared by the structural detectors

use crate::models::CodePointer;
use crate::scanner::{find_word, ClassDecl, MethodDecl, SourceFile};

/// Pointer spanning a method from signature to closing brace
pub fn method_pointer(file: &SourceFile, class: &ClassDecl, method: &MethodDecl) -> CodePointer {
    let start = method.signature_line;
    let end = method.end_line.max(start).min(file.line_count() as u32);
    CodePointer::lines(file.path(), start, end.max(start))
        .in_class(class.name.clone())
        .in_member(method.name.clone())
}

/// Pointer spanning a whole class declaration
pub fn class_pointer(file: &SourceFile, class: &ClassDecl) -> CodePointer {
    let start = class.start_line;
    let end = class.end_line.max(start).min(file.line_count() as u32);
    CodePointer::lines(file.path(), start, end.max(start)).in_class(class.name.clone())
}

/// Pointer for a single line, attributed to its enclosing class and method when known
pub fn line_pointer(file: &SourceFile, line: u32) -> CodePointer {
    let structure = file.structure();
    let mut pointer = CodePointer::lines(file.path(), line, line);
    if let Some((class, method)) = structure.method_at(line) {
        pointer = pointer.in_class(class.name.clone()).in_member(method.name.clone());
    } else if let Some(class) = structure.class_at(line) {
        pointer = pointer.in_class(class.name.clone());
    }
    pointer
}

/// Code lines of a method body, from the opening brace line to the closing one
pub fn body_lines<'a>(
    file: &'a SourceFile,
    method: &MethodDecl,
) -> impl Iterator<Item = (usize, &'a str)> + 'a {
    let (start, end) = match method.body_start_line {
        Some(start) => (start, method.end_line),
        None => (1, 0),
    };
    file.code_range(start, end)
}

/// Whether `line` calls `name(` as a whole word
pub fn calls_method(line: &str, name: &str) -> bool {
    let mut from = 0;
    while let Some(pos) = find_word(line, name, from) {
        let after = &line[pos + name.len()..];
        if after.trim_start().starts_with('(') {
            return true;
        }
        from = pos + name.len();
    }
    false
}

/// Byte offsets of every whole-word occurrence of `word`
pub fn word_positions(line: &str, word: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut from = 0;
    while let Some(pos) = find_word(line, word, from) {
        positions.push(pos);
        from = pos + word.len();
    }
    positions
}

/// A brace-delimited statement block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub open_line: u32,
    pub close_line: u32,
    /// Code text strictly between the braces (lines joined with `\n`)
    pub inner_code: String,
    /// Comment text strictly between the braces
    pub inner_comment: String,
}

/// Find the block whose `{` is the first one at or after byte `offset` of
/// line `line_index` (code view), giving up after `cap` lines.
pub fn block_from(
    file: &SourceFile,
    line_index: usize,
    offset: usize,
    cap: usize,
) -> Option<Block> {
    let mut depth = 0usize;
    let mut open_line = None;
    let mut inner_code = String::new();
    let mut inner_comment = String::new();
    let last = (line_index + cap).min(file.line_count());

    for index in line_index..last {
        let code: Vec<char> = file.code(index).chars().collect();
        let comment: Vec<char> = file.comment(index).chars().collect();
        let start = if index == line_index {
            file.code(index)
                .get(..offset)
                .map(|s| s.chars().count())
                .unwrap_or(0)
        } else {
            0
        };
        if open_line.is_some() && index != line_index {
            inner_code.push('\n');
            inner_comment.push('\n');
        }

        for (i, &c) in code.iter().enumerate().skip(start) {
            match c {
                '{' => {
                    depth += 1;
                    if depth == 1 {
                        open_line = Some(index as u32 + 1);
                        continue;
                    }
                }
                '}' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(Block {
                            open_line: open_line.unwrap_or(index as u32 + 1),
                            close_line: index as u32 + 1,
                            inner_code,
                            inner_comment,
                        });
                    }
                }
                _ => {}
            }
            if depth > 0 {
                inner_code.push(c);
                inner_comment.push(comment.get(i).copied().unwrap_or(' '));
            }
        }
    }
    None
}

/// Exception-like type names are never lazy or data classes
pub fn is_exception_type(name: &str) -> bool {
    name.ends_with("Exception") || name.ends_with("Error") || name == "Throwable"
}
