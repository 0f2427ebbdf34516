//! Line-oriented views of a source file
//!
//! A `SourceFile` keeps four aligned views of every line:
//! - raw text as read from disk
//! - brace: string/char literal contents blanked, comments kept
//! - code: comment text and string/char literal contents blanked out
//! - comments: only comment text kept, everything else blanked
//!
//! Blanking replaces characters with spaces so columns stay aligned across
//! views. Block-comment and text-block state carries across lines.

use super::java::JavaStructure;
use super::ScanOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Carry {
    Code,
    BlockComment,
    TextBlock,
}

struct MaskedLine {
    brace: String,
    code: String,
    comment: String,
}

/// Mask one line into its brace, code and comment views, updating the carried state
fn mask_line(raw: &str, carry: &mut Carry) -> MaskedLine {
    let chars: Vec<char> = raw.chars().collect();
    let mut brace = String::with_capacity(raw.len());
    let mut code = String::with_capacity(raw.len());
    let mut comment = String::with_capacity(raw.len());
    let mut i = 0;

    let blank = |c: char| if c == '\t' { '\t' } else { ' ' };

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match *carry {
            Carry::BlockComment => {
                if c == '*' && next == Some('/') {
                    *carry = Carry::Code;
                    brace.push_str("*/");
                    code.push_str("  ");
                    comment.push_str("*/");
                    i += 2;
                    continue;
                }
                brace.push(c);
                code.push(blank(c));
                comment.push(c);
            }
            Carry::TextBlock => {
                if c == '"' && next == Some('"') && chars.get(i + 2) == Some(&'"') {
                    *carry = Carry::Code;
                    brace.push_str("\"\"\"");
                    code.push_str("\"\"\"");
                    comment.push_str("   ");
                    i += 3;
                    continue;
                }
                brace.push(blank(c));
                code.push(blank(c));
                comment.push(blank(c));
            }
            Carry::Code => {
                if c == '/' && next == Some('/') {
                    for &rest in &chars[i..] {
                        brace.push(rest);
                        code.push(blank(rest));
                        comment.push(rest);
                    }
                    break;
                }
                if c == '/' && next == Some('*') {
                    *carry = Carry::BlockComment;
                    brace.push_str("/*");
                    code.push_str("  ");
                    comment.push_str("/*");
                    i += 2;
                    continue;
                }
                if c == '"' && next == Some('"') && chars.get(i + 2) == Some(&'"') {
                    *carry = Carry::TextBlock;
                    brace.push_str("\"\"\"");
                    code.push_str("\"\"\"");
                    comment.push_str("   ");
                    i += 3;
                    continue;
                }
                if c == '"' || c == '\'' {
                    // Literal: keep the delimiters, blank the contents
                    brace.push(c);
                    code.push(c);
                    comment.push(' ');
                    i += 1;
                    while i < chars.len() {
                        let lc = chars[i];
                        if lc == '\\' {
                            brace.push(' ');
                            code.push(' ');
                            comment.push(' ');
                            if i + 1 < chars.len() {
                                brace.push(' ');
                                code.push(' ');
                                comment.push(' ');
                            }
                            i += 2;
                            continue;
                        }
                        if lc == c {
                            brace.push(c);
                            code.push(c);
                            comment.push(' ');
                            i += 1;
                            break;
                        }
                        brace.push(blank(lc));
                        code.push(blank(lc));
                        comment.push(blank(lc));
                        i += 1;
                    }
                    continue;
                }
                brace.push(c);
                code.push(c);
                comment.push(blank(c));
            }
        }
        i += 1;
    }

    MaskedLine {
        brace,
        code,
        comment,
    }
}

/// A parsed source file with aligned line views and its lexical structure
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: String,
    raw: Vec<String>,
    brace: Vec<String>,
    code: Vec<String>,
    comments: Vec<String>,
    structure: JavaStructure,
}

impl SourceFile {
    /// Parse with default scan options
    pub fn parse(path: impl Into<String>, text: &str) -> Self {
        Self::parse_with(path, text, &ScanOptions::default())
    }

    pub fn parse_with(path: impl Into<String>, text: &str, options: &ScanOptions) -> Self {
        let mut carry = Carry::Code;
        let raw: Vec<String> = text.lines().map(|l| l.to_string()).collect();
        let mut brace = Vec::with_capacity(raw.len());
        let mut code = Vec::with_capacity(raw.len());
        let mut comments = Vec::with_capacity(raw.len());

        for line in &raw {
            let masked = mask_line(line, &mut carry);
            brace.push(masked.brace);
            code.push(masked.code);
            comments.push(masked.comment);
        }

        let mut file = Self {
            path: path.into(),
            raw,
            brace,
            code,
            comments,
            structure: JavaStructure::default(),
        };
        file.structure = JavaStructure::extract(&file, options);
        file
    }

    /// Relative path of the file within the project
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn line_count(&self) -> usize {
        self.raw.len()
    }

    pub fn raw_lines(&self) -> &[String] {
        &self.raw
    }

    /// Lines for brace tracking: literal contents blanked, comments kept
    pub fn brace_lines(&self) -> &[String] {
        &self.brace
    }

    pub fn code_lines(&self) -> &[String] {
        &self.code
    }

    /// Raw text of a line (0-based index)
    pub fn raw(&self, index: usize) -> &str {
        self.raw.get(index).map(|s| s.as_str()).unwrap_or("")
    }

    /// Code view of a line (0-based index), comments and literal contents blanked
    pub fn code(&self, index: usize) -> &str {
        self.code.get(index).map(|s| s.as_str()).unwrap_or("")
    }

    /// Comment text of a line (0-based index), everything else blanked
    pub fn comment(&self, index: usize) -> &str {
        self.comments.get(index).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn is_blank(&self, index: usize) -> bool {
        self.raw(index).trim().is_empty()
    }

    /// A line with comment text but no code
    pub fn is_comment_line(&self, index: usize) -> bool {
        !self.is_blank(index) && self.code(index).trim().is_empty()
    }

    /// A line carrying code (not blank, not comment-only)
    pub fn is_code_line(&self, index: usize) -> bool {
        !self.code(index).trim().is_empty()
    }

    pub fn code_line_count(&self) -> usize {
        (0..self.line_count()).filter(|&i| self.is_code_line(i)).count()
    }

    pub fn comment_line_count(&self) -> usize {
        (0..self.line_count())
            .filter(|&i| self.is_comment_line(i))
            .count()
    }

    pub fn blank_line_count(&self) -> usize {
        (0..self.line_count()).filter(|&i| self.is_blank(i)).count()
    }

    pub fn structure(&self) -> &JavaStructure {
        &self.structure
    }

    /// Code lines `start_line..=end_line` (1-based, clamped) with their 0-based index
    pub fn code_range(
        &self,
        start_line: u32,
        end_line: u32,
    ) -> impl Iterator<Item = (usize, &str)> {
        let start = (start_line.max(1) - 1) as usize;
        let end = (end_line as usize).min(self.line_count());
        (start..end.max(start)).map(move |i| (i, self.code(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment_is_blanked_in_code_view() {
        let f = SourceFile::parse("A.java", "int x = 1; // note {\n");
        assert_eq!(f.code(0).trim_end(), "int x = 1;");
        assert!(f.comment(0).contains("// note {"));
        assert!(f.brace_lines()[0].contains("// note {"));
        assert!(!f.is_comment_line(0));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let f = SourceFile::parse("A.java", "/* start\n still { comment\n end */ int y;\n");
        assert!(f.is_comment_line(0));
        assert!(f.is_comment_line(1));
        assert_eq!(f.code(2).trim(), "int y;");
        assert_eq!(f.comment_line_count(), 2);
    }

    #[test]
    fn test_string_contents_are_masked() {
        let f = SourceFile::parse("A.java", "String s = \"a { // b\";\n");
        let code = f.code(0);
        assert!(!code.contains('{'));
        assert!(!code.contains("//"));
        assert!(!f.brace_lines()[0].contains('{'));
        assert!(code.contains("String s = \""));
        assert_eq!(code.chars().count(), f.raw(0).chars().count());
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let f = SourceFile::parse("A.java", "String s = \"say \\\"hi\\\" {\"; int z;\n");
        assert!(f.code(0).contains("int z;"));
        assert!(!f.code(0).contains('{'));
    }

    #[test]
    fn test_text_block_is_masked() {
        let f = SourceFile::parse("A.java", "String q = \"\"\"\n  select { }\n  \"\"\";\nint k;\n");
        assert!(!f.code(1).contains('{'));
        assert_eq!(f.code(3).trim(), "int k;");
    }

    #[test]
    fn test_line_counts() {
        let f = SourceFile::parse("A.java", "class A {\n\n  // c\n  int x;\n}\n");
        assert_eq!(f.line_count(), 5);
        assert_eq!(f.blank_line_count(), 1);
        assert_eq!(f.comment_line_count(), 1);
        assert_eq!(f.code_line_count(), 3);
    }
}
