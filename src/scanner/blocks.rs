//! Brace-depth block resolution

/// Default fallback span for a method body whose closing brace is never found
pub const DEFAULT_METHOD_BODY_CAP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceState {
    Outside,
    Inside,
}

/// Resolve the 1-based end line of the block opened at or after `signature_index`.
///
/// Brace-depth state machine: the first `{` at or after the signature moves
/// OUTSIDE -> INSIDE with depth 1, every further `{` increments, every `}`
/// decrements, and the line on which depth returns to 0 is the end.
///
/// If no closing brace is found before end of file the result is
/// `min(signature_line + cap, total_lines)`. This silently truncates
/// malformed input, so callers choose `cap` deliberately.
///
/// Pass brace-view lines: literal contents are blanked, but comment lines
/// still count for brace tracking.
pub fn resolve_method_body<S: AsRef<str>>(lines: &[S], signature_index: usize, cap: usize) -> u32 {
    let total = lines.len();
    let mut state = BraceState::Outside;
    let mut depth: usize = 0;

    for (index, line) in lines.iter().enumerate().skip(signature_index) {
        for ch in line.as_ref().chars() {
            match (state, ch) {
                (BraceState::Outside, '{') => {
                    state = BraceState::Inside;
                    depth = 1;
                }
                (BraceState::Inside, '{') => depth += 1,
                (BraceState::Inside, '}') => {
                    depth -= 1;
                    if depth == 0 {
                        return (index + 1) as u32;
                    }
                }
                _ => {}
            }
        }
    }

    let signature_line = signature_index + 1;
    signature_line.saturating_add(cap).min(total) as u32
}

/// Resolve a block end with the whole rest of the file as the fallback
pub fn resolve_block_end<S: AsRef<str>>(lines: &[S], start_index: usize) -> u32 {
    resolve_method_body(lines, start_index, lines.len())
}

/// Net brace delta of one code line
pub fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method_of(len: usize) -> Vec<String> {
        let mut lines = vec!["void run() {".to_string()];
        for i in 0..len.saturating_sub(2) {
            lines.push(format!("    step{}();", i));
        }
        lines.push("}".to_string());
        lines
    }

    #[test]
    fn test_simple_method_end() {
        let lines = vec!["void a() {", "  int x = 1;", "}", "void b() {}"];
        assert_eq!(resolve_method_body(&lines, 0, DEFAULT_METHOD_BODY_CAP), 3);
        assert_eq!(resolve_method_body(&lines, 3, DEFAULT_METHOD_BODY_CAP), 4);
    }

    #[test]
    fn test_nested_blocks() {
        let lines = vec![
            "void a()",
            "{",
            "  if (x) {",
            "    while (y) { z(); }",
            "  }",
            "}",
        ];
        assert_eq!(resolve_method_body(&lines, 0, 50), 6);
    }

    #[test]
    fn test_sixty_line_method() {
        let lines = method_of(60);
        assert_eq!(resolve_method_body(&lines, 0, DEFAULT_METHOD_BODY_CAP), 60);
    }

    #[test]
    fn test_unterminated_falls_back_to_cap() {
        let mut lines = vec!["void a() {".to_string()];
        lines.extend((0..100).map(|i| format!("x{};", i)));
        assert_eq!(resolve_method_body(&lines, 0, 20), 21);
        // Cap never exceeds the file
        assert_eq!(resolve_method_body(&lines[..10], 0, 20), 10);
    }

    #[test]
    fn test_closing_brace_before_open_is_ignored() {
        let lines = vec!["} void a() {", "}"];
        assert_eq!(resolve_method_body(&lines, 0, 50), 2);
    }

    #[test]
    fn test_brace_delta() {
        assert_eq!(brace_delta("if (a) { b(); } else {"), 1);
        assert_eq!(brace_delta("}}"), -2);
    }
}
