//! JSON reporter
//!
//! Pretty-printed JSON for piping to jq or further processing.

use anyhow::Result;
use serde::Serialize;

pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodeAnalysisResult, FileAnalysis};

    #[test]
    fn test_json_render_valid() {
        let result = CodeAnalysisResult {
            workspace_id: "abc".into(),
            files: vec![FileAnalysis::errored("A.java", "failed to read A.java")],
            errored_file_count: 1,
            ..Default::default()
        };
        let json_str = render(&result).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["workspace_id"], "abc");
        assert_eq!(parsed["files"][0]["error"], "failed to read A.java");
        assert_eq!(parsed["cancelled"], false);
    }

    #[test]
    fn test_error_field_omitted_when_absent() {
        let mut file = FileAnalysis::errored("A.java", "x");
        file.error = None;
        let json_str = render(&file).expect("render JSON");
        assert!(!json_str.contains("\"error\""));
    }
}
