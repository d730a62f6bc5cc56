//! Fenced code block extraction from model replies.
//!
//! A reply is prose with an embedded block opened by a triple-backtick
//! marker tagged with the code type and closed by the next triple-backtick
//! line. Extraction returns the text strictly between the delimiters.

use crate::error::{HerdrError, Result};

/// Extract the first fenced block tagged with `code_type` from `content`.
///
/// A missing opening tag or a missing closing fence is an extraction error,
/// never a silently malformed slice.
pub fn extract_code(content: &str, code_type: &str) -> Result<String> {
    let open_tag = format!("```{}\n", code_type);

    let start_pos = content.find(&open_tag).ok_or_else(|| HerdrError::Extraction {
        code_type: code_type.to_string(),
    })?;

    let code_start = start_pos + open_tag.len();
    let remaining = &content[code_start..];

    let code_end = remaining.find("\n```").ok_or_else(|| HerdrError::Extraction {
        code_type: code_type.to_string(),
    })?;

    Ok(remaining[..code_end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic() {
        let reply = "Here is the script:\n\n```python\nprint(1)\n```\n\nEnjoy!";
        let code = extract_code(reply, "python").unwrap();
        assert_eq!(code, "print(1)");
    }

    #[test]
    fn test_extract_multiline() {
        let reply = "```python\nimport os\n\nprint(os.getcwd())\n```";
        let code = extract_code(reply, "python").unwrap();
        assert_eq!(code, "import os\n\nprint(os.getcwd())");
    }

    #[test]
    fn test_extract_first_of_several() {
        let reply = "```python\nfirst\n```\n\nand then\n\n```python\nsecond\n```";
        let code = extract_code(reply, "python").unwrap();
        assert_eq!(code, "first");
    }

    #[test]
    fn test_extract_other_code_type() {
        let reply = "```latex\n\\documentclass{article}\n```";
        let code = extract_code(reply, "latex").unwrap();
        assert_eq!(code, "\\documentclass{article}");
    }

    #[test]
    fn test_extract_ignores_wrong_tag() {
        let reply = "```html\n<p>hi</p>\n```";
        let result = extract_code(reply, "python");
        assert!(matches!(
            result,
            Err(HerdrError::Extraction { code_type }) if code_type == "python"
        ));
    }

    #[test]
    fn test_extract_missing_opening_tag() {
        let result = extract_code("no code here at all", "python");
        assert!(matches!(result, Err(HerdrError::Extraction { .. })));
    }

    #[test]
    fn test_extract_missing_closing_fence() {
        let reply = "```python\nprint(1)";
        let result = extract_code(reply, "python");
        assert!(matches!(result, Err(HerdrError::Extraction { .. })));
    }

    #[test]
    fn test_extract_empty_block() {
        let reply = "```python\n\n```";
        let code = extract_code(reply, "python").unwrap();
        assert_eq!(code, "");
    }

    #[test]
    fn test_extract_keeps_inner_whitespace() {
        let reply = "```python\n  indented = True\n```";
        let code = extract_code(reply, "python").unwrap();
        assert_eq!(code, "  indented = True");
    }

    #[test]
    fn test_extract_error_message_names_tag() {
        let err = extract_code("prose only", "html").unwrap_err();
        assert!(err.to_string().contains("```html"));
    }
}
