//! Cleaning and decoding of raw model output.
//!
//! Models wrap answers in ways the callers do not want: `<think>` blocks
//! from reasoning models and Markdown code fences around JSON. These
//! helpers strip both before the output is used.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use notewise_core::{Error, Result};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n?(.*?)\n?\s*```\s*$").expect("valid fence pattern")
});

/// Remove `<think>...</think>` blocks. An unclosed block swallows the rest.
pub fn strip_thinking(response: &str) -> String {
    if !response.contains("<think>") {
        return response.to_string();
    }

    let mut answer = String::new();
    let mut rest = response;
    while let Some(start) = rest.find("<think>") {
        answer.push_str(&rest[..start]);
        let after_open = &rest[start + "<think>".len()..];
        match after_open.find("</think>") {
            Some(end) => rest = &after_open[end + "</think>".len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    answer.push_str(rest);
    answer.trim_start().to_string()
}

/// Unwrap a response held in a single Markdown code fence.
pub fn strip_code_fences(response: &str) -> &str {
    match CODE_FENCE.captures(response).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => response.trim(),
    }
}

/// Decode a JSON response into `T` after removing thinking blocks and fences.
pub fn parse_json<T: DeserializeOwned>(response: &str) -> Result<T> {
    let cleaned = strip_thinking(response);
    let body = strip_code_fences(&cleaned);
    if body.is_empty() {
        return Err(Error::Serialization("Empty model response".to_string()));
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_strip_thinking_removes_blocks() {
        assert_eq!(
            strip_thinking("<think>hmm</think>\nHello there."),
            "Hello there."
        );
        assert_eq!(strip_thinking("a<think>x</think>b<think>y</think>c"), "abc");
    }

    #[test]
    fn test_strip_thinking_unclosed_block() {
        assert_eq!(strip_thinking("Answer<think>still going"), "Answer");
    }

    #[test]
    fn test_strip_thinking_keeps_plain_text() {
        assert_eq!(strip_thinking("line one\nline two\n"), "line one\nline two\n");
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n[1]\n```\n"), "[1]");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_json_accepts_fenced_and_bare() {
        let fenced: Value = parse_json("```json\n{\"tasks\": []}\n```").unwrap();
        assert_eq!(fenced, json!({"tasks": []}));

        let bare: Value = parse_json("<think>ok</think>{\"parsed\": false}").unwrap();
        assert_eq!(bare, json!({"parsed": false}));
    }

    #[test]
    fn test_parse_json_rejects_prose_and_empty() {
        assert!(matches!(
            parse_json::<Value>("Sure! Here are the tasks."),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            parse_json::<Value>("   "),
            Err(Error::Serialization(_))
        ));
    }
}
