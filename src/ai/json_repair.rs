//! JSON Repair
//!
//! LLM output is asked to be a bare JSON object but frequently arrives
//! wrapped in markdown fences, surrounded by prose, or truncated at the
//! token ceiling. This module extracts and repairs it before the strict
//! schema decode runs.

use serde_json::Value;
use tracing::debug;

use crate::types::{DocuError, Result};

/// Extract and parse JSON from an LLM response.
///
/// Primary entry point for parsing structured completion output. Handles
/// code fences, embedded JSON, trailing commas, and unbalanced brackets.
pub fn extract_json_from_response(content: &str) -> Result<Value> {
    JsonRepairer::default().parse_or_repair(content)
}

/// Repair strategies for malformed LLM JSON
#[derive(Default)]
pub struct JsonRepairer;

impl JsonRepairer {
    /// Parse JSON, attempting repair if the direct parse fails
    pub fn parse_or_repair(&self, raw: &str) -> Result<Value> {
        let cleaned = strip_code_fences(raw.trim().trim_start_matches('\u{feff}'));

        if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
            return Ok(value);
        }

        debug!("Direct JSON parse failed, attempting repair");

        // Light repair: trailing commas and missing closers
        let repaired = balance_brackets(&fix_trailing_commas(&cleaned));
        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
            debug!("JSON repaired (commas/brackets)");
            return Ok(value);
        }

        // Last resort: pull the first JSON object/array out of mixed prose
        if let Some(extracted) = extract_embedded(&cleaned) {
            let extracted = balance_brackets(&fix_trailing_commas(&extracted));
            if let Ok(value) = serde_json::from_str::<Value>(&extracted) {
                debug!("JSON extracted from mixed content");
                return Ok(value);
            }
        }

        Err(DocuError::LlmApi(format!(
            "Failed to parse or repair JSON response. Preview: {}...",
            cleaned.chars().take(160).collect::<String>()
        )))
    }
}

/// Strip ```json ... ``` / ``` ... ``` wrapping
fn strip_code_fences(s: &str) -> String {
    let mut result = s.to_string();

    if result.starts_with("```")
        && let Some(first_newline) = result.find('\n')
    {
        result = result[first_newline + 1..].to_string();
    }

    if result.ends_with("```") {
        result = result[..result.len() - 3].trim_end().to_string();
    }

    result.trim().to_string()
}

/// Drop commas that directly precede a closing bracket/brace
fn fix_trailing_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());

    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == ']' || chars[j] == '}') {
                i += 1;
                continue;
            }
        }
        result.push(chars[i]);
        i += 1;
    }

    result
}

/// Close unterminated strings and append missing closers
fn balance_brackets(s: &str) -> String {
    let mut result = s.to_string();

    let mut braces = 0i32;
    let mut brackets = 0i32;
    let mut in_string = false;
    let mut escape = false;

    for ch in result.chars() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => braces += 1,
            '}' if !in_string => braces -= 1,
            '[' if !in_string => brackets += 1,
            ']' if !in_string => brackets -= 1,
            _ => {}
        }
    }

    if in_string {
        result.push('"');
    }
    for _ in 0..brackets.max(0) {
        result.push(']');
    }
    for _ in 0..braces.max(0) {
        result.push('}');
    }

    result
}

/// Find the first balanced JSON object/array inside surrounding prose
fn extract_embedded(s: &str) -> Option<String> {
    let start = s.find(['{', '['])?;
    let open = s[start..].chars().next()?;
    let close = if open == '{' { '}' } else { ']' };

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape = false;

    for (i, ch) in s[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            c if !in_string && (c == '{' || c == '[') => depth += 1,
            c if !in_string && (c == '}' || c == ']') => {
                depth -= 1;
                if depth == 0 && c == close {
                    return Some(s[start..start + i + 1].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let value = extract_json_from_response(r#"{"key": "value"}"#).unwrap();
        assert_eq!(value["key"], "value");
    }

    #[test]
    fn test_strip_code_fences() {
        let value = extract_json_from_response("```json\n{\"key\": \"value\"}\n```").unwrap();
        assert_eq!(value["key"], "value");
    }

    #[test]
    fn test_fix_trailing_comma() {
        let value =
            extract_json_from_response(r#"{"functions": [{"name": "run"},]}"#).unwrap();
        assert!(value["functions"].is_array());
    }

    #[test]
    fn test_balance_missing_closers() {
        let value = extract_json_from_response(r#"{"functions": [{"name": "run"}"#).unwrap();
        assert!(value["functions"].is_array());
    }

    #[test]
    fn test_extract_from_prose() {
        let input = "Here is the analysis:\n{\"summary\": \"ok\"}\nHope this helps!";
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value["summary"], "ok");
    }

    #[test]
    fn test_unrepairable_input_errors() {
        let result = extract_json_from_response("no json here at all");
        assert!(matches!(result, Err(DocuError::LlmApi(_))));
    }
}
