//! Analysis Response Decoding
//!
//! Strict, schema-validated decode of the per-file analysis JSON. Required
//! fields must be present with the right types and bounded enum values;
//! anything else is an error that triggers the analyzer's documented stub
//! fallback. A partially-typed object never propagates downstream.
//!
//! Optional detail (functions, classes, constants, dependencies) degrades
//! element-wise: malformed entries are skipped, the analysis survives.

use serde_json::Value;

use crate::types::{
    ClassInfo, DocuError, FileAnalysis, FunctionComplexity, FunctionInfo, Importance,
    ParameterInfo, Result, ReturnInfo, json_string, json_string_array, json_string_or,
};

/// Decode a repaired JSON value into a validated `FileAnalysis`.
///
/// `file_path` and `cache_key` come from the pipeline, not the model - the
/// model is never trusted to key its own output.
pub fn parse_file_analysis(file_path: &str, cache_key: String, value: &Value) -> Result<FileAnalysis> {
    if !value.is_object() {
        return Err(parse_error(file_path, "response is not a JSON object"));
    }

    let summary = json_string(value, "summary")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| parse_error(file_path, "missing or empty 'summary'"))?;

    let importance_raw = json_string(value, "importance")
        .ok_or_else(|| parse_error(file_path, "missing 'importance'"))?;
    let importance = parse_importance_strict(&importance_raw)
        .ok_or_else(|| parse_error(file_path, &format!("invalid importance '{}'", importance_raw)))?;

    let complexity = value
        .get("complexity")
        .and_then(Value::as_u64)
        .ok_or_else(|| parse_error(file_path, "missing or non-numeric 'complexity'"))?
        .clamp(1, 10) as u8;

    Ok(FileAnalysis {
        file_path: file_path.to_string(),
        summary,
        importance,
        complexity,
        functions: parse_functions(value.get("functions")),
        classes: parse_classes(value.get("classes")),
        constants: json_string_array(value, "constants"),
        dependencies: json_string_array(value, "dependencies"),
        cache_key,
        analysis_ms: 0,
    })
}

/// Importance with no fallback - bounded enum values only
fn parse_importance_strict(s: &str) -> Option<Importance> {
    match s.to_lowercase().as_str() {
        "critical" => Some(Importance::Critical),
        "high" => Some(Importance::High),
        "medium" => Some(Importance::Medium),
        "low" => Some(Importance::Low),
        _ => None,
    }
}

fn parse_functions(value: Option<&Value>) -> Vec<FunctionInfo> {
    value
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(parse_function).collect())
        .unwrap_or_default()
}

fn parse_function(item: &Value) -> Option<FunctionInfo> {
    let name = json_string(item, "name").filter(|s| !s.is_empty())?;

    Some(FunctionInfo {
        name,
        description: json_string_or(item, "description", ""),
        parameters: parse_parameters(item.get("parameters")),
        complexity: json_string(item, "complexity")
            .map(|s| FunctionComplexity::parse(&s))
            .unwrap_or_default(),
        returns: parse_returns(item.get("returns")),
    })
}

fn parse_parameters(value: Option<&Value>) -> Vec<ParameterInfo> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|item| {
                    let name = json_string(item, "name").filter(|s| !s.is_empty())?;
                    Some(ParameterInfo {
                        name,
                        param_type: json_string_or(item, "param_type", ""),
                        description: json_string_or(item, "description", ""),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_returns(value: Option<&Value>) -> Option<ReturnInfo> {
    let value = value?;
    if !value.is_object() {
        return None;
    }
    Some(ReturnInfo {
        return_type: json_string_or(value, "return_type", ""),
        description: json_string_or(value, "description", ""),
    })
}

fn parse_classes(value: Option<&Value>) -> Vec<ClassInfo> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|item| {
                    let name = json_string(item, "name").filter(|s| !s.is_empty())?;
                    Some(ClassInfo {
                        name,
                        description: json_string_or(item, "description", ""),
                        methods: parse_functions(item.get("methods")),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_error(file_path: &str, reason: &str) -> DocuError {
    DocuError::LlmApi(format!("Invalid analysis for {}: {}", file_path, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_response() -> Value {
        json!({
            "summary": "Handles user authentication via OAuth",
            "importance": "high",
            "complexity": 6,
            "functions": [
                {
                    "name": "login",
                    "description": "Starts the OAuth flow",
                    "parameters": [
                        {"name": "provider", "param_type": "string", "description": "OAuth provider"}
                    ],
                    "complexity": "moderate",
                    "returns": {"return_type": "Promise<Session>", "description": "session"}
                }
            ],
            "classes": [
                {"name": "AuthService", "description": "Session manager", "methods": []}
            ],
            "constants": ["TOKEN_TTL"],
            "dependencies": ["next-auth", "zod"]
        })
    }

    #[test]
    fn test_parse_complete_analysis() {
        let analysis =
            parse_file_analysis("src/auth.ts", "abc123".to_string(), &valid_response()).unwrap();

        assert_eq!(analysis.file_path, "src/auth.ts");
        assert_eq!(analysis.cache_key, "abc123");
        assert_eq!(analysis.importance, Importance::High);
        assert_eq!(analysis.complexity, 6);
        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.functions[0].name, "login");
        assert_eq!(analysis.functions[0].parameters.len(), 1);
        assert_eq!(analysis.classes.len(), 1);
        assert_eq!(analysis.constants, vec!["TOKEN_TTL"]);
        assert_eq!(analysis.dependencies, vec!["next-auth", "zod"]);
    }

    #[test]
    fn test_missing_summary_is_error() {
        let response = json!({"importance": "low", "complexity": 3});
        assert!(parse_file_analysis("f.ts", "k".to_string(), &response).is_err());
    }

    #[test]
    fn test_invalid_importance_is_error() {
        let response = json!({
            "summary": "ok",
            "importance": "super-duper",
            "complexity": 3
        });
        assert!(parse_file_analysis("f.ts", "k".to_string(), &response).is_err());
    }

    #[test]
    fn test_non_numeric_complexity_is_error() {
        let response = json!({
            "summary": "ok",
            "importance": "low",
            "complexity": "medium"
        });
        assert!(parse_file_analysis("f.ts", "k".to_string(), &response).is_err());
    }

    #[test]
    fn test_complexity_clamped_to_range() {
        let response = json!({
            "summary": "ok",
            "importance": "low",
            "complexity": 95
        });
        let analysis = parse_file_analysis("f.ts", "k".to_string(), &response).unwrap();
        assert_eq!(analysis.complexity, 10);
    }

    #[test]
    fn test_malformed_detail_entries_skipped() {
        let response = json!({
            "summary": "ok",
            "importance": "medium",
            "complexity": 4,
            "functions": [
                {"description": "nameless, skipped"},
                {"name": "kept"}
            ],
            "classes": "not-an-array"
        });
        let analysis = parse_file_analysis("f.ts", "k".to_string(), &response).unwrap();
        assert_eq!(analysis.functions.len(), 1);
        assert_eq!(analysis.functions[0].name, "kept");
        assert!(analysis.classes.is_empty());
    }

    #[test]
    fn test_non_object_is_error() {
        assert!(parse_file_analysis("f.ts", "k".to_string(), &json!([1, 2])).is_err());
        assert!(parse_file_analysis("f.ts", "k".to_string(), &json!("text")).is_err());
    }
}
