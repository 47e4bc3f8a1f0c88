//! JSON Value Extraction Helpers
//!
//! Ergonomic helpers for pulling typed values out of `serde_json::Value`
//! when decoding LLM responses. Replaces verbose
//! `v.get("key")?.as_str()?.to_string()` chains.

/// Extract string from JSON value by key.
#[inline]
pub fn json_string(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(String::from)
}

/// Extract string with default value.
#[inline]
pub fn json_string_or(value: &serde_json::Value, key: &str, default: &str) -> String {
    json_string(value, key).unwrap_or_else(|| default.to_string())
}

/// Extract string array from JSON value by key.
#[inline]
pub fn json_string_array(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|s| s.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Extract u64 with default.
#[inline]
pub fn json_u64(value: &serde_json::Value, key: &str, default: u64) -> u64 {
    value.get(key).and_then(|v| v.as_u64()).unwrap_or(default)
}
