//! Per-File Analysis Types
//!
//! Output of analyzing one source file with the completion service.
//! A `FileAnalysis` is created once by the analyzer, never mutated, and
//! consumed only by the documentation compiler. The content-derived cache
//! key is the join point for an external analysis cache.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::source::SourceFile;

/// Content prefix length hashed into the cache key
const CACHE_KEY_CONTENT_PREFIX: usize = 4096;

/// Hex characters kept from the fingerprint digest
const CACHE_KEY_LEN: usize = 16;

// =============================================================================
// Importance & Complexity
// =============================================================================

/// Architectural importance of a file, assigned during analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low = 0,
    Medium = 1,
    High = 2,
    Critical = 3,
}

impl Default for Importance {
    fn default() -> Self {
        Importance::Medium
    }
}

impl Importance {
    /// Parse with graceful fallback to Medium for unknown values
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "critical" => Importance::Critical,
            "high" => Importance::High,
            "medium" => Importance::Medium,
            "low" => Importance::Low,
            _ => Importance::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Critical => "critical",
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

/// Per-function complexity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FunctionComplexity {
    Simple,
    #[default]
    Moderate,
    Complex,
}

impl FunctionComplexity {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "simple" | "low" => FunctionComplexity::Simple,
            "complex" | "high" => FunctionComplexity::Complex,
            _ => FunctionComplexity::Moderate,
        }
    }
}

// =============================================================================
// Function / Class Detail
// =============================================================================

/// One function parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(default)]
    pub param_type: String,
    #[serde(default)]
    pub description: String,
}

/// Return value description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnInfo {
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub description: String,
}

/// One documented function
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default)]
    pub complexity: FunctionComplexity,
    #[serde(default)]
    pub returns: Option<ReturnInfo>,
}

/// One documented class/struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub methods: Vec<FunctionInfo>,
}

// =============================================================================
// File Analysis
// =============================================================================

/// Structured result of analyzing one source file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Path of the analyzed file (key into the final document)
    pub file_path: String,

    /// Free-text summary of the file's role
    pub summary: String,

    /// Importance tier
    pub importance: Importance,

    /// Numeric complexity, 1..=10
    pub complexity: u8,

    #[serde(default)]
    pub functions: Vec<FunctionInfo>,

    #[serde(default)]
    pub classes: Vec<ClassInfo>,

    /// Named constants surfaced by the analysis
    #[serde(default)]
    pub constants: Vec<String>,

    /// Imported/required dependency names
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Content-derived fingerprint; join key for an external cache
    pub cache_key: String,

    /// Wall-clock analysis duration in milliseconds
    #[serde(default)]
    pub analysis_ms: u64,
}

impl FileAnalysis {
    /// Degraded stub used when the real analysis call fails.
    ///
    /// Carries the same cache key a successful call would have produced so
    /// a later run can still replace it through the cache.
    pub fn fallback(file: &SourceFile, reason: &str, analysis_ms: u64) -> Self {
        Self {
            file_path: file.path.clone(),
            summary: format!("Analysis unavailable for {}: {}", file.name, reason),
            importance: Importance::Low,
            complexity: 5,
            functions: Vec::new(),
            classes: Vec::new(),
            constants: Vec::new(),
            dependencies: Vec::new(),
            cache_key: cache_key(file),
            analysis_ms,
        }
    }

    /// Whether this analysis is the degraded fallback shape
    pub fn is_stub(&self) -> bool {
        self.summary.starts_with("Analysis unavailable")
            && self.functions.is_empty()
            && self.classes.is_empty()
    }
}

/// Content fingerprint for a source file.
///
/// Stable for unchanged content: SHA-256 over the path and the first
/// `CACHE_KEY_CONTENT_PREFIX` bytes of content, truncated to
/// `CACHE_KEY_LEN` hex characters.
pub fn cache_key(file: &SourceFile) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file.path.as_bytes());
    hasher.update([0u8]);
    let prefix_len = file.content.len().min(CACHE_KEY_CONTENT_PREFIX);
    hasher.update(&file.content.as_bytes()[..prefix_len]);
    let digest = hasher.finalize();

    let mut key = String::with_capacity(CACHE_KEY_LEN);
    for byte in digest.iter().take(CACHE_KEY_LEN / 2) {
        key.push_str(&format!("{:02x}", byte));
    }
    key
}
