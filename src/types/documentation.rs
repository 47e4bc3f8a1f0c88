//! Project Documentation Types
//!
//! The aggregate result of one pipeline run. Built once by the compiler,
//! immutable, handed to the caller for rendering and persistence.
//!
//! `file_docs` is a `BTreeMap` so iteration order (and therefore rendered
//! output) is reproducible across runs on unchanged input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::analysis::{ClassInfo, FunctionInfo, Importance};

/// Aggregate documentation for a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDocumentation {
    /// High-level project overview (synthesis call)
    pub overview: String,

    /// Architecture narrative (synthesis call)
    pub architecture: String,

    /// Setup and run instructions (derived from framework lookup)
    pub getting_started: String,

    /// API reference assembled from API-tagged file analyses
    pub api_reference: String,

    /// Directory tree rendering of the analyzed files
    pub project_structure: String,

    /// Top critical/high files with their summaries
    pub key_components: String,

    /// Examples pulled from simple functions across the codebase
    pub usage_examples: String,

    #[serde(default)]
    pub highlights: Option<DocumentationHighlights>,

    #[serde(default)]
    pub metrics: Option<QualityMetrics>,

    /// One entry per analyzed file, keyed by path
    #[serde(default)]
    pub file_docs: BTreeMap<String, FileDocumentation>,
}

/// Marketing-ish bullet points derived from the analyses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentationHighlights {
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

/// Aggregate quality metrics derived from the analyses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Overall complexity tier: Low / Medium / High
    pub complexity: String,
    /// Maintainability tier: Excellent / Good / Fair / Needs Improvement
    pub maintainability: String,
    /// Test-presence text
    pub test_coverage: String,
    /// High-complexity ratio text
    pub performance: String,
}

/// Presentation-oriented per-file record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDocumentation {
    pub summary: String,
    pub purpose: String,
    pub importance: Importance,
    #[serde(default)]
    pub functions: Vec<FunctionInfo>,
    #[serde(default)]
    pub classes: Vec<ClassInfo>,
    #[serde(default)]
    pub constants: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub quality: CodeQualityScores,
}

/// Simple inverse-of-complexity quality subscores, 1..=10
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeQualityScores {
    pub readability: u8,
    pub maintainability: u8,
}

impl CodeQualityScores {
    /// Derive subscores from a 1-10 complexity value
    pub fn from_complexity(complexity: u8) -> Self {
        Self {
            readability: (10u8.saturating_sub(complexity / 2)).max(1),
            maintainability: (10u8.saturating_sub(complexity.saturating_sub(1) / 2)).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_scores_inverse_of_complexity() {
        let simple = CodeQualityScores::from_complexity(1);
        assert_eq!(simple.readability, 10);
        assert_eq!(simple.maintainability, 10);

        let medium = CodeQualityScores::from_complexity(5);
        assert_eq!(medium.readability, 8);
        assert_eq!(medium.maintainability, 8);

        let hairy = CodeQualityScores::from_complexity(10);
        assert_eq!(hairy.readability, 5);
        assert_eq!(hairy.maintainability, 6);
    }

    #[test]
    fn test_quality_scores_floor_at_one() {
        // Even out-of-range inputs stay in bounds
        let scores = CodeQualityScores::from_complexity(20);
        assert!(scores.readability >= 1);
        assert!(scores.maintainability >= 1);
    }

    #[test]
    fn test_file_docs_iteration_is_sorted() {
        let mut doc = ProjectDocumentation::default();
        doc.file_docs
            .insert("src/z.rs".to_string(), FileDocumentation::default());
        doc.file_docs
            .insert("src/a.rs".to_string(), FileDocumentation::default());

        let keys: Vec<_> = doc.file_docs.keys().cloned().collect();
        assert_eq!(keys, vec!["src/a.rs", "src/z.rs"]);
    }
}
