//! Core Data Model
//!
//! Types shared across the pipeline: source inputs, project context,
//! per-file analyses, the aggregate documentation result, and the unified
//! error type.

pub mod analysis;
pub mod context;
pub mod documentation;
pub mod error;
pub mod json;
pub mod source;

pub use analysis::{
    ClassInfo, FileAnalysis, FunctionComplexity, FunctionInfo, Importance, ParameterInfo,
    ReturnInfo, cache_key,
};
pub use context::ProjectContext;
pub use documentation::{
    CodeQualityScores, DocumentationHighlights, FileDocumentation, ProjectDocumentation,
    QualityMetrics,
};
pub use error::{DocuError, ErrorCategory, ErrorClassifier, LlmError, Result, ResultExt};
pub use json::{json_string, json_string_array, json_string_or, json_u64};
pub use source::{RepositoryInfo, SourceFile};
