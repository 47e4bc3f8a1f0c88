//! DocuGenius - AI-Driven Repository Documentation Generator
//!
//! Fetches a repository's files, analyzes them with an LLM in bounded
//! concurrent batches, and compiles the analyses into one structured
//! documentation object with progress reporting along the way.
//!
//! ## Pipeline
//!
//! 1. **Classify/Prioritize**: path-based categories drive a fixed weight
//!    ordering so the most informative files survive the file cap
//! 2. **Batch Analysis**: per-file completion calls in fixed-size
//!    sequential batches; failures degrade to stub analyses
//! 3. **Compilation**: two concurrent synthesis calls plus sections
//!    derived deterministically from the collected analyses
//!
//! ## Quick Start
//!
//! ```ignore
//! use docugenius::ai::create_service;
//! use docugenius::pipeline::{DocumentationPipeline, PipelineOptions};
//!
//! let service = create_service(&provider_config)?;
//! let pipeline = DocumentationPipeline::new(service, PipelineOptions::default());
//! let doc = pipeline.generate(files, &repository, |event| {
//!     println!("[{:>3}%] {}", event.progress, event.message);
//! }).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: completion-service capability and providers
//! - [`pipeline`]: classifier, prioritizer, analyzer, scheduler, compiler
//! - [`github`]: source-enumerator capability and GitHub client
//! - [`storage`]: persistence sink for generated documents
//! - [`render`]: Markdown projection of the generated document
//! - [`config`]: layered TOML + env configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod github;
pub mod pipeline;
pub mod render;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{DocuError, ErrorCategory, Result};

// Data Model
pub use types::{
    FileAnalysis, Importance, ProjectContext, ProjectDocumentation, RepositoryInfo, SourceFile,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{
    DocumentationPipeline, MemoryCache, NoopCache, PipelineOptions, ProgressEvent, ProgressKind,
};

// =============================================================================
// Capability Re-exports
// =============================================================================

pub use ai::{CompletionOptions, CompletionService, OpenAiProvider, create_service};
pub use github::{GithubClient, RepoRef, SourceEnumerator};
pub use storage::{DocumentStore, MemoryStore, SavedDocument, SqliteStore};
