//! File Analyzer
//!
//! Produces one `FileAnalysis` per source file through a single bounded
//! completion call. The analyzer is infallible at its boundary: any
//! failure (provider error, timeout, malformed JSON, schema violation)
//! degrades to a stub analysis instead of propagating, so the batch
//! scheduler never needs per-file exception handling for this stage.
//!
//! The analyzer is immutable and shared via `Arc` across concurrent batch
//! tasks without locking. The completion service and the analysis cache
//! are injected explicitly - no ambient singletons.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::ai::{CompletionOptions, SharedCompletionService, with_timeout};
use crate::constants::{completion, pipeline};
use crate::types::{FileAnalysis, ProjectContext, Result, SourceFile, cache_key};

use super::parsers::parse_file_analysis;
use super::prompts::build_file_analysis_prompt;

// =============================================================================
// Analysis Cache Capability
// =============================================================================

/// Pluggable analysis cache keyed by the content fingerprint.
///
/// The in-process default never hits; the interface exists as the join
/// point for an external cache keyed by `FileAnalysis::cache_key`.
pub trait AnalysisCache: Send + Sync {
    fn get(&self, key: &str) -> Option<FileAnalysis>;
    fn put(&self, key: &str, analysis: FileAnalysis);
}

/// Shared cache handle
pub type SharedAnalysisCache = Arc<dyn AnalysisCache>;

/// Default cache: always misses, stores nothing
#[derive(Debug, Default)]
pub struct NoopCache;

impl AnalysisCache for NoopCache {
    fn get(&self, _key: &str) -> Option<FileAnalysis> {
        None
    }

    fn put(&self, _key: &str, _analysis: FileAnalysis) {}
}

/// In-memory cache for repeated runs within one process
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, FileAnalysis>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AnalysisCache for MemoryCache {
    fn get(&self, key: &str) -> Option<FileAnalysis> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn put(&self, key: &str, analysis: FileAnalysis) {
        self.entries.insert(key.to_string(), analysis);
    }
}

// =============================================================================
// File Analyzer
// =============================================================================

/// Analyzer tuning knobs
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    /// Characters of file content included in the prompt
    pub max_file_chars: usize,
    /// Output token ceiling per analysis call
    pub max_tokens: usize,
    /// Deadline for one completion call
    pub call_timeout: Duration,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_file_chars: pipeline::DEFAULT_MAX_FILE_CHARS,
            max_tokens: completion::ANALYSIS_MAX_TOKENS,
            call_timeout: Duration::from_secs(completion::CALL_TIMEOUT_SECS),
        }
    }
}

/// Per-file analyzer; immutable, shareable via `Arc`
pub struct FileAnalyzer {
    service: SharedCompletionService,
    cache: SharedAnalysisCache,
    options: AnalyzerOptions,
}

impl FileAnalyzer {
    pub fn new(
        service: SharedCompletionService,
        cache: SharedAnalysisCache,
        options: AnalyzerOptions,
    ) -> Self {
        Self {
            service,
            cache,
            options,
        }
    }

    /// Analyze one file. Never fails: provider or parse errors yield the
    /// degraded stub analysis carrying the same cache key and elapsed time.
    pub async fn analyze(&self, file: &SourceFile, context: &ProjectContext) -> FileAnalysis {
        let key = cache_key(file);

        if let Some(hit) = self.cache.get(&key) {
            debug!(path = %file.path, "Analysis cache hit");
            return hit;
        }

        let start = Instant::now();
        match self.request_analysis(file, context, &key).await {
            Ok(mut analysis) => {
                analysis.analysis_ms = start.elapsed().as_millis() as u64;
                self.cache.put(&key, analysis.clone());
                debug!(
                    path = %file.path,
                    importance = analysis.importance.as_str(),
                    elapsed_ms = analysis.analysis_ms,
                    "File analyzed"
                );
                analysis
            }
            Err(e) => {
                // Zero retries before stubbing: the degraded analysis is the
                // recovery path, never an exception to the caller.
                warn!(path = %file.path, error = %e, "Analysis failed, using stub");
                FileAnalysis::fallback(file, &e.to_string(), start.elapsed().as_millis() as u64)
            }
        }
    }

    async fn request_analysis(
        &self,
        file: &SourceFile,
        context: &ProjectContext,
        key: &str,
    ) -> Result<FileAnalysis> {
        let prompt = build_file_analysis_prompt(file, context, self.options.max_file_chars);
        let options = CompletionOptions::structured(self.options.max_tokens);

        let response = with_timeout(
            self.options.call_timeout,
            self.service.complete(&prompt, &options),
            "file analysis",
        )
        .await?;

        let value = crate::ai::extract_json_from_response(&response)?;
        parse_file_analysis(&file.path, key.to_string(), &value)
    }
}
