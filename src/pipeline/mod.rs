//! Documentation Pipeline
//!
//! Wires the stages together: classify/prioritize → batch analysis →
//! compilation, translating each stage's internal progress into one
//! monotone 0-100 scale with fixed checkpoints (0-10 categorize, 10-70
//! analysis, 70-100 compilation).
//!
//! `DocumentationPipeline::generate` is the single public entry point. It
//! is the one place a hard failure may propagate: an empty input set or a
//! run where no analyses survive produces a terminal `error` event and an
//! explicit error, since there is no meaningful partial document to
//! return.

pub mod analyzer;
pub mod classifier;
pub mod compiler;
mod parsers;
pub mod prioritizer;
pub mod progress;
pub mod prompts;
pub mod scheduler;

pub use analyzer::{
    AnalysisCache, AnalyzerOptions, FileAnalyzer, MemoryCache, NoopCache, SharedAnalysisCache,
};
pub use classifier::{FileCategory, classify};
pub use compiler::{CompilerOptions, DocumentationCompiler};
pub use prioritizer::prioritize;
pub use progress::{ProgressEvent, ProgressKind, ProgressReporter, ProgressSink};
pub use scheduler::{BatchScheduler, ProgressBand, SchedulerOptions};

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use crate::ai::SharedCompletionService;
use crate::constants::{completion, pipeline as limits, progress as checkpoints};
use crate::types::{
    DocuError, ProjectContext, ProjectDocumentation, RepositoryInfo, Result, SourceFile,
};

// =============================================================================
// Pipeline Options
// =============================================================================

/// Pipeline tuning knobs; the file cap and content ceiling are the two
/// deliberate resource-bounding controls and are always explicit here.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum files analyzed per run
    pub max_files: usize,
    /// Files analyzed concurrently per batch
    pub batch_size: usize,
    /// Characters of file content included in an analysis prompt
    pub max_file_chars: usize,
    /// Output token ceiling per analysis call
    pub analysis_max_tokens: usize,
    /// Output token ceiling per synthesis call
    pub synthesis_max_tokens: usize,
    /// Deadline for a single completion call
    pub call_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_files: limits::DEFAULT_MAX_FILES,
            batch_size: limits::DEFAULT_BATCH_SIZE,
            max_file_chars: limits::DEFAULT_MAX_FILE_CHARS,
            analysis_max_tokens: completion::ANALYSIS_MAX_TOKENS,
            synthesis_max_tokens: completion::SYNTHESIS_MAX_TOKENS,
            call_timeout: Duration::from_secs(completion::CALL_TIMEOUT_SECS),
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Orchestrates one documentation-generation run
pub struct DocumentationPipeline {
    scheduler: BatchScheduler,
    compiler: DocumentationCompiler,
}

impl DocumentationPipeline {
    /// Build a pipeline with the default (no-op) analysis cache
    pub fn new(service: SharedCompletionService, options: PipelineOptions) -> Self {
        Self::with_cache(service, Arc::new(NoopCache), options)
    }

    /// Build a pipeline with an explicit analysis cache
    pub fn with_cache(
        service: SharedCompletionService,
        cache: SharedAnalysisCache,
        options: PipelineOptions,
    ) -> Self {
        let analyzer = Arc::new(FileAnalyzer::new(
            Arc::clone(&service),
            cache,
            AnalyzerOptions {
                max_file_chars: options.max_file_chars,
                max_tokens: options.analysis_max_tokens,
                call_timeout: options.call_timeout,
            },
        ));

        let scheduler = BatchScheduler::new(
            analyzer,
            SchedulerOptions {
                max_files: options.max_files,
                batch_size: options.batch_size,
            },
        );

        let compiler = DocumentationCompiler::new(
            service,
            CompilerOptions {
                synthesis_max_tokens: options.synthesis_max_tokens,
                synthesis_max_analyses: completion::SYNTHESIS_MAX_ANALYSES,
                call_timeout: options.call_timeout,
            },
        );

        Self {
            scheduler,
            compiler,
        }
    }

    /// Run the full pipeline over a fetched file set.
    ///
    /// Progress events stream to `on_progress` as the run advances; the
    /// final event is `completed` at 100, or a terminal `error` event on
    /// one of the two fatal outcomes.
    #[instrument(skip_all, fields(repository = %repository.name, file_count = files.len()))]
    pub async fn generate(
        &self,
        files: Vec<SourceFile>,
        repository: &RepositoryInfo,
        on_progress: impl Fn(ProgressEvent) + Send + Sync + 'static,
    ) -> Result<ProjectDocumentation> {
        let reporter = ProgressReporter::new(on_progress);

        reporter.emit(
            ProgressKind::Started,
            0,
            format!("Starting documentation generation for {}", repository.name),
        );

        if files.is_empty() {
            reporter.emit_error("Repository contains no documentable files");
            return Err(DocuError::NoFiles);
        }

        let context = ProjectContext::derive(repository, &files);
        info!(
            framework = context.framework.as_deref().unwrap_or("unknown"),
            "Derived project context"
        );

        // 0-10: classify and prioritize
        let total = files.len();
        let prioritized = prioritize(files);
        reporter.emit(
            ProgressKind::Categorized,
            checkpoints::CATEGORIZE_END,
            format!("Categorized and prioritized {} files", total),
        );

        // 10-70: batched per-file analysis
        let analyses = self
            .scheduler
            .run(
                prioritized,
                Arc::new(context.clone()),
                &reporter,
                ProgressBand::new(checkpoints::CATEGORIZE_END, checkpoints::ANALYSIS_END),
            )
            .await;

        if analyses.is_empty() {
            reporter.emit_error("No file analyses survived the analysis stage");
            return Err(DocuError::NoAnalyses);
        }

        // 70-100: compilation
        let documentation = self
            .compiler
            .compile(
                &analyses,
                &context,
                &reporter,
                ProgressBand::new(checkpoints::ANALYSIS_END, checkpoints::COMPILE_END - 2),
            )
            .await;

        reporter.emit(
            ProgressKind::Completed,
            checkpoints::COMPILE_END,
            format!(
                "Documentation generated for {} files",
                documentation.file_docs.len()
            ),
        );

        Ok(documentation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{CompletionOptions, CompletionService};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionService for CountingService {
        async fn complete(&self, _prompt: &str, options: &CompletionOptions) -> crate::types::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if options.json_mode {
                Ok(r#"{"summary": "A module", "importance": "medium", "complexity": 4}"#.to_string())
            } else {
                Ok("Synthesized prose.".to_string())
            }
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn model(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_empty_file_list_is_fatal_with_no_calls() {
        let service = Arc::new(CountingService {
            calls: AtomicUsize::new(0),
        });
        let pipeline = DocumentationPipeline::new(service.clone(), PipelineOptions::default());

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let result = pipeline
            .generate(Vec::new(), &RepositoryInfo::new("empty"), move |e| {
                sink.lock().expect("sink lock").push(e)
            })
            .await;

        assert!(matches!(result, Err(DocuError::NoFiles)));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);

        let events = events.lock().expect("events lock");
        let last = events.last().expect("terminal event");
        assert_eq!(last.kind, ProgressKind::Error);
    }

    #[tokio::test]
    async fn test_single_file_run_completes_at_100() {
        let service = Arc::new(CountingService {
            calls: AtomicUsize::new(0),
        });
        let pipeline = DocumentationPipeline::new(service, PipelineOptions::default());

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let doc = pipeline
            .generate(
                vec![SourceFile::new("src/main.ts", "console.log('hi')")],
                &RepositoryInfo::new("demo"),
                move |e| sink.lock().expect("sink lock").push(e),
            )
            .await
            .expect("pipeline succeeds");

        assert_eq!(doc.file_docs.len(), 1);
        assert!(doc.file_docs.contains_key("src/main.ts"));

        let events = events.lock().expect("events lock");
        let progress: Vec<u8> = events.iter().map(|e| e.progress).collect();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));

        let last = events.last().expect("final event");
        assert_eq!(last.kind, ProgressKind::Completed);
        assert_eq!(last.progress, 100);
    }
}
