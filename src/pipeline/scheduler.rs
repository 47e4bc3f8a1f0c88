//! Batch Scheduler
//!
//! Drives the analyzer over the prioritized file list in fixed-size
//! concurrent batches. The batch size caps simultaneous outbound
//! completion calls (rate-limit and cost control) while still
//! parallelizing; batches themselves run strictly sequentially - batch
//! N+1 starts only after every call in batch N has settled.
//!
//! Each batch is a settle-all fan-out: every spawned analysis completes
//! or fails individually, failures are logged and skipped, and only
//! fulfilled results are accumulated. One failing file never aborts its
//! siblings (the analyzer itself already degrades provider errors to
//! stubs; the scheduler additionally tolerates panicked tasks).

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::constants::pipeline;
use crate::types::{FileAnalysis, ProjectContext, SourceFile};

use super::analyzer::FileAnalyzer;
use super::progress::{ProgressKind, ProgressReporter};

/// Scheduler tuning knobs
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Maximum files analyzed per run
    pub max_files: usize,
    /// Files analyzed concurrently per batch
    pub batch_size: usize,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            max_files: pipeline::DEFAULT_MAX_FILES,
            batch_size: pipeline::DEFAULT_BATCH_SIZE,
        }
    }
}

/// Progress band the scheduler interpolates across
#[derive(Debug, Clone, Copy)]
pub struct ProgressBand {
    pub start: u8,
    pub end: u8,
}

impl ProgressBand {
    pub fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    /// Linear interpolation by items processed over items planned
    pub fn at(&self, processed: usize, planned: usize) -> u8 {
        if planned == 0 {
            return self.end;
        }
        let span = (self.end - self.start) as usize;
        self.start + (span * processed / planned) as u8
    }
}

/// Batch scheduler over a shared analyzer
pub struct BatchScheduler {
    analyzer: Arc<FileAnalyzer>,
    options: SchedulerOptions,
}

impl BatchScheduler {
    pub fn new(analyzer: Arc<FileAnalyzer>, options: SchedulerOptions) -> Self {
        Self { analyzer, options }
    }

    /// Analyze the prioritized file list, capped to `max_files`, emitting
    /// a progress event after each settled batch.
    pub async fn run(
        &self,
        files: Vec<SourceFile>,
        context: Arc<ProjectContext>,
        reporter: &ProgressReporter,
        band: ProgressBand,
    ) -> Vec<FileAnalysis> {
        let capped: Vec<Arc<SourceFile>> = files
            .into_iter()
            .take(self.options.max_files)
            .map(Arc::new)
            .collect();
        let planned = capped.len();
        let batch_size = self.options.batch_size.max(1);

        info!(
            planned,
            batch_size,
            max_files = self.options.max_files,
            "Starting batch analysis"
        );

        let mut analyses: Vec<FileAnalysis> = Vec::with_capacity(planned);
        let mut processed = 0usize;

        for batch in capped.chunks(batch_size) {
            // Fan out: all files in the batch analyzed concurrently
            let mut paths = Vec::with_capacity(batch.len());
            let mut handles = Vec::with_capacity(batch.len());
            for file in batch {
                let analyzer = Arc::clone(&self.analyzer);
                let context = Arc::clone(&context);
                let file = Arc::clone(file);
                paths.push(file.path.clone());
                handles.push(tokio::spawn(
                    async move { analyzer.analyze(&file, &context).await },
                ));
            }

            // Fan in: every task settles before the next batch starts
            for (path, settled) in paths.into_iter().zip(join_all(handles).await) {
                processed += 1;
                match settled {
                    Ok(analysis) => analyses.push(analysis),
                    Err(e) => {
                        // Panicked or cancelled task: log, keep the siblings
                        warn!(path = %path, error = %e, "Analysis task did not complete");
                    }
                }
            }

            reporter.emit(
                ProgressKind::Analyzing,
                band.at(processed, planned),
                format!("Analyzed {}/{} files", processed, planned),
            );
        }

        info!(
            analyzed = analyses.len(),
            planned, "Batch analysis complete"
        );

        analyses
    }
}
