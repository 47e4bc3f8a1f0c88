//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Pipeline resource bounds
pub mod pipeline {
    /// Maximum files analyzed per run (cost ceiling; configurable)
    pub const DEFAULT_MAX_FILES: usize = 30;

    /// Files analyzed concurrently per batch (rate-limit control; configurable)
    pub const DEFAULT_BATCH_SIZE: usize = 3;

    /// Characters of file content included in an analysis prompt
    pub const DEFAULT_MAX_FILE_CHARS: usize = 8000;

    /// Marker appended when prompt content is cut at the ceiling
    pub const TRUNCATION_MARKER: &str = "\n... [truncated]";
}

/// Progress checkpoints on the single 0-100 scale
pub mod progress {
    /// End of the classify/prioritize band
    pub const CATEGORIZE_END: u8 = 10;

    /// End of the batch-analysis band
    pub const ANALYSIS_END: u8 = 70;

    /// End of the compilation band
    pub const COMPILE_END: u8 = 100;
}

/// Completion-call tuning
pub mod completion {
    /// Output token ceiling for one per-file analysis call
    pub const ANALYSIS_MAX_TOKENS: usize = 1500;

    /// Output token ceiling for one synthesis (overview/architecture) call
    pub const SYNTHESIS_MAX_TOKENS: usize = 1000;

    /// Per-call deadline in seconds
    pub const CALL_TIMEOUT_SECS: u64 = 60;

    /// Analyses fed into one synthesis prompt at most
    pub const SYNTHESIS_MAX_ANALYSES: usize = 10;
}

/// Network constants
pub mod network {
    /// Default HTTP request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Maximum GitHub fetch attempts for transient failures
    pub const GITHUB_MAX_RETRIES: usize = 3;

    /// Base delay for GitHub retry backoff (milliseconds)
    pub const GITHUB_RETRY_BASE_MS: u64 = 500;

    /// Largest file fetched from the contents API (bytes)
    pub const GITHUB_MAX_FILE_BYTES: u64 = 200_000;
}
