//! Unified Error Type System
//!
//! Centralized error types for the whole pipeline, with category-based
//! classification so callers can decide between retry and fail-fast without
//! string matching at every call site.
//!
//! ## Recovery boundaries
//!
//! - Per-file analysis errors never cross the analyzer boundary (degraded
//!   stub instead).
//! - Synthesis errors never abort compilation (templated fallback).
//! - `NoFiles` / `NoAnalyses` are the only fatal pipeline outcomes.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories for retry and logging decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Context/token limit exceeded - do not retry
    TokenLimit,
    /// Authentication failed - fail fast
    Auth,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Service unavailable - retry with backoff
    Unavailable,
    /// Invalid request - fix the request, do not retry
    BadRequest,
    /// Response could not be parsed
    ParseError,
    /// Temporary server issues - retry
    Transient,
    /// Unknown error - conservative, no retry
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::TokenLimit => write!(f, "TOKEN_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Whether an operation that failed with this category may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit | Self::Network | Self::Transient | Self::Unavailable
        )
    }

    /// Recommended wait before a retry of this category
    pub fn recommended_delay(&self) -> Duration {
        match self {
            Self::RateLimit => Duration::from_secs(30),
            Self::Network | Self::Unavailable => Duration::from_secs(5),
            Self::Transient => Duration::from_secs(2),
            _ => Duration::from_millis(500),
        }
    }
}

// =============================================================================
// Remote-Service Error
// =============================================================================

/// Structured error for completion-service and GitHub calls
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Category for routing decisions
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Which service produced the error ("openai", "github", ...)
    pub source: Option<String>,
    /// Suggested wait before retry, when the server provided one
    pub retry_after: Option<Duration>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "[{}:{}] {}", source, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            source: None,
            retry_after: None,
        }
    }

    pub fn with_source(
        category: ErrorCategory,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            source: Some(source.into()),
            retry_after: None,
        }
    }

    pub fn retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Unknown, message)
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }

    pub fn recommended_delay(&self) -> Duration {
        self.retry_after
            .unwrap_or_else(|| self.category.recommended_delay())
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Classifies raw error messages and HTTP statuses into categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from any remote service
    pub fn classify(message: &str, source: &str) -> LlmError {
        let lower = message.to_lowercase();

        if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota exceeded")
        {
            return LlmError::with_source(ErrorCategory::RateLimit, message, source)
                .retry_after(Duration::from_secs(30));
        }

        if lower.contains("context length")
            || lower.contains("maximum context")
            || (lower.contains("token") && (lower.contains("limit") || lower.contains("exceed")))
        {
            return LlmError::with_source(ErrorCategory::TokenLimit, message, source);
        }

        if lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("forbidden")
        {
            return LlmError::with_source(ErrorCategory::Auth, message, source);
        }

        if lower.contains("connection")
            || lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("dns")
            || lower.contains("unreachable")
        {
            return LlmError::with_source(ErrorCategory::Network, message, source)
                .retry_after(Duration::from_secs(5));
        }

        if lower.contains("502")
            || lower.contains("503")
            || lower.contains("service unavailable")
            || lower.contains("overloaded")
        {
            return LlmError::with_source(ErrorCategory::Unavailable, message, source)
                .retry_after(Duration::from_secs(5));
        }

        if lower.contains("400") || lower.contains("bad request") || lower.contains("malformed") {
            return LlmError::with_source(ErrorCategory::BadRequest, message, source);
        }

        if lower.contains("parse") || lower.contains("json") || lower.contains("unexpected token") {
            return LlmError::with_source(ErrorCategory::ParseError, message, source);
        }

        if lower.contains("500") || lower.contains("internal error") || lower.contains("temporary")
        {
            return LlmError::with_source(ErrorCategory::Transient, message, source)
                .retry_after(Duration::from_secs(2));
        }

        LlmError::with_source(ErrorCategory::Unknown, message, source)
    }

    /// Classify an HTTP status code directly (more accurate than substrings)
    pub fn classify_http_status(status: u16, message: &str, source: &str) -> LlmError {
        match status {
            429 => LlmError::with_source(ErrorCategory::RateLimit, message, source)
                .retry_after(Duration::from_secs(30)),
            401 | 403 => LlmError::with_source(ErrorCategory::Auth, message, source),
            400 | 422 => LlmError::with_source(ErrorCategory::BadRequest, message, source),
            404 => LlmError::with_source(ErrorCategory::Unavailable, message, source),
            500 | 502 | 503 | 504 => {
                LlmError::with_source(ErrorCategory::Transient, message, source)
                    .retry_after(Duration::from_secs(5))
            }
            _ => LlmError::with_source(ErrorCategory::Unknown, message, source),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DocuError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Remote Service Errors
    // -------------------------------------------------------------------------
    /// Structured completion-service error with category and retry hints
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Simple completion-service error (use Llm for structured errors)
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("GitHub API error: {0}")]
    Github(String),

    // -------------------------------------------------------------------------
    // Pipeline Errors
    // -------------------------------------------------------------------------
    #[error("Pipeline error in stage {stage}: {message}")]
    Pipeline { stage: String, message: String },

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Repository contains no documentable files - nothing to analyze
    #[error("No documentable files found in repository")]
    NoFiles,

    /// Every per-file analysis was lost (not even stubs survived)
    #[error("No file analyses survived the analysis stage")]
    NoAnalyses,

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<LlmError> for DocuError {
    fn from(err: LlmError) -> Self {
        DocuError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, DocuError>;

// =============================================================================
// Helper Constructors
// =============================================================================

impl DocuError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn pipeline(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pipeline {
            stage: stage.into(),
            message: message.into(),
        }
    }

    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(LlmError::from_message(message))
    }

    /// Whether this is one of the two fatal pipeline outcomes
    pub fn is_fatal_pipeline_error(&self) -> bool {
        matches!(self, Self::NoFiles | Self::NoAnalyses)
    }
}

/// Context extension trait for adding context to foreign errors
pub trait ResultExt<T> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| DocuError::Storage(format!("{}: {}", context.into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
