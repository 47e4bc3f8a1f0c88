//! Progress Reporting
//!
//! Progress events on a single 0-100 scale, emitted to a caller-supplied
//! sink (a CLI spinner, an SSE handler, a test collector). The reporter
//! owns the monotonicity invariant: an emitted value never goes below the
//! previous one, regardless of what a stage computes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Progress event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    Started,
    Categorized,
    Analyzing,
    Compiling,
    Completed,
    Error,
}

impl ProgressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressKind::Started => "started",
            ProgressKind::Categorized => "categorized",
            ProgressKind::Analyzing => "analyzing",
            ProgressKind::Compiling => "compiling",
            ProgressKind::Completed => "completed",
            ProgressKind::Error => "error",
        }
    }
}

/// One progress update; transient, never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub kind: ProgressKind,
    pub message: String,
    /// 0-100, monotone non-decreasing within one run
    pub progress: u8,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Caller-supplied event consumer
pub type ProgressSink = dyn Fn(ProgressEvent) + Send + Sync;

/// Monotone progress emitter shared across pipeline stages
#[derive(Clone)]
pub struct ProgressReporter {
    sink: Arc<ProgressSink>,
    last: Arc<AtomicU8>,
}

impl ProgressReporter {
    pub fn new(sink: impl Fn(ProgressEvent) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            last: Arc::new(AtomicU8::new(0)),
        }
    }

    /// Reporter that discards all events
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Emit an event, clamping progress to never decrease
    pub fn emit(&self, kind: ProgressKind, progress: u8, message: impl Into<String>) {
        self.emit_with_stage(kind, progress, message, None);
    }

    /// Emit an event with an explicit stage tag
    pub fn emit_with_stage(
        &self,
        kind: ProgressKind,
        progress: u8,
        message: impl Into<String>,
        stage: Option<&str>,
    ) {
        let progress = progress.min(100);
        let clamped = self.last.fetch_max(progress, Ordering::SeqCst).max(progress);

        (self.sink)(ProgressEvent {
            kind,
            message: message.into(),
            progress: clamped,
            stage: stage.map(str::to_string),
            payload: None,
        });
    }

    /// Emit a terminal error event at the current progress value
    pub fn emit_error(&self, message: impl Into<String>) {
        let current = self.last.load(Ordering::SeqCst);
        (self.sink)(ProgressEvent {
            kind: ProgressKind::Error,
            message: message.into(),
            progress: current,
            stage: None,
            payload: None,
        });
    }

    /// Last emitted progress value
    pub fn last_progress(&self) -> u8 {
        self.last.load(Ordering::SeqCst)
    }
}
