//! Completion-Service Abstraction
//!
//! Defines the `CompletionService` capability the pipeline depends on: a
//! text/JSON completion call with a model name, token ceiling, and
//! temperature. Provider identity, auth, and rate-limit handling belong to
//! the implementation, never to the pipeline.
//!
//! Implementations are passed into the analyzer and compiler explicitly
//! (constructor injection) so the pipeline is trivially testable with a
//! fake service.

mod json_repair;
mod openai;
mod timeout;

pub use json_repair::{JsonRepairer, extract_json_from_response};
pub use openai::OpenAiProvider;
pub use timeout::with_timeout;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::types::{DocuError, Result};

// =============================================================================
// Completion Options
// =============================================================================

/// Per-call completion parameters
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Model override; provider default when None
    pub model: Option<String>,
    /// Output token ceiling
    pub max_tokens: usize,
    /// Sampling temperature (0.0 = deterministic)
    pub temperature: f32,
    /// Request a JSON object response
    pub json_mode: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 1024,
            temperature: 0.2,
            json_mode: false,
        }
    }
}

impl CompletionOptions {
    /// Options for structured per-file analysis calls
    pub fn structured(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            temperature: 0.1,
            json_mode: true,
            ..Default::default()
        }
    }

    /// Options for prose synthesis calls
    pub fn prose(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            temperature: 0.4,
            json_mode: false,
            ..Default::default()
        }
    }
}

// =============================================================================
// Completion Service Trait
// =============================================================================

/// Shared completion service handle for concurrent pipeline stages
pub type SharedCompletionService = Arc<dyn CompletionService>;

/// Text/JSON completion capability
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete a prompt and return the raw response text.
    ///
    /// Callers that need structured output parse the text themselves
    /// (see `extract_json_from_response`).
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Default model in use
    fn model(&self) -> &str;
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for completion-service providers.
///
/// API keys are redacted in debug output and never serialized.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "openai" (OpenAI-compatible endpoints)
    pub provider: String,
    /// Default model name
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key; falls back to env at construction time
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL for custom endpoints
    #[serde(default)]
    pub api_base: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            timeout_secs: 120,
            api_key: None,
            api_base: None,
        }
    }
}

/// Create a shared completion service from configuration
pub fn create_service(config: &ProviderConfig) -> Result<SharedCompletionService> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        _ => Err(DocuError::Config(format!(
            "Unknown provider: {}. Supported: openai",
            config.provider
        ))),
    }
}
