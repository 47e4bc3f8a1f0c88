//! Configuration Types
//!
//! All configuration structures with sensible defaults. Supports global
//! (~/.config/docugenius/) and project (.docugenius/) level configuration.
//!
//! The pipeline's two resource-bounding controls - the file cap and the
//! per-file content ceiling - live here as explicit, overridable fields.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::ProviderConfig;
use crate::constants::{completion, network, pipeline};
use crate::github::GithubClientConfig;
use crate::pipeline::PipelineOptions;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// GitHub enumerator settings
    pub github: GithubConfig,

    /// Completion-service settings
    pub llm: LlmConfig,

    /// Pipeline resource bounds
    pub pipeline: PipelineConfig,

    /// Document store settings
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            github: GithubConfig::default(),
            llm: LlmConfig::default(),
            pipeline: PipelineConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.pipeline.max_files == 0 {
            return Err(crate::types::DocuError::Config(
                "pipeline.max_files must be greater than 0".to_string(),
            ));
        }
        if self.pipeline.batch_size == 0 {
            return Err(crate::types::DocuError::Config(
                "pipeline.batch_size must be greater than 0".to_string(),
            ));
        }
        if self.pipeline.max_file_chars < 200 {
            return Err(crate::types::DocuError::Config(format!(
                "pipeline.max_file_chars must be at least 200, got {}",
                self.pipeline.max_file_chars
            )));
        }
        if self.llm.timeout_secs == 0 {
            return Err(crate::types::DocuError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// GitHub Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// API base URL; override for GitHub Enterprise
    pub api_base: String,
    /// Access token; falls back to GITHUB_TOKEN at client construction
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Largest file fetched, in bytes
    pub max_file_bytes: u64,
    /// Most files fetched per repository
    pub max_files: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            token: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            max_file_bytes: network::GITHUB_MAX_FILE_BYTES,
            max_files: 100,
        }
    }
}

impl From<&GithubConfig> for GithubClientConfig {
    fn from(config: &GithubConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
            timeout_secs: config.timeout_secs,
            max_file_bytes: config.max_file_bytes,
            max_files: config.max_files,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type: "openai"
    pub provider: String,
    /// Default model name
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key; falls back to OPENAI_API_KEY at provider construction
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL for compatible gateways
    pub api_base: Option<String>,
}

impl Default for LlmConfig {
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

impl From<&LlmConfig> for ProviderConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
        }
    }
}

// =============================================================================
// Pipeline Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum files analyzed per run (cost ceiling)
    pub max_files: usize,
    /// Files analyzed concurrently per batch (rate-limit control)
    pub batch_size: usize,
    /// Characters of file content included in an analysis prompt
    pub max_file_chars: usize,
    /// Output token ceiling per analysis call
    pub analysis_max_tokens: usize,
    /// Output token ceiling per synthesis call
    pub synthesis_max_tokens: usize,
    /// Deadline for a single completion call, in seconds
    pub call_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_files: pipeline::DEFAULT_MAX_FILES,
            batch_size: pipeline::DEFAULT_BATCH_SIZE,
            max_file_chars: pipeline::DEFAULT_MAX_FILE_CHARS,
            analysis_max_tokens: completion::ANALYSIS_MAX_TOKENS,
            synthesis_max_tokens: completion::SYNTHESIS_MAX_TOKENS,
            call_timeout_secs: completion::CALL_TIMEOUT_SECS,
        }
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_files: config.max_files,
            batch_size: config.batch_size,
            max_file_chars: config.max_file_chars,
            analysis_max_tokens: config.analysis_max_tokens,
            synthesis_max_tokens: config.synthesis_max_tokens,
            call_timeout: Duration::from_secs(config.call_timeout_secs),
        }
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the SQLite document store
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(".docugenius/documents.db"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch() {
        let mut config = Config::default();
        config.pipeline.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let mut config = Config::default();
        config.pipeline.max_files = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_tiny_truncation_ceiling() {
        let mut config = Config::default();
        config.pipeline.max_file_chars = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pipeline_options_conversion() {
        let config = PipelineConfig {
            max_files: 12,
            batch_size: 4,
            call_timeout_secs: 30,
            ..Default::default()
        };
        let options = PipelineOptions::from(&config);
        assert_eq!(options.max_files, 12);
        assert_eq!(options.batch_size, 4);
        assert_eq!(options.call_timeout, Duration::from_secs(30));
    }
}
