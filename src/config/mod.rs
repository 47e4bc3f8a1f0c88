//! Configuration
//!
//! Layered TOML + env configuration for the CLI and library defaults.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{Config, GithubConfig, LlmConfig, PipelineConfig, StorageConfig};
