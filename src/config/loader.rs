//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/docugenius/config.toml)
//! 3. Project config (.docugenius/config.toml)
//! 4. Environment variables (DOCUGENIUS_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{DocuError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with the full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. DOCUGENIUS_PIPELINE_MAX_FILES -> pipeline.max_files
        figment = figment.merge(Env::prefixed("DOCUGENIUS_").split('_').lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| DocuError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file only (plus defaults)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DocuError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory (~/.config/docugenius/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("docugenius"))
    }

    /// Global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Project config file path
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".docugenius/config.toml")
    }

    /// Project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".docugenius")
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Create the project directory and a default config if absent
    pub fn init_project() -> Result<PathBuf> {
        let project_dir = Self::project_dir();
        fs::create_dir_all(&project_dir)?;

        let config_path = project_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, Self::default_project_config())?;
            info!("Created project config: {}", config_path.display());
        }

        Ok(project_dir)
    }

    /// Print configuration file paths with existence markers
    pub fn show_paths() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    fn default_project_config() -> String {
        r#"# DocuGenius Project Configuration
# Project-specific settings that override global defaults.

version = "1.0"

[llm]
provider = "openai"
timeout_secs = 120

[pipeline]
# Cost controls: files analyzed per run and prompt content ceiling
max_files = 30
batch_size = 3
max_file_chars = 8000

[storage]
db_path = ".docugenius/documents.db"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_default_config() {
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.pipeline.max_files, 30);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[pipeline]
max_files = 12
batch_size = 2
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.pipeline.max_files, 12);
        assert_eq!(config.pipeline.batch_size, 2);
        // Untouched values keep their defaults
        assert_eq!(config.pipeline.max_file_chars, 8000);
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pipeline]\nbatch_size = 0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}
