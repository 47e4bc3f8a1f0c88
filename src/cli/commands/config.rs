//! Config Command
//!
//! Show, locate, and initialize configuration.

use crate::cli::output::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Print the merged effective configuration
pub fn show(as_json: bool) -> Result<()> {
    let config = ConfigLoader::load()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!(
            "{}",
            toml::to_string_pretty(&config)
                .map_err(|e| crate::types::DocuError::Config(e.to_string()))?
        );
    }
    Ok(())
}

/// Print configuration file paths
pub fn path() -> Result<()> {
    ConfigLoader::show_paths();
    Ok(())
}

/// Initialize the project configuration directory
pub fn init() -> Result<()> {
    let output = Output::new();
    let dir = ConfigLoader::init_project()?;
    output.success(&format!("Initialized {}", dir.display()));
    Ok(())
}
