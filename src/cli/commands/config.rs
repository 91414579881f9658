//! Config Command
//!
//! Usage:
//!   quizforge config show [-f json]
//!   quizforge config path
//!   quizforge config init [--force]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    ConfigLoader::show_config(format == "json")
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global configuration
pub fn init(force: bool) -> Result<()> {
    let config_path = ConfigLoader::init_global(force)?;
    let out = Output::new();
    out.success("Initialized global configuration");
    out.info(&format!("Config: {}", config_path.display()));
    Ok(())
}
