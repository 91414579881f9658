//! Configuration Management
//!
//! Hierarchical resolution, lowest priority first:
//! 1. Built-in defaults
//! 2. Global config (~/.config/quizforge/config.toml)
//! 3. Project config (./quizforge.toml)
//! 4. Environment variables (QUIZFORGE_*)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
