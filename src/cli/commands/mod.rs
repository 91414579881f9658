//! Subcommand handlers invoked from `main.rs`.

pub mod config;
pub mod generate;
