//! CLI Layer
//!
//! Subcommand implementations and console output helpers.

pub mod commands;
pub mod output;
