//! CLI module
//!
//! This module provides the command-line interface for greenland-schema:
//! argument parsing and the command handlers.

pub mod commands;

// Re-exports
pub use commands::{handle_command, Command, CommandType, Source};
