//! Error types for greenland-schema
//!
//! Schema compilation and decompilation never fail; these errors cover the
//! edges around them (reading files, parsing JSON text, configuration and
//! command-line handling).

use thiserror::Error;

/// Result type alias for greenland-schema
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Main error type for greenland-schema
#[derive(Error, Debug)]
pub enum SchemaError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider name did not match any dialect
    #[error("Unknown provider: {0} (expected openai, anthropic, gemini or ollama)")]
    UnknownProvider(String),

    /// Unknown CLI command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// CLI command with missing or malformed arguments
    #[error("Invalid syntax for '{command}', expected: {expected}")]
    InvalidCommandSyntax { command: String, expected: String },
}
