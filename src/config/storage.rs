//! Configuration Storage
//!
//! This module handles persistent storage of configuration data: the default
//! provider, model-name routing and OpenAI response-format options.

use crate::error::{Result, SchemaError};
use crate::llm::provider::{DEFAULT_FALLBACK, DEFAULT_PREFIXES};
use crate::llm::{Provider, Router};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration directory name
const CONFIG_DIR: &str = "greenland-schema";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Persistent configuration data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider used when a command names none
    pub default_provider: Provider,
    /// Model-name prefixes per provider
    pub routing: RoutingConfig,
    /// OpenAI `response_format` options
    pub openai: OpenAIConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: Provider::OpenAI,
            routing: RoutingConfig::default(),
            openai: OpenAIConfig::default(),
        }
    }
}

/// Model-name routing
///
/// Ollama prefixes are checked first so that locally served models with
/// vendor-like names (`gpt-oss`) stay local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub openai: Vec<String>,
    pub anthropic: Vec<String>,
    pub gemini: Vec<String>,
    pub ollama: Vec<String>,
    /// Provider for models no prefix matches
    pub fallback: Provider,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        let prefixes = |target: Provider| -> Vec<String> {
            DEFAULT_PREFIXES
                .iter()
                .filter(|(_, provider)| *provider == target)
                .map(|(prefix, _)| prefix.to_string())
                .collect()
        };
        Self {
            openai: prefixes(Provider::OpenAI),
            anthropic: prefixes(Provider::Anthropic),
            gemini: prefixes(Provider::Gemini),
            ollama: prefixes(Provider::Ollama),
            fallback: DEFAULT_FALLBACK,
        }
    }
}

impl RoutingConfig {
    /// Build the router described by this configuration
    pub fn router(&self) -> Router {
        let routes = [
            (Provider::Ollama, &self.ollama),
            (Provider::OpenAI, &self.openai),
            (Provider::Anthropic, &self.anthropic),
            (Provider::Gemini, &self.gemini),
        ];

        routes
            .into_iter()
            .flat_map(|(provider, prefixes)| prefixes.iter().map(move |p| (p, provider)))
            .fold(Router::new(self.fallback), |router, (prefix, provider)| {
                router.with_prefix(prefix.as_str(), provider)
            })
    }
}

/// OpenAI `response_format` options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAIConfig {
    /// Value of `json_schema.strict`
    pub strict: bool,
    /// Fixed `json_schema.name`; the schema's own name when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            strict: true,
            schema_name: None,
        }
    }
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR))
            .ok_or_else(|| SchemaError::Config("Could not find configuration directory".into()))
    }

    /// Get the configuration file path
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load configuration from the user's config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    /// Load configuration from a file, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to the user's config directory
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
