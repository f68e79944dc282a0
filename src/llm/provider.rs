//! Provider dialects
//!
//! This module defines the trait-based abstraction over the structured-output
//! dialects of each LLM provider, and the model-name routing that picks one.

use crate::error::{Result, SchemaError};
use crate::llm::providers::{
    anthropic::AnthropicDialect, gemini::GeminiDialect, ollama::OllamaDialect,
    openai::OpenAIDialect,
};
use crate::schema::{Document, Schema};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// An LLM provider with its own schema dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI strict structured outputs
    OpenAI,
    /// Anthropic Claude
    Anthropic,
    /// Google Gemini
    Gemini,
    /// Local models served by Ollama
    Ollama,
}

impl Provider {
    /// All providers, in a stable order
    pub const ALL: [Provider; 4] = [
        Provider::OpenAI,
        Provider::Anthropic,
        Provider::Gemini,
        Provider::Ollama,
    ];

    /// Lowercase identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
        }
    }

    /// The provider's dialect with default options
    pub fn dialect(&self) -> Box<dyn Dialect> {
        match self {
            Provider::OpenAI => Box::new(OpenAIDialect::default()),
            Provider::Anthropic => Box::new(AnthropicDialect),
            Provider::Gemini => Box::new(GeminiDialect),
            Provider::Ollama => Box::new(OllamaDialect),
        }
    }

    /// Compile a schema into this provider's dialect
    pub fn compile(&self, schema: &Schema) -> Document {
        self.dialect().compile(schema)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "gpt" => Ok(Provider::OpenAI),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "gemini" | "google" => Ok(Provider::Gemini),
            "ollama" | "local" => Ok(Provider::Ollama),
            _ => Err(SchemaError::UnknownProvider(s.to_string())),
        }
    }
}

/// A provider's structured-output dialect
///
/// Implementations are pure: every call builds a fresh document that shares
/// nothing with the input schema or with other calls.
pub trait Dialect: Send + Sync {
    /// The provider this dialect targets
    fn provider(&self) -> Provider;

    /// Compile a schema into the provider's JSON-Schema subset
    fn compile(&self, schema: &Schema) -> Document;

    /// The part of a request body that carries the compiled schema
    ///
    /// The returned object is meant to be merged into the provider's request
    /// payload next to the model, messages and generation settings.
    fn request_fragment(&self, schema: &Schema) -> Document;
}

/// Picks a provider from a model name by prefix
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
    /// Prefixes checked in order; the first match wins
    routes: Vec<(String, Provider)>,
    /// Provider for models no prefix matches
    fallback: Provider,
}

/// Prefixes of hosted models, in matching order
pub const DEFAULT_PREFIXES: [(&str, Provider); 7] = [
    ("gpt-", Provider::OpenAI),
    ("chatgpt-", Provider::OpenAI),
    ("o1", Provider::OpenAI),
    ("o3", Provider::OpenAI),
    ("o4", Provider::OpenAI),
    ("claude-", Provider::Anthropic),
    ("gemini-", Provider::Gemini),
];

/// Provider for model names no prefix claims; anything else is assumed local
pub const DEFAULT_FALLBACK: Provider = Provider::Ollama;

impl Default for Router {
    fn default() -> Self {
        DEFAULT_PREFIXES
            .into_iter()
            .fold(Self::new(DEFAULT_FALLBACK), |router, (prefix, provider)| {
                router.with_prefix(prefix, provider)
            })
    }
}

impl Router {
    /// Create a router with no prefixes
    pub fn new(fallback: Provider) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    /// Route models starting with `prefix` to `provider`
    pub fn with_prefix(mut self, prefix: impl Into<String>, provider: Provider) -> Self {
        self.routes.push((prefix.into(), provider));
        self
    }

    /// Provider for models no prefix matches
    pub fn fallback(&self) -> Provider {
        self.fallback
    }

    /// Pick the provider for a model name
    pub fn route(&self, model: &str) -> Provider {
        let provider = self
            .routes
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix.as_str()))
            .map(|(_, provider)| *provider)
            .unwrap_or(self.fallback);
        debug!(model, %provider, "routed model to provider");
        provider
    }
}
