//! Configuration module
//!
//! This module handles configuration management: where schemas go by
//! default, how model names map to providers, and per-dialect options.

pub mod storage;

pub use storage::{Config, OpenAIConfig, RoutingConfig};

use crate::llm::{Dialect, OpenAIDialect, Provider, Router};
use tracing::warn;

/// Runtime settings derived from the stored configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// The configuration the settings were built from
    pub config: Config,
    /// Model-name router
    router: Router,
}

impl Settings {
    /// Build settings from a configuration
    pub fn new(config: Config) -> Self {
        let router = config.routing.router();
        Self { config, router }
    }

    /// Load settings from disk, falling back to defaults
    ///
    /// A broken config file is reported and ignored rather than fatal.
    pub fn load() -> Self {
        match Config::load() {
            Ok(config) => Self::new(config),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable configuration, using defaults");
                Self::default()
            }
        }
    }

    /// Provider used when none is named
    pub fn default_provider(&self) -> Provider {
        self.config.default_provider
    }

    /// Pick the provider for a model name
    pub fn route(&self, model: &str) -> Provider {
        self.router.route(model)
    }

    /// The dialect for a provider, with configured options applied
    pub fn dialect(&self, provider: Provider) -> Box<dyn Dialect> {
        match provider {
            Provider::OpenAI => {
                let mut dialect = OpenAIDialect::new().with_strict(self.config.openai.strict);
                if let Some(name) = &self.config.openai.schema_name {
                    dialect = dialect.with_format_name(name.as_str());
                }
                Box::new(dialect)
            }
            other => other.dialect(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
