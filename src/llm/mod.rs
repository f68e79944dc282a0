//! LLM dialect module
//!
//! This module provides the trait-based provider dialect abstraction and one
//! schema compiler per LLM provider.

pub(crate) mod compile;
pub mod provider;

// Provider implementations
pub mod providers {
    pub mod anthropic;
    pub mod gemini;
    pub mod ollama;
    pub mod openai;
}

// Re-exports
pub use provider::{Dialect, Provider, Router};
pub use providers::anthropic::{compile_anthropic, AnthropicDialect};
pub use providers::gemini::{compile_gemini, GeminiDialect};
pub use providers::ollama::{compile_ollama, OllamaDialect};
pub use providers::openai::{clean_for_openai, compile_openai, forced_required_fields, OpenAIDialect};
