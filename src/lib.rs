//! greenland-schema library
//!
//! Describe a structured LLM response once as a [`Schema`] and compile it into
//! the JSON-Schema dialect each provider accepts. The main binary is in
//! src/main.rs.

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod schema;

pub use error::{Result, SchemaError};
pub use llm::{
    clean_for_openai, compile_anthropic, compile_gemini, compile_ollama, compile_openai, Dialect,
    Provider, Router,
};
pub use schema::{decompile, ArrayItems, Document, FieldType, ObjectShape, Property, Schema};
