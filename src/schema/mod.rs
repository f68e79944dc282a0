//! Schema module
//!
//! The provider-agnostic description of "the JSON I want back from the
//! model", plus the decompiler that rebuilds it from JSON-Schema documents.

pub mod decompile;
pub mod model;
pub mod property;

// Re-exports
pub use decompile::decompile;
pub use model::{Schema, DEFAULT_SCHEMA_NAME};
pub use property::{ArrayItems, FieldType, ObjectShape, Property};

/// A compiled, JSON-encodable schema document
pub type Document = serde_json::Value;
