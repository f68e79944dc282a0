//! Object shapes
//!
//! A [`Schema`] is one JSON object shape: a name, a description and an
//! ordered mapping of field name to [`Property`].

use super::{decompile, Document, Property};
use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder name for schemas without a title
pub const DEFAULT_SCHEMA_NAME: &str = "Schema";

/// An ordered set of named fields
///
/// Insertion order of `properties` is kept all the way into compiled
/// documents; Gemini relies on it for `propertyOrdering`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub properties: IndexMap<String, Property>,
    /// Whether keys beyond `properties` are allowed when this schema is nested
    #[serde(default)]
    pub additional_properties: bool,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_NAME, "")
    }
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: IndexMap::new(),
            additional_properties: false,
        }
    }

    /// Append a field; re-using a name replaces the field in place
    pub fn with_property(mut self, name: impl Into<String>, property: Property) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Allow or forbid unlisted keys when nested
    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = allowed;
        self
    }

    /// Every field name, in insertion order
    pub fn all_properties(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    /// Names of fields flagged as required, in insertion order
    pub fn required_properties(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|(_, prop)| prop.required)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names of fields flagged as optional, in insertion order
    pub fn optional_properties(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|(_, prop)| !prop.required)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Reconstruct a schema from a JSON-Schema document
    pub fn from_document(document: &Document) -> Self {
        decompile(document)
    }

    /// Parse JSON text and reconstruct a schema from it
    ///
    /// Only malformed JSON is an error; odd shapes fall back to defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: Document = serde_json::from_str(text)?;
        Ok(decompile(&document))
    }
}
