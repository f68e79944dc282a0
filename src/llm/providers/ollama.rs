//! Ollama structured outputs
//!
//! Ollama takes standard JSON-Schema in the `format` field of a chat request.

use crate::llm::compile::{base_fragment, name_list, push_default, required_names, Fragment};
use crate::llm::provider::{Dialect, Provider};
use crate::schema::{ArrayItems, Document, ObjectShape, Property, Schema};
use indexmap::IndexMap;
use serde_json::{json, Value};

/// Compile a schema into Ollama's dialect
///
/// The root (and every array-item schema) forbids additional properties;
/// nested objects carry whatever the schema says for them.
pub fn compile_ollama(schema: &Schema) -> Document {
    Value::Object(compile_object(&schema.properties))
}

/// Follow-up prompt for the structuring phase of a two-phase request
///
/// The first phase lets the model answer freely; the second asks it to
/// restate that answer as JSON with the schema's keys.
pub fn structure_prompt(schema: &Schema) -> String {
    let keys: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
    format!(
        "Based on the previous response to the prompt, provide a JSON response using the following keys: {}",
        keys.join(", ")
    )
}

fn compile_object(properties: &IndexMap<String, Property>) -> Fragment {
    let mut object = Fragment::new();
    object.insert("type".into(), Value::from("object"));
    object.insert("properties".into(), compile_properties(properties));
    object.insert("required".into(), name_list(required_names(properties)));
    object.insert("additionalProperties".into(), Value::Bool(false));
    object
}

fn compile_properties(properties: &IndexMap<String, Property>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(name, prop)| (name.clone(), compile_property(prop)))
            .collect(),
    )
}

fn compile_property(prop: &Property) -> Value {
    let mut fragment = base_fragment(prop);

    if let Some(shape) = prop.object_shape() {
        if let Some(properties) = shape.properties() {
            fragment.insert("properties".into(), compile_properties(properties));
            let required = required_names(properties);
            if !required.is_empty() {
                fragment.insert("required".into(), name_list(required));
            }
            fragment.insert(
                "additionalProperties".into(),
                Value::Bool(shape.additional_properties()),
            );
        } else if let ObjectShape::Map(values) = shape.as_ref() {
            fragment.insert("additionalProperties".into(), values.clone());
        }
    } else if let Some(items) = prop.array_items() {
        let items = match items {
            ArrayItems::Schema(schema) => Value::Object(compile_object(&schema.properties)),
            ArrayItems::Fragment(raw) => raw.clone(),
        };
        fragment.insert("items".into(), items);
    }

    push_default(&mut fragment, prop);
    Value::Object(fragment)
}

/// Ollama dialect
///
/// The compiled schema is sent as the chat request's `format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OllamaDialect;

impl Dialect for OllamaDialect {
    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    fn compile(&self, schema: &Schema) -> Document {
        compile_ollama(schema)
    }

    fn request_fragment(&self, schema: &Schema) -> Document {
        json!({ "format": compile_ollama(schema) })
    }
}
