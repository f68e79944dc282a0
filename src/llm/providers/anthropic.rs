//! Anthropic Claude structured responses
//!
//! Claude takes a plain JSON-Schema: `required` lists only the fields the
//! schema marks as required, and bounds and defaults are kept.

use crate::error::Result;
use crate::llm::compile::{base_fragment, name_list, push_default, required_names, Fragment};
use crate::llm::provider::{Dialect, Provider};
use crate::schema::{ArrayItems, Document, ObjectShape, Property, Schema};
use indexmap::IndexMap;
use serde_json::{json, Value};

/// Compile a schema into Anthropic's dialect
///
/// Nested objects forbid additional properties; the root does not say.
pub fn compile_anthropic(schema: &Schema) -> Document {
    Value::Object(compile_object(&schema.properties))
}

/// Prompt prefix asking Claude to answer with JSON matching the schema
///
/// Used when the schema travels in the prompt rather than as a tool.
pub fn schema_prompt(schema: &Schema) -> Result<String> {
    let document = serde_json::to_string_pretty(&compile_anthropic(schema))?;
    Ok(format!(
        "Please provide a JSON response matching exactly this schema:\n{document}\n\n\
         Your response must be valid JSON that matches the schema above."
    ))
}

fn compile_object(properties: &IndexMap<String, Property>) -> Fragment {
    let mut object = Fragment::new();
    object.insert("type".into(), Value::from("object"));
    object.insert("properties".into(), compile_properties(properties));
    object.insert("required".into(), name_list(required_names(properties)));
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
            fragment.insert("additionalProperties".into(), Value::Bool(false));
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

/// Tool name used when the schema name is empty
const FALLBACK_TOOL_NAME: &str = "structured_response";

/// Anthropic dialect
///
/// Claude's structured responses go through a forced tool call: the schema
/// becomes the tool's `input_schema` and `tool_choice` pins the model to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnthropicDialect;

impl Dialect for AnthropicDialect {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn compile(&self, schema: &Schema) -> Document {
        compile_anthropic(schema)
    }

    fn request_fragment(&self, schema: &Schema) -> Document {
        let name = if schema.name.is_empty() {
            FALLBACK_TOOL_NAME
        } else {
            schema.name.as_str()
        };

        json!({
            "tools": [{
                "name": name,
                "description": schema.description,
                "input_schema": compile_anthropic(schema),
            }],
            "tool_choice": {"type": "tool", "name": name},
        })
    }
}
