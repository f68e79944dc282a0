//! Google Gemini response schemas
//!
//! Gemini follows the same required-field rules as Anthropic, and additionally
//! needs `propertyOrdering` on every object level so that generated fields
//! come back in declaration order.

use crate::llm::compile::{
    base_fragment, is_object_fragment, name_list, push_default, required_names, Fragment,
};
use crate::llm::provider::{Dialect, Provider};
use crate::schema::{ArrayItems, Document, ObjectShape, Property, Schema};
use indexmap::IndexMap;
use serde_json::{json, Value};

/// Compile a schema into Gemini's dialect
///
/// `propertyOrdering` lists the field names of each object in insertion
/// order: at the root, inside nested objects, inside array-item schemas and
/// inside object-shaped raw item fragments that lack one.
pub fn compile_gemini(schema: &Schema) -> Document {
    Value::Object(compile_object(&schema.properties))
}

fn compile_object(properties: &IndexMap<String, Property>) -> Fragment {
    let mut object = Fragment::new();
    object.insert("type".into(), Value::from("object"));
    object.insert("properties".into(), compile_properties(properties));
    object.insert("required".into(), name_list(required_names(properties)));
    object.insert("propertyOrdering".into(), name_list(properties.keys()));
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
            fragment.insert("propertyOrdering".into(), name_list(properties.keys()));
            fragment.insert(
                "additionalProperties".into(),
                Value::Bool(shape.additional_properties()),
            );
        } else if let ObjectShape::Map(values) = shape.as_ref() {
            fragment.insert("additionalProperties".into(), ordered_fragment(values));
        }
    } else if let Some(items) = prop.array_items() {
        let items = match items {
            ArrayItems::Schema(schema) => Value::Object(compile_object(&schema.properties)),
            ArrayItems::Fragment(raw) => ordered_fragment(raw),
        };
        fragment.insert("items".into(), items);
    }

    push_default(&mut fragment, prop);
    Value::Object(fragment)
}

/// Copy a hand-authored fragment, adding `propertyOrdering` to its objects
///
/// An existing `propertyOrdering` is left alone.
fn ordered_fragment(raw: &Value) -> Value {
    let Value::Object(source) = raw else {
        return raw.clone();
    };
    let mut fragment = source.clone();

    if let Some(properties) = source.get("properties").and_then(Value::as_object) {
        let ordered: Fragment = properties
            .iter()
            .map(|(name, prop)| (name.clone(), ordered_fragment(prop)))
            .collect();
        fragment.insert("properties".into(), Value::Object(ordered));
        if is_object_fragment(source) {
            fragment
                .entry("propertyOrdering")
                .or_insert_with(|| name_list(properties.keys()));
        }
    }

    for key in ["items", "additionalProperties"] {
        if let Some(nested) = source.get(key) {
            fragment.insert(key.into(), ordered_fragment(nested));
        }
    }

    Value::Object(fragment)
}

/// Gemini dialect
///
/// The schema goes into `generationConfig.responseSchema` together with a
/// JSON response MIME type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeminiDialect;

impl Dialect for GeminiDialect {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn compile(&self, schema: &Schema) -> Document {
        compile_gemini(schema)
    }

    fn request_fragment(&self, schema: &Schema) -> Document {
        json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": compile_gemini(schema),
            }
        })
    }
}
