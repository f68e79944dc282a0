//! OpenAI structured outputs
//!
//! OpenAI's strict mode accepts a narrow JSON-Schema subset: every object
//! lists all of its properties in `required`, forbids additional properties,
//! and no numeric bounds may appear anywhere in the tree.

use crate::llm::compile::{base_fragment, is_object_fragment, name_list, Fragment};
use crate::llm::provider::{Dialect, Provider};
use crate::schema::{ArrayItems, Document, ObjectShape, Property, Schema};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Name used in `response_format` when the schema name is unusable
const FALLBACK_FORMAT_NAME: &str = "Details";

/// Longest `json_schema.name` OpenAI accepts
const MAX_FORMAT_NAME_LEN: usize = 64;

/// Compile a schema into OpenAI's strict dialect
///
/// Every property of every object is listed in `required`, whatever its
/// `required` flag says, and `additionalProperties` is `false` at every
/// level. `default` is never emitted and bounds are stripped by
/// [`clean_for_openai`].
pub fn compile_openai(schema: &Schema) -> Document {
    let forced = forced_required_fields(schema);
    if !forced.is_empty() {
        debug!(
            schema = %schema.name,
            fields = ?forced,
            "optional fields marked required for OpenAI strict mode"
        );
    }

    clean_for_openai(Value::Object(compile_object(&schema.properties)))
}

/// Remove `minimum`/`maximum` from a document
///
/// Walks the schema levels of the tree (`properties.*`, `items`, map-valued
/// `additionalProperties` and `anyOf` branches, recursively) and rebuilds it
/// without bounds. Keys of a `properties` map are field names, not keywords,
/// so a field called `minimum` survives.
pub fn clean_for_openai(document: Document) -> Document {
    match document {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !matches!(key.as_str(), "minimum" | "maximum"))
                .map(|(key, value)| {
                    let value = match key.as_str() {
                        "properties" => clean_properties(value),
                        "items" | "additionalProperties" => clean_for_openai(value),
                        "anyOf" => clean_branches(value),
                        _ => value,
                    };
                    (key, value)
                })
                .collect(),
        ),
        other => other,
    }
}

fn clean_branches(branches: Value) -> Value {
    match branches {
        Value::Array(list) => Value::Array(list.into_iter().map(clean_for_openai).collect()),
        other => other,
    }
}

fn clean_properties(properties: Value) -> Value {
    match properties {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(name, prop)| (name, clean_for_openai(prop)))
                .collect(),
        ),
        other => other,
    }
}

/// Dotted paths of fields the IR marks optional but OpenAI will require
///
/// Array-item fields are reported as `field[].child`.
pub fn forced_required_fields(schema: &Schema) -> Vec<String> {
    let mut fields = Vec::new();
    collect_optional(&schema.properties, "", &mut fields);
    fields
}

fn collect_optional(properties: &IndexMap<String, Property>, prefix: &str, out: &mut Vec<String>) {
    for (name, prop) in properties {
        let path = format!("{prefix}{name}");
        if !prop.required {
            out.push(path.clone());
        }
        if let Some(shape) = prop.object_shape() {
            if let Some(fields) = shape.properties() {
                collect_optional(fields, &format!("{path}."), out);
            }
        } else if let Some(ArrayItems::Schema(items)) = prop.array_items() {
            collect_optional(&items.properties, &format!("{path}[]."), out);
        }
    }
}

fn compile_object(properties: &IndexMap<String, Property>) -> Fragment {
    let mut object = Fragment::new();
    object.insert("type".into(), Value::from("object"));
    object.insert("properties".into(), compile_properties(properties));
    object.insert("required".into(), name_list(properties.keys()));
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
            if !properties.is_empty() {
                fragment.insert("required".into(), name_list(properties.keys()));
            }
            fragment.insert("additionalProperties".into(), Value::Bool(false));
        } else if let ObjectShape::Map(values) = shape.as_ref() {
            fragment.insert("additionalProperties".into(), strict_fragment(values));
        }
    } else if let Some(items) = prop.array_items() {
        let items = match items {
            ArrayItems::Schema(schema) => Value::Object(compile_object(&schema.properties)),
            ArrayItems::Fragment(raw) => strict_fragment(raw),
        };
        fragment.insert("items".into(), items);
    }

    Value::Object(fragment)
}

/// Copy a hand-authored fragment, applying the strict-mode object rules
///
/// Object fragments with `properties` require all of their keys and forbid
/// extras; object fragments without them get `additionalProperties: false`
/// unless they already say otherwise. Map-like objects keep their value
/// schema, which gets the same treatment.
fn strict_fragment(raw: &Value) -> Value {
    let Value::Object(source) = raw else {
        return raw.clone();
    };
    let mut fragment = source.clone();

    if is_object_fragment(source) {
        match source.get("properties").and_then(Value::as_object) {
            Some(properties) => {
                let strict: Fragment = properties
                    .iter()
                    .map(|(name, prop)| (name.clone(), strict_fragment(prop)))
                    .collect();
                fragment.insert("properties".into(), Value::Object(strict));
                fragment.insert("required".into(), name_list(properties.keys()));
                fragment.insert("additionalProperties".into(), Value::Bool(false));
            }
            None => match source.get("additionalProperties") {
                Some(values @ Value::Object(_)) => {
                    fragment.insert("additionalProperties".into(), strict_fragment(values));
                }
                Some(_) => {}
                None => {
                    fragment.insert("additionalProperties".into(), Value::Bool(false));
                }
            },
        }
    }

    if let Some(items) = source.get("items") {
        fragment.insert("items".into(), strict_fragment(items));
    }

    Value::Object(fragment)
}

/// Restrict a schema name to the characters `response_format` allows
fn format_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FORMAT_NAME_LEN)
        .collect();

    if sanitized.trim_matches('_').is_empty() {
        FALLBACK_FORMAT_NAME.to_string()
    } else {
        sanitized
    }
}

/// OpenAI dialect
///
/// Builds the `response_format` block of a chat completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIDialect {
    /// Value of `json_schema.strict`
    strict: bool,
    /// Overrides the schema name in `json_schema.name`
    format_name: Option<String>,
}

impl Default for OpenAIDialect {
    fn default() -> Self {
        Self {
            strict: true,
            format_name: None,
        }
    }
}

impl OpenAIDialect {
    /// Create a dialect in strict mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `strict` flag sent with the schema
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Use a fixed `json_schema.name` instead of the schema's name
    pub fn with_format_name(mut self, name: impl Into<String>) -> Self {
        self.format_name = Some(name.into());
        self
    }
}

impl Dialect for OpenAIDialect {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn compile(&self, schema: &Schema) -> Document {
        compile_openai(schema)
    }

    fn request_fragment(&self, schema: &Schema) -> Document {
        let name = format_name(self.format_name.as_deref().unwrap_or(&schema.name));

        let mut json_schema = Fragment::new();
        json_schema.insert("name".into(), Value::String(name));
        if !schema.description.is_empty() {
            json_schema.insert("description".into(), Value::from(schema.description.as_str()));
        }
        json_schema.insert("strict".into(), Value::Bool(self.strict));
        json_schema.insert("schema".into(), compile_openai(schema));

        let mut response_format = Fragment::new();
        response_format.insert("type".into(), Value::from("json_schema"));
        response_format.insert("json_schema".into(), Value::Object(json_schema));

        let mut fragment = Fragment::new();
        fragment.insert("response_format".into(), Value::Object(response_format));
        Value::Object(fragment)
    }
}
