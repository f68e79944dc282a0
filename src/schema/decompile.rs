//! JSON-Schema decompiler
//!
//! Rebuilds a [`Schema`] from a hand-authored (or previously compiled)
//! JSON-Schema document. This is best-effort reconstruction: malformed pieces
//! fall back to defaults instead of failing.

use super::{ArrayItems, Document, FieldType, ObjectShape, Property, Schema, DEFAULT_SCHEMA_NAME};
use serde_json::{json, Map, Value};

/// Description given to array-item schemas that carry none
const ARRAY_ITEM_DESCRIPTION: &str = "Array item";

/// Reconstruct a [`Schema`] from a JSON-Schema document
///
/// The name comes from `title`, then `name`, then [`DEFAULT_SCHEMA_NAME`].
/// A field is required exactly when it is listed in the enclosing `required`
/// array. Objects with a `properties` map and arrays whose items are such
/// objects become nested schemas; any other `items` value is kept verbatim.
pub fn decompile(document: &Document) -> Schema {
    let Some(root) = document.as_object() else {
        return Schema::default();
    };

    let name = str_field(root, "title")
        .or_else(|| str_field(root, "name"))
        .unwrap_or(DEFAULT_SCHEMA_NAME);

    decompile_object(root, name)
}

fn decompile_object(object: &Map<String, Value>, name: &str) -> Schema {
    let description = str_field(object, "description").unwrap_or_default();
    let required: Vec<&str> = object
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut schema =
        Schema::new(name, description).with_additional_properties(additional_properties(object));

    if let Some(properties) = object.get("properties").and_then(Value::as_object) {
        for (prop_name, definition) in properties {
            let is_required = required.contains(&prop_name.as_str());
            schema.properties.insert(
                prop_name.clone(),
                decompile_property(prop_name, definition, is_required),
            );
        }
    }

    schema
}

fn decompile_property(name: &str, definition: &Value, required: bool) -> Property {
    let empty = Map::new();
    let definition = definition.as_object().unwrap_or(&empty);

    let field_type = str_field(definition, "type")
        .map(FieldType::from_json_type)
        .unwrap_or(FieldType::String);

    let mut prop = Property::new(
        field_type,
        str_field(definition, "description").unwrap_or_default(),
    );
    prop.required = required;

    if field_type.is_numeric() {
        prop.minimum = definition.get("minimum").and_then(Value::as_number).cloned();
        prop.maximum = definition.get("maximum").and_then(Value::as_number).cloned();
    }

    if let Some(Value::Array(values)) = definition.get("enum") {
        prop.enum_values = Some(values.clone());
    }

    prop.default = definition.get("default").filter(|v| !v.is_null()).cloned();

    match field_type {
        FieldType::Object => prop.object = decompile_object_shape(name, definition),
        FieldType::Array => prop.items = decompile_items(name, definition.get("items")),
        _ => {}
    }

    prop
}

fn decompile_object_shape(name: &str, definition: &Map<String, Value>) -> Option<ObjectShape> {
    if definition.get("properties").is_some_and(Value::is_object) {
        let nested = decompile_object(definition, &format!("{name}Object"));
        return Some(ObjectShape::Schema(nested));
    }

    // `additionalProperties` without `properties`: a map, unless it is closed
    match definition.get("additionalProperties")? {
        Value::Bool(false) => Some(ObjectShape::empty()),
        values @ Value::Object(_) => Some(ObjectShape::Map(values.clone())),
        _ => Some(ObjectShape::Map(Value::Bool(true))),
    }
}

fn decompile_items(name: &str, items: Option<&Value>) -> Option<ArrayItems> {
    match items? {
        Value::Object(items) if is_object_with_properties(items) => {
            let mut nested = decompile_object(items, &format!("{name}Item"));
            if nested.description.is_empty() {
                nested.description = ARRAY_ITEM_DESCRIPTION.to_string();
            }
            Some(ArrayItems::Schema(nested))
        }
        fragment @ Value::Object(_) => Some(ArrayItems::Fragment(fragment.clone())),
        _ => Some(ArrayItems::Fragment(json!({"type": "string"}))),
    }
}

fn is_object_with_properties(object: &Map<String, Value>) -> bool {
    str_field(object, "type") == Some("object")
        && object.get("properties").is_some_and(Value::is_object)
}

/// `additionalProperties` as a flag; a sub-schema value permits extra keys
fn additional_properties(object: &Map<String, Value>) -> bool {
    match object.get("additionalProperties") {
        Some(Value::Bool(allowed)) => *allowed,
        Some(Value::Object(_)) => true,
        _ => false,
    }
}

fn str_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}
