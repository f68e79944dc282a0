//! Building blocks shared by the dialect compilers
//!
//! Each provider module owns its own recursion; these helpers only cover the
//! per-field attributes every dialect spells the same way.

use crate::schema::Property;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A JSON object under construction
pub(crate) type Fragment = Map<String, Value>;

/// `type`, `description`, `enum` and numeric bounds for one field
///
/// Empty descriptions and empty enums are left out. Bounds appear only for
/// `number` and `integer` fields.
pub(crate) fn base_fragment(prop: &Property) -> Fragment {
    let mut fragment = Fragment::new();
    fragment.insert("type".into(), Value::from(prop.field_type.as_str()));

    if let Some(description) = prop.description.as_deref().filter(|d| !d.is_empty()) {
        fragment.insert("description".into(), Value::from(description));
    }

    if let Some(values) = prop.enum_values.as_ref().filter(|v| !v.is_empty()) {
        fragment.insert("enum".into(), Value::Array(values.clone()));
    }

    let (minimum, maximum) = prop.numeric_bounds();
    if let Some(minimum) = minimum {
        fragment.insert("minimum".into(), Value::Number(minimum.clone()));
    }
    if let Some(maximum) = maximum {
        fragment.insert("maximum".into(), Value::Number(maximum.clone()));
    }

    fragment
}

/// Append `default` when the field has one
pub(crate) fn push_default(fragment: &mut Fragment, prop: &Property) {
    if let Some(default) = &prop.default {
        fragment.insert("default".into(), default.clone());
    }
}

/// A JSON array of field names
pub(crate) fn name_list<'a, I>(names: I) -> Value
where
    I: IntoIterator<Item = &'a String>,
{
    Value::Array(names.into_iter().cloned().map(Value::String).collect())
}

/// Names of the fields flagged as required, in declaration order
pub(crate) fn required_names(properties: &IndexMap<String, Property>) -> Vec<&String> {
    properties
        .iter()
        .filter(|(_, prop)| prop.required)
        .map(|(name, _)| name)
        .collect()
}

/// Whether a raw fragment is `{"type": "object", ...}`
pub(crate) fn is_object_fragment(fragment: &Fragment) -> bool {
    fragment.get("type").and_then(Value::as_str) == Some("object")
}
