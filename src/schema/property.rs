//! Field descriptors
//!
//! A [`Property`] describes one field of a structured response. It carries no
//! name of its own; the owning [`Schema`](super::Schema) or inline object keys
//! it.

use super::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Primitive JSON type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    /// The JSON-Schema spelling of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// Parse a JSON-Schema `type` value, falling back to `string`
    pub fn from_json_type(name: &str) -> Self {
        match name {
            "number" => FieldType::Number,
            "integer" => FieldType::Integer,
            "boolean" => FieldType::Boolean,
            "array" => FieldType::Array,
            "object" => FieldType::Object,
            _ => FieldType::String,
        }
    }

    /// Whether `minimum`/`maximum` apply to this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number | FieldType::Integer)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a nested object field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectShape {
    /// A separately constructed schema
    Schema(Schema),
    /// Properties declared directly on the field
    Inline {
        properties: IndexMap<String, Property>,
        #[serde(default)]
        additional_properties: bool,
    },
    /// Open map with arbitrary keys
    ///
    /// Holds the `additionalProperties` value: a JSON-Schema fragment for
    /// the map's values, or `true` for values of any shape.
    Map(Value),
}

impl ObjectShape {
    /// An inline object with no properties
    pub fn empty() -> Self {
        ObjectShape::Inline {
            properties: IndexMap::new(),
            additional_properties: false,
        }
    }

    /// The fields of the nested object, in declaration order
    ///
    /// `None` for open maps, which declare no fields.
    pub fn properties(&self) -> Option<&IndexMap<String, Property>> {
        match self {
            ObjectShape::Schema(schema) => Some(&schema.properties),
            ObjectShape::Inline { properties, .. } => Some(properties),
            ObjectShape::Map(_) => None,
        }
    }

    /// Whether the nested object admits unlisted keys
    pub fn additional_properties(&self) -> bool {
        match self {
            ObjectShape::Schema(schema) => schema.additional_properties,
            ObjectShape::Inline {
                additional_properties,
                ..
            } => *additional_properties,
            ObjectShape::Map(_) => true,
        }
    }
}

/// Element description of an array field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayItems {
    /// Object-shaped elements described by a full schema
    Schema(Schema),
    /// An already-shaped JSON-Schema fragment, e.g. `{"type": "string"}`
    Fragment(Value),
}

fn default_required() -> bool {
    true
}

fn as_bound(value: Value) -> Option<Number> {
    match value {
        Value::Number(number) => Some(number),
        _ => None,
    }
}

/// A single field descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Primitive type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Free-text description shown to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the field is mandatory; dialects may reinterpret this
    #[serde(default = "default_required")]
    pub required: bool,
    /// Allowed values, in order
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Lower bound, only meaningful for numeric types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    /// Upper bound, only meaningful for numeric types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    /// Literal default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Nested object structure, used when `field_type` is `object`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectShape>,
    /// Element description, used when `field_type` is `array`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ArrayItems>,
}

impl Property {
    /// Create a required property of the given type
    ///
    /// An empty description is stored as absent.
    pub fn new(field_type: FieldType, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            field_type,
            description: (!description.is_empty()).then_some(description),
            required: true,
            enum_values: None,
            minimum: None,
            maximum: None,
            default: None,
            object: None,
            items: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(FieldType::String, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(FieldType::Number, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(FieldType::Integer, description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new(FieldType::Boolean, description)
    }

    /// Object field described by a full nested schema
    pub fn object(description: impl Into<String>, schema: Schema) -> Self {
        let mut prop = Self::new(FieldType::Object, description);
        prop.object = Some(ObjectShape::Schema(schema));
        prop
    }

    /// Object field with its properties declared inline
    pub fn inline_object<I, K>(
        description: impl Into<String>,
        properties: I,
        additional_properties: bool,
    ) -> Self
    where
        I: IntoIterator<Item = (K, Property)>,
        K: Into<String>,
    {
        let mut prop = Self::new(FieldType::Object, description);
        prop.object = Some(ObjectShape::Inline {
            properties: properties
                .into_iter()
                .map(|(name, prop)| (name.into(), prop))
                .collect(),
            additional_properties,
        });
        prop
    }

    /// Object field used as a map from arbitrary keys to `values`
    pub fn map(description: impl Into<String>, values: Value) -> Self {
        let mut prop = Self::new(FieldType::Object, description);
        prop.object = Some(ObjectShape::Map(values));
        prop
    }

    /// Array of objects described by a full schema
    pub fn array_of(description: impl Into<String>, schema: Schema) -> Self {
        let mut prop = Self::new(FieldType::Array, description);
        prop.items = Some(ArrayItems::Schema(schema));
        prop
    }

    /// Array whose items are a raw JSON-Schema fragment
    pub fn array(description: impl Into<String>, items: Value) -> Self {
        let mut prop = Self::new(FieldType::Array, description);
        prop.items = Some(ArrayItems::Fragment(items));
        prop
    }

    /// Mark the property as not required
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Restrict the property to a set of values
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the lower bound
    ///
    /// Accepts integers and floats. A non-finite float leaves the bound unset.
    pub fn with_minimum(mut self, minimum: impl Into<Value>) -> Self {
        self.minimum = as_bound(minimum.into());
        self
    }

    /// Set the upper bound
    pub fn with_maximum(mut self, maximum: impl Into<Value>) -> Self {
        self.maximum = as_bound(maximum.into());
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Bounds that a compiler may emit; always `(None, None)` for non-numeric types
    pub fn numeric_bounds(&self) -> (Option<&Number>, Option<&Number>) {
        if self.field_type.is_numeric() {
            (self.minimum.as_ref(), self.maximum.as_ref())
        } else {
            (None, None)
        }
    }

    /// The object shape to compile, or `None` if this is not an object field
    ///
    /// Object fields with no declared shape compile as an empty object.
    pub fn object_shape(&self) -> Option<std::borrow::Cow<'_, ObjectShape>> {
        use std::borrow::Cow;
        if self.field_type != FieldType::Object {
            return None;
        }
        Some(match &self.object {
            Some(shape) => Cow::Borrowed(shape),
            None => Cow::Owned(ObjectShape::empty()),
        })
    }

    /// The array items to compile, or `None` if this is not an array field
    pub fn array_items(&self) -> Option<&ArrayItems> {
        if self.field_type != FieldType::Array {
            return None;
        }
        self.items.as_ref()
    }
}
