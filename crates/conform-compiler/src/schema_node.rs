//! Typed views over raw JSON Schema values.
//!
//! The compiler walks untyped `serde_json::Value`s. Before any keyword is
//! read, a value is narrowed to a [`SchemaNode`] with [`SchemaNode::new`],
//! which fails for anything that is not a JSON object (booleans, arrays,
//! strings and numbers are never treated as schemas).

use std::fmt;

use serde_json::{Map, Value};

/// A JSON Schema primitive type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Array,
    Object,
}

impl JsonType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(JsonType::String),
            "number" => Some(JsonType::Number),
            "integer" => Some(JsonType::Integer),
            "boolean" => Some(JsonType::Boolean),
            "null" => Some(JsonType::Null),
            "array" => Some(JsonType::Array),
            "object" => Some(JsonType::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::Boolean => "boolean",
            JsonType::Null => "null",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }

    /// The type of a JSON value, used to infer placeholder types.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::String(_) => JsonType::String,
            Value::Number(n) if n.is_i64() || n.is_u64() => JsonType::Integer,
            Value::Number(_) => JsonType::Number,
            Value::Bool(_) => JsonType::Boolean,
            Value::Null => JsonType::Null,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a node's `type` keyword declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// No `type` keyword.
    Untyped,
    One(JsonType),
    /// `type: [..]` with more than one entry.
    Many(Vec<JsonType>),
    /// A type name outside the draft-07 set.
    Unknown(String),
}

/// Whether a value can be read as a schema object.
pub fn is_schema_object(value: &Value) -> bool {
    value.is_object()
}

/// A JSON object narrowed to a schema.
#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a> {
    value: &'a Value,
    map: &'a Map<String, Value>,
}

impl<'a> SchemaNode<'a> {
    pub fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(|map| Self { value, map })
    }

    pub fn get(&self, keyword: &str) -> Option<&'a Value> {
        self.map.get(keyword)
    }

    pub fn has(&self, keyword: &str) -> bool {
        self.map.contains_key(keyword)
    }

    pub fn str(&self, keyword: &str) -> Option<&'a str> {
        self.get(keyword).and_then(Value::as_str)
    }

    pub fn u64(&self, keyword: &str) -> Option<u64> {
        self.get(keyword).and_then(Value::as_u64)
    }

    pub fn title(&self) -> Option<&'a str> {
        self.str("title").filter(|title| !title.is_empty())
    }

    /// The `properties` map, if present.
    pub fn properties(&self) -> Option<&'a Map<String, Value>> {
        self.get("properties").and_then(Value::as_object)
    }

    /// Whether `name` is listed in this node's `required` array.
    pub fn requires(&self, name: &str) -> bool {
        self.get("required")
            .and_then(Value::as_array)
            .is_some_and(|names| names.iter().any(|n| n.as_str() == Some(name)))
    }

    pub fn declared_type(&self) -> DeclaredType {
        match self.get("type") {
            None => DeclaredType::Untyped,
            Some(Value::String(name)) => match JsonType::parse(name) {
                Some(ty) => DeclaredType::One(ty),
                None => DeclaredType::Unknown(name.clone()),
            },
            Some(Value::Array(names)) => {
                let mut types = Vec::new();
                for name in names {
                    match name.as_str().and_then(JsonType::parse) {
                        Some(ty) if !types.contains(&ty) => types.push(ty),
                        Some(_) => {}
                        None => return DeclaredType::Unknown(name.to_string()),
                    }
                }
                match types.len() {
                    0 => DeclaredType::Untyped,
                    1 => DeclaredType::One(types[0]),
                    _ => DeclaredType::Many(types),
                }
            }
            Some(other) => DeclaredType::Unknown(other.to_string()),
        }
    }

    /// True for `type: "object"` nodes that declare `properties`.
    pub fn is_object_with_properties(&self) -> bool {
        self.declared_type() == DeclaredType::One(JsonType::Object) && self.properties().is_some()
    }

    pub fn as_value(&self) -> &'a Value {
        self.value
    }
}

/// Dotted path of property keys from the document root.
///
/// Array `items` and `contains` do not add a segment, so the path of a
/// field inside array elements is the array's path plus the field key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment, if any.
    pub fn key(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
