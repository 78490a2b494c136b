//! Single-field validators, one constructor per JSON Schema type.

use conform_runtime::{
    ArraySchema, BooleanSchema, MixedSchema, NullSchema, NumberSchema, Schema, SchemaBuilder,
    StringFormat, StringSchema,
};
use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::builder::{Builder, Field};
use crate::diagnostics::DiagnosticCategory;
use crate::messages::Keyword;
use crate::schema_node::{DeclaredType, JsonType, SchemaNode};

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// A numeric keyword with its bound rendered for messages.
fn bound(node: SchemaNode<'_>, keyword: &str) -> Option<(f64, String)> {
    match node.get(keyword)? {
        Value::Number(n) => n.as_f64().map(|f| (f, n.to_string())),
        _ => None,
    }
}

impl Builder<'_> {
    /// Compile a non-object property. `None` when the property cannot be
    /// compiled (untyped without constraints, unknown type).
    pub(crate) fn leaf(&mut self, field: &Field<'_>) -> Option<Schema> {
        match field.node.declared_type() {
            DeclaredType::One(ty) => Some(self.typed(field, ty)),
            DeclaredType::Many(types) => {
                trace!("{}: lazy schema over {:?}", field.path, types);
                let candidates = types.into_iter().map(|ty| self.typed(field, ty)).collect();
                Some(Schema::lazy(candidates))
            }
            DeclaredType::Untyped => {
                let node = field.node;
                if node.has("enum") || node.has("const") || field.required {
                    Some(self.finish_mixed(MixedSchema::new(), field).into())
                } else {
                    self.diagnose(
                        DiagnosticCategory::UntypedProperty,
                        &field.path,
                        "property has no type and was skipped",
                    );
                    None
                }
            }
            DeclaredType::Unknown(name) => {
                self.diagnose(
                    DiagnosticCategory::UnknownType,
                    &field.path,
                    format!("unknown type {}", name),
                );
                None
            }
        }
    }

    fn typed(&mut self, field: &Field<'_>, ty: JsonType) -> Schema {
        match ty {
            JsonType::String => self.string_schema(field).into(),
            JsonType::Number | JsonType::Integer => self.number_schema(field, ty).into(),
            JsonType::Boolean => self.finish(BooleanSchema::new(), field, ty).into(),
            JsonType::Null => self.finish(NullSchema::new(), field, ty).into(),
            JsonType::Array => self.array_schema(field).into(),
            JsonType::Object => self.nested_object(field).into(),
        }
    }

    /// Layer the type error, allowed values and required status common to
    /// every primitive.
    pub(crate) fn finish<S: SchemaBuilder>(&self, schema: S, field: &Field<'_>, ty: JsonType) -> S {
        let schema = schema.type_error(self.message(field, Keyword::Type(ty), ty.as_str()));
        self.finish_mixed(schema, field)
    }

    fn finish_mixed<S: SchemaBuilder>(&self, mut schema: S, field: &Field<'_>) -> S {
        let node = field.node;
        if node.get("nullable") == Some(&Value::Bool(true)) {
            schema = schema.nullable();
        }
        if let Some(Value::Array(values)) = node.get("enum") {
            schema = schema.one_of(values.clone(), self.message(field, Keyword::Enum, ""));
        }
        if let Some(constant) = node.get("const") {
            schema = schema.one_of(vec![constant.clone()], self.message(field, Keyword::Const, ""));
        }
        if field.required {
            schema = schema.required(self.message(field, Keyword::Required, ""));
        }
        schema
    }

    fn string_schema(&mut self, field: &Field<'_>) -> StringSchema {
        let node = field.node;
        let mut schema = StringSchema::new();

        if let Some(min) = node.u64("minLength") {
            let message = self.message(field, Keyword::MinLength, &min.to_string());
            schema = schema.min_length(to_usize(min), message);
        }
        if let Some(max) = node.u64("maxLength") {
            let message = self.message(field, Keyword::MaxLength, &max.to_string());
            schema = schema.max_length(to_usize(max), message);
        }
        if let Some(pattern) = node.str("pattern") {
            match Regex::new(pattern) {
                Ok(regex) => {
                    let message = self.message(field, Keyword::Pattern, pattern);
                    schema = schema.matches(regex, message);
                }
                Err(e) => self.diagnose(
                    DiagnosticCategory::InvalidPattern,
                    &field.path,
                    format!("invalid pattern {:?}: {}", pattern, e),
                ),
            }
        }
        if let Some(name) = node.str("format") {
            let format = StringFormat::parse(name);
            if format.is_known() {
                let message = self.message(field, Keyword::Format, name);
                schema = schema.format(format, message);
            } else {
                self.diagnose(
                    DiagnosticCategory::UnknownFormat,
                    &field.path,
                    format!("format {} is not checked", name),
                );
            }
        }

        self.finish(schema, field, JsonType::String)
    }

    fn number_schema(&self, field: &Field<'_>, ty: JsonType) -> NumberSchema {
        let node = field.node;
        let mut schema = NumberSchema::new();

        if ty == JsonType::Integer {
            schema = schema.integer(self.message(field, Keyword::Type(ty), ty.as_str()));
        }

        // Draft-04 style boolean exclusive bounds turn minimum/maximum exclusive.
        let exclusive_min = node.get("exclusiveMinimum") == Some(&Value::Bool(true));
        let exclusive_max = node.get("exclusiveMaximum") == Some(&Value::Bool(true));

        if let Some((min, shown)) = bound(node, "minimum") {
            schema = if exclusive_min {
                let message = self.message(field, Keyword::ExclusiveMinimum, &shown);
                schema.more_than(min, message)
            } else {
                let message = self.message(field, Keyword::Minimum, &shown);
                schema.min(min, message)
            };
        }
        if let Some((max, shown)) = bound(node, "maximum") {
            schema = if exclusive_max {
                let message = self.message(field, Keyword::ExclusiveMaximum, &shown);
                schema.less_than(max, message)
            } else {
                let message = self.message(field, Keyword::Maximum, &shown);
                schema.max(max, message)
            };
        }
        if let Some((min, shown)) = bound(node, "exclusiveMinimum") {
            let message = self.message(field, Keyword::ExclusiveMinimum, &shown);
            schema = schema.more_than(min, message);
        }
        if let Some((max, shown)) = bound(node, "exclusiveMaximum") {
            let message = self.message(field, Keyword::ExclusiveMaximum, &shown);
            schema = schema.less_than(max, message);
        }
        if let Some((factor, shown)) = bound(node, "multipleOf") {
            let message = self.message(field, Keyword::MultipleOf, &shown);
            schema = schema.multiple_of(factor, message);
        }

        self.finish(schema, field, ty)
    }

    fn array_schema(&mut self, field: &Field<'_>) -> ArraySchema {
        let node = field.node;
        let mut schema = ArraySchema::new();

        if let Some(min) = node.u64("minItems") {
            let message = self.message(field, Keyword::MinItems, &min.to_string());
            schema = schema.min_items(to_usize(min), message);
        }
        if let Some(max) = node.u64("maxItems") {
            let message = self.message(field, Keyword::MaxItems, &max.to_string());
            schema = schema.max_items(to_usize(max), message);
        }
        if node.get("uniqueItems") == Some(&Value::Bool(true)) {
            schema = schema.unique(self.message(field, Keyword::UniqueItems, ""));
        }

        match node.get("items") {
            Some(items @ Value::Object(_)) => {
                if let Some(item) = self.item(items, field) {
                    schema = schema.of(item);
                }
            }
            Some(Value::Array(tuple)) => {
                let items = tuple
                    .iter()
                    .map(|item| {
                        self.item(item, field)
                            .unwrap_or_else(|| MixedSchema::new().into())
                    })
                    .collect();
                schema = schema.tuple(items, self.message(field, Keyword::Tuple, ""));
            }
            _ => {}
        }

        if let Some(contains) = node.get("contains") {
            if let Some(item) = self.item(contains, field) {
                let message = self.message(field, Keyword::Contains, item.type_name());
                schema = schema.contains(item, message);
            }
        }

        self.finish(schema, field, JsonType::Array)
    }

    /// Compile an `items`/`contains` schema at the array's own path.
    fn item(&mut self, value: &Value, array: &Field<'_>) -> Option<Schema> {
        let resolved = self.resolve(value, &array.path);
        let Some(node) = SchemaNode::new(&resolved) else {
            self.diagnose(
                DiagnosticCategory::MalformedProperty,
                &array.path,
                format!("array item schema is not a schema object: {}", value),
            );
            return None;
        };
        let item = Field {
            node,
            path: array.path.clone(),
            label: node
                .title()
                .map(String::from)
                .unwrap_or_else(|| array.label.clone()),
            required: false,
        };
        self.leaf(&item)
    }
}
