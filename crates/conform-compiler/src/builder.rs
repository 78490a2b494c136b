//! The recursive walk from a JSON Schema node to an [`ObjectSchema`].

use conform_runtime::{ObjectSchema, Schema, SchemaBuilder};
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace, warn};

use crate::conditions::merge_conditions_with;
use crate::config::Config;
use crate::definitions::{
    lookup_definition, merge_array_items_definition, merge_definition, Definition,
};
use crate::diagnostics::{DiagnosticCategory, Diagnostics};
use crate::messages::{label_for, Keyword, MessageResolver};
use crate::schema_node::{is_schema_object, FieldPath, JsonType, SchemaNode};

/// Label of the document root when it has no `title`.
const ROOT_LABEL: &str = "Value";

/// Number of `$ref` passes applied to each property.
const REF_PASSES: usize = 2;

/// State of one compilation.
pub(crate) struct Builder<'d> {
    document: &'d Value,
    messages: MessageResolver<'d>,
    diagnostics: Diagnostics,
}

/// A property being compiled.
pub(crate) struct Field<'n> {
    pub node: SchemaNode<'n>,
    pub path: FieldPath,
    pub label: String,
    /// Listed in the enclosing object's `required`
    pub required: bool,
}

impl<'d> Builder<'d> {
    pub fn new(document: &'d Value, config: &'d Config) -> Self {
        Self {
            document,
            messages: MessageResolver::new(&config.errors),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub(crate) fn diagnose(
        &mut self,
        category: DiagnosticCategory,
        path: &FieldPath,
        message: impl Into<String>,
    ) {
        let message = message.into();
        warn!("{}: {}", path, message);
        self.diagnostics.record(category, path.to_string(), message);
    }

    pub(crate) fn message(&self, field: &Field<'_>, keyword: Keyword, detail: &str) -> String {
        self.messages
            .resolve(&field.path, &field.label, keyword, detail)
    }

    /// Compile the whole document; `None` when it has no `properties`.
    pub fn build_root(&mut self) -> Option<ObjectSchema> {
        let document = self.document;
        let label = SchemaNode::new(document)
            .and_then(|node| node.title())
            .unwrap_or(ROOT_LABEL)
            .to_string();
        let path = FieldPath::root();
        let object = self.build_object(document, &path, &label)?;
        let message = self
            .messages
            .resolve(&path, &label, Keyword::Type(JsonType::Object), "object");
        Some(object.type_error(message))
    }

    /// Build the shape of an object node and its compositions.
    ///
    /// Returns `None` when the node (after condition merging) has no
    /// `properties`.
    #[instrument(skip(self, node, path, label), fields(path = %path), level = "debug")]
    pub fn build_object(
        &mut self,
        node: &Value,
        path: &FieldPath,
        label: &str,
    ) -> Option<ObjectSchema> {
        let merged = merge_conditions_with(node, self.document, path, &mut self.diagnostics);
        let schema_node = SchemaNode::new(&merged)?;
        let Some(properties) = schema_node.properties() else {
            debug!("No properties, nothing to build");
            return None;
        };
        Some(self.shape(schema_node, properties, path, label))
    }

    fn shape(
        &mut self,
        node: SchemaNode<'_>,
        properties: &Map<String, Value>,
        path: &FieldPath,
        label: &str,
    ) -> ObjectSchema {
        let mut fields = Vec::with_capacity(properties.len());

        for (key, value) in properties {
            let child_path = path.child(key);
            if !is_schema_object(value) {
                self.diagnose(
                    DiagnosticCategory::MalformedProperty,
                    &child_path,
                    format!("property value is not a schema object: {}", value),
                );
                continue;
            }

            let resolved = self.resolve(value, &child_path);
            let Some(child) = SchemaNode::new(&resolved) else {
                continue;
            };
            let field = Field {
                node: child,
                label: label_for(child.title(), key),
                required: node.requires(key),
                path: child_path,
            };

            let compiled = if child.is_object_with_properties() {
                trace!("{}: nested object", field.path);
                Some(Schema::from(self.nested_object(&field)))
            } else {
                self.leaf(&field)
            };
            if let Some(schema) = compiled {
                fields.push((key.clone(), schema));
            }
        }

        let object = ObjectSchema::new().shape(fields);
        self.compositions(object, node, path, label)
    }

    /// Object-typed property: its own shape wrapped with the property's
    /// type, required and allowed-value messages.
    pub(crate) fn nested_object(&mut self, field: &Field<'_>) -> ObjectSchema {
        let shape = self
            .build_object(field.node.as_value(), &field.path, &field.label)
            .unwrap_or_default();
        self.finish(shape, field, JsonType::Object)
    }

    /// Resolve a property's `$ref` (twice, so a reference inside the
    /// referenced definition is followed too) and the `$ref`s of its array
    /// items.
    pub(crate) fn resolve(&mut self, value: &Value, path: &FieldPath) -> Value {
        let mut resolved = value.clone();
        for _ in 0..REF_PASSES {
            match lookup_definition(&resolved, self.document) {
                Definition::NoRef => break,
                Definition::Found(_) => {
                    if let Some(merged) = merge_definition(&resolved, self.document) {
                        resolved = merged;
                    }
                }
                Definition::Dangling(reference) => {
                    self.diagnose(
                        DiagnosticCategory::DanglingRef,
                        path,
                        format!("no definition for {}", reference),
                    );
                    break;
                }
                Definition::External(reference) => {
                    self.diagnose(
                        DiagnosticCategory::ExternalRef,
                        path,
                        format!("external reference {} is not resolved", reference),
                    );
                    break;
                }
            }
        }
        if let Some(merged) = merge_array_items_definition(&resolved, self.document) {
            resolved = merged;
        }
        resolved
    }

    fn compositions(
        &mut self,
        mut object: ObjectSchema,
        node: SchemaNode<'_>,
        path: &FieldPath,
        label: &str,
    ) -> ObjectSchema {
        if let Some(condition) = node.get("if") {
            object = self.conditional(
                object,
                condition,
                node.get("then"),
                node.get("else"),
                node,
                path,
                label,
            );
        }

        if let Some(Value::Array(entries)) = node.get("allOf") {
            for entry in entries {
                let entry = merge_definition(entry, self.document).unwrap_or_else(|| entry.clone());
                match entry.get("if") {
                    Some(condition) if entry.get("properties").is_none() => {
                        object = self.conditional(
                            object,
                            condition,
                            entry.get("then"),
                            entry.get("else"),
                            node,
                            path,
                            label,
                        );
                    }
                    _ => {
                        let branch = self.branch(&entry, node, path, label);
                        object = object.all_of(branch);
                    }
                }
            }
        }

        if let Some(Value::Array(entries)) = node.get("anyOf") {
            let branches = entries
                .iter()
                .map(|entry| self.branch(entry, node, path, label))
                .collect();
            let message = self.messages.resolve(path, label, Keyword::AnyOf, "");
            object = object.any_of(branches, message);
        }

        if let Some(Value::Array(entries)) = node.get("oneOf") {
            let branches = entries
                .iter()
                .map(|entry| self.branch(entry, node, path, label))
                .collect();
            let message = self.messages.resolve(path, label, Keyword::OneOf, "");
            object = object.exactly_one_of(branches, message);
        }

        object
    }

    #[allow(clippy::too_many_arguments)]
    fn conditional(
        &mut self,
        object: ObjectSchema,
        condition: &Value,
        then: Option<&Value>,
        otherwise: Option<&Value>,
        base: SchemaNode<'_>,
        path: &FieldPath,
        label: &str,
    ) -> ObjectSchema {
        if then.is_none() && otherwise.is_none() {
            return object;
        }
        debug!("{}: conditional branches", path);
        let condition = self.branch(condition, base, path, label);
        let then = then.map(|branch| self.branch(branch, base, path, label));
        let otherwise = otherwise.map(|branch| self.branch(branch, base, path, label));
        object.when(condition, then, otherwise)
    }

    /// Compile a condition or combination branch against its base node.
    fn branch(
        &mut self,
        branch: &Value,
        base: SchemaNode<'_>,
        path: &FieldPath,
        label: &str,
    ) -> ObjectSchema {
        let resolved = merge_definition(branch, self.document).unwrap_or_else(|| branch.clone());
        let inherited = inherit_types(&resolved, base, self.document);
        let merged = merge_conditions_with(&inherited, self.document, path, &mut self.diagnostics);
        let Some(node) = SchemaNode::new(&merged) else {
            return ObjectSchema::new();
        };
        let empty = Map::new();
        let properties = node.properties().unwrap_or(&empty);
        self.shape(node, properties, path, label)
    }
}

/// Give branch properties the base property's `type` when they declare
/// none, and add a property for every `required` name the branch does not
/// describe.
fn inherit_types(branch: &Value, base: SchemaNode<'_>, document: &Value) -> Value {
    let Value::Object(map) = branch else {
        return branch.clone();
    };
    let base_type = |key: &str| -> Option<Value> {
        let property = base.properties()?.get(key)?;
        let resolved = merge_definition(property, document);
        resolved.as_ref().unwrap_or(property).get("type").cloned()
    };

    let mut properties = map
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for (key, property) in properties.iter_mut() {
        if let Value::Object(property) = property {
            if !property.contains_key("type") && !property.contains_key("$ref") {
                if let Some(ty) = base_type(key.as_str()) {
                    property.insert("type".to_string(), ty);
                }
            }
        }
    }

    let required = map
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect::<Vec<_>>())
        .unwrap_or_default();
    for name in required {
        if !properties.contains_key(name) {
            let mut property = Map::new();
            if let Some(ty) = base_type(name) {
                property.insert("type".to_string(), ty);
            }
            properties.insert(name.to_string(), Value::Object(property));
        }
    }

    let mut inherited = map.clone();
    if !properties.is_empty() {
        inherited.insert("properties".to_string(), Value::Object(properties));
    }
    Value::Object(inherited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_inherit_types() {
        let base = json!({
            "properties": {
                "country": {"type": "string"},
                "zip": {"type": "string", "minLength": 5}
            }
        });
        let branch = json!({
            "properties": {"country": {"const": "US"}},
            "required": ["zip", "extra"]
        });
        let inherited = inherit_types(&branch, SchemaNode::new(&base).unwrap(), &base);
        assert_eq!(
            inherited["properties"],
            json!({
                "country": {"const": "US", "type": "string"},
                "zip": {"type": "string"},
                "extra": {}
            })
        );
    }

    #[test]
    fn test_resolve_records_dangling_refs() {
        let document = json!({"definitions": {}});
        let config = Config::default();
        let mut builder = Builder::new(&document, &config);
        let path = FieldPath::root().child("a");

        let resolved = builder.resolve(&json!({"$ref": "#/definitions/x", "type": "string"}), &path);
        assert_eq!(resolved, json!({"$ref": "#/definitions/x", "type": "string"}));

        let diagnostics = builder.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].category, DiagnosticCategory::DanglingRef);
        assert_eq!(diagnostics.entries()[0].path, "a");
    }

    #[test]
    fn test_resolve_follows_two_levels() {
        let document = json!({
            "definitions": {
                "name": {"type": "string"},
                "alias": {"$ref": "#/definitions/name", "minLength": 2}
            }
        });
        let config = Config::default();
        let mut builder = Builder::new(&document, &config);
        let resolved = builder.resolve(
            &json!({"$ref": "#/definitions/alias", "title": "Alias"}),
            &FieldPath::root(),
        );
        assert_eq!(
            resolved,
            json!({"type": "string", "minLength": 2, "title": "Alias"})
        );
        assert!(builder.into_diagnostics().is_empty());
    }
}
