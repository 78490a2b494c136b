//! `$ref` resolution against the document being compiled.
//!
//! Only local references (`#/definitions/x`, `#/$defs/x`, or any other
//! JSON pointer into the document) resolve. Resolution is single-level:
//! the returned definition may carry its own `$ref`, which the caller
//! resolves on its next pass.

use serde_json::{Map, Value};
use tracing::trace;

/// Outcome of looking up a node's `$ref`.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// The node has no `$ref`.
    NoRef,
    /// Copy of the referenced schema object.
    Found(Map<String, Value>),
    /// A local pointer that does not reach a schema object.
    Dangling(String),
    /// A reference into another document.
    External(String),
}

/// Look up the definition referenced by `node`.
pub fn lookup_definition(node: &Value, document: &Value) -> Definition {
    let Some(reference) = node.get("$ref").and_then(Value::as_str) else {
        return Definition::NoRef;
    };
    let Some(pointer) = reference.strip_prefix('#') else {
        return Definition::External(reference.to_string());
    };
    let Ok(pointer) = urlencoding::decode(pointer) else {
        return Definition::Dangling(reference.to_string());
    };
    match document.pointer(&pointer) {
        Some(Value::Object(definition)) => {
            trace!("Resolved {}", reference);
            Definition::Found(definition.clone())
        }
        _ => Definition::Dangling(reference.to_string()),
    }
}

/// The referenced definition, or `None` when there is no `$ref` or it
/// does not resolve.
pub fn get_definition(node: &Value, document: &Value) -> Option<Value> {
    match lookup_definition(node, document) {
        Definition::Found(definition) => Some(Value::Object(definition)),
        _ => None,
    }
}

/// Resolve `node`'s `$ref` and layer its sibling keywords over the
/// definition. Returns `None` when nothing was resolved.
pub fn merge_definition(node: &Value, document: &Value) -> Option<Value> {
    let Value::Object(siblings) = node else {
        return None;
    };
    let Definition::Found(mut merged) = lookup_definition(node, document) else {
        return None;
    };
    for (keyword, value) in siblings {
        if keyword != "$ref" {
            merged.insert(keyword.clone(), value.clone());
        }
    }
    Some(Value::Object(merged))
}

/// Resolve `$ref`s inside an array node's `items` (single schema or tuple)
/// and `contains`. Returns `None` when nothing changed.
pub fn merge_array_items_definition(node: &Value, document: &Value) -> Option<Value> {
    let Value::Object(map) = node else {
        return None;
    };
    let mut changed = false;
    let mut merged = map.clone();

    match map.get("items") {
        Some(items @ Value::Object(_)) => {
            if let Some(resolved) = merge_definition(items, document) {
                merged.insert("items".to_string(), resolved);
                changed = true;
            }
        }
        Some(Value::Array(tuple)) => {
            let resolved: Vec<Value> = tuple
                .iter()
                .map(|item| match merge_definition(item, document) {
                    Some(resolved) => {
                        changed = true;
                        resolved
                    }
                    None => item.clone(),
                })
                .collect();
            merged.insert("items".to_string(), Value::Array(resolved));
        }
        _ => {}
    }

    if let Some(contains) = map.get("contains") {
        if let Some(resolved) = merge_definition(contains, document) {
            merged.insert("contains".to_string(), resolved);
            changed = true;
        }
    }

    changed.then_some(Value::Object(merged))
}
