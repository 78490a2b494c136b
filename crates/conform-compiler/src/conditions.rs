//! Flattening of conditionally declared properties.
//!
//! Properties that only appear inside `if`/`then`/`else` or an
//! `allOf`/`anyOf`/`oneOf` branch get a placeholder `{"type": ..}` entry in
//! the node's own `properties`, so the rest of the compiler sees one flat
//! property map per node. Declared properties are never altered. When
//! branches disagree on a name's type the placeholder accepts every branch
//! type, so alternatives are left to the composition checks.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::definitions::merge_definition;
use crate::diagnostics::{DiagnosticCategory, Diagnostics};
use crate::schema_node::{FieldPath, JsonType};

const SINGLE_BRANCHES: [&str; 3] = ["if", "then", "else"];
const BRANCH_LISTS: [&str; 3] = ["allOf", "anyOf", "oneOf"];

/// Whether a node carries any conditional or combination keyword.
pub fn has_conditions(node: &Value) -> bool {
    SINGLE_BRANCHES
        .iter()
        .chain(BRANCH_LISTS.iter())
        .any(|keyword| node.get(*keyword).is_some())
}

/// Back-fill placeholder properties from conditional branches.
///
/// Returns a new node; `node` itself is left untouched.
pub fn merge_conditions(node: &Value, document: &Value) -> Value {
    merge_conditions_with(node, document, &FieldPath::root(), &mut Diagnostics::new())
}

pub(crate) fn merge_conditions_with(
    node: &Value,
    document: &Value,
    path: &FieldPath,
    diagnostics: &mut Diagnostics,
) -> Value {
    let Value::Object(map) = node else {
        return node.clone();
    };
    if !has_conditions(node) {
        return node.clone();
    }

    let mut placeholders = Map::new();
    let mut conflicts = Vec::new();
    collect_placeholders(map, document, &mut placeholders, &mut conflicts);
    for (key, message) in conflicts {
        type_conflict(diagnostics, path.child(&key), message);
    }
    if placeholders.is_empty() {
        return node.clone();
    }

    let mut merged = map.clone();
    let properties = merged
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(properties) = properties else {
        warn!("{}: `properties` is not an object, conditions not merged", path);
        return node.clone();
    };

    for (key, placeholder) in placeholders {
        match properties.get(&key) {
            Some(declared) => {
                let declared = merge_definition(declared, document).unwrap_or_else(|| declared.clone());
                if let (Some(declared_type), Some(branch_type)) =
                    (declared.get("type"), placeholder.get("type"))
                {
                    let branch_types = type_names(branch_type);
                    if type_names(declared_type)
                        .iter()
                        .any(|ty| !branch_types.contains(ty))
                    {
                        type_conflict(
                            diagnostics,
                            path.child(&key),
                            format!(
                                "declared type {} differs from condition type {}",
                                declared_type, branch_type
                            ),
                        );
                    }
                }
            }
            None => {
                debug!("{}: placeholder for conditional property '{}'", path, key);
                properties.insert(key, placeholder);
            }
        }
    }
    Value::Object(merged)
}

fn type_conflict(diagnostics: &mut Diagnostics, path: FieldPath, message: String) {
    warn!("{}: {}", path, message);
    diagnostics.record(DiagnosticCategory::TypeConflict, path.to_string(), message);
}

/// Type names of a `type` keyword value, string or list form.
fn type_names(ty: &Value) -> Vec<Value> {
    match ty {
        Value::Array(names) => names.clone(),
        other => vec![other.clone()],
    }
}

/// Key and message of each placeholder whose branches disagree on type.
type Conflicts = Vec<(String, String)>;

fn collect_placeholders(
    node: &Map<String, Value>,
    document: &Value,
    out: &mut Map<String, Value>,
    conflicts: &mut Conflicts,
) {
    for keyword in SINGLE_BRANCHES {
        if let Some(branch) = node.get(keyword) {
            collect_branch(branch, document, out, conflicts);
        }
    }
    for keyword in BRANCH_LISTS {
        if let Some(Value::Array(branches)) = node.get(keyword) {
            for branch in branches {
                collect_branch(branch, document, out, conflicts);
            }
        }
    }
}

fn collect_branch(
    branch: &Value,
    document: &Value,
    out: &mut Map<String, Value>,
    conflicts: &mut Conflicts,
) {
    let resolved = merge_definition(branch, document);
    let Some(branch) = resolved.as_ref().unwrap_or(branch).as_object() else {
        return;
    };
    if let Some(properties) = branch.get("properties").and_then(Value::as_object) {
        for (key, property) in properties {
            let property = merge_definition(property, document).unwrap_or_else(|| property.clone());
            if let Some(ty) = infer_type(&property) {
                add_placeholder(out, key, ty, conflicts);
            }
        }
    }
    collect_placeholders(branch, document, out, conflicts);
}

/// Record a branch type for `key`, widening an earlier placeholder to a
/// type list when the branches disagree.
fn add_placeholder(out: &mut Map<String, Value>, key: &str, ty: Value, conflicts: &mut Conflicts) {
    let Some(existing) = out.get(key).and_then(|p| p.get("type")) else {
        out.insert(key.to_string(), json!({ "type": ty }));
        return;
    };
    let mut names = type_names(existing);
    let before = names.len();
    for name in type_names(&ty) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if names.len() == before {
        return;
    }
    conflicts.push((
        key.to_string(),
        format!("condition branches disagree on type: {} and {}", existing, ty),
    ));
    out.insert(key.to_string(), json!({ "type": names }));
}

/// The branch property's declared `type`, else the type of its `const` or
/// of its `enum` values when they all agree.
fn infer_type(property: &Value) -> Option<Value> {
    if let Some(ty) = property.get("type") {
        return Some(ty.clone());
    }
    if let Some(constant) = property.get("const") {
        return Some(Value::from(JsonType::of_value(constant).as_str()));
    }
    let values = property.get("enum")?.as_array()?;
    let first = JsonType::of_value(values.first()?);
    values
        .iter()
        .all(|v| JsonType::of_value(v) == first)
        .then(|| Value::from(first.as_str()))
}
