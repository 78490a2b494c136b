//! Removal of empty schema objects before compilation.

use serde_json::{Map, Value};

/// Keywords whose values are data, not schemas; never pruned.
const DATA_KEYWORDS: [&str; 4] = ["enum", "const", "default", "examples"];

/// Drop every object member whose value is an empty object.
///
/// Pruning is bottom-up: an object that only held empty objects becomes
/// empty itself and is dropped too, so applying it twice changes nothing.
/// Array elements are pruned inside but never removed, which keeps tuple
/// positions stable.
pub fn remove_empty_objects(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(prune_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(remove_empty_objects).collect()),
        other => other.clone(),
    }
}

fn prune_map(map: &Map<String, Value>) -> Map<String, Value> {
    let mut pruned = Map::new();
    for (key, value) in map {
        if DATA_KEYWORDS.contains(&key.as_str()) {
            pruned.insert(key.clone(), value.clone());
            continue;
        }
        let value = remove_empty_objects(value);
        if !matches!(&value, Value::Object(m) if m.is_empty()) {
            pruned.insert(key.clone(), value);
        }
    }
    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_prunes_bottom_up() {
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {},
                "b": {"properties": {"c": {}}},
                "d": {"type": "string"}
            }
        });
        assert_eq!(
            remove_empty_objects(&schema),
            json!({"type": "object", "properties": {"d": {"type": "string"}}})
        );
    }

    #[test]
    fn test_keeps_data_and_tuple_positions() {
        let schema = json!({
            "default": {},
            "const": {},
            "items": [{}, {"type": "string"}]
        });
        assert_eq!(remove_empty_objects(&schema), schema);
    }

    fn json_tree() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            "[a-z]{0,4}".prop_map(Value::from),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                prop::collection::btree_map("[a-e]{1,2}|enum|default", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_pruning_is_idempotent(value in json_tree()) {
            let once = remove_empty_objects(&value);
            prop_assert_eq!(remove_empty_objects(&once), once);
        }
    }
}
