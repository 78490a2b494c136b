//! Compiling a realistic schema with a YAML error configuration

mod fixtures;

use conform_compiler::{convert, Compiler, DiagnosticCategory};
use conform_runtime::{ObjectSchema, ValidateOptions};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn profile() -> ObjectSchema {
    convert(
        &fixtures::load_schema("profile"),
        &fixtures::load_config("profile"),
    )
    .unwrap()
}

fn errors(value: Value) -> Vec<(String, String)> {
    match profile().validate_sync_with(&value, ValidateOptions::collect_all()) {
        Ok(_) => Vec::new(),
        Err(errors) => errors.into_iter().map(|e| (e.path, e.message)).collect(),
    }
}

fn pair(path: &str, message: &str) -> (String, String) {
    (path.to_string(), message.to_string())
}

#[test]
fn test_valid_profile() {
    let value = json!({
        "name": "Ada Lovelace",
        "age": 36,
        "email": "ada@example.com",
        "phones": ["+44 20 7946 0000"],
        "role": "admin",
        "website": "https://example.com/ada",
        "settings": {"theme": "dark", "notifications": true},
        "notes": "anything goes"
    });
    assert_eq!(profile().validate_sync(&value).unwrap(), value);
}

#[test]
fn test_required_messages() {
    assert_eq!(
        errors(json!({})),
        vec![
            pair("name", "Tell us your name"),
            pair("email", "This field is required"),
            pair("settings", "This field is required"),
        ]
    );
}

#[test]
fn test_constraint_messages() {
    assert_eq!(
        errors(json!({
            "name": "A",
            "age": 200,
            "email": "not-an-email",
            "phones": ["12"],
            "role": "owner",
            "website": "not a uri",
            "settings": {"theme": "blue"}
        })),
        vec![
            pair("name", "Your name is too short"),
            pair("age", "That is older than anyone alive"),
            pair("email", "Email is an invalid email format"),
            pair("phones[0]", "Phones is an incorrect format"),
            pair("role", "Role does not match any of the enumerables"),
            pair("website", "Website is an invalid uri format"),
            pair("settings.theme", "Pick light or dark"),
        ]
    );
}

#[test]
fn test_type_messages() {
    assert_eq!(
        errors(json!({
            "name": 5,
            "age": 1.5,
            "email": "ada@example.com",
            "phones": ["+44 20 7946 0000", "+44 20 7946 0000"],
            "website": null,
            "settings": []
        })),
        vec![
            pair("name", "Please enter text"),
            pair("age", "Age is not of type integer"),
            pair("phones", "Phones values are not unique"),
            pair("settings", "Settings is not of type object"),
        ]
    );
}

#[test]
fn test_pruned_profile_compiles_strictly() {
    let document = fixtures::load_schema("profile");
    let config = fixtures::load_config("profile");

    let compiled = Compiler::new(config.clone())
        .strict(true)
        .compile(&document)
        .unwrap();
    assert!(compiled.diagnostics.is_empty());

    let unpruned = Compiler::new(config).prune(false).compile(&document).unwrap();
    let skipped: Vec<_> = unpruned
        .diagnostics
        .by_category(DiagnosticCategory::UntypedProperty)
        .map(|d| d.path.as_str())
        .collect();
    assert_eq!(skipped, vec!["notes"]);
}
