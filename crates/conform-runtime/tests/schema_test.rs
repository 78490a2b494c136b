//! End-to-end checks of hand-built schemas.

use conform_runtime::{Schema, SchemaBuilder, StringFormat, ValidateOptions};
use pretty_assertions::assert_eq;
use regex::Regex;
use serde_json::json;

fn profile() -> Schema {
    Schema::object()
        .field(
            "email",
            Schema::string()
                .required("Email is required")
                .format(StringFormat::Email, "Email is an invalid email format"),
        )
        .field(
            "code",
            Schema::string().matches(
                Regex::new("^[A-Z]{3}$").unwrap(),
                "Code is an incorrect format",
            ),
        )
        .field(
            "age",
            Schema::number()
                .integer("Age is not of type integer")
                .min(0.0, "Age requires a minimum value of 0"),
        )
        .field(
            "tags",
            Schema::array()
                .of(Schema::string().type_error("Tags is not of type string"))
                .unique("Tags values are not unique"),
        )
        .into()
}

#[test]
fn test_valid_profile() {
    let value = json!({"email": "a@b.io", "code": "ABC", "age": 3, "tags": ["x", "y"]});
    assert_eq!(profile().validate_sync(&value).unwrap(), value);
}

#[test]
fn test_collect_all_reports_in_field_order() {
    let value = json!({"email": "nope", "code": "abc", "age": -1.5, "tags": ["x", "x", 1]});
    let errors = profile()
        .validate_sync_with(&value, ValidateOptions::collect_all())
        .unwrap_err();

    let found: Vec<(String, String)> = errors
        .into_iter()
        .map(|e| (e.path, e.message))
        .collect();
    assert_eq!(
        found,
        vec![
            ("email".to_string(), "Email is an invalid email format".to_string()),
            ("code".to_string(), "Code is an incorrect format".to_string()),
            ("age".to_string(), "Age is not of type integer".to_string()),
            ("tags".to_string(), "Tags values are not unique".to_string()),
            ("tags[2]".to_string(), "Tags is not of type string".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_async_matches_collect_all() {
    let value = json!({"code": 1});
    let sync = profile()
        .validate_sync_with(&value, ValidateOptions::collect_all())
        .unwrap_err();
    let async_errors = profile().validate(&value).await.unwrap_err();
    assert_eq!(sync, async_errors);
    assert_eq!(async_errors.len(), 2);
}

#[test]
fn test_nullable_required_field() {
    let schema = Schema::object().field(
        "note",
        Schema::string().nullable().required("Note is required"),
    );
    let errors = schema.validate_sync(&json!({"note": null})).unwrap_err();
    assert_eq!(errors.messages(), vec!["Note is required"]);

    let optional = Schema::object().field("note", Schema::string().nullable());
    assert!(optional.is_valid(&json!({"note": null})));
}
