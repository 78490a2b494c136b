//! End-to-end tests for schema and data file handling

use std::fs;
use std::path::{Path, PathBuf};

use conform::{load_config, load_document, run_check, run_validate, CompileArgs, Outcome};
use tempfile::TempDir;

const SCHEMA: &str = r#"{
    "title": "Order",
    "properties": {
        "id": {"type": "string", "minLength": 3},
        "quantity": {"type": "integer", "minimum": 1}
    },
    "required": ["id", "quantity"]
}"#;

const ERRORS: &str = r#"
errors:
  id:
    required: Every order needs an id
  defaults:
    minimum: Too few
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn args(dir: &TempDir, config: Option<&Path>) -> CompileArgs {
    CompileArgs {
        schema: write(dir, "order.schema.json", SCHEMA),
        config: config.map(Path::to_path_buf),
        strict: false,
    }
}

#[test]
fn test_load_document_by_extension() {
    let dir = TempDir::new().unwrap();
    let json = write(&dir, "data.json", r#"{"a": [1, 2]}"#);
    let yaml = write(&dir, "data.yml", "a:\n  - 1\n  - 2\n");

    assert_eq!(load_document(&json).unwrap(), load_document(&yaml).unwrap());
    assert!(load_document(&dir.path().join("missing.json")).is_err());
}

#[test]
fn test_missing_config_is_empty() {
    assert!(load_config(None).unwrap().errors.is_empty());
}

#[tokio::test]
async fn test_validate_valid_data() {
    let dir = TempDir::new().unwrap();
    let data = write(&dir, "order.yaml", "id: abc\nquantity: 2\n");

    let outcome = run_validate(&args(&dir, None), &data, false).await.unwrap();
    assert_eq!(outcome, Outcome::Valid);
    assert_eq!(outcome.render(), "valid");
}

#[tokio::test]
async fn test_validate_reports_configured_messages() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "order.errors.yaml", ERRORS);
    let data = write(&dir, "order.json", r#"{"quantity": 0}"#);
    let args = args(&dir, Some(&config));

    let first = run_validate(&args, &data, false).await.unwrap();
    assert_eq!(first.render(), "Every order needs an id");

    let all = run_validate(&args, &data, true).await.unwrap();
    assert_eq!(
        all,
        Outcome::Invalid(vec![
            "Every order needs an id".to_string(),
            "Too few".to_string()
        ])
    );
    assert_eq!(all.render(), "Every order needs an id\nToo few");
}

#[tokio::test]
async fn test_validate_without_properties_fails() {
    let dir = TempDir::new().unwrap();
    let args = CompileArgs {
        schema: write(&dir, "empty.schema.json", r#"{"type": "object"}"#),
        config: None,
        strict: false,
    };
    let data = write(&dir, "data.json", "{}");
    assert!(run_validate(&args, &data, false).await.is_err());
}

#[test]
fn test_check_reports_diagnostics() {
    let dir = TempDir::new().unwrap();
    let clean = args(&dir, None);
    assert!(run_check(&clean).unwrap().ends_with(": ok"));

    let noisy = CompileArgs {
        schema: write(
            &dir,
            "noisy.schema.json",
            r##"{"properties": {"a": {"$ref": "#/definitions/missing", "type": "string"}}}"##,
        ),
        config: None,
        strict: false,
    };
    let report = run_check(&noisy).unwrap();
    assert!(report.contains("DANGLING_REF"));

    let strict = CompileArgs {
        strict: true,
        ..noisy
    };
    assert!(run_check(&strict).is_err());
}
