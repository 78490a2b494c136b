//! Test fixture loader
//!
//! Schemas and error configurations stored as JSON or YAML files

use conform_compiler::Config;
use serde_json::Value;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

/// Load a schema document from `<name>.schema.json`
pub fn load_schema(name: &str) -> Value {
    let path = fixture_path(&format!("{}.schema.json", name));
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", name, e))
}

/// Load an error configuration from `<name>.errors.yaml`
pub fn load_config(name: &str) -> Config {
    let path = fixture_path(&format!("{}.errors.yaml", name));
    Config::from_path(&path)
        .unwrap_or_else(|e| panic!("Failed to load config {}: {}", path.display(), e))
}
