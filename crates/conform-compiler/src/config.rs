//! Error-message configuration.
//!
//! ```yaml
//! errors:
//!   defaults:
//!     string: "All values should be of type string"
//!   countries:
//!     country:
//!       maxLength: "Country is required"
//! ```
//!
//! The `errors` mapping mirrors the document's property hierarchy; the
//! keys at each level are either child property names or constraint
//! keywords. `defaults` holds type-wide fallbacks.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CompileError;
use crate::schema_node::FieldPath;

/// Top-level configuration passed to the compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub errors: ErrorConfig,
}

/// Nested message table keyed by property path and keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorConfig(Map<String, Value>);

const DEFAULTS: &str = "defaults";

impl ErrorConfig {
    pub fn new(errors: Map<String, Value>) -> Self {
        Self(errors)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The message configured at `errors.<path>.<keyword>`.
    pub fn lookup(&self, path: &FieldPath, keyword: &str) -> Option<&str> {
        let mut level = &self.0;
        for segment in path.segments() {
            level = level.get(segment)?.as_object()?;
        }
        level.get(keyword)?.as_str()
    }

    /// The message configured at `errors.defaults.<keyword>`.
    pub fn default_for(&self, keyword: &str) -> Option<&str> {
        self.0.get(DEFAULTS)?.get(keyword)?.as_str()
    }
}

impl Config {
    pub fn new(errors: ErrorConfig) -> Self {
        Self { errors }
    }

    pub fn from_json_str(input: &str) -> Result<Self, CompileError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, CompileError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Load a configuration file; `.yaml`/`.yml` files are read as YAML,
    /// everything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = if is_yaml(path) {
            Self::from_yaml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };
        tracing::debug!("Loaded error config from {}", path.display());
        Ok(config)
    }
}

/// Whether a path has a YAML extension.
pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn path(segments: &[&str]) -> FieldPath {
        segments.iter().copied().collect()
    }

    #[test]
    fn test_lookup_nested_path() {
        let config = Config::from_json_str(
            r#"{"errors": {"countries": {"country": {"maxLength": "Country is required"}}}}"#,
        )
        .unwrap();

        assert_eq!(
            config
                .errors
                .lookup(&path(&["countries", "country"]), "maxLength"),
            Some("Country is required")
        );
        assert_eq!(config.errors.lookup(&path(&["countries"]), "maxLength"), None);
        assert_eq!(
            config.errors.lookup(&path(&["countries", "country", "x"]), "maxLength"),
            None
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml_str(
            "errors:\n  defaults:\n    array: Default array message\n",
        )
        .unwrap();
        assert_eq!(
            config.errors.default_for("array"),
            Some("Default array message")
        );
        assert_eq!(config.errors.default_for("string"), None);
    }

    #[test]
    fn test_missing_errors_section() {
        let config = Config::from_json_str("{}").unwrap();
        assert!(config.errors.is_empty());
    }

    #[test]
    fn test_from_path_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(yaml, "errors:\n  name:\n    required: Name please").unwrap();
        let config = Config::from_path(yaml.path()).unwrap();
        assert_eq!(
            config.errors.lookup(&path(&["name"]), "required"),
            Some("Name please")
        );

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"errors": {{"defaults": {{"string": "S"}}}}}}"#).unwrap();
        let config = Config::from_path(json.path()).unwrap();
        assert_eq!(config.errors.default_for("string"), Some("S"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(matches!(
            Config::from_json_str(r#"{"errors": 3}"#),
            Err(CompileError::Json(_))
        ));
    }
}
