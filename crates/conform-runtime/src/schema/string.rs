use regex::Regex;
use serde_json::Value;

use super::base::{Flow, SchemaBase, SchemaBuilder};
use crate::errors::ValidationErrors;
use crate::format::StringFormat;
use crate::validate::{Validate, ValidationContext};

/// Schema for string values.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub(crate) base: SchemaBase,
    min_length: Option<(usize, String)>,
    max_length: Option<(usize, String)>,
    pattern: Option<(Regex, String)>,
    format: Option<(StringFormat, String)>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require at least `min` characters.
    pub fn min_length(mut self, min: usize, message: impl Into<String>) -> Self {
        self.min_length = Some((min, message.into()));
        self
    }

    /// Allow at most `max` characters.
    pub fn max_length(mut self, max: usize, message: impl Into<String>) -> Self {
        self.max_length = Some((max, message.into()));
        self
    }

    /// Require a match of `pattern` anywhere in the value.
    pub fn matches(mut self, pattern: Regex, message: impl Into<String>) -> Self {
        self.pattern = Some((pattern, message.into()));
        self
    }

    /// Require the value to be a valid `format`.
    pub fn format(mut self, format: StringFormat, message: impl Into<String>) -> Self {
        self.format = Some((format, message.into()));
        self
    }

    pub fn base(&self) -> &SchemaBase {
        &self.base
    }
}

impl SchemaBuilder for StringSchema {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}

impl Validate for StringSchema {
    fn validate_at(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Flow::Continue(value) =
            self.base
                .precheck(value, "string", Value::is_string, ctx, &mut errors)
        else {
            return errors.into_result();
        };
        let text = value.as_str().unwrap_or_default();
        let length = text.chars().count();

        if let Some((min, message)) = &self.min_length {
            if length < *min && ctx.report(&mut errors, "minLength", message) {
                return Err(errors);
            }
        }
        if let Some((max, message)) = &self.max_length {
            if length > *max && ctx.report(&mut errors, "maxLength", message) {
                return Err(errors);
            }
        }
        if let Some((pattern, message)) = &self.pattern {
            if !pattern.is_match(text) && ctx.report(&mut errors, "pattern", message) {
                return Err(errors);
            }
        }
        if let Some((format, message)) = &self.format {
            if !format.is_valid(text) && ctx.report(&mut errors, "format", message) {
                return Err(errors);
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(schema: &StringSchema, value: Option<&Value>) -> Vec<String> {
        let mut ctx = ValidationContext::collect_all();
        match schema.validate_at(value, &mut ctx) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.into_iter().map(|e| e.message).collect(),
        }
    }

    #[test]
    fn test_length_bounds_count_characters() {
        let schema = StringSchema::new()
            .min_length(1, "too short")
            .max_length(5, "too long");

        assert!(check(&schema, Some(&json!("héllo"))).is_empty());
        assert_eq!(check(&schema, Some(&json!(""))), vec!["too short"]);
        assert_eq!(check(&schema, Some(&json!("Singapore"))), vec!["too long"]);
    }

    #[test]
    fn test_type_error_short_circuits() {
        let schema = StringSchema::new()
            .type_error("Name is not of type string")
            .min_length(3, "too short");

        assert_eq!(
            check(&schema, Some(&json!(42))),
            vec!["Name is not of type string"]
        );
        assert_eq!(
            check(&schema, Some(&Value::Null)),
            vec!["Name is not of type string"]
        );
    }

    #[test]
    fn test_absent_optional_passes_constraints() {
        let schema = StringSchema::new().min_length(3, "too short");
        assert!(check(&schema, None).is_empty());

        let required = schema.required("Name is required");
        assert_eq!(check(&required, None), vec!["Name is required"]);
    }

    #[test]
    fn test_pattern_and_format() {
        let schema = StringSchema::new()
            .matches(Regex::new("^[a-z]+@").unwrap(), "bad pattern")
            .format(StringFormat::Email, "bad email");

        assert!(check(&schema, Some(&json!("jane@example.com"))).is_empty());
        assert_eq!(
            check(&schema, Some(&json!("Jane@example"))),
            vec!["bad pattern", "bad email"]
        );
    }

    #[test]
    fn test_one_of_values() {
        let schema = StringSchema::new().one_of(vec![json!("a"), json!("b")], "not allowed");
        assert!(check(&schema, Some(&json!("a"))).is_empty());
        assert_eq!(check(&schema, Some(&json!("c"))), vec!["not allowed"]);
    }
}
