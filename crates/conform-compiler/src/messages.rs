//! Error-message resolution.
//!
//! A message for a field path and constraint keyword is the first of:
//!
//! 1. `errors.<path>.<keyword>` from the [`ErrorConfig`]
//! 2. `errors.defaults.<keyword>`
//! 3. a built-in message synthesized from the field label
//!
//! The keyword of a type mismatch is the JSON type name, so
//! `errors.defaults.string` covers every string type error.

use tracing::trace;

use crate::config::ErrorConfig;
use crate::schema_node::{FieldPath, JsonType};

/// A constraint whose failure message can be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// Type mismatch (also used for non-whole integers)
    Type(JsonType),
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    MinItems,
    MaxItems,
    Contains,
    Tuple,
    UniqueItems,
    Enum,
    Const,
    AnyOf,
    OneOf,
}

impl Keyword {
    /// The key used for this keyword in the error configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Type(ty) => ty.as_str(),
            Keyword::Required => "required",
            Keyword::MinLength => "minLength",
            Keyword::MaxLength => "maxLength",
            Keyword::Pattern => "pattern",
            Keyword::Format => "format",
            Keyword::Minimum => "minimum",
            Keyword::Maximum => "maximum",
            Keyword::ExclusiveMinimum => "exclusiveMinimum",
            Keyword::ExclusiveMaximum => "exclusiveMaximum",
            Keyword::MultipleOf => "multipleOf",
            Keyword::MinItems => "minItems",
            Keyword::MaxItems => "maxItems",
            Keyword::Contains => "contains",
            Keyword::Tuple => "tuple",
            Keyword::UniqueItems => "uniqueItems",
            Keyword::Enum => "enum",
            Keyword::Const => "const",
            Keyword::AnyOf => "anyOf",
            Keyword::OneOf => "oneOf",
        }
    }

    /// Built-in message. `detail` is the bound, type or format the
    /// constraint was declared with.
    pub fn builtin(&self, label: &str, detail: &str) -> String {
        match self {
            Keyword::Type(ty) => format!("{} is not of type {}", label, ty),
            Keyword::Required => format!("{} is required", label),
            Keyword::MinLength => format!("{} requires a minimum of {} characters", label, detail),
            Keyword::MaxLength => {
                format!("{} cannot exceed a maximum of {} characters", label, detail)
            }
            Keyword::Pattern => format!("{} is an incorrect format", label),
            Keyword::Format => format!("{} is an invalid {} format", label, detail),
            Keyword::Minimum => format!("{} requires a minimum value of {}", label, detail),
            Keyword::Maximum => format!("{} cannot exceed a maximum value of {}", label, detail),
            Keyword::ExclusiveMinimum => {
                format!("{} requires a value greater than {}", label, detail)
            }
            Keyword::ExclusiveMaximum => format!("{} requires a value less than {}", label, detail),
            Keyword::MultipleOf => format!("{} requires a multiple of {}", label, detail),
            Keyword::MinItems => format!("{} requires a minimum of {} items", label, detail),
            Keyword::MaxItems => format!("{} cannot exceed a maximum of {} items", label, detail),
            Keyword::Contains => format!(
                "{} must at least contain one item of type {}",
                label, detail
            ),
            Keyword::Tuple => format!("{} must be of same type", label),
            Keyword::UniqueItems => format!("{} values are not unique", label),
            Keyword::Enum => format!("{} does not match any of the enumerables", label),
            Keyword::Const => format!("{} does not match constant", label),
            Keyword::AnyOf => format!("{} does not match any of the allowed schemas", label),
            Keyword::OneOf => format!("{} must match exactly one of the allowed schemas", label),
        }
    }
}

/// Resolves messages against one error configuration.
#[derive(Debug, Clone, Copy)]
pub struct MessageResolver<'c> {
    errors: &'c ErrorConfig,
}

impl<'c> MessageResolver<'c> {
    pub fn new(errors: &'c ErrorConfig) -> Self {
        Self { errors }
    }

    pub fn resolve(&self, path: &FieldPath, label: &str, keyword: Keyword, detail: &str) -> String {
        let key = keyword.as_str();
        if let Some(message) = self.errors.lookup(path, key) {
            trace!("{}: configured message for {}", path, key);
            return message.to_string();
        }
        if let Some(message) = self.errors.default_for(key) {
            trace!("{}: default message for {}", path, key);
            return message.to_string();
        }
        keyword.builtin(label, detail)
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Label used in built-in messages: the node's title, else the key
/// capitalized.
pub fn label_for(title: Option<&str>, key: &str) -> String {
    match title {
        Some(title) => title.to_string(),
        None => capitalize(key),
    }
}
