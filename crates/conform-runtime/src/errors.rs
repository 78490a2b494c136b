//! Validation error types for conform-runtime.
//!
//! A failing validation produces an ordered [`ValidationErrors`] list. Each
//! entry carries the data path it was raised at, the caller-facing message
//! and the rule that produced it.

use std::fmt;

/// A collection of validation errors, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    /// Individual validation errors
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create an empty validation errors collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validation errors collection from a single error.
    pub fn from_error(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Merge another ValidationErrors into this one.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// The first error raised, if any.
    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Human-readable messages in the order they were raised.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// `Ok(())` when empty, the collection itself otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "No validation errors")
        } else if self.errors.len() == 1 {
            write!(f, "Validation error: {}", self.errors[0])
        } else {
            writeln!(f, "{} validation errors:", self.errors.len())?;
            for (i, error) in self.errors.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, error)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::from_error(error)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// A single validation error with location and context.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Data path to the value that failed validation.
    ///
    /// Examples:
    /// - `""` - root object
    /// - `"groceries"` - a top-level field
    /// - `"countries[0].country"` - a field inside an array element
    pub path: String,

    /// Human-readable error message.
    pub message: String,

    /// The rule that was violated (if known).
    ///
    /// Examples:
    /// - `"typeError"` - value has the wrong JSON type
    /// - `"required"` - required field missing
    /// - `"maxLength"` - string too long
    /// - `"tuple"` - tuple element mismatch
    pub rule: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Set the rule that was violated.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)?;
        } else {
            write!(f, "{}: {}", self.path, self.message)?;
        }

        if let Some(rule) = &self.rule {
            write!(f, " [{}]", rule)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}
