//! The validation trait and the context threaded through a validation run.

use serde_json::Value;

use crate::errors::{ValidationError, ValidationErrors};

/// Trait for schemas that can check a JSON value.
///
/// `value` is `None` when the field is absent from its parent object, which
/// is distinct from an explicit `null`.
pub trait Validate {
    /// Validate a value at the context's current path.
    ///
    /// Returns `Ok(())` if valid, or `Err(ValidationErrors)` with the
    /// violations found (only the first one when the context aborts early).
    fn validate_at(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext,
    ) -> Result<(), ValidationErrors>;
}

/// Options controlling a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Stop at the first failing constraint.
    pub abort_early: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self { abort_early: true }
    }
}

impl ValidateOptions {
    /// Options that collect every failing constraint.
    pub fn collect_all() -> Self {
        Self { abort_early: false }
    }
}

/// Context for validation operations.
///
/// Tracks the data path of the value under validation and whether the run
/// stops at the first error.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    /// Current data path being validated
    path: Vec<String>,
    /// Whether to stop at the first error
    abort_early: bool,
}

impl ValidationContext {
    /// Create a context from run options.
    pub fn new(options: ValidateOptions) -> Self {
        Self {
            path: Vec::new(),
            abort_early: options.abort_early,
        }
    }

    /// Create a context that collects all errors instead of stopping at first.
    pub fn collect_all() -> Self {
        Self::new(ValidateOptions::collect_all())
    }

    /// Get the current data path as a string, e.g. `countries[0].country`.
    pub fn current_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            if !out.is_empty() && !segment.starts_with('[') {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }

    /// Push a path segment for nested validation.
    pub fn push_path(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    /// Pop a path segment after nested validation.
    pub fn pop_path(&mut self) {
        self.path.pop();
    }

    /// Push an array index to the path.
    pub fn push_index(&mut self, index: usize) {
        self.path.push(format!("[{}]", index));
    }

    /// Create an error at the current path.
    pub fn error(&self, rule: &str, message: impl Into<String>) -> ValidationError {
        ValidationError::new(self.current_path(), message).with_rule(rule)
    }

    /// Fold a nested result into `errors`.
    ///
    /// Returns `true` when the caller should stop validating.
    pub fn absorb(
        &self,
        errors: &mut ValidationErrors,
        result: Result<(), ValidationErrors>,
    ) -> bool {
        match result {
            Ok(()) => false,
            Err(nested) => {
                errors.merge(nested);
                self.abort_early
            }
        }
    }

    /// Record a single error; returns `true` when the caller should stop.
    pub fn report(&self, errors: &mut ValidationErrors, rule: &str, message: &str) -> bool {
        errors.push(self.error(rule, message));
        self.abort_early
    }

    /// A detached context at the same path that stops at the first error.
    ///
    /// Used for trial validations (conditions, alternatives) whose errors
    /// are never surfaced directly.
    pub fn probe(&self) -> Self {
        Self {
            path: self.path.clone(),
            abort_early: true,
        }
    }
}
