use serde_json::Value;

use super::base::{Flow, SchemaBase, SchemaBuilder};
use crate::errors::ValidationErrors;
use crate::validate::{Validate, ValidationContext};

/// Schema for numeric values, optionally restricted to integers.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    pub(crate) base: SchemaBase,
    integer: Option<String>,
    min: Option<(f64, String)>,
    max: Option<(f64, String)>,
    more_than: Option<(f64, String)>,
    less_than: Option<(f64, String)>,
    multiple_of: Option<(f64, String)>,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject numbers with a fractional part.
    pub fn integer(mut self, message: impl Into<String>) -> Self {
        self.integer = Some(message.into());
        self
    }

    /// Inclusive lower bound.
    pub fn min(mut self, min: f64, message: impl Into<String>) -> Self {
        self.min = Some((min, message.into()));
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, max: f64, message: impl Into<String>) -> Self {
        self.max = Some((max, message.into()));
        self
    }

    /// Exclusive lower bound.
    pub fn more_than(mut self, bound: f64, message: impl Into<String>) -> Self {
        self.more_than = Some((bound, message.into()));
        self
    }

    /// Exclusive upper bound.
    pub fn less_than(mut self, bound: f64, message: impl Into<String>) -> Self {
        self.less_than = Some((bound, message.into()));
        self
    }

    pub fn multiple_of(mut self, factor: f64, message: impl Into<String>) -> Self {
        self.multiple_of = Some((factor, message.into()));
        self
    }

    pub fn is_integer(&self) -> bool {
        self.integer.is_some()
    }

    pub fn base(&self) -> &SchemaBase {
        &self.base
    }
}

impl SchemaBuilder for NumberSchema {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}

fn is_whole(value: &Value) -> bool {
    value.is_i64() || value.is_u64() || value.as_f64().is_some_and(|n| n.fract() == 0.0)
}

fn is_multiple(value: f64, factor: f64) -> bool {
    if factor == 0.0 {
        return false;
    }
    let quotient = value / factor;
    (quotient - quotient.round()).abs() < 1e-9
}

impl Validate for NumberSchema {
    fn validate_at(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let type_name = if self.integer.is_some() { "integer" } else { "number" };
        let Flow::Continue(value) =
            self.base
                .precheck(value, type_name, Value::is_number, ctx, &mut errors)
        else {
            return errors.into_result();
        };

        if let Some(message) = &self.integer {
            if !is_whole(value) {
                errors.push(ctx.error("integer", message.as_str()));
                return Err(errors);
            }
        }

        let number = value.as_f64().unwrap_or_default();
        let checks = [
            (
                "minimum",
                &self.min,
                self.min.as_ref().map_or(true, |b| number >= b.0),
            ),
            (
                "maximum",
                &self.max,
                self.max.as_ref().map_or(true, |b| number <= b.0),
            ),
            (
                "exclusiveMinimum",
                &self.more_than,
                self.more_than.as_ref().map_or(true, |b| number > b.0),
            ),
            (
                "exclusiveMaximum",
                &self.less_than,
                self.less_than.as_ref().map_or(true, |b| number < b.0),
            ),
            (
                "multipleOf",
                &self.multiple_of,
                self.multiple_of
                    .as_ref()
                    .map_or(true, |b| is_multiple(number, b.0)),
            ),
        ];
        for (rule, bound, passed) in checks {
            if let (Some((_, message)), false) = (bound, passed) {
                if ctx.report(&mut errors, rule, message) {
                    return Err(errors);
                }
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(schema: &NumberSchema, value: Value) -> Vec<String> {
        let mut ctx = ValidationContext::collect_all();
        match schema.validate_at(Some(&value), &mut ctx) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.into_iter().map(|e| e.message).collect(),
        }
    }

    #[test]
    fn test_inclusive_and_exclusive_bounds() {
        let schema = NumberSchema::new()
            .min(1.0, "min")
            .max(10.0, "max")
            .more_than(0.0, "gt")
            .less_than(10.0, "lt");

        assert!(check(&schema, json!(1)).is_empty());
        assert_eq!(check(&schema, json!(10)), vec!["lt"]);
        assert_eq!(check(&schema, json!(0)), vec!["min", "gt"]);
        assert_eq!(check(&schema, json!(11.5)), vec!["max", "lt"]);
    }

    #[test]
    fn test_integer_rejects_fractions() {
        let schema = NumberSchema::new()
            .type_error("Age is not of type integer")
            .integer("Age is not of type integer");

        assert!(check(&schema, json!(4)).is_empty());
        assert!(check(&schema, json!(4.0)).is_empty());
        assert_eq!(check(&schema, json!(4.5)), vec!["Age is not of type integer"]);
        assert_eq!(check(&schema, json!("4")), vec!["Age is not of type integer"]);
    }

    #[test]
    fn test_multiple_of() {
        let schema = NumberSchema::new().multiple_of(0.5, "step");
        assert!(check(&schema, json!(2.5)).is_empty());
        assert_eq!(check(&schema, json!(2.25)), vec!["step"]);
    }
}
