use serde_json::Value;

use super::base::{json_eq, Flow, SchemaBase, SchemaBuilder};
use super::{passes, Schema};
use crate::errors::ValidationErrors;
use crate::validate::{Validate, ValidationContext};

/// Schema for arrays.
#[derive(Debug, Clone, Default)]
pub struct ArraySchema {
    pub(crate) base: SchemaBase,
    of: Option<Box<Schema>>,
    tuple: Option<(Vec<Schema>, String)>,
    contains: Option<(Box<Schema>, String)>,
    min_items: Option<(usize, String)>,
    max_items: Option<(usize, String)>,
    unique: Option<String>,
}

impl ArraySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every element against `item`.
    pub fn of(mut self, item: impl Into<Schema>) -> Self {
        self.of = Some(Box::new(item.into()));
        self
    }

    /// Validate element `i` against `items[i]`; any mismatch reports `message`.
    pub fn tuple(mut self, items: Vec<Schema>, message: impl Into<String>) -> Self {
        self.tuple = Some((items, message.into()));
        self
    }

    /// Require at least one element matching `item`.
    pub fn contains(mut self, item: impl Into<Schema>, message: impl Into<String>) -> Self {
        self.contains = Some((Box::new(item.into()), message.into()));
        self
    }

    /// Require at least `min` elements. An absent array fails this check.
    pub fn min_items(mut self, min: usize, message: impl Into<String>) -> Self {
        self.min_items = Some((min, message.into()));
        self
    }

    /// Allow at most `max` elements. An absent array fails this check.
    pub fn max_items(mut self, max: usize, message: impl Into<String>) -> Self {
        self.max_items = Some((max, message.into()));
        self
    }

    /// Reject arrays with repeated elements.
    pub fn unique(mut self, message: impl Into<String>) -> Self {
        self.unique = Some(message.into());
        self
    }

    /// The element schema set by [`ArraySchema::of`].
    pub fn item_schema(&self) -> Option<&Schema> {
        self.of.as_deref()
    }

    pub fn base(&self) -> &SchemaBase {
        &self.base
    }

    /// Size bounds also apply to a missing array.
    fn check_absent(&self, ctx: &ValidationContext, errors: &mut ValidationErrors) {
        if let Some((_, message)) = &self.min_items {
            if ctx.report(errors, "minItems", message) {
                return;
            }
        }
        if let Some((_, message)) = &self.max_items {
            ctx.report(errors, "maxItems", message);
        }
    }
}

impl SchemaBuilder for ArraySchema {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}

fn has_duplicates(items: &[Value]) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, a)| items[i + 1..].iter().any(|b| json_eq(a, b)))
}

impl Validate for ArraySchema {
    fn validate_at(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let items = match self
            .base
            .precheck(value, "array", Value::is_array, ctx, &mut errors)
        {
            Flow::Continue(Value::Array(items)) => items,
            Flow::Absent => {
                self.check_absent(ctx, &mut errors);
                return errors.into_result();
            }
            _ => return errors.into_result(),
        };

        if let Some((min, message)) = &self.min_items {
            if items.len() < *min && ctx.report(&mut errors, "minItems", message) {
                return Err(errors);
            }
        }
        if let Some((max, message)) = &self.max_items {
            if items.len() > *max && ctx.report(&mut errors, "maxItems", message) {
                return Err(errors);
            }
        }
        if let Some(message) = &self.unique {
            if has_duplicates(items) && ctx.report(&mut errors, "uniqueItems", message) {
                return Err(errors);
            }
        }

        if let Some(item_schema) = &self.of {
            for (i, item) in items.iter().enumerate() {
                ctx.push_index(i);
                let result = item_schema.validate_at(Some(item), ctx);
                ctx.pop_path();
                if ctx.absorb(&mut errors, result) {
                    return Err(errors);
                }
            }
        }

        if let Some((schemas, message)) = &self.tuple {
            for (i, (schema, item)) in schemas.iter().zip(items).enumerate() {
                ctx.push_index(i);
                let matched = passes(schema, Some(item), ctx);
                let stop = !matched && ctx.report(&mut errors, "tuple", message);
                ctx.pop_path();
                if stop {
                    return Err(errors);
                }
            }
        }

        if let Some((schema, message)) = &self.contains {
            let probe: &ValidationContext = ctx;
            let found = items
                .iter()
                .any(|item| passes(schema.as_ref(), Some(item), probe));
            if !found && ctx.report(&mut errors, "contains", message) {
                return Err(errors);
            }
        }

        errors.into_result()
    }
}
