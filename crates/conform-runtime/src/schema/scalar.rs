//! Primitives without type-specific constraints.

use serde_json::Value;

use super::base::{SchemaBase, SchemaBuilder};
use crate::errors::ValidationErrors;
use crate::validate::{Validate, ValidationContext};

/// Schema for boolean values.
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    pub(crate) base: SchemaBase,
}

/// Schema accepting only `null`.
#[derive(Debug, Clone, Default)]
pub struct NullSchema {
    pub(crate) base: SchemaBase,
}

/// Schema accepting any JSON type; only presence and allowed values are
/// checked.
#[derive(Debug, Clone, Default)]
pub struct MixedSchema {
    pub(crate) base: SchemaBase,
}

macro_rules! scalar_schema {
    ($schema:ident, $type_name:literal, $type_ok:expr) => {
        impl $schema {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn base(&self) -> &SchemaBase {
                &self.base
            }
        }

        impl SchemaBuilder for $schema {
            fn base_mut(&mut self) -> &mut SchemaBase {
                &mut self.base
            }
        }

        impl Validate for $schema {
            fn validate_at(
                &self,
                value: Option<&Value>,
                ctx: &mut ValidationContext,
            ) -> Result<(), ValidationErrors> {
                let mut errors = ValidationErrors::new();
                self.base
                    .precheck(value, $type_name, $type_ok, ctx, &mut errors);
                errors.into_result()
            }
        }
    };
}

scalar_schema!(BooleanSchema, "boolean", Value::is_boolean);
scalar_schema!(NullSchema, "null", Value::is_null);
scalar_schema!(MixedSchema, "mixed", |_: &Value| true);
