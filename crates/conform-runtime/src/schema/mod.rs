//! Chainable schema primitives and the [`Schema`] tree they compose into.

mod array;
mod base;
mod number;
mod object;
mod scalar;
mod string;

pub use array::ArraySchema;
pub use base::{json_eq, SchemaBase, SchemaBuilder};
pub use number::NumberSchema;
pub use object::{Composition, ObjectSchema};
pub use scalar::{BooleanSchema, MixedSchema, NullSchema};
pub use string::StringSchema;

use serde_json::Value;

use crate::errors::ValidationErrors;
use crate::validate::{Validate, ValidateOptions, ValidationContext};

/// A validator for one JSON value.
#[derive(Debug, Clone)]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
    Null(NullSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
    Mixed(MixedSchema),
    Lazy(LazySchema),
}

/// Picks one of several candidate schemas by the runtime type of the value.
///
/// The first candidate whose type accepts the value is used; when none does
/// (or the value is absent) the first candidate reports the failure.
#[derive(Debug, Clone, Default)]
pub struct LazySchema {
    candidates: Vec<Schema>,
}

impl LazySchema {
    pub fn new(candidates: Vec<Schema>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Schema] {
        &self.candidates
    }

    fn select(&self, value: Option<&Value>) -> Option<&Schema> {
        value
            .and_then(|v| self.candidates.iter().find(|c| c.accepts_type(v)))
            .or_else(|| self.candidates.first())
    }
}

impl Validate for LazySchema {
    fn validate_at(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext,
    ) -> Result<(), ValidationErrors> {
        match self.select(value) {
            Some(schema) => schema.validate_at(value, ctx),
            None => Ok(()),
        }
    }
}

impl Schema {
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    pub fn null() -> NullSchema {
        NullSchema::new()
    }

    pub fn array() -> ArraySchema {
        ArraySchema::new()
    }

    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    pub fn mixed() -> MixedSchema {
        MixedSchema::new()
    }

    pub fn lazy(candidates: Vec<Schema>) -> Self {
        Schema::Lazy(LazySchema::new(candidates))
    }

    /// Name of the JSON type this schema checks.
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String(_) => "string",
            Schema::Number(n) if n.is_integer() => "integer",
            Schema::Number(_) => "number",
            Schema::Boolean(_) => "boolean",
            Schema::Null(_) => "null",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
            Schema::Mixed(_) | Schema::Lazy(_) => "mixed",
        }
    }

    /// Whether the value's JSON type matches this schema.
    pub fn accepts_type(&self, value: &Value) -> bool {
        let nullable = self.base().is_some_and(SchemaBase::is_nullable);
        match self {
            Schema::String(_) => value.is_string() || (nullable && value.is_null()),
            Schema::Number(_) => value.is_number() || (nullable && value.is_null()),
            Schema::Boolean(_) => value.is_boolean() || (nullable && value.is_null()),
            Schema::Null(_) => value.is_null(),
            Schema::Array(_) => value.is_array() || (nullable && value.is_null()),
            Schema::Object(_) => value.is_object() || (nullable && value.is_null()),
            Schema::Mixed(_) => true,
            Schema::Lazy(lazy) => lazy.candidates.iter().any(|c| c.accepts_type(value)),
        }
    }

    /// Shared settings of the primitive, if this is not a [`LazySchema`].
    pub fn base(&self) -> Option<&SchemaBase> {
        match self {
            Schema::String(s) => Some(&s.base),
            Schema::Number(s) => Some(&s.base),
            Schema::Boolean(s) => Some(&s.base),
            Schema::Null(s) => Some(&s.base),
            Schema::Array(s) => Some(&s.base),
            Schema::Object(s) => Some(&s.base),
            Schema::Mixed(s) => Some(&s.base),
            Schema::Lazy(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Schema::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArraySchema> {
        match self {
            Schema::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl Validate for Schema {
    fn validate_at(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext,
    ) -> Result<(), ValidationErrors> {
        match self {
            Schema::String(s) => s.validate_at(value, ctx),
            Schema::Number(s) => s.validate_at(value, ctx),
            Schema::Boolean(s) => s.validate_at(value, ctx),
            Schema::Null(s) => s.validate_at(value, ctx),
            Schema::Array(s) => s.validate_at(value, ctx),
            Schema::Object(s) => s.validate_at(value, ctx),
            Schema::Mixed(s) => s.validate_at(value, ctx),
            Schema::Lazy(s) => s.validate_at(value, ctx),
        }
    }
}

macro_rules! into_schema {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Schema {
                fn from(schema: $ty) -> Self {
                    Schema::$variant(schema)
                }
            }
        )*
    };
}

into_schema! {
    String => StringSchema,
    Number => NumberSchema,
    Boolean => BooleanSchema,
    Null => NullSchema,
    Array => ArraySchema,
    Object => ObjectSchema,
    Mixed => MixedSchema,
    Lazy => LazySchema,
}

/// Trial validation whose errors are discarded.
pub(crate) fn passes<S: Validate + ?Sized>(
    schema: &S,
    value: Option<&Value>,
    ctx: &ValidationContext,
) -> bool {
    let mut probe = ctx.probe();
    schema.validate_at(value, &mut probe).is_ok()
}

fn run<S: Validate + ?Sized>(
    schema: &S,
    value: &Value,
    options: ValidateOptions,
) -> Result<Value, ValidationErrors> {
    let mut ctx = ValidationContext::new(options);
    schema.validate_at(Some(value), &mut ctx)?;
    Ok(value.clone())
}

macro_rules! entry_points {
    ($($ty:ty),*) => {
        $(
            impl $ty {
                /// Validate synchronously, stopping at the first failure.
                ///
                /// Returns the input value when it is valid.
                pub fn validate_sync(&self, value: &Value) -> Result<Value, ValidationErrors> {
                    run(self, value, ValidateOptions::default())
                }

                /// Validate synchronously with explicit options.
                pub fn validate_sync_with(
                    &self,
                    value: &Value,
                    options: ValidateOptions,
                ) -> Result<Value, ValidationErrors> {
                    run(self, value, options)
                }

                /// Validate asynchronously, reporting every failing constraint.
                pub async fn validate(&self, value: &Value) -> Result<Value, ValidationErrors> {
                    run(self, value, ValidateOptions::collect_all())
                }

                /// Validate asynchronously with explicit options.
                pub async fn validate_with(
                    &self,
                    value: &Value,
                    options: ValidateOptions,
                ) -> Result<Value, ValidationErrors> {
                    run(self, value, options)
                }

                /// Whether the value passes every constraint.
                pub fn is_valid(&self, value: &Value) -> bool {
                    self.validate_sync(value).is_ok()
                }
            }
        )*
    };
}

entry_points!(Schema, ObjectSchema);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nullable_name() -> Schema {
        Schema::lazy(vec![
            Schema::string()
                .type_error("Name is not of type string")
                .min_length(2, "too short")
                .into(),
            Schema::null().into(),
        ])
    }

    #[test]
    fn test_lazy_selects_candidate_by_type() {
        let schema = nullable_name();
        assert!(schema.is_valid(&json!("Jo")));
        assert!(schema.is_valid(&Value::Null));

        let errors = schema.validate_sync(&json!("J")).unwrap_err();
        assert_eq!(errors.messages(), vec!["too short"]);

        let errors = schema.validate_sync(&json!(3)).unwrap_err();
        assert_eq!(errors.messages(), vec!["Name is not of type string"]);
    }

    #[test]
    fn test_validate_sync_returns_input() {
        let schema: Schema = Schema::object()
            .field("name", Schema::string().required("Name is required"))
            .into();
        let input = json!({"name": "Jo", "extra": true});
        assert_eq!(schema.validate_sync(&input).unwrap(), input);
    }

    #[tokio::test]
    async fn test_validate_collects_all_errors() {
        let schema = Schema::object()
            .field("a", Schema::string().required("A is required"))
            .field("b", Schema::number().type_error("B is not of type number"));

        let errors = schema.validate(&json!({"b": "x"})).await.unwrap_err();
        assert_eq!(
            errors.messages(),
            vec!["A is required", "B is not of type number"]
        );

        let errors = schema.validate_sync(&json!({"b": "x"})).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Schema::from(Schema::number().integer("int")).type_name(), "integer");
        assert_eq!(Schema::from(Schema::array()).type_name(), "array");
        assert!(Schema::from(Schema::mixed()).accepts_type(&json!([1])));
    }
}
