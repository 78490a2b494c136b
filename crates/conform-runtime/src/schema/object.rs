use indexmap::IndexMap;
use serde_json::Value;

use super::base::{Flow, SchemaBase, SchemaBuilder};
use super::{passes, Schema};
use crate::errors::ValidationErrors;
use crate::validate::{Validate, ValidationContext};

/// Schema for JSON objects: a shape of named child schemas plus optional
/// compositions evaluated against the whole object.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub(crate) base: SchemaBase,
    fields: IndexMap<String, Schema>,
    compositions: Vec<Composition>,
}

/// A constraint applied to the whole object after its fields.
#[derive(Debug, Clone)]
pub enum Composition {
    /// Apply `then` when the object satisfies `condition`, `otherwise` if not.
    When {
        condition: ObjectSchema,
        then: Option<ObjectSchema>,
        otherwise: Option<ObjectSchema>,
    },
    /// Always apply the schema.
    AllOf(ObjectSchema),
    /// At least one branch must accept the object.
    AnyOf {
        branches: Vec<ObjectSchema>,
        message: String,
    },
    /// Exactly one branch must accept the object.
    OneOf {
        branches: Vec<ObjectSchema>,
        message: String,
    },
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `fields` into the shape; a name already present is replaced.
    pub fn shape<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        for (name, schema) in fields {
            self.fields.insert(name.into(), schema);
        }
        self
    }

    /// Add or replace one field.
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.insert(name.into(), schema.into());
        self
    }

    pub fn when(
        mut self,
        condition: ObjectSchema,
        then: Option<ObjectSchema>,
        otherwise: Option<ObjectSchema>,
    ) -> Self {
        self.compositions.push(Composition::When {
            condition,
            then,
            otherwise,
        });
        self
    }

    pub fn all_of(mut self, schema: ObjectSchema) -> Self {
        self.compositions.push(Composition::AllOf(schema));
        self
    }

    pub fn any_of(mut self, branches: Vec<ObjectSchema>, message: impl Into<String>) -> Self {
        self.compositions.push(Composition::AnyOf {
            branches,
            message: message.into(),
        });
        self
    }

    pub fn exactly_one_of(
        mut self,
        branches: Vec<ObjectSchema>,
        message: impl Into<String>,
    ) -> Self {
        self.compositions.push(Composition::OneOf {
            branches,
            message: message.into(),
        });
        self
    }

    /// Child schema for a field name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.fields.get(name)
    }

    /// Fields in shape order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.fields.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.compositions.is_empty()
    }

    pub fn base(&self) -> &SchemaBase {
        &self.base
    }

    fn validate_fields(
        &self,
        object: &serde_json::Map<String, Value>,
        ctx: &mut ValidationContext,
        errors: &mut ValidationErrors,
    ) -> bool {
        for (name, schema) in &self.fields {
            ctx.push_path(name.as_str());
            let result = schema.validate_at(object.get(name), ctx);
            ctx.pop_path();
            if ctx.absorb(errors, result) {
                return true;
            }
        }
        false
    }

    fn validate_compositions(
        &self,
        value: &Value,
        ctx: &mut ValidationContext,
        errors: &mut ValidationErrors,
    ) -> bool {
        for composition in &self.compositions {
            let stop = match composition {
                Composition::When {
                    condition,
                    then,
                    otherwise,
                } => {
                    let branch = if passes(condition, Some(value), ctx) {
                        then.as_ref()
                    } else {
                        otherwise.as_ref()
                    };
                    match branch {
                        Some(branch) => {
                            let result = branch.validate_at(Some(value), ctx);
                            ctx.absorb(errors, result)
                        }
                        None => false,
                    }
                }
                Composition::AllOf(schema) => {
                    let result = schema.validate_at(Some(value), ctx);
                    ctx.absorb(errors, result)
                }
                Composition::AnyOf { branches, message } => {
                    let probe: &ValidationContext = ctx;
                    let matched = branches.iter().any(|b| passes(b, Some(value), probe));
                    !matched && ctx.report(errors, "anyOf", message)
                }
                Composition::OneOf { branches, message } => {
                    let probe: &ValidationContext = ctx;
                    let matched = branches
                        .iter()
                        .filter(|b| passes(*b, Some(value), probe))
                        .count();
                    matched != 1 && ctx.report(errors, "oneOf", message)
                }
            };
            if stop {
                return true;
            }
        }
        false
    }
}

impl SchemaBuilder for ObjectSchema {
    fn base_mut(&mut self) -> &mut SchemaBase {
        &mut self.base
    }
}

impl Validate for ObjectSchema {
    fn validate_at(
        &self,
        value: Option<&Value>,
        ctx: &mut ValidationContext,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let Flow::Continue(value) =
            self.base
                .precheck(value, "object", Value::is_object, ctx, &mut errors)
        else {
            return errors.into_result();
        };
        let Some(object) = value.as_object() else {
            return errors.into_result();
        };

        if self.validate_fields(object, ctx, &mut errors) {
            return Err(errors);
        }
        self.validate_compositions(value, ctx, &mut errors);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArraySchema, StringSchema};
    use crate::validate::ValidateOptions;
    use serde_json::json;

    fn messages(schema: &ObjectSchema, value: Value, options: ValidateOptions) -> Vec<String> {
        let mut ctx = ValidationContext::new(options);
        match schema.validate_at(Some(&value), &mut ctx) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.into_iter().map(|e| e.message).collect(),
        }
    }

    #[test]
    fn test_nested_array_of_objects() {
        let country = ObjectSchema::new().field(
            "country",
            StringSchema::new().max_length(5, "Country is required"),
        );
        let schema = ObjectSchema::new().field("countries", ArraySchema::new().of(country));

        let mut ctx = ValidationContext::collect_all();
        let errors = schema
            .validate_at(
                Some(&json!({"countries": [{"country": "Singapore"}]})),
                &mut ctx,
            )
            .unwrap_err();
        assert_eq!(errors.errors[0].path, "countries[0].country");
        assert_eq!(errors.errors[0].message, "Country is required");
    }

    #[test]
    fn test_abort_early_reports_first_field() {
        let schema = ObjectSchema::new()
            .field("a", StringSchema::new().required("A is required"))
            .field("b", StringSchema::new().required("B is required"));

        assert_eq!(
            messages(&schema, json!({}), ValidateOptions::default()),
            vec!["A is required"]
        );
        assert_eq!(
            messages(&schema, json!({}), ValidateOptions::collect_all()),
            vec!["A is required", "B is required"]
        );
    }

    #[test]
    fn test_when_selects_branch() {
        let condition = ObjectSchema::new().field(
            "country",
            StringSchema::new().one_of(vec![json!("US")], "not US"),
        );
        let then = ObjectSchema::new().field(
            "zip",
            StringSchema::new().required("Zip is required"),
        );
        let otherwise = ObjectSchema::new().field(
            "postcode",
            StringSchema::new().required("Postcode is required"),
        );
        let schema = ObjectSchema::new().when(condition, Some(then), Some(otherwise));

        let options = ValidateOptions::collect_all();
        assert_eq!(
            messages(&schema, json!({"country": "US"}), options),
            vec!["Zip is required"]
        );
        assert_eq!(
            messages(&schema, json!({"country": "NL"}), options),
            vec!["Postcode is required"]
        );
        assert!(messages(&schema, json!({"country": "US", "zip": "1"}), options).is_empty());
    }

    #[test]
    fn test_any_of_and_one_of() {
        let has_a = ObjectSchema::new().field("a", StringSchema::new().required("a"));
        let has_b = ObjectSchema::new().field("b", StringSchema::new().required("b"));
        let options = ValidateOptions::collect_all();

        let any = ObjectSchema::new().any_of(vec![has_a.clone(), has_b.clone()], "need a or b");
        assert!(messages(&any, json!({"a": "x", "b": "y"}), options).is_empty());
        assert_eq!(messages(&any, json!({}), options), vec!["need a or b"]);

        let one = ObjectSchema::new().exactly_one_of(vec![has_a, has_b], "need exactly one");
        assert!(messages(&one, json!({"a": "x"}), options).is_empty());
        assert_eq!(
            messages(&one, json!({"a": "x", "b": "y"}), options),
            vec!["need exactly one"]
        );
    }

    #[test]
    fn test_shape_replaces_existing_fields() {
        let schema = ObjectSchema::new()
            .field("a", StringSchema::new())
            .shape([("a", Schema::from(ArraySchema::new())), ("b", StringSchema::new().into())]);
        assert_eq!(schema.len(), 2);
        assert!(matches!(schema.get("a"), Some(Schema::Array(_))));
        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
