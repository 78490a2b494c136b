//! State and checks shared by every schema primitive.

use serde_json::Value;

use crate::errors::ValidationErrors;
use crate::validate::ValidationContext;

/// Presence, type and allowed-value settings common to all primitives.
#[derive(Debug, Clone, Default)]
pub struct SchemaBase {
    pub(crate) type_error: Option<String>,
    pub(crate) required: Option<String>,
    pub(crate) nullable: bool,
    pub(crate) allowed: Option<(Vec<Value>, String)>,
}

impl SchemaBase {
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Presence and type checks run before any type-specific constraint.
    pub(crate) fn precheck<'v>(
        &self,
        value: Option<&'v Value>,
        type_name: &str,
        type_ok: impl Fn(&Value) -> bool,
        ctx: &ValidationContext,
        errors: &mut ValidationErrors,
    ) -> Flow<'v> {
        match value {
            None => match &self.required {
                Some(message) => {
                    errors.push(ctx.error("required", message.as_str()));
                    Flow::Stop
                }
                None => Flow::Absent,
            },
            Some(Value::Null) if self.nullable => match &self.required {
                Some(message) => {
                    errors.push(ctx.error("required", message.as_str()));
                    Flow::Stop
                }
                None => Flow::Stop,
            },
            Some(v) if !type_ok(v) => {
                let message = match &self.type_error {
                    Some(message) => message.clone(),
                    None => format!("value is not of type {}", type_name),
                };
                errors.push(ctx.error("typeError", message));
                Flow::Stop
            }
            Some(v) => {
                if let Some((allowed, message)) = &self.allowed {
                    if !allowed.iter().any(|candidate| json_eq(candidate, v))
                        && ctx.report(errors, "enum", message)
                    {
                        return Flow::Stop;
                    }
                }
                Flow::Continue(v)
            }
        }
    }
}

/// Outcome of [`SchemaBase::precheck`].
pub(crate) enum Flow<'v> {
    /// The value is present and well typed; run the remaining constraints.
    Continue(&'v Value),
    /// The field is absent and optional.
    Absent,
    /// Nothing further to check.
    Stop,
}

/// Chainable setters shared by every primitive.
pub trait SchemaBuilder: Sized {
    #[doc(hidden)]
    fn base_mut(&mut self) -> &mut SchemaBase;

    /// Message raised when the value has the wrong JSON type.
    fn type_error(mut self, message: impl Into<String>) -> Self {
        self.base_mut().type_error = Some(message.into());
        self
    }

    /// Mark the field required; absent and `null` values fail with `message`.
    fn required(mut self, message: impl Into<String>) -> Self {
        self.base_mut().required = Some(message.into());
        self
    }

    /// Undo a previous `required`.
    fn optional(mut self) -> Self {
        self.base_mut().required = None;
        self
    }

    /// Accept `null` as a valid value.
    fn nullable(mut self) -> Self {
        self.base_mut().nullable = true;
        self
    }

    /// Restrict the value to one of `values`.
    fn one_of(mut self, values: Vec<Value>, message: impl Into<String>) -> Self {
        self.base_mut().allowed = Some((values, message.into()));
        self
    }
}

/// JSON equality that treats numerically equal numbers as equal.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_eq_numbers() {
        assert!(json_eq(&json!(1), &json!(1.0)));
        assert!(!json_eq(&json!(1), &json!(2)));
        assert!(json_eq(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
        assert!(!json_eq(&json!("1"), &json!(1)));
    }

    #[test]
    fn test_precheck_absent_and_null() {
        let ctx = ValidationContext::collect_all();
        let mut errors = ValidationErrors::new();
        let base = SchemaBase {
            required: Some("Name is required".into()),
            ..Default::default()
        };

        assert!(matches!(
            base.precheck(None, "string", Value::is_string, &ctx, &mut errors),
            Flow::Stop
        ));
        assert_eq!(errors.messages(), vec!["Name is required"]);

        let optional = SchemaBase::default();
        let mut errors = ValidationErrors::new();
        assert!(matches!(
            optional.precheck(None, "string", Value::is_string, &ctx, &mut errors),
            Flow::Absent
        ));
        let null = json!(null);
        assert!(matches!(
            optional.precheck(Some(&null), "string", Value::is_string, &ctx, &mut errors),
            Flow::Stop
        ));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].rule.as_deref(), Some("typeError"));
    }
}
