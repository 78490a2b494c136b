//! Conform Runtime Library
//!
//! Chainable validation schemas that compiled JSON Schema documents execute
//! against configuration values:
//!
//! - **Schema primitives**: string, number, boolean, null, array, object,
//!   mixed and lazy (multi-type) schemas, each carrying its own messages
//! - **Validate trait**: path-aware validation with abort-early or
//!   collect-all runs
//! - **Error types**: structured validation errors with data paths
//!
//! # Example
//!
//! ```rust
//! use conform_runtime::{Schema, SchemaBuilder};
//! use serde_json::json;
//!
//! let schema = Schema::object().field(
//!     "name",
//!     Schema::string()
//!         .required("Name is required")
//!         .min_length(2, "Name requires a minimum of 2 characters"),
//! );
//!
//! let errors = schema.validate_sync(&json!({})).unwrap_err();
//! assert_eq!(errors.messages(), vec!["Name is required"]);
//! assert!(schema.is_valid(&json!({"name": "Jo"})));
//! ```

mod errors;
mod format;
mod schema;
mod validate;

pub use errors::{ValidationError, ValidationErrors};
pub use format::StringFormat;
pub use schema::{
    json_eq, ArraySchema, BooleanSchema, Composition, LazySchema, MixedSchema, NullSchema,
    NumberSchema, ObjectSchema, Schema, SchemaBase, SchemaBuilder, StringSchema,
};
pub use validate::{Validate, ValidateOptions, ValidationContext};
