//! JSON Schema to conform validator compiler
//!
//! Turns a draft-07 JSON Schema document into a
//! [`conform_runtime::ObjectSchema`], resolving `$ref`s, flattening
//! conditional branches and threading a user-supplied error-message
//! configuration through every level of nesting.
//!
//! ```rust
//! use conform_compiler::{convert, Config};
//! use serde_json::json;
//!
//! let document = json!({
//!     "type": "object",
//!     "properties": {"groceries": {"type": "array", "minItems": 3}}
//! });
//! let config = Config::from_json_str(
//!     r#"{"errors": {"groceries": {"minItems": "A minimum item of 3 is required"}}}"#,
//! )
//! .unwrap();
//!
//! let schema = convert(&document, &config).unwrap();
//! let errors = schema.validate_sync(&json!({"groceries": ["milk"]})).unwrap_err();
//! assert_eq!(errors.messages(), vec!["A minimum item of 3 is required"]);
//! ```

mod builder;
mod compiler;
pub mod conditions;
pub mod config;
pub mod definitions;
pub mod diagnostics;
pub mod error;
mod leaf;
pub mod messages;
pub mod prune;
pub mod schema_node;

pub use compiler::{build, clean_schema, convert, Compiled, Compiler};
pub use config::{Config, ErrorConfig};
pub use diagnostics::{Diagnostic, DiagnosticCategory, Diagnostics};
pub use error::CompileError;
