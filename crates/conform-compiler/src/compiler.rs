//! Compilation entry points.

use conform_runtime::ObjectSchema;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::builder::Builder;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::CompileError;
use crate::prune::remove_empty_objects;

/// Compile a document without pruning.
///
/// Returns `None` when the document has no top-level `properties`, which
/// callers treat as "nothing to validate".
pub fn build(document: &Value, config: &Config) -> Option<ObjectSchema> {
    Builder::new(document, config).build_root()
}

/// Prune empty schema objects, then [`build`].
pub fn clean_schema(document: &Value, config: &Config) -> Option<ObjectSchema> {
    let pruned = remove_empty_objects(document);
    build(&pruned, config)
}

/// Convert a JSON Schema document into a validator using `config` for
/// error messages.
pub fn convert(document: &Value, config: &Config) -> Option<ObjectSchema> {
    clean_schema(document, config)
}

/// Result of [`Compiler::compile`].
#[derive(Debug, Clone)]
pub struct Compiled {
    /// `None` when the document has no top-level `properties`
    pub schema: Option<ObjectSchema>,
    pub diagnostics: Diagnostics,
}

/// Configurable compiler with diagnostics and strict mode.
///
/// ```rust
/// use conform_compiler::{Compiler, Config};
/// use serde_json::json;
///
/// let document = json!({
///     "properties": {"name": {"type": "string", "format": "colour"}}
/// });
///
/// let compiled = Compiler::new(Config::default()).compile(&document).unwrap();
/// assert_eq!(compiled.diagnostics.len(), 1);
///
/// let strict = Compiler::new(Config::default()).strict(true);
/// assert!(strict.compile(&document).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Compiler {
    config: Config,
    strict: bool,
    prune: bool,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Compiler {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            strict: false,
            prune: true,
        }
    }

    /// Fail compilation when any diagnostic is recorded.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Remove empty schema objects before compiling (on by default).
    pub fn prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    #[instrument(skip_all, fields(strict = self.strict), level = "debug")]
    pub fn compile(&self, document: &Value) -> Result<Compiled, CompileError> {
        let pruned;
        let document = if self.prune {
            pruned = remove_empty_objects(document);
            &pruned
        } else {
            document
        };

        let mut builder = Builder::new(document, &self.config);
        let schema = builder.build_root();
        let diagnostics = builder.into_diagnostics();
        debug!(
            "Compiled {} top-level fields with {} diagnostics",
            schema.as_ref().map_or(0, ObjectSchema::len),
            diagnostics.len()
        );

        if self.strict && !diagnostics.is_empty() {
            return Err(diagnostics.into());
        }
        Ok(Compiled {
            schema,
            diagnostics,
        })
    }
}
