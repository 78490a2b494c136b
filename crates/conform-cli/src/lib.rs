//! Library interface for the conform CLI

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use conform_compiler::{config::is_yaml, Compiled, Compiler, Config};
use conform_runtime::{ValidateOptions, ValidationErrors};
use serde_json::Value;
use tracing::{debug, info};

/// Read a JSON or YAML document, choosing the parser by extension.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?
    };
    debug!("Loaded {}", path.display());
    Ok(value)
}

/// Load the error configuration, or an empty one when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("Failed to load error config {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Files and switches shared by `validate` and `check`.
#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub schema: PathBuf,
    pub config: Option<PathBuf>,
    pub strict: bool,
}

impl CompileArgs {
    pub fn compile(&self) -> Result<Compiled> {
        let document = load_document(&self.schema)?;
        let config = load_config(self.config.as_deref())?;
        let compiled = Compiler::new(config)
            .strict(self.strict)
            .compile(&document)
            .with_context(|| format!("Failed to compile {}", self.schema.display()))?;
        info!(
            "Compiled {} with {} diagnostics",
            self.schema.display(),
            compiled.diagnostics.len()
        );
        Ok(compiled)
    }
}

/// Result of validating one data file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Valid,
    Invalid(Vec<String>),
}

impl Outcome {
    fn from_errors(errors: ValidationErrors) -> Self {
        Outcome::Invalid(errors.into_iter().map(|e| e.message).collect())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }

    /// `valid`, or one message per line.
    pub fn render(&self) -> String {
        match self {
            Outcome::Valid => "valid".to_string(),
            Outcome::Invalid(messages) => messages.join("\n"),
        }
    }
}

/// Compile the schema and validate one data file against it.
///
/// Stops at the first failure unless `all` is set.
pub async fn run_validate(args: &CompileArgs, data: &Path, all: bool) -> Result<Outcome> {
    let compiled = args.compile()?;
    let Some(schema) = compiled.schema else {
        bail!(
            "{} has no top-level properties to validate against",
            args.schema.display()
        );
    };
    let value = load_document(data)?;

    let options = if all {
        ValidateOptions::collect_all()
    } else {
        ValidateOptions::default()
    };
    let outcome = match schema.validate_with(&value, options).await {
        Ok(_) => Outcome::Valid,
        Err(errors) => Outcome::from_errors(errors),
    };
    debug!("{} is valid: {}", data.display(), outcome.is_valid());
    Ok(outcome)
}

/// Compile only and report the diagnostics.
pub fn run_check(args: &CompileArgs) -> Result<String> {
    let compiled = args.compile()?;
    if compiled.schema.is_none() {
        bail!("{} has no top-level properties", args.schema.display());
    }
    if compiled.diagnostics.is_empty() {
        Ok(format!("{}: ok", args.schema.display()))
    } else {
        Ok(compiled.diagnostics.format_summary())
    }
}
