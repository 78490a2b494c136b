use thiserror::Error;

use crate::diagnostics::Diagnostics;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Strict compilation failed ({count} diagnostics):\n{summary}")]
    Strict { count: usize, summary: String },
}

impl From<Diagnostics> for CompileError {
    fn from(diagnostics: Diagnostics) -> Self {
        CompileError::Strict {
            count: diagnostics.len(),
            summary: diagnostics.format_summary(),
        }
    }
}
