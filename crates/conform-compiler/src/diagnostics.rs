//! Diagnostics for input the compiler tolerates silently.
//!
//! Compilation never fails on structurally incomplete documents. Every
//! condition it steps over is recorded here instead, so strict mode and
//! `conform check` can report them together.

use std::collections::BTreeMap;
use std::fmt;

/// Category of a tolerated condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticCategory {
    /// `$ref` pointing at nothing in the document
    DanglingRef,
    /// `$ref` to another document
    ExternalRef,
    /// Property value that is not a schema object
    MalformedProperty,
    /// Property without `type`, `enum`, `const` or a `required` entry
    UntypedProperty,
    /// `type` outside the draft-07 set
    UnknownType,
    /// `pattern` that is not a valid regular expression
    InvalidPattern,
    /// `format` the runtime does not check
    UnknownFormat,
    /// Condition branch declaring a different type than the base property
    TypeConflict,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::DanglingRef => write!(f, "DANGLING_REF"),
            DiagnosticCategory::ExternalRef => write!(f, "EXTERNAL_REF"),
            DiagnosticCategory::MalformedProperty => write!(f, "MALFORMED_PROPERTY"),
            DiagnosticCategory::UntypedProperty => write!(f, "UNTYPED_PROPERTY"),
            DiagnosticCategory::UnknownType => write!(f, "UNKNOWN_TYPE"),
            DiagnosticCategory::InvalidPattern => write!(f, "INVALID_PATTERN"),
            DiagnosticCategory::UnknownFormat => write!(f, "UNKNOWN_FORMAT"),
            DiagnosticCategory::TypeConflict => write!(f, "TYPE_CONFLICT"),
        }
    }
}

/// A single tolerated condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    /// Dotted field path, `<root>` for the document itself
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        category: DiagnosticCategory,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] at {}: {}", self.category, self.path, self.message)
    }
}

/// Diagnostics collected over one compilation, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn record(
        &mut self,
        category: DiagnosticCategory,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.add(Diagnostic::new(category, path, message));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn by_category(
        &self,
        category: DiagnosticCategory,
    ) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.category == category)
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Format diagnostics grouped by category.
    pub fn format_summary(&self) -> String {
        if self.entries.is_empty() {
            return "No diagnostics".to_string();
        }

        let mut by_category: BTreeMap<DiagnosticCategory, Vec<&Diagnostic>> = BTreeMap::new();
        for entry in &self.entries {
            by_category.entry(entry.category).or_default().push(entry);
        }

        let mut lines = Vec::new();
        lines.push(format!("Found {} diagnostic(s):", self.entries.len()));
        lines.push(String::new());

        for (category, entries) in by_category {
            lines.push(format!("## {} ({}):", category, entries.len()));
            for entry in entries.iter().take(10) {
                lines.push(format!("  - {}: {}", entry.path, entry.message));
            }
            if entries.len() > 10 {
                lines.push(format!("  ... and {} more", entries.len() - 10));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }

    /// One diagnostic per line.
    pub fn format_compact(&self) -> String {
        self.entries
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
