use std::fmt;
use std::path::{Path, PathBuf};

/// How bad a finding is. Only errors fail a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Error => "ERROR/Data",
            Severity::Warning => "WARN/Data",
        }
    }
}

/// What a diagnostic is about. Lets callers (and tests) count findings
/// without matching on message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    ReadFailed,
    ParseFailed,
    MissingProperty(String),
    DuplicatePrototype,
    DuplicatePath,
    NoPaths,
    PathToSelf,
    UnknownLocation,
    UnknownItem,
    UnknownNpcType,
    InvalidNpcRegistration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    pub id: Option<String>,
    pub source_file: Option<PathBuf>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.tag(), self.message)
    }
}

/// Ordered collection of everything found during a load.
///
/// Every push is also logged, so a caller that only looks at the final
/// verdict still gets the full report on the `data` tracing target.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(
        &mut self,
        kind: DiagnosticKind,
        id: Option<&str>,
        source_file: Option<&Path>,
        message: impl Into<String>,
    ) {
        self.push(Severity::Error, kind, id, source_file, message.into());
    }

    pub fn warning(
        &mut self,
        kind: DiagnosticKind,
        id: Option<&str>,
        source_file: Option<&Path>,
        message: impl Into<String>,
    ) {
        self.push(Severity::Warning, kind, id, source_file, message.into());
    }

    /// Shorthand for the most common finding: a required key is absent.
    pub fn missing_property(&mut self, id: Option<&str>, source_file: &Path, property: &str) {
        let message = format!(
            "Missing property '{}' in prototype '{}', in file \"{}\".",
            property,
            id.unwrap_or("<no id>"),
            source_file.display()
        );
        self.error(
            DiagnosticKind::MissingProperty(property.to_string()),
            id,
            Some(source_file),
            message,
        );
    }

    fn push(
        &mut self,
        severity: Severity,
        kind: DiagnosticKind,
        id: Option<&str>,
        source_file: Option<&Path>,
        message: String,
    ) {
        match severity {
            Severity::Error => tracing::error!(target: "data", "{}", message),
            Severity::Warning => tracing::warn!(target: "data", "{}", message),
        }

        self.entries.push(Diagnostic {
            severity,
            kind,
            message,
            id: id.map(str::to_string),
            source_file: source_file.map(Path::to_path_buf),
        });
    }

    /// Append findings from another pass. They were already logged when
    /// first recorded, so this does not log again.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn count_kind(&self, kind: &DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| &d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut diags = Diagnostics::new();
        diags.warning(DiagnosticKind::NoPaths, Some("cellar"), None, "no paths");
        assert!(!diags.has_errors());
        assert_eq!(diags.warnings().count(), 1);

        diags.missing_property(Some("cellar"), Path::new("location/cellar.toml"), "description");
        assert!(diags.has_errors());
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn missing_property_names_id_and_file() {
        let mut diags = Diagnostics::new();
        diags.missing_property(Some("sword"), Path::new("item/sword.toml"), "defense");

        let d = diags.iter().next().unwrap();
        assert_eq!(d.kind, DiagnosticKind::MissingProperty("defense".into()));
        assert!(d.message.contains("'sword'"));
        assert!(d.message.contains("item/sword.toml"));
        assert!(d.to_string().starts_with("[ERROR/Data]"));
    }
}
