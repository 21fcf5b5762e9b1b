use std::path::PathBuf;

use serde::Serialize;

use crate::mode::Mode;

/// What happened to one entity or field during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Field is missing and was only reported (check)
    MissingField,
    /// Field was filled from the catalog
    Filled,
    /// Interactive user skipped the suggestion
    Skipped,
    /// Existing description disagrees with live data (drift)
    Drift,
    /// Entity has no documentation at all (check)
    MissingEntity,
    /// New entity stub was appended
    StubCreated,
    /// Undocumented entity could not be placed
    RoutingFailed,
    /// Edit refused because the document's layout cannot take it in place
    Uneditable,
}

impl FindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FindingKind::MissingField => "missing field",
            FindingKind::Filled => "filled",
            FindingKind::Skipped => "skipped",
            FindingKind::Drift => "drift",
            FindingKind::MissingEntity => "missing entity",
            FindingKind::StubCreated => "stub created",
            FindingKind::RoutingFailed => "routing failed",
            FindingKind::Uneditable => "not editable in place",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub kind: FindingKind,
}

impl Finding {
    pub fn new(kind: FindingKind, entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            column: None,
            field: None,
            path: None,
            kind,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// `entity`, `entity.column`, optionally suffixed with `[field]`
    pub fn location(&self) -> String {
        let mut out = self.entity.clone();
        if let Some(column) = &self.column {
            out.push('.');
            out.push_str(column);
        }
        if let Some(field) = &self.field {
            out.push_str(&format!(" [{}]", field));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Aggregate result of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub mode: Mode,
    /// Any field was missing, filled, drifted, or any entity was undocumented
    pub changes_needed: bool,
    pub findings: Vec<Finding>,
    /// Files flushed to disk
    pub written: Vec<PathBuf>,
    pub write_failures: Vec<WriteFailure>,
    /// Files modified in memory but not written (check/drift)
    pub pending: Vec<PathBuf>,
}

impl ReconcileReport {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            changes_needed: false,
            findings: Vec::new(),
            written: Vec::new(),
            write_failures: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn record(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn findings_of(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    pub fn count_of(&self, kind: FindingKind) -> usize {
        self.findings_of(kind).count()
    }

    /// CI gate verdict: check and drift fail when changes are needed
    pub fn ci_failed(&self) -> bool {
        self.mode.is_ci_gate() && self.changes_needed
    }

    pub fn has_write_failures(&self) -> bool {
        !self.write_failures.is_empty()
    }
}
