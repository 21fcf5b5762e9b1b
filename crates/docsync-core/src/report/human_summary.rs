//! Human-readable summary renderer for reconciliation runs.

use super::model::{FindingKind, ReconcileReport};
use crate::mode::Mode;

/// Render a Markdown summary of a [`ReconcileReport`].
///
/// Intended for CI job summaries and terminal output. It is informational
/// only; the exit status is derived from the report itself.
pub fn render_human_summary(report: &ReconcileReport) -> String {
    let mut out = String::new();

    out.push_str("## Documentation Reconciliation\n\n");
    out.push_str(&format!(
        "**Mode**: {}  \n**Verdict**: {}\n\n",
        report.mode,
        verdict(report)
    ));

    let sections = [
        (FindingKind::MissingEntity, "Undocumented Entities"),
        (FindingKind::MissingField, "Missing Fields"),
        (FindingKind::Drift, "Drifted Descriptions"),
        (FindingKind::Filled, "Filled Fields"),
        (FindingKind::StubCreated, "New Stubs"),
        (FindingKind::Skipped, "Skipped Suggestions"),
        (FindingKind::RoutingFailed, "Unplaceable Entities"),
        (FindingKind::Uneditable, "Uneditable Fields"),
    ];

    for (kind, title) in sections {
        let count = report.count_of(kind);
        if count == 0 {
            continue;
        }
        out.push_str(&format!("### {} ({})\n\n", title, count));
        for finding in report.findings_of(kind) {
            match &finding.path {
                Some(path) => out.push_str(&format!(
                    "- `{}` in `{}`\n",
                    finding.location(),
                    path.display()
                )),
                None => out.push_str(&format!("- `{}`\n", finding.location())),
            }
        }
        out.push('\n');
    }

    if !report.written.is_empty() {
        out.push_str(&format!("### Written Files ({})\n\n", report.written.len()));
        for path in &report.written {
            out.push_str(&format!("- `{}`\n", path.display()));
        }
        out.push('\n');
    }

    if !report.pending.is_empty() {
        out.push_str(&format!(
            "### Pending Changes ({}, not written)\n\n",
            report.pending.len()
        ));
        for path in &report.pending {
            out.push_str(&format!("- `{}`\n", path.display()));
        }
        out.push('\n');
    }

    if report.has_write_failures() {
        out.push_str("### ⚠ Write Failures\n\n");
        for failure in &report.write_failures {
            out.push_str(&format!(
                "- `{}`: {}\n",
                failure.path.display(),
                failure.message
            ));
        }
        out.push('\n');
    }

    if report.findings.is_empty() && report.written.is_empty() {
        out.push_str("_Documentation is up to date._\n");
    }

    out
}

fn verdict(report: &ReconcileReport) -> &'static str {
    match report.mode {
        Mode::Check if report.changes_needed => "FAIL (documentation is incomplete)",
        Mode::Drift if report.changes_needed => "FAIL (documentation has drifted)",
        Mode::Check | Mode::Drift => "PASS",
        Mode::Update | Mode::Interactive if report.has_write_failures() => {
            "INCOMPLETE (some files could not be written)"
        }
        Mode::Update | Mode::Interactive if report.changes_needed => "UPDATED",
        Mode::Update | Mode::Interactive => "UP TO DATE",
    }
}
