//! Reconciliation outcome reporting

pub mod human_summary;
pub mod model;

pub use human_summary::render_human_summary;
pub use model::{Finding, FindingKind, ReconcileReport, WriteFailure};
