//! Command orchestration layer.
//!
//! Provides high-level command functions that load the JSON inputs and
//! settings, then hand off to the reconciler or the lineage merger.

pub mod engine_command;
pub mod lineage;
pub mod reconcile;
