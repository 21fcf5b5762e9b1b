//! Subcommand implementations

pub mod lineage;
pub mod reconcile;

/// How a successful command run should end the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The run completed but a CI gate (check, drift) failed
    CheckFailed,
}
