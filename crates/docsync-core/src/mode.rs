//! Reconciliation run modes

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DocSyncError;

/// How a reconciliation run treats missing and drifted documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fill missing fields and write changed files
    #[default]
    Update,
    /// Report missing fields; never mutate or write
    Check,
    /// Ask per field whether to accept, edit or skip the suggestion
    Interactive,
    /// Report drifted descriptions and fill missing fields in memory; never write
    Drift,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Update, Mode::Check, Mode::Interactive, Mode::Drift];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Update => "update",
            Mode::Check => "check",
            Mode::Interactive => "interactive",
            Mode::Drift => "drift",
        }
    }

    /// Whether dirty documents are flushed at the end of the run
    pub fn writes_files(self) -> bool {
        matches!(self, Mode::Update | Mode::Interactive)
    }

    /// Whether `DRIFT` column statuses are consulted
    pub fn detects_drift(self) -> bool {
        matches!(self, Mode::Drift)
    }

    /// Whether a positive outcome means the CI gate fails
    pub fn is_ci_gate(self) -> bool {
        matches!(self, Mode::Check | Mode::Drift)
    }
}

impl FromStr for Mode {
    type Err = DocSyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| DocSyncError::InvalidMode {
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
