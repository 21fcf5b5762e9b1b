//! Field decision policy
//!
//! Every generated field the reconciler considers is routed through a
//! [`ModePolicy`], which decides whether the value is applied, only reported,
//! or skipped. The policy variant is fixed per run by the [`Mode`].

use serde_json::Value;

use crate::errors::{DocSyncError, Result};
use crate::mode::Mode;
use crate::model::EntityKind;
use crate::prompt::Prompter;

/// Identifies the field a decision is being made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTarget<'a> {
    pub kind: EntityKind,
    pub entity: &'a str,
    pub column: Option<&'a str>,
    pub key: &'a str,
}

impl<'a> FieldTarget<'a> {
    pub fn entity_field(kind: EntityKind, entity: &'a str, key: &'a str) -> Self {
        Self {
            kind,
            entity,
            column: None,
            key,
        }
    }

    pub fn column_field(kind: EntityKind, entity: &'a str, column: &'a str, key: &'a str) -> Self {
        Self {
            kind,
            entity,
            column: Some(column),
            key,
        }
    }

    /// Human label for the node owning the field, e.g. `column 'customers.customer_id'`
    pub fn node_label(&self) -> String {
        match self.column {
            Some(column) => format!("column '{}.{}'", self.entity, column),
            None => format!("{} '{}'", self.kind, self.entity),
        }
    }
}

/// Outcome of a policy decision for one missing field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDecision {
    /// Write this value into the target
    Apply(Value),
    /// Record that a change is needed without touching the target
    Report,
    /// Leave the target untouched and record nothing
    Skip,
}

/// Per-mode decision strategy
pub enum ModePolicy<'p> {
    /// Apply every suggestion as-is (update, drift)
    Fill,
    /// Report every missing field (check)
    Report,
    /// Ask the prompter for each field (interactive)
    Prompt(&'p mut dyn Prompter),
}

impl<'p> ModePolicy<'p> {
    /// Select the policy for a run mode
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if interactive mode is requested without a prompter.
    pub fn for_mode(mode: Mode, prompter: Option<&'p mut dyn Prompter>) -> Result<Self> {
        match mode {
            Mode::Update | Mode::Drift => Ok(ModePolicy::Fill),
            Mode::Check => Ok(ModePolicy::Report),
            Mode::Interactive => prompter.map(ModePolicy::Prompt).ok_or_else(|| {
                DocSyncError::InvalidInput {
                    message: "interactive mode requires a prompter".to_string(),
                }
            }),
        }
    }

    /// Decide what happens to a missing field given its suggested value
    ///
    /// # Errors
    ///
    /// Propagates prompter failures.
    pub fn decide(&mut self, target: &FieldTarget<'_>, suggested: &Value) -> Result<FieldDecision> {
        match self {
            ModePolicy::Fill => Ok(FieldDecision::Apply(suggested.clone())),
            ModePolicy::Report => Ok(FieldDecision::Report),
            ModePolicy::Prompt(prompter) => {
                let shown = display_value(suggested);
                let answer = prompter.ask(&target.node_label(), target.key, &shown)?;
                Ok(match answer {
                    None => FieldDecision::Skip,
                    Some(text) if text == shown => FieldDecision::Apply(suggested.clone()),
                    Some(text) => FieldDecision::Apply(Value::String(text)),
                })
            }
        }
    }
}

impl std::fmt::Debug for ModePolicy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModePolicy::Fill => f.write_str("Fill"),
            ModePolicy::Report => f.write_str("Report"),
            ModePolicy::Prompt(_) => f.write_str("Prompt"),
        }
    }
}

/// Text shown to the user for a suggested value; strings are shown bare
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
