//! Project settings (`docsync.toml`)
//!
//! Every key is optional; an absent file yields the defaults.

use std::path::{Path, PathBuf};

use docsync_core::logging_facility::Profile;
use serde::Deserialize;

use crate::errors::{config_error, io_error, Result};

/// Settings file looked up at the project root
pub const SETTINGS_FILE_NAME: &str = "docsync.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSettings {
    pub scan: ScanSettings,
    pub documents: DocumentSettings,
    pub index: IndexSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSettings {
    /// Subdirectories of the project root searched for documents, in order
    pub directories: Vec<PathBuf>,
    /// File extensions (without dot) treated as documents
    pub extensions: Vec<String>,
    /// Files whose name contains any of these substrings are skipped
    pub exclude: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            directories: vec!["models".into(), "seeds".into(), "snapshots".into()],
            extensions: vec!["yml".to_string(), "yaml".to_string()],
            exclude: vec!["dbt_project".to_string()],
        }
    }
}

impl ScanSettings {
    /// Whether a file qualifies as a documentation file
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if self.exclude.iter().any(|pattern| name.contains(pattern.as_str())) {
            return false;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentSettings {
    /// File name used for new stub documents
    pub schema_file_name: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            schema_file_name: "schema.yml".to_string(),
        }
    }
}

/// What to do when two documents define the same entity name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    LastWins,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexSettings {
    pub on_duplicate: DuplicatePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    pub profile: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            profile: "development".to_string(),
        }
    }
}

impl LoggingSettings {
    /// Parsed logging profile
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unknown profile name.
    pub fn profile(&self) -> Result<Profile> {
        Ok(self.profile.parse::<Profile>()?)
    }
}

impl ProjectSettings {
    /// Parse settings from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Config` for malformed TOML, unknown keys or wrong types.
    pub fn from_toml_str(source: &Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error(source, e.to_string()))
    }

    /// Load settings for a project
    ///
    /// An explicit path must exist. Without one, `docsync.toml` at the
    /// project root is used when present, else the defaults.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`/`Io` if the file cannot be read and `Config` if it
    /// does not parse.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = project_root.join(SETTINGS_FILE_NAME);
                if !candidate.is_file() {
                    tracing::debug!(root = %project_root.display(), "no settings file; using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|e| io_error("load_settings", &path, e))?;
        let settings = Self::from_toml_str(&path, &text)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }
}
