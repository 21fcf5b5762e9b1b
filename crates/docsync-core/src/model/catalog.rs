use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::{DocSyncError, Result};

/// Outcome of comparing an existing column description against live data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DriftStatus {
    #[serde(rename = "MATCH")]
    Match,
    #[serde(rename = "DRIFT")]
    Drift,
    /// No drift check was run for this column
    #[default]
    #[serde(rename = "N/A")]
    NotApplicable,
}

/// One column of a generated catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedColumn {
    pub name: String,

    /// Physical column type reported by the generator (informational)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// Generated fields (description, tags, tests, meta, ...) in generator order
    #[serde(
        rename = "ai_generated",
        default,
        deserialize_with = "empty_map_if_null"
    )]
    pub generated_fields: Map<String, Value>,

    #[serde(default)]
    pub drift_status: DriftStatus,
}

impl GeneratedColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            generated_fields: Map::new(),
            drift_status: DriftStatus::NotApplicable,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.generated_fields.insert(key.into(), value.into());
        self
    }

    pub fn with_drift_status(mut self, status: DriftStatus) -> Self {
        self.drift_status = status;
        self
    }
}

/// Everything the external generator produced for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Filled from the catalog's object key
    #[serde(skip)]
    pub entity_name: String,

    #[serde(rename = "model_description", default)]
    pub generated_description: Option<String>,

    /// Carried for downstream renderers; never written into documents
    #[serde(rename = "model_lineage_chart", default)]
    pub generated_lineage_chart: Option<String>,

    #[serde(default, deserialize_with = "empty_vec_if_null")]
    pub columns: Vec<GeneratedColumn>,

    /// Path of the entity's defining source file, used only for stub placement
    #[serde(rename = "original_file_path", default)]
    pub source_file_hint: Option<PathBuf>,
}

impl CatalogEntry {
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            generated_description: None,
            generated_lineage_chart: None,
            columns: Vec::new(),
            source_file_hint: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.generated_description = Some(description.into());
        self
    }

    pub fn with_column(mut self, column: GeneratedColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_source_file_hint(mut self, hint: impl Into<PathBuf>) -> Self {
        self.source_file_hint = Some(hint.into());
        self
    }

    /// Non-empty generated description, if any
    pub fn description(&self) -> Option<&str> {
        self.generated_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }

    /// First generated column with exactly this name
    pub fn generated_column(&self, name: &str) -> Option<&GeneratedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Generated catalog keyed by entity name
///
/// Iteration is in entity-name order so that runs are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the generator's JSON object (`{ "<entity>": { ... }, ... }`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidCatalog` if the payload is not an object of entries,
    /// or an entry is malformed or has an empty name.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| DocSyncError::InvalidCatalog {
            message: format!("catalog is not valid JSON: {}", e),
        })?;
        Self::from_json_value(value)
    }

    /// Build a catalog from an already-parsed JSON value
    ///
    /// # Errors
    ///
    /// See [`Catalog::from_json_str`].
    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(DocSyncError::InvalidCatalog {
                message: "catalog must be a JSON object keyed by entity name".to_string(),
            });
        };

        let mut catalog = Catalog::new();
        for (name, raw) in object {
            if name.is_empty() {
                return Err(DocSyncError::InvalidCatalog {
                    message: "catalog contains an entry with an empty name".to_string(),
                });
            }
            let mut entry: CatalogEntry =
                serde_json::from_value(raw).map_err(|e| DocSyncError::InvalidCatalog {
                    message: format!("entry '{}': {}", name, e),
                })?;
            entry.entity_name = name;
            catalog.insert(entry);
        }
        Ok(catalog)
    }

    /// Insert or replace an entry under its entity name
    pub fn insert(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.entity_name.clone(), entry);
    }

    pub fn get(&self, entity_name: &str) -> Option<&CatalogEntry> {
        self.entries.get(entity_name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

fn empty_map_if_null<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_vec_if_null<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<GeneratedColumn>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<GeneratedColumn>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generator_payload() {
        let json = r#"{
            "customers": {
                "model_description": "One row per customer",
                "model_lineage_chart": "graph TD; a --> customers",
                "columns": [
                    {
                        "name": "customer_id",
                        "type": "integer",
                        "ai_generated": {"description": "Primary key", "tests": ["unique"]},
                        "drift_status": "N/A"
                    }
                ],
                "original_file_path": "models/customers.sql"
            }
        }"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        let entry = catalog.get("customers").unwrap();

        assert_eq!(entry.entity_name, "customers");
        assert_eq!(entry.description(), Some("One row per customer"));
        assert_eq!(
            entry.source_file_hint.as_deref(),
            Some(std::path::Path::new("models/customers.sql"))
        );
        let column = entry.generated_column("customer_id").unwrap();
        assert_eq!(column.data_type.as_deref(), Some("integer"));
        assert_eq!(column.drift_status, DriftStatus::NotApplicable);
        let keys: Vec<&String> = column.generated_fields.keys().collect();
        assert_eq!(keys, ["description", "tests"]);
    }

    #[test]
    fn test_optional_keys_default() {
        let json = r#"{"orders": {"columns": [{"name": "id", "ai_generated": null}]}}"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let entry = catalog.get("orders").unwrap();

        assert!(entry.description().is_none());
        assert!(entry.source_file_hint.is_none());
        assert!(entry.columns[0].generated_fields.is_empty());
    }

    #[test]
    fn test_blank_description_is_absent() {
        let entry = CatalogEntry::new("x").with_description("   ");
        assert!(entry.description().is_none());
    }

    #[test]
    fn test_reject_non_object_catalog() {
        let err = Catalog::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, DocSyncError::InvalidCatalog { .. }));
    }

    #[test]
    fn test_reject_unknown_drift_status() {
        let json = r#"{"orders": {"columns": [{"name": "id", "drift_status": "MAYBE"}]}}"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("orders"));
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let catalog: Catalog = ["zeta", "alpha", "mid"]
            .into_iter()
            .map(CatalogEntry::new)
            .collect();
        let names: Vec<&str> = catalog.entries().map(|e| e.entity_name.as_str()).collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }
}
