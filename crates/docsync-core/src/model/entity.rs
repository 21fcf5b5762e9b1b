use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category of documented entity; each maps to one top-level section key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Model,
    Source,
    Seed,
    Snapshot,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Model,
        EntityKind::Source,
        EntityKind::Seed,
        EntityKind::Snapshot,
    ];

    /// Top-level document key holding entities of this kind
    pub fn section(self) -> &'static str {
        match self {
            EntityKind::Model => "models",
            EntityKind::Source => "sources",
            EntityKind::Seed => "seeds",
            EntityKind::Snapshot => "snapshots",
        }
    }

    pub fn from_section(section: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.section() == section)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Model => "model",
            EntityKind::Source => "source",
            EntityKind::Seed => "seed",
            EntityKind::Snapshot => "snapshot",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column entry of a new entity stub
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnRecord {
    pub name: String,
    pub fields: Map<String, Value>,
}

impl ColumnRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Map::new(),
        }
    }

    /// Render as `{name, <fields...>}` with `name` first
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("name".to_string(), Value::String(self.name.clone()));
        for (key, value) in &self.fields {
            if key != "name" {
                object.insert(key.clone(), value.clone());
            }
        }
        Value::Object(object)
    }
}

/// New entity stub assembled before it is appended to a document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityRecord {
    pub name: String,
    pub fields: Map<String, Value>,
    pub columns: Vec<ColumnRecord>,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Map::new(),
            columns: Vec::new(),
        }
    }

    /// Render as `{name, <fields...>, columns?}`; an empty column list is omitted
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("name".to_string(), Value::String(self.name.clone()));
        for (key, value) in &self.fields {
            if key != "name" && key != "columns" {
                object.insert(key.clone(), value.clone());
            }
        }
        if !self.columns.is_empty() {
            object.insert(
                "columns".to_string(),
                Value::Array(self.columns.iter().map(ColumnRecord::to_value).collect()),
            );
        }
        Value::Object(object)
    }
}
