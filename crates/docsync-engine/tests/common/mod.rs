//! Shared fixtures for engine integration tests
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use docsync_core::{Catalog, Prompter, Result};
use tempfile::TempDir;

pub const CUSTOMERS_SCHEMA: &str = "\
version: 2

models:
  - name: customers
    description: Customer dimension
    columns:
      - name: customer_id
        tests:
          - unique
      - name: email
        description: Contact address   # pii
";

/// Temporary project tree
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    pub fn yaml(&self, rel: &str) -> serde_yaml::Value {
        serde_yaml::from_str(&self.read(rel)).unwrap()
    }

    /// Every file under the root with its bytes
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(self.root(), self.root(), &mut files);
        files
    }
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let rel = path.strip_prefix(root).unwrap().to_path_buf();
            files.insert(rel, fs::read(&path).unwrap());
        }
    }
}

/// Catalog matching [`CUSTOMERS_SCHEMA`]: `customer_id` lacks a description
/// and `email` lacks tags
pub fn customers_catalog() -> Catalog {
    Catalog::from_json_value(serde_json::json!({
        "customers": {
            "model_description": "Generated customer summary",
            "model_lineage_chart": "graph TD;",
            "columns": [
                {
                    "name": "customer_id",
                    "type": "integer",
                    "ai_generated": {"description": "Primary key"},
                    "drift_status": "N/A"
                },
                {
                    "name": "email",
                    "type": "varchar",
                    "ai_generated": {"description": "Generated email text", "tags": ["pii"]},
                    "drift_status": "MATCH"
                }
            ],
            "original_file_path": "models/customers.sql"
        }
    }))
    .unwrap()
}

/// Follow a path of keys and sequence positions; absent nodes are null
pub fn lookup(value: &serde_yaml::Value, path: &[&str]) -> serde_yaml::Value {
    path.iter()
        .fold(value, |node, key| match key.parse::<usize>() {
            Ok(i) => &node[i],
            Err(_) => &node[*key],
        })
        .clone()
}

/// Prompter answering from a script; records every question
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    pub asked: Vec<(String, String, String)>,
}

impl ScriptedPrompter {
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<&'static str>>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(str::to_string)).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, node_label: &str, field_key: &str, suggested: &str) -> Result<Option<String>> {
        self.asked
            .push((node_label.to_string(), field_key.to_string(), suggested.to_string()));
        Ok(self.answers.pop_front().unwrap_or(None))
    }
}
