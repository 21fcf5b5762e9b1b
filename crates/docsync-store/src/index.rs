//! Entity index: which document defines which entity

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use docsync_core::errors::{DocSyncError, ExError, ExErrorKind};
use docsync_core::{log_op_end, log_op_error, log_op_start, EntityKind};
use walkdir::WalkDir;

use crate::config::{DuplicatePolicy, ProjectSettings};
use crate::document::{NodeRef, StructuredDocument};
use crate::errors::Result;
use crate::store::DocumentStore;

/// Where an entity is defined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLocation {
    pub path: PathBuf,
    pub kind: EntityKind,
    /// Index within the document's section sequence
    pub position: usize,
}

impl EntityLocation {
    pub fn node(&self) -> NodeRef {
        NodeRef::entity(self.kind, self.position)
    }
}

/// Two definitions of the same entity name; the later one won
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCollision {
    pub entity: String,
    pub replaced: EntityLocation,
    pub winner: EntityLocation,
}

#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    entries: BTreeMap<String, EntityLocation>,
    collisions: Vec<EntityCollision>,
    documents_scanned: usize,
}

impl EntityIndex {
    /// Scan the project's documentation directories
    ///
    /// Every qualifying file is parsed before anything is registered: a
    /// single parse failure aborts the scan and leaves `store` untouched.
    ///
    /// # Errors
    ///
    /// Returns `Parse` naming the offending file, `Io` if a directory cannot
    /// be walked, and `DuplicateEntity` when collisions are rejected.
    pub fn scan(root: &Path, settings: &ProjectSettings, store: &mut DocumentStore) -> Result<Self> {
        let start = Instant::now();
        log_op_start!("scan", path = %root.display());

        let result = Self::scan_inner(root, settings, store);
        match &result {
            Ok(index) => {
                log_op_end!(
                    "scan",
                    duration_ms = start.elapsed().as_millis() as u64,
                    document_count = index.documents_scanned,
                    entity_count = index.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    "scan",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
            }
        }
        result
    }

    fn scan_inner(root: &Path, settings: &ProjectSettings, store: &mut DocumentStore) -> Result<Self> {
        let mut parsed = Vec::new();
        for path in discover(root, settings)? {
            let document = StructuredDocument::read(&path)?;
            if document.is_empty() {
                tracing::debug!(path = %path.display(), "skipping empty document");
                continue;
            }
            parsed.push(document);
        }

        let mut index = EntityIndex {
            documents_scanned: parsed.len(),
            ..Default::default()
        };
        for document in &parsed {
            for entry in document.entities() {
                let location = EntityLocation {
                    path: document.path().to_path_buf(),
                    kind: entry.kind,
                    position: entry.index,
                };
                index.register(entry.name, location, settings.index.on_duplicate)?;
            }
        }

        for document in parsed {
            store.insert(document);
        }
        Ok(index)
    }

    fn register(
        &mut self,
        name: String,
        location: EntityLocation,
        policy: DuplicatePolicy,
    ) -> Result<()> {
        let Some(previous) = self.entries.get(&name) else {
            self.entries.insert(name, location);
            return Ok(());
        };

        if policy == DuplicatePolicy::Reject {
            return Err(DocSyncError::DuplicateEntity {
                entity: name,
                first_path: previous.path.display().to_string(),
                second_path: location.path.display().to_string(),
            }
            .into());
        }

        tracing::warn!(
            entity = %name,
            replaced = %previous.path.display(),
            winner = %location.path.display(),
            "entity defined more than once; the last definition wins"
        );
        self.collisions.push(EntityCollision {
            entity: name.clone(),
            replaced: previous.clone(),
            winner: location.clone(),
        });
        self.entries.insert(name, location);
        Ok(())
    }

    pub fn lookup(&self, entity: &str) -> Option<&EntityLocation> {
        self.entries.get(entity)
    }

    pub fn is_documented(&self, entity: &str) -> bool {
        self.entries.contains_key(entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityLocation)> {
        self.entries.iter().map(|(name, loc)| (name.as_str(), loc))
    }

    pub fn collisions(&self) -> &[EntityCollision] {
        &self.collisions
    }

    pub fn documents_scanned(&self) -> usize {
        self.documents_scanned
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Qualifying files in configured-directory order, then file-name order
fn discover(root: &Path, settings: &ProjectSettings) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir in &settings.scan.directories {
        let dir = root.join(dir);
        if !dir.is_dir() {
            tracing::debug!(path = %dir.display(), "scan directory missing; skipping");
            continue;
        }
        for entry in WalkDir::new(&dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                ExError::new(ExErrorKind::Io)
                    .with_op("scan")
                    .with_path(dir.display().to_string())
                    .with_message(e.to_string())
            })?;
            if entry.file_type().is_file() && settings.scan.accepts(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}
