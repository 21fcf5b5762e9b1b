//! In-memory document store
//!
//! Holds every document touched during one run, keyed by path, plus the
//! set of paths whose in-memory content differs from disk.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use docsync_core::errors::ExError;
use docsync_core::{log_op_end, log_op_error, log_op_start};

use crate::atomic::atomic_write;
use crate::document::StructuredDocument;
use crate::errors::{write_error, Result};

/// A document that could not be written
#[derive(Debug, Clone)]
pub struct FlushFailure {
    pub path: PathBuf,
    pub error: ExError,
}

/// Outcome of [`DocumentStore::flush_all`]
#[derive(Debug, Clone, Default)]
pub struct FlushReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<FlushFailure>,
}

impl FlushReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<PathBuf, StructuredDocument>,
    dirty: BTreeSet<PathBuf>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document, returning the cached instance on repeat calls
    ///
    /// # Errors
    ///
    /// Returns `NotFound`/`Io` if the file cannot be read, `Parse` if it is
    /// not a valid document.
    pub fn load(&mut self, path: &Path) -> Result<&mut StructuredDocument> {
        if !self.documents.contains_key(path) {
            let document = StructuredDocument::read(path)?;
            tracing::debug!(path = %path.display(), "document loaded");
            self.documents.insert(path.to_path_buf(), document);
        }
        self.documents
            .get_mut(path)
            .ok_or_else(|| crate::errors::parse_error(path, "document vanished from store"))
    }

    /// Register an already-parsed document; an existing entry is kept
    pub fn insert(&mut self, document: StructuredDocument) -> &mut StructuredDocument {
        self.documents
            .entry(document.path().to_path_buf())
            .or_insert(document)
    }

    /// Create a new empty document at `path`, replacing nothing
    pub fn create(&mut self, path: &Path) -> &mut StructuredDocument {
        self.insert(StructuredDocument::create(path))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }

    pub fn get(&self, path: &Path) -> Option<&StructuredDocument> {
        self.documents.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut StructuredDocument> {
        self.documents.get_mut(path)
    }

    pub fn documents(&self) -> impl Iterator<Item = &StructuredDocument> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn mark_dirty(&mut self, path: &Path) {
        if self.dirty.insert(path.to_path_buf()) {
            tracing::debug!(path = %path.display(), "document marked dirty");
        }
    }

    pub fn is_dirty(&self, path: &Path) -> bool {
        self.dirty.contains(path)
    }

    /// Paths pending a write, in path order
    pub fn dirty_paths(&self) -> Vec<PathBuf> {
        self.dirty.iter().cloned().collect()
    }

    /// Write every dirty document
    ///
    /// Each file is written on its own; a failure is logged, recorded in the
    /// report and leaves that path dirty while the rest are still written.
    pub fn flush_all(&mut self) -> FlushReport {
        let start = Instant::now();
        log_op_start!("flush_all", document_count = self.dirty.len());

        let mut report = FlushReport::default();
        for path in self.dirty_paths() {
            match self.flush_one(&path) {
                Ok(()) => {
                    self.dirty.remove(&path);
                    tracing::info!(path = %path.display(), "document written");
                    report.written.push(path);
                }
                Err(err) => {
                    let err = write_error(&path, &err);
                    log_op_error!(
                        "flush_document",
                        err.clone(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        path = %path.display()
                    );
                    report.failed.push(FlushFailure { path, error: err });
                }
            }
        }

        log_op_end!(
            "flush_all",
            duration_ms = start.elapsed().as_millis() as u64,
            written = report.written.len(),
            failed = report.failed.len()
        );
        report
    }

    fn flush_one(&self, path: &Path) -> Result<()> {
        let document = self
            .documents
            .get(path)
            .ok_or_else(|| crate::errors::parse_error(path, "dirty path has no document"))?;
        let text = document.render()?;
        atomic_write(path, text.as_bytes())
    }
}
