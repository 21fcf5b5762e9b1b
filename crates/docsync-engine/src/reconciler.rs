//! Reconciliation of a generated catalog against the project's documents
//!
//! ## Run shape
//! 1. Scan the project into an [`EntityIndex`] (any parse failure aborts)
//! 2. Reconcile documented entities, then undocumented ones, each group in
//!    name order
//! 3. Flush dirty documents (update, interactive) or report them as
//!    pending (check, drift)
//!
//! Every missing field is routed through the run's [`ModePolicy`]; a field
//! that is present and non-empty is never touched.

use std::path::{Path, PathBuf};
use std::time::Instant;

use docsync_core::errors::{DocSyncError, ExError, ExErrorKind};
use docsync_core::{
    log_op_end, log_op_error, log_op_start, Catalog, CatalogEntry, ColumnRecord, DriftStatus,
    EntityKind, EntityRecord, FieldDecision, FieldTarget, Finding, FindingKind, GeneratedColumn,
    Mode, ModePolicy, Prompter, ReconcileReport, WriteFailure,
};
use docsync_core_types::RunId;
use docsync_store::errors::Result;
use docsync_store::index::EntityLocation;
use docsync_store::{DocumentStore, EntityIndex, NodeRef, ProjectSettings, StructuredDocument};
use serde_json::Value;

const DESCRIPTION: &str = "description";

pub struct ReconciliationEngine<'p> {
    root: PathBuf,
    settings: ProjectSettings,
    store: DocumentStore,
    index: EntityIndex,
    mode: Mode,
    policy: ModePolicy<'p>,
    report: ReconcileReport,
    run_id: RunId,
}

impl<'p> ReconciliationEngine<'p> {
    /// Scan `root` and prepare a run in `mode`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for interactive mode without a prompter and
    /// any scan failure (`Parse`, `Io`, `DuplicateEntity`).
    pub fn open(
        root: &Path,
        settings: ProjectSettings,
        mode: Mode,
        prompter: Option<&'p mut dyn Prompter>,
    ) -> Result<Self> {
        let policy = ModePolicy::for_mode(mode, prompter)?;
        let mut store = DocumentStore::new();
        let index = EntityIndex::scan(root, &settings, &mut store)?;

        Ok(Self {
            root: root.to_path_buf(),
            settings,
            store,
            index,
            mode,
            policy,
            report: ReconcileReport::new(mode),
            run_id: RunId::new(),
        })
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn index(&self) -> &EntityIndex {
        &self.index
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn report(&self) -> &ReconcileReport {
        &self.report
    }

    /// Reconcile every catalog entry; returns whether any change was needed or made
    ///
    /// # Errors
    ///
    /// Propagates prompter failures, document edit failures and parse
    /// failures of documents loaded for stub placement.
    pub fn reconcile(&mut self, catalog: &Catalog) -> Result<bool> {
        let span = tracing::info_span!("reconcile", run_id = %self.run_id, mode = %self.mode);
        let _guard = span.enter();

        let start = Instant::now();
        log_op_start!("reconcile", entity_count = catalog.len());

        let result = self.reconcile_inner(catalog);
        match &result {
            Ok(()) => {
                log_op_end!(
                    "reconcile",
                    duration_ms = start.elapsed().as_millis() as u64,
                    changes_needed = self.report.changes_needed,
                    finding_count = self.report.findings.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    "reconcile",
                    err.clone().with_run_id(self.run_id.clone()),
                    duration_ms = start.elapsed().as_millis() as u64
                );
            }
        }
        result.map(|()| self.report.changes_needed)
    }

    fn reconcile_inner(&mut self, catalog: &Catalog) -> Result<()> {
        let (documented, undocumented): (Vec<&CatalogEntry>, Vec<&CatalogEntry>) = catalog
            .entries()
            .partition(|entry| self.index.is_documented(&entry.entity_name));

        for entry in documented {
            let Some(location) = self.index.lookup(&entry.entity_name).cloned() else {
                continue;
            };
            self.update_existing(entry, &location)?;
        }
        for entry in undocumented {
            self.create_stub(entry)?;
        }
        Ok(())
    }

    /// Finish the run: flush in writing modes, otherwise list pending paths
    pub fn finish(mut self) -> ReconcileReport {
        if self.mode.writes_files() {
            let flush = self.store.flush_all();
            self.report.written = flush.written;
            self.report.write_failures = flush
                .failed
                .into_iter()
                .map(|failure| WriteFailure {
                    path: failure.path,
                    message: failure.error.to_string(),
                })
                .collect();
        } else {
            self.report.pending = self.store.dirty_paths();
        }
        self.report
    }

    fn update_existing(&mut self, entry: &CatalogEntry, location: &EntityLocation) -> Result<()> {
        let name = entry.entity_name.as_str();
        let entity_node = location.node();
        tracing::debug!(entity = %name, path = %location.path.display(), "updating documented entity");

        if let Some(description) = entry.description() {
            if self.document(&location.path)?.is_field_missing(entity_node, DESCRIPTION) {
                let target = FieldTarget::entity_field(location.kind, name, DESCRIPTION);
                let suggested = Value::String(description.to_string());
                self.fill_document_field(&location.path, entity_node, &target, &suggested)?;
            }
        }

        let columns = self
            .document(&location.path)?
            .columns(location.kind, location.position);
        for (position, column_name) in columns {
            let Some(generated) = entry.generated_column(&column_name) else {
                continue;
            };
            let column_node = NodeRef::column(location.kind, location.position, position);
            self.update_column(location, column_node, name, &column_name, generated)?;
        }
        Ok(())
    }

    fn update_column(
        &mut self,
        location: &EntityLocation,
        node: NodeRef,
        entity: &str,
        column: &str,
        generated: &GeneratedColumn,
    ) -> Result<()> {
        if self.mode.detects_drift()
            && generated.drift_status == DriftStatus::Drift
            && !self.document(&location.path)?.is_field_missing(node, DESCRIPTION)
        {
            tracing::warn!(entity = %entity, column = %column, "column description has drifted");
            self.report.record(
                Finding::new(FindingKind::Drift, entity)
                    .with_column(column)
                    .with_field(DESCRIPTION)
                    .with_path(&location.path),
            );
            self.report.changes_needed = true;
            return Ok(());
        }

        for (key, suggested) in &generated.generated_fields {
            if is_blank(suggested) || !self.document(&location.path)?.is_field_missing(node, key) {
                continue;
            }
            let target = FieldTarget::column_field(location.kind, entity, column, key);
            self.fill_document_field(&location.path, node, &target, suggested)?;
        }
        Ok(())
    }

    fn fill_document_field(
        &mut self,
        path: &Path,
        node: NodeRef,
        target: &FieldTarget<'_>,
        suggested: &Value,
    ) -> Result<()> {
        let Some(value) = self.process_field(target, suggested, path)? else {
            return Ok(());
        };
        let document = self
            .store
            .get_mut(path)
            .ok_or_else(|| document_missing(path))?;
        match document.set_field(node, target.key, &value) {
            Ok(()) => {
                self.store.mark_dirty(path);
                self.report
                    .record(field_finding(FindingKind::Filled, target, path));
            }
            Err(err) if err.kind() == ExErrorKind::Uneditable => {
                tracing::warn!(
                    entity = %target.entity,
                    column = target.column.unwrap_or(""),
                    field = %target.key,
                    path = %path.display(),
                    "field left unfilled to keep the document's formatting"
                );
                self.report
                    .record(field_finding(FindingKind::Uneditable, target, path));
            }
            Err(err) => return Err(err),
        }
        self.report.changes_needed = true;
        Ok(())
    }

    /// Route one missing field through the policy
    ///
    /// Reported and skipped fields are recorded here; an applied value is
    /// returned and recorded by the caller once it has landed.
    fn process_field(
        &mut self,
        target: &FieldTarget<'_>,
        suggested: &Value,
        path: &Path,
    ) -> Result<Option<Value>> {
        let decision = self.policy.decide(target, suggested)?;
        let outcome = match &decision {
            FieldDecision::Apply(_) => FindingKind::Filled,
            FieldDecision::Report => FindingKind::MissingField,
            FieldDecision::Skip => FindingKind::Skipped,
        };
        tracing::debug!(
            entity = %target.entity,
            column = target.column.unwrap_or(""),
            field = %target.key,
            outcome = outcome.as_str(),
            "field processed"
        );

        match decision {
            FieldDecision::Apply(value) => Ok(Some(value)),
            FieldDecision::Report => {
                self.report.record(field_finding(outcome, target, path));
                self.report.changes_needed = true;
                Ok(None)
            }
            FieldDecision::Skip => {
                self.report.record(field_finding(outcome, target, path));
                Ok(None)
            }
        }
    }

    fn create_stub(&mut self, entry: &CatalogEntry) -> Result<()> {
        let start = Instant::now();
        let name = entry.entity_name.as_str();

        let target = self.stub_target(entry);
        let exists = target
            .as_deref()
            .is_some_and(|path| self.store.contains(path) || path.is_file());
        // documents outside the scanned directories never reach the index
        if let (Some(path), true) = (target.as_deref(), exists) {
            if let Some(location) = self.find_in(path, name)? {
                tracing::info!(
                    entity = %name,
                    path = %path.display(),
                    "entity already documented next to its source"
                );
                return self.update_existing(entry, &location);
            }
        }

        if self.mode == Mode::Check {
            tracing::info!(entity = %name, "entity is not documented");
            self.report.record(Finding::new(FindingKind::MissingEntity, name));
            self.report.changes_needed = true;
            return Ok(());
        }

        let Some(target) = target else {
            log_op_error!(
                "create_stub",
                ExError::from(DocSyncError::Routing {
                    entity: name.to_string(),
                })
                .with_run_id(self.run_id.clone()),
                duration_ms = start.elapsed().as_millis() as u64,
                entity = %name
            );
            self.report.record(Finding::new(FindingKind::RoutingFailed, name));
            return Ok(());
        };

        log_op_start!("create_stub", entity = %name, path = %target.display());
        let (record, filled) = self.build_stub(entry, &target)?;

        let document = if exists {
            self.store.load(&target)?
        } else {
            self.store.create(&target)
        };
        match append_stub(document, &record) {
            Ok(()) => {}
            Err(err) if err.kind() == ExErrorKind::Uneditable => {
                log_op_error!(
                    "create_stub",
                    err.with_entity(name).with_run_id(self.run_id.clone()),
                    duration_ms = start.elapsed().as_millis() as u64,
                    entity = %name
                );
                self.report
                    .record(Finding::new(FindingKind::Uneditable, name).with_path(&target));
                self.report.changes_needed = true;
                return Ok(());
            }
            Err(err) => return Err(err),
        }
        self.store.mark_dirty(&target);

        for finding in filled {
            self.report.record(finding);
        }
        self.report
            .record(Finding::new(FindingKind::StubCreated, name).with_path(&target));
        self.report.changes_needed = true;
        log_op_end!(
            "create_stub",
            duration_ms = start.elapsed().as_millis() as u64,
            entity = %name,
            column_count = record.columns.len()
        );
        Ok(())
    }

    /// Location of `name` in the document at `path`, loading it if needed
    fn find_in(&mut self, path: &Path, name: &str) -> Result<Option<EntityLocation>> {
        let document = self.store.load(path)?;
        Ok(document
            .entities()
            .into_iter()
            .find(|existing| existing.name == name)
            .map(|existing| EntityLocation {
                path: path.to_path_buf(),
                kind: existing.kind,
                position: existing.index,
            }))
    }

    /// `dirname(hint)/<schema_file_name>`, with relative hints under the project root
    fn stub_target(&self, entry: &CatalogEntry) -> Option<PathBuf> {
        let hint = entry.source_file_hint.as_ref()?;
        if hint.as_os_str().is_empty() {
            return None;
        }
        let hint = self.root.join(hint);
        let dir = hint.parent().unwrap_or(&self.root);
        Some(dir.join(&self.settings.documents.schema_file_name))
    }

    /// Stub record plus the Filled findings to record once it is appended
    fn build_stub(&mut self, entry: &CatalogEntry, path: &Path) -> Result<(EntityRecord, Vec<Finding>)> {
        let name = entry.entity_name.as_str();
        let mut record = EntityRecord::new(name);
        let mut filled = Vec::new();

        if let Some(description) = entry.description() {
            let target = FieldTarget::entity_field(EntityKind::Model, name, DESCRIPTION);
            let suggested = Value::String(description.to_string());
            if let Some(value) = self.process_field(&target, &suggested, path)? {
                record.fields.insert(DESCRIPTION.to_string(), value);
                filled.push(field_finding(FindingKind::Filled, &target, path));
            }
        }

        for generated in &entry.columns {
            let mut column = ColumnRecord::new(generated.name.as_str());
            for (key, suggested) in &generated.generated_fields {
                if is_blank(suggested) {
                    continue;
                }
                let target =
                    FieldTarget::column_field(EntityKind::Model, name, &generated.name, key);
                if let Some(value) = self.process_field(&target, suggested, path)? {
                    column.fields.insert(key.clone(), value);
                    filled.push(field_finding(FindingKind::Filled, &target, path));
                }
            }
            record.columns.push(column);
        }
        Ok((record, filled))
    }

    fn document(&self, path: &Path) -> Result<&StructuredDocument> {
        self.store.get(path).ok_or_else(|| document_missing(path))
    }
}

fn append_stub(document: &mut StructuredDocument, record: &EntityRecord) -> Result<()> {
    let position = document.append_entity(EntityKind::Model, &record.to_value())?;
    tracing::debug!(
        entity = %record.name,
        path = %document.path().display(),
        position,
        "stub appended"
    );
    Ok(())
}

fn field_finding(kind: FindingKind, target: &FieldTarget<'_>, path: &Path) -> Finding {
    let finding = Finding::new(kind, target.entity)
        .with_field(target.key)
        .with_path(path);
    match target.column {
        Some(column) => finding.with_column(column),
        None => finding,
    }
}

/// A suggestion that would itself count as missing is never offered
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn document_missing(path: &Path) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("reconcile")
        .with_path(path.display().to_string())
        .with_message("indexed document is not held by the store")
}

/// Convenience for callers that do not need the engine between phases
///
/// # Errors
///
/// See [`ReconciliationEngine::open`] and [`ReconciliationEngine::reconcile`].
pub fn reconcile_project(
    root: &Path,
    settings: ProjectSettings,
    catalog: &Catalog,
    mode: Mode,
    prompter: Option<&mut dyn Prompter>,
) -> Result<ReconcileReport> {
    let mut engine = ReconciliationEngine::open(root, settings, mode, prompter)?;
    engine.reconcile(catalog)?;
    Ok(engine.finish())
}
