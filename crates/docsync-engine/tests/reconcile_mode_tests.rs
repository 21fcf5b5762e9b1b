// Mode gating: check and drift never touch disk, interactive follows the
// prompter, and the engine command surface wires the inputs together

mod common;

use std::io::Cursor;

use common::{customers_catalog, lookup, Project, ScriptedPrompter, CUSTOMERS_SCHEMA};
use docsync_core::{Catalog, ExErrorKind, FindingKind, LinePrompter, Mode, Prompter};
use docsync_engine::commands::engine_command::{
    apply_engine_command, EngineCommand, EngineCommandResult,
};
use docsync_engine::commands::reconcile::ReconcileOptions;
use docsync_engine::reconciler::reconcile_project;
use docsync_engine::ReconciliationEngine;
use docsync_store::ProjectSettings;
use serde_json::json;

fn run(
    project: &Project,
    catalog: &Catalog,
    mode: Mode,
    prompter: Option<&mut dyn Prompter>,
) -> docsync_core::ReconcileReport {
    reconcile_project(project.root(), ProjectSettings::default(), catalog, mode, prompter).unwrap()
}

fn drifted_catalog() -> Catalog {
    Catalog::from_json_value(json!({
        "customers": {
            "columns": [
                {"name": "customer_id", "ai_generated": {"description": "Primary key"}},
                {
                    "name": "email",
                    "ai_generated": {"description": "Hashed contact address", "tags": ["pii"]},
                    "drift_status": "DRIFT"
                }
            ]
        }
    }))
    .unwrap()
}

#[test]
fn test_check_reports_without_writing() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);
    let before = project.snapshot();

    let report = run(&project, &customers_catalog(), Mode::Check, None);

    assert!(report.changes_needed);
    assert!(report.ci_failed());
    assert_eq!(project.snapshot(), before);
    assert!(report.written.is_empty());

    let missing: Vec<String> = report
        .findings_of(FindingKind::MissingField)
        .map(|f| f.location())
        .collect();
    assert_eq!(
        missing,
        ["customers.customer_id [description]", "customers.email [tags]"]
    );
}

#[test]
fn test_check_reports_undocumented_entities() {
    let project = Project::new();
    let catalog = Catalog::from_json_value(json!({
        "stg_orders": {"original_file_path": "models/staging/stg_orders.sql"}
    }))
    .unwrap();

    let report = run(&project, &catalog, Mode::Check, None);

    assert!(report.ci_failed());
    assert_eq!(report.count_of(FindingKind::MissingEntity), 1);
    assert!(project.snapshot().is_empty());
}

#[test]
fn test_check_passes_on_complete_documentation() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);
    let catalog = customers_catalog();
    run(&project, &catalog, Mode::Update, None);

    let report = run(&project, &catalog, Mode::Check, None);

    assert!(!report.changes_needed);
    assert!(!report.ci_failed());
}

#[test]
fn test_drift_flags_column_and_leaves_disk_alone() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);
    let before = project.snapshot();

    let report = run(&project, &drifted_catalog(), Mode::Drift, None);

    assert!(report.ci_failed());
    assert_eq!(project.snapshot(), before);

    let drift: Vec<String> = report
        .findings_of(FindingKind::Drift)
        .map(|f| f.location())
        .collect();
    assert_eq!(drift, ["customers.email [description]"]);
    // the drifted column is left alone entirely, other gaps are still filled in memory
    assert!(report
        .findings
        .iter()
        .all(|f| f.column.as_deref() != Some("email") || f.kind == FindingKind::Drift));
    assert_eq!(report.count_of(FindingKind::Filled), 1);
    assert_eq!(report.pending, vec![project.path("models/schema.yml")]);
}

#[test]
fn test_drift_status_is_ignored_outside_drift_mode() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);

    let report = run(&project, &drifted_catalog(), Mode::Update, None);

    assert_eq!(report.count_of(FindingKind::Drift), 0);
    let doc = project.yaml("models/schema.yml");
    assert_eq!(lookup(&doc, &["models", "0", "columns", "1", "tags", "0"]), "pii");
    assert_eq!(
        lookup(&doc, &["models", "0", "columns", "1", "description"]),
        "Contact address"
    );
}

#[test]
fn test_drift_without_existing_description_is_filled() {
    let project = Project::new();
    project.write(
        "models/schema.yml",
        "models:\n  - name: customers\n    columns:\n      - name: email\n",
    );

    let report = run(&project, &drifted_catalog(), Mode::Drift, None);

    assert_eq!(report.count_of(FindingKind::Drift), 0);
    assert_eq!(report.count_of(FindingKind::Filled), 2);
    assert!(report.ci_failed());
}

#[test]
fn test_interactive_accept_and_skip() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);
    let mut prompter = ScriptedPrompter::new([Some("Primary key"), None]);

    let report = run(&project, &customers_catalog(), Mode::Interactive, Some(&mut prompter));

    assert_eq!(
        prompter.asked,
        [
            (
                "column 'customers.customer_id'".to_string(),
                "description".to_string(),
                "Primary key".to_string()
            ),
            (
                "column 'customers.email'".to_string(),
                "tags".to_string(),
                r#"["pii"]"#.to_string()
            ),
        ]
    );
    assert_eq!(report.count_of(FindingKind::Filled), 1);
    assert_eq!(report.count_of(FindingKind::Skipped), 1);

    let doc = project.yaml("models/schema.yml");
    assert_eq!(
        lookup(&doc, &["models", "0", "columns", "0", "description"]),
        "Primary key"
    );
    assert!(lookup(&doc, &["models", "0", "columns", "1", "tags"]).is_null());
}

#[test]
fn test_interactive_edit_is_stored_as_text() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);
    let mut prompter = ScriptedPrompter::new([Some("Surrogate key"), Some(r#"["pii"]"#)]);

    run(&project, &customers_catalog(), Mode::Interactive, Some(&mut prompter));

    let doc = project.yaml("models/schema.yml");
    assert_eq!(
        lookup(&doc, &["models", "0", "columns", "0", "description"]),
        "Surrogate key"
    );
    // accepting the shown suggestion keeps its structure
    assert_eq!(lookup(&doc, &["models", "0", "columns", "1", "tags", "0"]), "pii");
}

#[test]
fn test_interactive_through_line_prompter() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);
    // accept the first suggestion, skip the second
    let mut prompter = LinePrompter::new(Cursor::new(b"\ns\n".to_vec()), Vec::new());

    let report = run(&project, &customers_catalog(), Mode::Interactive, Some(&mut prompter));

    assert_eq!(report.count_of(FindingKind::Filled), 1);
    assert_eq!(report.count_of(FindingKind::Skipped), 1);
    let shown = String::from_utf8(prompter.into_output()).unwrap();
    assert!(shown.contains("customers.customer_id"));
}

#[test]
fn test_interactive_skip_everything_changes_nothing() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);
    let before = project.snapshot();
    let mut prompter = ScriptedPrompter::new([None, None]);

    let report = run(&project, &customers_catalog(), Mode::Interactive, Some(&mut prompter));

    assert!(!report.changes_needed);
    assert!(report.written.is_empty());
    assert_eq!(project.snapshot(), before);
}

#[test]
fn test_interactive_requires_prompter() {
    let project = Project::new();
    let err = ReconciliationEngine::open(
        project.root(),
        ProjectSettings::default(),
        Mode::Interactive,
        None,
    )
    .err()
    .unwrap();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_parse_failure_aborts_before_any_write() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);
    project.write("models/broken.yml", "models:\n  - name: [unclosed\n");
    let before = project.snapshot();

    let err = ReconciliationEngine::open(
        project.root(),
        ProjectSettings::default(),
        Mode::Update,
        None,
    )
    .err()
    .unwrap();

    assert_eq!(err.kind(), ExErrorKind::Parse);
    assert!(err.path().unwrap().ends_with("broken.yml"));
    assert_eq!(project.snapshot(), before);
}

#[test]
fn test_engine_command_reconcile_from_files() {
    let project = Project::new();
    project.write("models/schema.yml", CUSTOMERS_SCHEMA);
    let catalog_path = project.write(
        "target/catalog.json",
        r#"{"customers": {"columns": [{"name": "customer_id", "ai_generated": {"description": "Primary key"}}]}}"#,
    );

    let result = apply_engine_command(
        EngineCommand::Reconcile(ReconcileOptions {
            project_dir: project.root().to_path_buf(),
            catalog_path,
            mode: Mode::Update,
            settings: ProjectSettings::default(),
        }),
        None,
    )
    .unwrap();

    let EngineCommandResult::Reconcile(report) = result else {
        panic!("expected a reconcile result");
    };
    assert_eq!(report.written, vec![project.path("models/schema.yml")]);
}

#[test]
fn test_engine_command_lineage_from_files() {
    let project = Project::new();
    let fks = project.write(
        "fks.json",
        r#"[{"source_table": "orders", "source_column": "customer_id",
             "target_table": "customers", "target_column": "id"}]"#,
    );
    let models = project.write(
        "models.json",
        r#"[{"name": "customers", "dependencies": ["raw.customers"]}]"#,
    );

    let result = apply_engine_command(
        EngineCommand::Lineage {
            foreign_keys_path: fks,
            models_path: models,
        },
        None,
    )
    .unwrap();

    let EngineCommandResult::Lineage(graph) = result else {
        panic!("expected a lineage result");
    };
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.style_of("customers"), Some(docsync_core::NodeStyle::Model));
    assert_eq!(graph.style_of("raw.customers"), Some(docsync_core::NodeStyle::Source));
}

#[test]
fn test_engine_command_missing_catalog() {
    let project = Project::new();
    let err = apply_engine_command(
        EngineCommand::Reconcile(ReconcileOptions {
            project_dir: project.root().to_path_buf(),
            catalog_path: project.path("absent.json"),
            mode: Mode::Check,
            settings: ProjectSettings::default(),
        }),
        None,
    )
    .err()
    .unwrap();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}
