use crate::pipeline::{self, CUSTOMER_TABLE, EVENTS_TABLE};
use crate::{DirStore, MemoryStore, RunContext, TableStore};

use chrono::NaiveDate;
use fluxsynth_gen::{CalendarConfig, CustomerConfig, ReferencePopulation, SynthError};
use fluxsynth_model::ReferenceRecord;
use serde_json::json;

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

fn small_reference() -> ReferencePopulation {
    let rows = (0..40)
        .map(|i| ReferenceRecord {
            email: Some(format!("ref{i}@crocevia.test")),
            phone: Some(format!("06 00 00 00 {i:02}")),
            first_name: Some(format!("Ref{i}")),
            last_name: Some("Partner".to_string()),
        })
        .collect();
    ReferencePopulation::new(rows).unwrap()
}

// ============================================================================
// RunContext
// ============================================================================

#[test]
fn run_context_scopes_names_uniquely() {
    let a = RunContext::new();
    let b = RunContext::new();
    assert_eq!(a.run_id().len(), 6);
    assert_ne!(a.scoped_name("tmp_source"), b.scoped_name("tmp_source"));
    assert!(a.scoped_name("tmp_source").starts_with("tmp_source_"));
}

// ============================================================================
// MemoryStore
// ============================================================================

#[test]
fn memory_store_replace_append_count() {
    let store = MemoryStore::new();
    assert!(!store.table_exists("t"));
    assert!(store.append_rows("t", vec![json!({"a": 1})]).is_err());

    store.replace_table("t", vec![json!({"a": 1}), json!({"a": 2})]).unwrap();
    assert_eq!(store.row_count("t").unwrap(), 2);

    store.append_rows("t", vec![json!({"a": 3})]).unwrap();
    assert_eq!(store.row_count("t").unwrap(), 3);

    // Replace drops the previous contents entirely.
    store.replace_table("t", vec![json!({"a": 9})]).unwrap();
    assert_eq!(store.row_count("t").unwrap(), 1);
}

#[test]
fn memory_store_sampling_is_seeded() {
    let store = MemoryStore::new();
    let rows = (0..200).map(|i| json!({"i": i})).collect::<Vec<_>>();
    store.replace_table("t", rows).unwrap();

    let a = store.sample_rows("t", 10, 7).unwrap();
    let b = store.sample_rows("t", 10, 7).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 10);

    let frac = store.sample_fraction("t", 10.0, 7).unwrap();
    // 10% of 200 with a generous slack.
    assert!(frac.len() < 60, "sampled {} of 200", frac.len());
    assert_eq!(frac, store.sample_fraction("t", 10.0, 7).unwrap());
}

// ============================================================================
// DirStore
// ============================================================================

#[test]
fn dir_store_roundtrips_and_replaces_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::open(dir.path()).unwrap();

    store
        .replace_table("t", vec![json!({"a": 1}), json!({"a": 2})])
        .unwrap();
    assert_eq!(store.row_count("t").unwrap(), 2);
    assert_eq!(store.read_all("t").unwrap()[1], json!({"a": 2}));

    store.replace_table("t", vec![json!({"a": 3})]).unwrap();
    assert_eq!(store.read_all("t").unwrap(), vec![json!({"a": 3})]);

    // No temp artifact left behind after the swap.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn dir_store_append_requires_existing_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::open(dir.path()).unwrap();

    assert!(store.append_rows("t", vec![json!({"a": 1})]).is_err());
    store.create_if_missing("t").unwrap();
    store.append_rows("t", vec![json!({"a": 1})]).unwrap();
    store.append_rows("t", vec![json!({"a": 2})]).unwrap();
    assert_eq!(store.row_count("t").unwrap(), 2);
}

// ============================================================================
// Pipelines
// ============================================================================

#[test]
fn customer_pipeline_writes_exact_rows_and_preview() {
    let store = MemoryStore::new();
    let cfg = CustomerConfig {
        target_rows: 1_000,
        seed: 11,
    };
    let report = pipeline::build_customers(
        &store,
        &cfg,
        &small_reference(),
        anchor(),
        true,
        &RunContext::new(),
    )
    .unwrap();

    assert_eq!(report.table, CUSTOMER_TABLE);
    assert_eq!(report.rows_written, 1_000);
    assert_eq!(store.row_count(CUSTOMER_TABLE).unwrap(), 1_000);
    assert_eq!(report.preview.len(), 100);
    assert!(report.warnings.is_empty());
}

#[test]
fn event_pipeline_requires_the_customer_table() {
    let store = MemoryStore::new();
    let err = pipeline::build_events(
        &store,
        &CalendarConfig::default(),
        anchor(),
        true,
        &RunContext::new(),
    )
    .unwrap_err();
    assert!(matches!(err, SynthError::DataSource(_)));
}

#[test]
fn event_pipeline_degrades_on_an_empty_customer_table() {
    let store = MemoryStore::new();
    store.replace_table(CUSTOMER_TABLE, Vec::new()).unwrap();

    let cfg = CalendarConfig {
        sample_multiplier: 1,
        attach_customer_pct: 0.30,
        seed: 5,
    };
    let report =
        pipeline::build_events(&store, &cfg, anchor(), true, &RunContext::new()).unwrap();

    assert!(!report.warnings.is_empty());
    assert!(store.row_count(EVENTS_TABLE).unwrap() > 0);
    // Every written event is unattached.
    let attached = store
        .read_all(EVENTS_TABLE)
        .unwrap()
        .iter()
        .filter(|row| !row["customer_id"].is_null())
        .count();
    assert_eq!(attached, 0);
}

#[test]
fn append_mode_accumulates_batches() {
    let store = MemoryStore::new();
    let cfg = CustomerConfig {
        target_rows: 500,
        seed: 3,
    };
    let ctx = RunContext::new();
    pipeline::build_customers(&store, &cfg, &small_reference(), anchor(), false, &ctx).unwrap();
    pipeline::build_customers(&store, &cfg, &small_reference(), anchor(), false, &ctx).unwrap();
    assert_eq!(store.row_count(CUSTOMER_TABLE).unwrap(), 1_000);
}
