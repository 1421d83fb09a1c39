//! Integration tests for the complete Fluxsynth pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - reference population → customer synthesizer → store
//! - customer table → event synthesizers (attachment pool sampling)
//! - overwrite vs append materialization on a real `DirStore`
//!
//! Run with: cargo test --test integration_tests

use chrono::NaiveDate;
use tempfile::tempdir;

use fluxsynth_gen::{BulkConfig, CalendarConfig, CustomerConfig, ReferencePopulation, SynthError};
use fluxsynth_model::ReferenceRecord;
use fluxsynth_store::pipeline::{self, CUSTOMER_TABLE, EVENTS_BULK_TABLE, EVENTS_TABLE};
use fluxsynth_store::{DirStore, MemoryStore, RunContext, TableStore};

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

fn reference() -> ReferencePopulation {
    let rows = (0..120)
        .map(|i| ReferenceRecord {
            email: (i % 7 != 0).then(|| format!("ref{i}@crocevia.test")),
            phone: (i % 5 != 0).then(|| format!("06 12 34 {:02} {:02}", i / 100, i % 100)),
            first_name: Some(format!("Ref{i}")),
            last_name: Some("Partner".to_string()),
        })
        .collect();
    ReferencePopulation::new(rows).unwrap()
}

// ============================================================================
// Full pipeline: customers → events
// ============================================================================

#[test]
fn test_customers_then_events_end_to_end() {
    let store = MemoryStore::new();
    let ctx = RunContext::new();

    let customers = CustomerConfig {
        target_rows: 2_000,
        seed: 42,
    };
    let report =
        pipeline::build_customers(&store, &customers, &reference(), anchor(), true, &ctx).unwrap();
    assert_eq!(report.rows_written, 2_000);
    assert_eq!(store.row_count(CUSTOMER_TABLE).unwrap(), 2_000);

    let events = CalendarConfig {
        sample_multiplier: 1,
        attach_customer_pct: 0.30,
        seed: 42,
    };
    let report = pipeline::build_events(&store, &events, anchor(), true, &ctx).unwrap();
    assert_eq!(report.table, EVENTS_TABLE);
    assert!(report.rows_written >= 336 * 20);
    assert!(report.rows_written <= 336 * 600);
    assert!(report.preview.len() <= 100);

    // Attached ids resolve to real customer rows.
    let rows = store.read_all(EVENTS_TABLE).unwrap();
    let attached: Vec<&str> = rows
        .iter()
        .filter_map(|r| r["customer_id"].as_str())
        .collect();
    assert!(!attached.is_empty());
    assert!(attached.iter().all(|id| id.starts_with("CUST-")));

    let rate = attached.len() as f64 / rows.len() as f64;
    assert!((rate - 0.30).abs() < 0.05, "attachment rate {rate}");
}

#[test]
fn test_bulk_pipeline_cycles_through_customers() {
    let store = MemoryStore::new();
    let ctx = RunContext::new();

    let customers = CustomerConfig {
        target_rows: 1_000,
        seed: 7,
    };
    pipeline::build_customers(&store, &customers, &reference(), anchor(), true, &ctx).unwrap();

    let bulk = BulkConfig {
        total_events: 20_000,
        attach_customer_pct: 0.30,
        seed: 7,
    };
    let report = pipeline::build_events_bulk(&store, &bulk, anchor(), true, &ctx).unwrap();
    assert_eq!(report.table, EVENTS_BULK_TABLE);
    assert_eq!(report.rows_written, 20_000);
    assert_eq!(store.row_count(EVENTS_BULK_TABLE).unwrap(), 20_000);

    let rows = store.read_all(EVENTS_BULK_TABLE).unwrap();
    let attached = rows.iter().filter(|r| !r["customer_id"].is_null()).count() as f64;
    let rate = attached / rows.len() as f64;
    assert!((rate - 0.30).abs() < 0.02, "attachment rate {rate}");
}

#[test]
fn test_event_pipelines_fail_fast_without_customers() {
    let store = MemoryStore::new();
    let ctx = RunContext::new();

    let err = pipeline::build_events(&store, &CalendarConfig::default(), anchor(), true, &ctx)
        .unwrap_err();
    assert!(matches!(err, SynthError::DataSource(_)));

    let bulk = BulkConfig {
        total_events: 100,
        attach_customer_pct: 0.30,
        seed: 1,
    };
    let err = pipeline::build_events_bulk(&store, &bulk, anchor(), true, &ctx).unwrap_err();
    assert!(matches!(err, SynthError::DataSource(_)));
}

// ============================================================================
// DirStore materialization
// ============================================================================

#[test]
fn test_dir_store_overwrite_and_append_modes() {
    let dir = tempdir().unwrap();
    let store = DirStore::open(dir.path()).unwrap();
    let ctx = RunContext::new();

    let cfg = CustomerConfig {
        target_rows: 300,
        seed: 5,
    };
    pipeline::build_customers(&store, &cfg, &reference(), anchor(), true, &ctx).unwrap();
    assert_eq!(store.row_count(CUSTOMER_TABLE).unwrap(), 300);

    // Overwrite replaces, append accumulates.
    pipeline::build_customers(&store, &cfg, &reference(), anchor(), true, &ctx).unwrap();
    assert_eq!(store.row_count(CUSTOMER_TABLE).unwrap(), 300);
    pipeline::build_customers(&store, &cfg, &reference(), anchor(), false, &ctx).unwrap();
    assert_eq!(store.row_count(CUSTOMER_TABLE).unwrap(), 600);

    // Rows survive a fresh store handle (they are really on disk).
    let reopened = DirStore::open(dir.path()).unwrap();
    assert_eq!(reopened.row_count(CUSTOMER_TABLE).unwrap(), 600);
}

#[test]
fn test_same_seed_pipelines_agree_across_stores() {
    let mem = MemoryStore::new();
    let dir = tempdir().unwrap();
    let disk = DirStore::open(dir.path()).unwrap();
    let ctx = RunContext::new();

    let cfg = CustomerConfig {
        target_rows: 400,
        seed: 99,
    };
    pipeline::build_customers(&mem, &cfg, &reference(), anchor(), true, &ctx).unwrap();
    pipeline::build_customers(&disk, &cfg, &reference(), anchor(), true, &ctx).unwrap();

    assert_eq!(
        mem.read_all(CUSTOMER_TABLE).unwrap(),
        disk.read_all(CUSTOMER_TABLE).unwrap()
    );
}
