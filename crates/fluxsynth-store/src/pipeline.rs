//! Pipeline glue: run a synthesizer, materialize its table, report back.
//!
//! Each pipeline owns its output table for the duration of a run. There is
//! no partial success: either the full row set is written or the run fails;
//! in overwrite mode the store swaps the table in atomically.

use anyhow::Context;
use chrono::NaiveDate;
use serde_json::Value;

use fluxsynth_gen::events::AttachmentStats;
use fluxsynth_gen::{
    bulk, customers, events, BulkConfig, CalendarConfig, CustomerConfig, ReferencePopulation,
    SynthError,
};

use crate::{RunContext, TableStore};

pub const CUSTOMER_TABLE: &str = "crm_customers";
pub const EVENTS_TABLE: &str = "viewing_events";
pub const EVENTS_BULK_TABLE: &str = "viewing_events_bulk";

/// Bounded preview returned for inspection; not part of the data contract.
pub const PREVIEW_ROWS: usize = 100;

/// Slice of the customer table pre-sampled as the calendar attachment pool.
pub const CUSTOMER_POOL_PCT: f64 = 2.5;
/// Slice pre-materialized for the high-volume variant (better cycling
/// coverage at scale).
pub const BULK_POOL_PCT: f64 = 50.0;

/// Attachment shortfall beyond this is reported as a warning.
pub const ATTACH_TOLERANCE: f64 = 0.05;

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub table: String,
    pub rows_written: u64,
    pub preview: Vec<Value>,
    pub warnings: Vec<String>,
}

/// Build and materialize the customer population.
pub fn build_customers(
    store: &dyn TableStore,
    cfg: &CustomerConfig,
    reference: &ReferencePopulation,
    anchor: NaiveDate,
    overwrite: bool,
    ctx: &RunContext,
) -> Result<PipelineReport, SynthError> {
    tracing::info!(
        run_id = ctx.run_id(),
        target_rows = cfg.target_rows,
        "building customer population"
    );
    let records = customers::synthesize(cfg, reference, anchor)?;
    let rows = to_rows(&records)?;
    materialize(store, CUSTOMER_TABLE, rows, overwrite)?;
    finish(store, CUSTOMER_TABLE, records.len() as u64, cfg.seed, Vec::new())
}

/// Build and materialize one calendar week of events.
pub fn build_events(
    store: &dyn TableStore,
    cfg: &CalendarConfig,
    anchor: NaiveDate,
    overwrite: bool,
    ctx: &RunContext,
) -> Result<PipelineReport, SynthError> {
    let pool = customer_pool(store, CUSTOMER_POOL_PCT, cfg.seed)?;
    tracing::info!(
        run_id = ctx.run_id(),
        pool_len = pool.len(),
        "building calendar-weighted events"
    );
    let (generated, stats) = events::synthesize(cfg, &pool, anchor)?;
    let rows = to_rows(&generated)?;
    materialize(store, EVENTS_TABLE, rows, overwrite)?;
    finish(
        store,
        EVENTS_TABLE,
        generated.len() as u64,
        cfg.seed,
        attachment_warnings(&stats),
    )
}

/// Build and materialize the high-volume event table.
pub fn build_events_bulk(
    store: &dyn TableStore,
    cfg: &BulkConfig,
    anchor: NaiveDate,
    overwrite: bool,
    ctx: &RunContext,
) -> Result<PipelineReport, SynthError> {
    let pool = customer_pool(store, BULK_POOL_PCT, cfg.seed)?;
    tracing::info!(
        run_id = ctx.run_id(),
        total_events = cfg.total_events,
        pool_len = pool.len(),
        "building high-volume events"
    );
    let (generated, stats) = bulk::synthesize(cfg, &pool, anchor)?;
    let rows = to_rows(&generated)?;
    materialize(store, EVENTS_BULK_TABLE, rows, overwrite)?;
    finish(
        store,
        EVENTS_BULK_TABLE,
        generated.len() as u64,
        cfg.seed,
        attachment_warnings(&stats),
    )
}

/// Pre-sample the attachment pool from the customer table.
///
/// A missing prerequisite table is a hard `DataSource` failure; a table that
/// exists but samples empty degrades downstream (attachments resolve null).
fn customer_pool(
    store: &dyn TableStore,
    pct: f64,
    seed: u64,
) -> Result<Vec<String>, SynthError> {
    if !store.table_exists(CUSTOMER_TABLE) {
        return Err(SynthError::DataSource(format!(
            "customer table `{CUSTOMER_TABLE}` does not exist; run the customer synthesizer first"
        )));
    }
    let rows = store
        .sample_fraction(CUSTOMER_TABLE, pct, seed)
        .context("sampling the customer pool")?;
    Ok(rows
        .iter()
        .filter_map(|row| row.get("customer_id").and_then(Value::as_str))
        .map(String::from)
        .collect())
}

fn attachment_warnings(stats: &AttachmentStats) -> Vec<String> {
    let mut warnings = Vec::new();
    if stats.pool_len == 0 {
        warnings.push(
            "customer pool sampled empty; all events were written without a customer_id"
                .to_string(),
        );
    } else if stats.shortfall() > ATTACH_TOLERANCE {
        warnings.push(format!(
            "attachment rate {:.3} fell short of the requested {:.3} (pool of {})",
            stats.achieved_pct(),
            stats.requested_pct,
            stats.pool_len
        ));
    }
    for w in &warnings {
        tracing::warn!("{w}");
    }
    warnings
}

fn to_rows<T: serde::Serialize>(records: &[T]) -> Result<Vec<Value>, SynthError> {
    records
        .iter()
        .map(|r| serde_json::to_value(r).context("serializing record"))
        .collect::<anyhow::Result<Vec<Value>>>()
        .map_err(SynthError::from)
}

fn materialize(
    store: &dyn TableStore,
    table: &str,
    rows: Vec<Value>,
    overwrite: bool,
) -> Result<(), SynthError> {
    if overwrite {
        store.replace_table(table, rows)?;
    } else {
        store.create_if_missing(table)?;
        store.append_rows(table, rows)?;
    }
    Ok(())
}

fn finish(
    store: &dyn TableStore,
    table: &str,
    rows_written: u64,
    seed: u64,
    warnings: Vec<String>,
) -> Result<PipelineReport, SynthError> {
    let preview = store
        .sample_rows(table, PREVIEW_ROWS, seed)
        .context("sampling the preview")?;
    Ok(PipelineReport {
        table: table.to_string(),
        rows_written,
        preview,
        warnings,
    })
}
