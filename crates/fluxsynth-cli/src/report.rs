//! Aggregate reports over materialized tables.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;

use fluxsynth_gen::summary::{CustomerSummary, EventSummary};
use fluxsynth_model::{CustomerRecord, ViewingEvent};
use fluxsynth_store::pipeline::{CUSTOMER_TABLE, EVENTS_BULK_TABLE, EVENTS_TABLE};
use fluxsynth_store::TableStore;

pub fn print_table_report(store: &dyn TableStore, table: &str) -> Result<()> {
    match table {
        CUSTOMER_TABLE => print_customer_report(store, table),
        EVENTS_TABLE | EVENTS_BULK_TABLE => print_event_report(store, table),
        other => Err(anyhow!(
            "unknown table `{other}` (try: {CUSTOMER_TABLE} | {EVENTS_TABLE} | {EVENTS_BULK_TABLE})"
        )),
    }
}

fn print_customer_report(store: &dyn TableStore, table: &str) -> Result<()> {
    let records: Vec<CustomerRecord> = read_table(store, table)?;
    let s = CustomerSummary::from_records(&records);

    println!("{} {}", "table".bold(), table.bold());
    println!("  rows          {}", s.total);
    println!(
        "  overlap       {} (TRIPLE {} / EMAIL {} / PHONE {})",
        s.overlap_total(),
        s.triple,
        s.email,
        s.phone
    );
    println!("  none          {}", s.none);
    println!("  duplicates    {}", s.duplicate);
    println!(
        "  null rates    email {:.3} / phone {:.3} (NONE subset)",
        s.none_email_null_rate, s.none_phone_null_rate
    );
    Ok(())
}

fn print_event_report(store: &dyn TableStore, table: &str) -> Result<()> {
    let events: Vec<ViewingEvent> = read_table(store, table)?;
    let s = EventSummary::from_events(&events);

    println!("{} {}", "table".bold(), table.bold());
    println!("  rows          {}", s.total);
    println!(
        "  attached      {} ({:.3})",
        s.attached,
        s.attachment_rate()
    );
    println!("  events/hour");
    let peak = s.per_hour.iter().copied().max().unwrap_or(0).max(1);
    for (hour, count) in s.per_hour.iter().enumerate() {
        let bar = "#".repeat((count * 40 / peak) as usize);
        println!("    {hour:02}h {count:>8} {bar}");
    }
    Ok(())
}

fn read_table<T: serde::de::DeserializeOwned>(
    store: &dyn TableStore,
    table: &str,
) -> Result<Vec<T>> {
    store
        .read_all(table)?
        .into_iter()
        .map(|row| serde_json::from_value(row).context("deserializing row"))
        .collect()
}
