//! Fluxsynth CLI
//!
//! Command-line interface for:
//! - Building the synthetic CRM population (`customers`)
//! - Building one calendar week of viewing events (`events`)
//! - Building the high-volume event table (`events-bulk`)
//! - Summarizing a materialized table (`report`)
//! - Seeding a local reference-population file (`tools seed-reference`)

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use fluxsynth_gen::{BulkConfig, CalendarConfig, CustomerConfig, ReferencePopulation};
use fluxsynth_model::ReferenceRecord;
use fluxsynth_store::pipeline::{self, PipelineReport};
use fluxsynth_store::{DirStore, RunContext};

mod report;
mod seed_reference;

#[derive(Parser)]
#[command(name = "fluxsynth")]
#[command(
    author,
    version,
    about = "Fluxsynth: synthetic streaming-platform datasets (CRM + viewing logs)"
)]
struct Cli {
    /// Directory the table store lives in.
    #[arg(long, global = true, default_value = "./fluxsynth-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the customer population with controlled overlap, missingness
    /// and duplicates.
    Customers {
        /// Total rows to produce (base + duplicates).
        #[arg(long, default_value_t = 4_000_000)]
        target_rows: u64,

        /// Reference population file (JSONL; one object with
        /// email/phone/first_name/last_name per line).
        #[arg(long)]
        reference: PathBuf,

        /// Append a new batch instead of replacing the table.
        #[arg(long)]
        append: bool,

        /// RNG seed (deterministic).
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },

    /// Build one calendar week of viewing events.
    Events {
        /// Scales the per-slot baseline volume.
        #[arg(long, default_value_t = 1)]
        sample_multiplier: u32,

        /// Fraction of events attached to a customer (clamped to [0,1]).
        #[arg(long, default_value_t = 0.30)]
        attach_customer_pct: f64,

        /// Append a new batch instead of replacing the table.
        #[arg(long)]
        append: bool,

        /// RNG seed (deterministic).
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },

    /// Build the high-volume event table (pure index-modulo derivation).
    EventsBulk {
        /// Total events to produce.
        #[arg(long, default_value_t = 5_000_000)]
        total_events: u64,

        /// Fraction of events attached to a customer (clamped to [0,1]).
        #[arg(long, default_value_t = 0.30)]
        attach_customer_pct: f64,

        /// Append a new batch instead of replacing the table.
        #[arg(long)]
        append: bool,

        /// RNG seed (deterministic).
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },

    /// Print aggregate summaries for a materialized table.
    Report {
        /// Table name (crm_customers, viewing_events, viewing_events_bulk).
        #[arg(long, default_value = pipeline::CUSTOMER_TABLE)]
        table: String,
    },

    /// Tooling commands.
    Tools {
        #[command(subcommand)]
        command: ToolsCommands,
    },
}

#[derive(Subcommand)]
enum ToolsCommands {
    /// Write a plausible reference-population JSONL file for local runs.
    SeedReference {
        /// Rows to produce.
        #[arg(long, default_value_t = 10_000)]
        rows: u64,

        /// Output path.
        #[arg(long)]
        out: PathBuf,

        /// RNG seed (deterministic).
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let cli = Cli::parse();
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::Customers {
            target_rows,
            reference,
            append,
            seed,
        } => {
            let store = DirStore::open(&cli.data_dir)?;
            let reference = load_reference(&reference)?;
            let cfg = CustomerConfig { target_rows, seed };
            let report = pipeline::build_customers(
                &store,
                &cfg,
                &reference,
                today,
                !append,
                &RunContext::new(),
            )?;
            print_report(&report);
        }
        Commands::Events {
            sample_multiplier,
            attach_customer_pct,
            append,
            seed,
        } => {
            let store = DirStore::open(&cli.data_dir)?;
            let cfg = CalendarConfig {
                sample_multiplier,
                attach_customer_pct,
                seed,
            };
            let report =
                pipeline::build_events(&store, &cfg, today, !append, &RunContext::new())?;
            print_report(&report);
        }
        Commands::EventsBulk {
            total_events,
            attach_customer_pct,
            append,
            seed,
        } => {
            let store = DirStore::open(&cli.data_dir)?;
            let cfg = BulkConfig {
                total_events,
                attach_customer_pct,
                seed,
            };
            let report =
                pipeline::build_events_bulk(&store, &cfg, today, !append, &RunContext::new())?;
            print_report(&report);
        }
        Commands::Report { table } => {
            let store = DirStore::open(&cli.data_dir)?;
            report::print_table_report(&store, &table)?;
        }
        Commands::Tools { command } => match command {
            ToolsCommands::SeedReference { rows, out, seed } => {
                let written = seed_reference::write_reference(&out, rows, seed)?;
                eprintln!(
                    "{} {} rows to {}",
                    "wrote".green().bold(),
                    written,
                    out.display()
                );
            }
        },
    }

    Ok(())
}

fn load_reference(path: &PathBuf) -> Result<ReferencePopulation> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening reference population {}", path.display()))?;
    let mut rows: Vec<ReferenceRecord> = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line)
            .with_context(|| format!("parsing {}:{}", path.display(), lineno + 1))?;
        rows.push(row);
    }
    Ok(ReferencePopulation::new(rows)?)
}

fn print_report(report: &PipelineReport) {
    println!(
        "{} {} {} rows",
        "built".green().bold(),
        report.table.bold(),
        report.rows_written
    );
    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    if let Some(first) = report.preview.first() {
        println!("{} {}", "preview:".cyan(), first);
    }
}
