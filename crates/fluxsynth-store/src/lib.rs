//! Fluxsynth store surface
//!
//! The generators treat "the warehouse" as an external relational store;
//! this crate defines that surface ([`TableStore`]) and two stand-in
//! implementations:
//!
//! - [`MemoryStore`]: tables in a map, for tests and ephemeral runs
//! - [`DirStore`]: one JSONL file per table; overwrite replaces the file
//!   atomically (write temp, rename), append writes to the end
//!
//! Rows cross this boundary as `serde_json::Value` so the store stays
//! schema-flexible, like a warehouse VARIANT column. The [`pipeline`] module
//! glues the synthesizers to a store.

pub mod pipeline;

#[cfg(test)]
mod tests;

use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use fluxsynth_gen::rng::XorShift64;

// ============================================================================
// Run context
// ============================================================================

/// Run-scoped naming for intermediate artifacts.
///
/// Generated once per invocation and threaded through the pipelines, so two
/// accidental concurrent runs never collide on temp names. Never a
/// process-wide global.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: String,
}

impl RunContext {
    pub fn new() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self {
            run_id: hex[..6].to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// `base` decorated with this run's suffix.
    pub fn scoped_name(&self, base: &str) -> String {
        format!("{base}_{}", self.run_id)
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Store surface
// ============================================================================

/// The relational surface the pipelines consume: bulk table (re)creation,
/// append, counting and random sampling. No query language.
pub trait TableStore: Send + Sync {
    /// Atomically replace `table` with `rows` (creating it if absent).
    fn replace_table(&self, table: &str, rows: Vec<Value>) -> Result<()>;

    /// Create `table` empty if it does not exist yet.
    fn create_if_missing(&self, table: &str) -> Result<()>;

    /// Append `rows` to an existing table.
    fn append_rows(&self, table: &str, rows: Vec<Value>) -> Result<()>;

    fn table_exists(&self, table: &str) -> bool;

    fn row_count(&self, table: &str) -> Result<u64>;

    /// Up to `n` rows, chosen by a seeded shuffle.
    fn sample_rows(&self, table: &str, n: usize, seed: u64) -> Result<Vec<Value>>;

    /// Each row kept independently with probability `pct / 100`.
    fn sample_fraction(&self, table: &str, pct: f64, seed: u64) -> Result<Vec<Value>>;

    fn read_all(&self, table: &str) -> Result<Vec<Value>>;
}

fn sample_from(mut rows: Vec<Value>, n: usize, seed: u64) -> Vec<Value> {
    let mut rng = XorShift64::new(seed ^ 0x5157_4f52_4153_0001);
    fluxsynth_gen::rng::shuffle(&mut rows, &mut rng);
    rows.truncate(n);
    rows
}

fn fraction_from(rows: Vec<Value>, pct: f64, seed: u64) -> Vec<Value> {
    let p = (pct / 100.0).clamp(0.0, 1.0);
    let mut rng = XorShift64::new(seed ^ 0x5157_4f52_4153_0002);
    rows.into_iter().filter(|_| rng.chance(p)).collect()
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStore for MemoryStore {
    fn replace_table(&self, table: &str, rows: Vec<Value>) -> Result<()> {
        self.tables.write().insert(table.to_string(), rows);
        Ok(())
    }

    fn create_if_missing(&self, table: &str) -> Result<()> {
        self.tables
            .write()
            .entry(table.to_string())
            .or_default();
        Ok(())
    }

    fn append_rows(&self, table: &str, rows: Vec<Value>) -> Result<()> {
        let mut tables = self.tables.write();
        let existing = tables
            .get_mut(table)
            .ok_or_else(|| anyhow!("table `{table}` does not exist"))?;
        existing.extend(rows);
        Ok(())
    }

    fn table_exists(&self, table: &str) -> bool {
        self.tables.read().contains_key(table)
    }

    fn row_count(&self, table: &str) -> Result<u64> {
        let tables = self.tables.read();
        let rows = tables
            .get(table)
            .ok_or_else(|| anyhow!("table `{table}` does not exist"))?;
        Ok(rows.len() as u64)
    }

    fn sample_rows(&self, table: &str, n: usize, seed: u64) -> Result<Vec<Value>> {
        Ok(sample_from(self.read_all(table)?, n, seed))
    }

    fn sample_fraction(&self, table: &str, pct: f64, seed: u64) -> Result<Vec<Value>> {
        Ok(fraction_from(self.read_all(table)?, pct, seed))
    }

    fn read_all(&self, table: &str) -> Result<Vec<Value>> {
        let tables = self.tables.read();
        let rows = tables
            .get(table)
            .ok_or_else(|| anyhow!("table `{table}` does not exist"))?;
        Ok(rows.clone())
    }
}

// ============================================================================
// Directory-backed store (one JSONL file per table)
// ============================================================================

pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating store directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.jsonl"))
    }

    fn write_rows(path: &Path, rows: &[Value]) -> Result<()> {
        let mut buf = String::new();
        for row in rows {
            buf.push_str(&serde_json::to_string(row)?);
            buf.push('\n');
        }
        fs::write(path, buf).with_context(|| format!("writing {}", path.display()))
    }
}

impl TableStore for DirStore {
    fn replace_table(&self, table: &str, rows: Vec<Value>) -> Result<()> {
        // Write fully to a temp file, then rename: the visible table is
        // either the old one or the complete new one, never partial. The
        // temp name is unique per call so concurrent runs cannot collide on
        // it (the last rename still wins, as with any single-writer store).
        let path = self.table_path(table);
        let hex = Uuid::new_v4().simple().to_string();
        let tmp = self.dir.join(format!(".{table}.jsonl.tmp-{}", &hex[..6]));
        Self::write_rows(&tmp, &rows)?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("swapping {} into place", path.display()))?;
        Ok(())
    }

    fn create_if_missing(&self, table: &str) -> Result<()> {
        let path = self.table_path(table);
        if !path.exists() {
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        }
        Ok(())
    }

    fn append_rows(&self, table: &str, rows: Vec<Value>) -> Result<()> {
        let path = self.table_path(table);
        if !path.exists() {
            return Err(anyhow!("table `{table}` does not exist"));
        }
        let mut file = OpenOptions::new()
            .append(true)
            .open(&path)
            .with_context(|| format!("opening {} for append", path.display()))?;
        for row in &rows {
            writeln!(file, "{}", serde_json::to_string(row)?)?;
        }
        Ok(())
    }

    fn table_exists(&self, table: &str) -> bool {
        self.table_path(table).exists()
    }

    fn row_count(&self, table: &str) -> Result<u64> {
        Ok(self.read_all(table)?.len() as u64)
    }

    fn sample_rows(&self, table: &str, n: usize, seed: u64) -> Result<Vec<Value>> {
        Ok(sample_from(self.read_all(table)?, n, seed))
    }

    fn sample_fraction(&self, table: &str, pct: f64, seed: u64) -> Result<Vec<Value>> {
        Ok(fraction_from(self.read_all(table)?, pct, seed))
    }

    fn read_all(&self, table: &str) -> Result<Vec<Value>> {
        let path = self.table_path(table);
        let file =
            File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let mut rows = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            rows.push(serde_json::from_str(&line)?);
        }
        Ok(rows)
    }
}
