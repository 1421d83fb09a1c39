//! Seed a local reference-population file.
//!
//! The customer synthesizer consumes an externally-owned reference table; in
//! local runs there is none, so this writes a plausible JSONL stand-in. Rows
//! carry seeded missingness but never lose both email and phone (the
//! synthesizer would drop such rows on load anyway).

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use fluxsynth_gen::rng::{row_rng, Stream};
use fluxsynth_gen::tables::{EMAIL_DOMAINS, FIRST_NAMES, LAST_NAMES};
use fluxsynth_model::ReferenceRecord;

pub fn write_reference(out: &Path, rows: u64, seed: u64) -> Result<u64> {
    let file =
        File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut writer = BufWriter::new(file);

    for i in 1..=rows {
        let record = reference_row(seed, i);
        writeln!(writer, "{}", serde_json::to_string(&record)?)?;
    }
    writer.flush()?;
    Ok(rows)
}

fn reference_row(seed: u64, i: u64) -> ReferenceRecord {
    let mut rng = row_rng(seed, Stream::Reference, i);
    let first = FIRST_NAMES[rng.gen_range_usize(FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range_usize(LAST_NAMES.len())];

    let email = format!(
        "{}.{}{}@{}",
        first.to_lowercase(),
        last.to_lowercase(),
        i,
        EMAIL_DOMAINS[rng.gen_range_usize(EMAIL_DOMAINS.len())]
    );
    let phone = format!(
        "0{} {:02} {:02} {:02} {:02}",
        rng.gen_range_u32(6, 7),
        rng.gen_range_u32(10, 99),
        rng.gen_range_u32(10, 99),
        rng.gen_range_u32(10, 99),
        rng.gen_range_u32(10, 99),
    );

    // Some rows miss one identity field, never both.
    let drop_email = rng.chance(0.10);
    let drop_phone = !drop_email && rng.chance(0.15);

    ReferenceRecord {
        email: (!drop_email).then_some(email),
        phone: (!drop_phone).then_some(phone),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
    }
}
