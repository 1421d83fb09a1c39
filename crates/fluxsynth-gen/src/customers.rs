//! Customer population synthesizer.
//!
//! Produces exactly `target_rows` records: `base_count` dense-indexed base
//! rows whose overlap category is a threshold function of the index, plus
//! `dup_count` near-duplicates sampled from the NONE-category subset via an
//! explicit seeded permutation.

use chrono::{Duration, NaiveDate};
use fluxsynth_model::{CustomerRecord, OverlapCategory, ReferenceRecord, SubscriptionLevel};
use serde::{Deserialize, Serialize};

use crate::alloc::PopulationPlan;
use crate::reference::ReferencePopulation;
use crate::rng::{row_rng, shuffle, Stream, XorShift64};
use crate::tables;
use crate::SynthError;

/// Null rate for `email` outside the email-overlap categories.
pub const EMAIL_MISSING_RATE: f64 = 0.15;
/// Null rate for `phone` outside the phone-overlap categories.
pub const PHONE_MISSING_RATE: f64 = 0.20;
/// Per-field mutation probability for duplicate records.
pub const DUPLICATE_MUTATION_RATE: f64 = 0.5;

/// `date_joined` falls within this many days before the anchor date.
const JOINED_WINDOW_DAYS: u32 = 3650;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerConfig {
    pub target_rows: u64,
    pub seed: u64,
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            target_rows: 4_000_000,
            seed: 1,
        }
    }
}

/// Build the full population.
///
/// Base rows come out in dense index order, duplicates appended after them;
/// category assignment and name fields are pure functions of the index, so
/// re-running with any seed reproduces them. The seed only drives
/// missingness, phone digits, joined dates, duplicate selection and
/// duplicate mutations.
pub fn synthesize(
    cfg: &CustomerConfig,
    reference: &ReferencePopulation,
    anchor: NaiveDate,
) -> Result<Vec<CustomerRecord>, SynthError> {
    let plan = PopulationPlan::for_target(cfg.target_rows)?;

    let mut out: Vec<CustomerRecord> = Vec::with_capacity(plan.target_rows as usize);
    // (position in `out`, dense row index) of every NONE-category row.
    let mut none_rows: Vec<(usize, u64)> = Vec::with_capacity(plan.none_count() as usize);

    for index in 1..=plan.base_count {
        let record = base_record(&plan, cfg.seed, reference, anchor, index);
        if record.overlap_category == OverlapCategory::None {
            none_rows.push((out.len(), index));
        }
        out.push(record);
    }

    // Uniform duplicate selection as an explicit permutation: shuffle the
    // NONE positions once, take the first dup_count.
    let mut select_rng = row_rng(cfg.seed, Stream::DuplicateSelect, 0);
    shuffle(&mut none_rows, &mut select_rng);
    for &(pos, index) in none_rows.iter().take(plan.dup_count as usize) {
        let dup = duplicate_record(&out[pos], cfg.seed, index);
        out.push(dup);
    }

    Ok(out)
}

fn base_record(
    plan: &PopulationPlan,
    seed: u64,
    reference: &ReferencePopulation,
    anchor: NaiveDate,
    index: u64,
) -> CustomerRecord {
    let category = plan.category_for_index(index);
    let partner = reference.partner(index);

    let gen_first = tables::FIRST_NAMES[(index % 20) as usize];
    let gen_last = tables::LAST_NAMES[(index % 25) as usize];

    // TRIPLE rows borrow the reference name when it is present.
    let (first_name, last_name) = if category == OverlapCategory::Triple {
        (
            partner.first_name.clone().unwrap_or_else(|| gen_first.to_string()),
            partner.last_name.clone().unwrap_or_else(|| gen_last.to_string()),
        )
    } else {
        (gen_first.to_string(), gen_last.to_string())
    };

    let email = resolve_email(category, partner, seed, index, gen_first, gen_last);
    let phone = resolve_phone(category, partner, seed, index);

    let joined_days = row_rng(seed, Stream::JoinDate, index).gen_range_u32(0, JOINED_WINDOW_DAYS);
    let date_joined = anchor - Duration::days(i64::from(joined_days));

    CustomerRecord {
        customer_id: format!("{}{:010}", tables::CUSTOMER_ID_PREFIX, index),
        first_name,
        last_name,
        email,
        phone,
        gender: (if index % 2 == 0 { "Male" } else { "Female" }).to_string(),
        profession: tables::PROFESSIONS[(index % 8) as usize].to_string(),
        date_joined,
        subscription_level: SubscriptionLevel::ALL[(index % 4) as usize],
        overlap_category: category,
    }
}

/// Email resolution: overlap categories take the reference email verbatim
/// (falling back to a synthesized one if the reference row has none, so the
/// category's non-null invariant holds); everything else synthesizes, then
/// missingness applies outside the protected categories.
fn resolve_email(
    category: OverlapCategory,
    partner: &ReferenceRecord,
    seed: u64,
    index: u64,
    gen_first: &str,
    gen_last: &str,
) -> Option<String> {
    let protected = matches!(category, OverlapCategory::Triple | OverlapCategory::Email);
    let raw = if protected {
        partner
            .email
            .clone()
            .unwrap_or_else(|| synth_email(index, gen_first, gen_last))
    } else {
        synth_email(index, gen_first, gen_last)
    };

    if !protected && row_rng(seed, Stream::EmailMissing, index).chance(EMAIL_MISSING_RATE) {
        None
    } else {
        Some(raw)
    }
}

fn resolve_phone(
    category: OverlapCategory,
    partner: &ReferenceRecord,
    seed: u64,
    index: u64,
) -> Option<String> {
    let protected = matches!(category, OverlapCategory::Triple | OverlapCategory::Phone);
    let raw = if protected {
        partner.phone.clone().unwrap_or_else(|| synth_phone(seed, index))
    } else {
        synth_phone(seed, index)
    };

    if !protected && row_rng(seed, Stream::PhoneMissing, index).chance(PHONE_MISSING_RATE) {
        None
    } else {
        Some(raw)
    }
}

fn synth_email(index: u64, first: &str, last: &str) -> String {
    format!(
        "{}.{}@{}",
        first.to_lowercase(),
        last.to_lowercase(),
        tables::EMAIL_DOMAINS[(index % 6) as usize]
    )
}

/// French-format number: `0X XX XX XX XX` with a deterministic prefix digit
/// and seeded two-digit groups.
fn synth_phone(seed: u64, index: u64) -> String {
    let mut rng = row_rng(seed, Stream::PhoneDigits, index);
    format!(
        "0{} {} {} {} {}",
        1 + index % 6,
        rng.gen_range_u32(10, 99),
        rng.gen_range_u32(10, 99),
        rng.gen_range_u32(10, 99),
        rng.gen_range_u32(10, 99),
    )
}

fn duplicate_record(base: &CustomerRecord, seed: u64, index: u64) -> CustomerRecord {
    let mut rng = row_rng(seed, Stream::DuplicateMutate, index);
    let email = match &base.email {
        Some(e) if rng.chance(DUPLICATE_MUTATION_RATE) => Some(mutate_email(e, &mut rng)),
        other => other.clone(),
    };
    let phone = match &base.phone {
        Some(p) if rng.chance(DUPLICATE_MUTATION_RATE) => Some(mutate_phone(p, &mut rng)),
        other => other.clone(),
    };

    CustomerRecord {
        customer_id: format!("{}{}", base.customer_id, tables::DUPLICATE_ID_SUFFIX),
        email,
        phone,
        overlap_category: OverlapCategory::Duplicate,
        ..base.clone()
    }
}

/// Insert a random digit just before the `@`.
fn mutate_email(email: &str, rng: &mut XorShift64) -> String {
    let digit = (b'0' + rng.gen_range_u32(0, 9) as u8) as char;
    match email.find('@') {
        Some(at) => {
            let mut out = String::with_capacity(email.len() + 1);
            out.push_str(&email[..at]);
            out.push(digit);
            out.push_str(&email[at..]);
            out
        }
        None => email.to_string(),
    }
}

/// Replace the last digit with a random one.
fn mutate_phone(phone: &str, rng: &mut XorShift64) -> String {
    let digit = (b'0' + rng.gen_range_u32(0, 9) as u8) as char;
    let mut out = phone.to_string();
    out.pop();
    out.push(digit);
    out
}
