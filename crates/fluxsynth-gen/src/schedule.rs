//! Weekly slot schedule and the time-of-day/day-of-week weight curve.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::rng::{row_rng, Stream};

/// 7 days × 48 half-hour slots.
pub const SLOTS_PER_WEEK: u32 = 336;
pub const SLOT_SECONDS: u32 = 1800;

/// Per-slot event-count clamp; keeps generation cost bounded.
pub const MIN_EVENTS_PER_SLOT: u32 = 20;
pub const MAX_EVENTS_PER_SLOT: u32 = 600;

/// Baseline events per slot before weighting.
const BASE_RATE: f64 = 100.0;
/// Jitter added to the baseline, in `[0, 30)`.
const JITTER_SPAN: u32 = 30;
const WEEKEND_FACTOR: f64 = 1.2;

/// Monday of the week containing `anchor`.
pub fn week_start(anchor: NaiveDate) -> NaiveDate {
    anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()))
}

/// Hour-of-day weight lookup.
pub fn hour_weight(hour: u32) -> f64 {
    match hour {
        0..=5 => 1.0,
        6..=8 => 3.0,
        9..=12 => 4.0,
        13 => 6.0,
        14..=17 => 4.0,
        18..=19 => 6.0,
        20 => 8.0,
        21..=22 => 12.0,
        23 => 4.0,
        _ => 3.0,
    }
}

/// One half-hour slot of the generated week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// 0-based slot index within the week.
    pub index: u32,
    pub start: NaiveDateTime,
    pub weight: f64,
}

impl Slot {
    /// Jittered, weighted, clamped per-slot event target.
    pub fn target_events(&self, sample_multiplier: u32, seed: u64) -> u32 {
        let jitter = row_rng(seed, Stream::SlotJitter, u64::from(self.index))
            .gen_range_u32(0, JITTER_SPAN - 1);
        let raw =
            ((BASE_RATE + f64::from(jitter)) * self.weight * f64::from(sample_multiplier) / 10.0)
                .round() as u32;
        raw.clamp(MIN_EVENTS_PER_SLOT, MAX_EVENTS_PER_SLOT)
    }
}

/// The 336 slots of the week containing `anchor`, in order.
pub fn week_slots(anchor: NaiveDate) -> Vec<Slot> {
    let start = week_start(anchor)
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default();
    (0..SLOTS_PER_WEEK)
        .map(|index| {
            let slot_start = start + Duration::minutes(i64::from(index) * 30);
            let weekend = matches!(slot_start.weekday(), Weekday::Sat | Weekday::Sun);
            let weight =
                hour_weight(slot_start.hour()) * if weekend { WEEKEND_FACTOR } else { 1.0 };
            Slot {
                index,
                start: slot_start,
                weight,
            }
        })
        .collect()
}
