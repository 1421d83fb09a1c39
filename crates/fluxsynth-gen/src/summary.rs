//! Aggregates over materialized datasets.
//!
//! These are the summaries a downstream analytics layer reads; the pipelines
//! also use [`EventSummary`] to detect attachment shortfall.

use chrono::Timelike;
use fluxsynth_model::{CustomerRecord, OverlapCategory, ViewingEvent};
use serde::{Deserialize, Serialize};

/// Per-category record counts plus null rates among the NONE subset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub total: u64,
    pub triple: u64,
    pub email: u64,
    pub phone: u64,
    pub none: u64,
    pub duplicate: u64,
    /// Null rate of `email` among NONE-category records.
    pub none_email_null_rate: f64,
    /// Null rate of `phone` among NONE-category records.
    pub none_phone_null_rate: f64,
}

impl CustomerSummary {
    pub fn from_records(records: &[CustomerRecord]) -> Self {
        let mut s = Self {
            total: records.len() as u64,
            ..Self::default()
        };
        let mut none_email_null = 0u64;
        let mut none_phone_null = 0u64;
        for r in records {
            match r.overlap_category {
                OverlapCategory::Triple => s.triple += 1,
                OverlapCategory::Email => s.email += 1,
                OverlapCategory::Phone => s.phone += 1,
                OverlapCategory::None => {
                    s.none += 1;
                    none_email_null += u64::from(r.email.is_none());
                    none_phone_null += u64::from(r.phone.is_none());
                }
                OverlapCategory::Duplicate => s.duplicate += 1,
            }
        }
        if s.none > 0 {
            s.none_email_null_rate = none_email_null as f64 / s.none as f64;
            s.none_phone_null_rate = none_phone_null as f64 / s.none as f64;
        }
        s
    }

    pub fn overlap_total(&self) -> u64 {
        self.triple + self.email + self.phone
    }
}

/// Event volume and attachment aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub total: u64,
    pub attached: u64,
    /// Events per hour-of-day.
    pub per_hour: [u64; 24],
}

impl EventSummary {
    pub fn from_events(events: &[ViewingEvent]) -> Self {
        let mut per_hour = [0u64; 24];
        let mut attached = 0u64;
        for e in events {
            per_hour[e.event_time.hour() as usize] += 1;
            attached += u64::from(e.customer_id.is_some());
        }
        Self {
            total: events.len() as u64,
            attached,
            per_hour,
        }
    }

    pub fn attachment_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.attached as f64 / self.total as f64
        }
    }
}
