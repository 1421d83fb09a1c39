//! Calendar-weighted viewing-event synthesizer.
//!
//! One week of events anchored to the Monday of the anchor date's week.
//! Per-slot volume follows the weight curve in [`crate::schedule`]; each
//! event optionally attaches to a customer drawn from a small pre-sampled
//! pool via a deterministic `(slot, seq)` mapping, which keeps attachment
//! O(pool) instead of a full customer join per event.

use chrono::{Duration, NaiveDate};
use fluxsynth_model::{DeviceMeta, ViewingEvent};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields;
use crate::rng::{row_rng, Stream, XorShift64};
use crate::schedule::{week_slots, Slot, SLOT_SECONDS};
use crate::tables;
use crate::SynthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Scales the per-slot baseline volume.
    pub sample_multiplier: u32,
    /// Target fraction of events carrying a customer_id, clamped to [0, 1].
    pub attach_customer_pct: f64,
    pub seed: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            sample_multiplier: 1,
            attach_customer_pct: 0.30,
            seed: 1,
        }
    }
}

/// Attachment outcome of one event-synthesis run.
///
/// An empty pool degrades the run instead of failing it: all attachments
/// resolve to null and the shortfall is reported here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentStats {
    pub requested_pct: f64,
    pub total_events: u64,
    pub attached_events: u64,
    pub pool_len: usize,
}

impl AttachmentStats {
    pub fn achieved_pct(&self) -> f64 {
        if self.total_events == 0 {
            0.0
        } else {
            self.attached_events as f64 / self.total_events as f64
        }
    }

    /// How far attachment fell short of the request, in fraction points.
    pub fn shortfall(&self) -> f64 {
        (self.requested_pct - self.achieved_pct()).max(0.0)
    }
}

/// Generate one week of events.
///
/// `pool` is the pre-sampled customer-id slice attachment maps into; pass an
/// empty slice when no customers exist yet (degraded-but-valid output).
pub fn synthesize(
    cfg: &CalendarConfig,
    pool: &[String],
    anchor: NaiveDate,
) -> Result<(Vec<ViewingEvent>, AttachmentStats), SynthError> {
    if cfg.sample_multiplier == 0 {
        return Err(SynthError::Configuration(
            "sample_multiplier must be > 0".to_string(),
        ));
    }
    let attach_pct = cfg.attach_customer_pct.clamp(0.0, 1.0);

    if pool.is_empty() {
        tracing::warn!(
            "customer pool is empty; all events will be generated without a customer_id"
        );
    }

    let mut events = Vec::new();
    let mut attached = 0u64;

    for slot in week_slots(anchor) {
        let target = slot.target_events(cfg.sample_multiplier, cfg.seed);
        for seq in 1..=target {
            let event = slot_event(cfg.seed, &slot, seq, attach_pct, pool);
            if event.customer_id.is_some() {
                attached += 1;
            }
            events.push(event);
        }
    }

    let stats = AttachmentStats {
        requested_pct: attach_pct,
        total_events: events.len() as u64,
        attached_events: attached,
        pool_len: pool.len(),
    };
    Ok((events, stats))
}

fn slot_event(
    seed: u64,
    slot: &Slot,
    seq: u32,
    attach_pct: f64,
    pool: &[String],
) -> ViewingEvent {
    // seq <= 600 < 1000, so the composite key is unique across the week.
    let row_key = u64::from(slot.index) * 1000 + u64::from(seq);
    let mut rng = row_rng(seed, Stream::EventFields, row_key);

    let event_time = slot.start + Duration::seconds(i64::from(rng.gen_range_u32(0, SLOT_SECONDS - 1)));
    let attach = rng.chance(attach_pct);
    let customer_id = if attach && !pool.is_empty() {
        Some(pool[(row_key % pool.len() as u64) as usize].clone())
    } else {
        None
    };

    let f = fields::draw(&mut rng);
    let (ad_breaks, ad_total_seconds) = fields::ad_counters(f.watch_seconds);

    ViewingEvent {
        log_id: Uuid::new_v4(),
        channel: tables::CHANNEL.to_string(),
        event_time,
        slot_start_time: slot.start,
        programme_id: programme_id(slot),
        customer_id,
        device_type: f.device_type,
        os_name: f.os_name.to_string(),
        connection_type: f.connection_type,
        bitrate_kbps: f.bitrate_kbps,
        buffer_events: f.buffer_events,
        rebuffer_ratio: f.rebuffer_ratio,
        watch_seconds: f.watch_seconds,
        ad_breaks,
        ad_total_seconds,
        event_type: f.event_type,
        ip_address: f.ip_address.clone(),
        isp: f.isp,
        country: tables::COUNTRY.to_string(),
        region: tables::REGIONS_6[(slot.index % 6) as usize].to_string(),
        city: tables::CITIES_6[(seq % 6) as usize].to_string(),
        device: device_meta(&mut rng, &f),
    }
}

/// Stable programme id per slot.
fn programme_id(slot: &Slot) -> String {
    format!("{}-{}", tables::CHANNEL, slot.start.format("%Y%m%d-%H%M"))
}

fn device_meta(rng: &mut XorShift64, f: &fields::EventFields) -> DeviceMeta {
    DeviceMeta {
        device_id: Uuid::new_v4().to_string(),
        session_id: Uuid::new_v4().to_string(),
        app_name: tables::APP_NAME.to_string(),
        app_version: format!("1.{}.{}", rng.gen_range_u32(0, 9), rng.gen_range_u32(0, 9)),
        player_version: format!("4.{}", rng.gen_range_u32(0, 4)),
        resolution: fields::resolution_for_bitrate(f.bitrate_kbps).to_string(),
        drm: fields::drm_for_os(f.os_name).to_string(),
        manufacturer: fields::manufacturer_for_device(f.device_type).to_string(),
        model: fields::model_for_device(f.device_type).to_string(),
    }
}
