//! High-volume viewing-event synthesizer.
//!
//! Exactly `total_events` events spread 2 s apart across a 4-week window
//! anchored three weeks before the current week. Every field is a pure
//! function of `event_id` (plus the run seed for the attachment gate), so
//! generation is embarrassingly parallel: rows are built with rayon and any
//! partitioning of the id range yields identical output.
//!
//! Attachment uses the same probabilistic semantic as the calendar variant
//! (a seeded per-event draw) rather than a periodic `id % 100` gate; the
//! draw is still a pure function of `(seed, event_id)`.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use fluxsynth_model::{
    ConnectionType, DeviceMeta, DeviceType, EventType, Isp, ViewingEvent,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::AttachmentStats;
use crate::fields;
use crate::rng::{row_rng, Stream};
use crate::schedule::week_start;
use crate::tables;
use crate::SynthError;

/// Window length and its offset before the current week.
const WINDOW_OFFSET_DAYS: i64 = 21;
const EVENT_SPACING_SECS: i64 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkConfig {
    pub total_events: u64,
    /// Target fraction of events carrying a customer_id, clamped to [0, 1].
    pub attach_customer_pct: f64,
    pub seed: u64,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            total_events: 5_000_000,
            attach_customer_pct: 0.30,
            seed: 1,
        }
    }
}

/// Generate exactly `cfg.total_events` events.
///
/// `customers` is the pre-materialized customer-id list attachment cycles
/// through; an empty slice degrades to all-null attachment.
pub fn synthesize(
    cfg: &BulkConfig,
    customers: &[String],
    anchor: NaiveDate,
) -> Result<(Vec<ViewingEvent>, AttachmentStats), SynthError> {
    if cfg.total_events == 0 {
        return Err(SynthError::Configuration(
            "total_events must be > 0".to_string(),
        ));
    }
    let attach_pct = cfg.attach_customer_pct.clamp(0.0, 1.0);

    if customers.is_empty() {
        tracing::warn!(
            "customer list is empty; all events will be generated without a customer_id"
        );
    }

    let window_start = (week_start(anchor) - Duration::days(WINDOW_OFFSET_DAYS))
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default();

    // Indexed range: rayon preserves order, so row i is always event_id i+1.
    let events: Vec<ViewingEvent> = (0..cfg.total_events as usize)
        .into_par_iter()
        .map(|i| bulk_event(cfg.seed, i as u64 + 1, window_start, attach_pct, customers))
        .collect();

    let attached = events.iter().filter(|e| e.customer_id.is_some()).count() as u64;
    let stats = AttachmentStats {
        requested_pct: attach_pct,
        total_events: events.len() as u64,
        attached_events: attached,
        pool_len: customers.len(),
    };
    Ok((events, stats))
}

fn bulk_event(
    seed: u64,
    event_id: u64,
    window_start: NaiveDateTime,
    attach_pct: f64,
    customers: &[String],
) -> ViewingEvent {
    let event_time = window_start + Duration::seconds((event_id as i64 - 1) * EVENT_SPACING_SECS);
    // Hour bucket in this variant.
    let slot_start_time = event_time
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .unwrap_or(event_time);

    let attach = row_rng(seed, Stream::Attach, event_id).chance(attach_pct);
    let customer_id = if attach && !customers.is_empty() {
        Some(customers[(event_id % customers.len() as u64) as usize].clone())
    } else {
        None
    };

    let device_type = match event_id % 4 {
        0 => DeviceType::SmartTv,
        1 => DeviceType::Mobile,
        2 => DeviceType::Web,
        _ => DeviceType::Tablet,
    };
    let os_name = match event_id % 4 {
        0 => "Tizen",
        1 => "iOS",
        2 => "ChromeOS",
        _ => "Android",
    };
    let connection_type = match event_id % 3 {
        0 => ConnectionType::Wifi,
        1 => ConnectionType::Ethernet,
        _ => ConnectionType::Cellular,
    };

    let bitrate_kbps = 1000 + (event_id % 5000) as u32;
    let buffer_events = (event_id % 8) as u32;
    let rebuffer_ratio = (event_id % 50) as f64 / 1000.0;
    let watch_seconds = 60 + (event_id % 1200) as u32;
    let (ad_breaks, ad_total_seconds) = fields::ad_counters(watch_seconds);

    let event_type = match event_id % 10 {
        0 => EventType::PlayStart,
        9 => EventType::PlayEnd,
        8 => EventType::Pause,
        7 => EventType::Seek,
        _ => EventType::Play,
    };

    let (ip_address, isp) = match event_id % 3 {
        0 => (
            format!(
                "81.{}.{}.{}",
                50 + event_id % 14,
                event_id % 256,
                (event_id * 7) % 256
            ),
            Isp::Orange,
        ),
        1 => (
            format!(
                "82.{}.{}.{}",
                70 + event_id % 50,
                event_id % 256,
                (event_id * 11) % 256
            ),
            Isp::Free,
        ),
        _ => (
            format!(
                "90.{}.{}.{}",
                event_id % 256,
                (event_id * 3) % 256,
                (event_id * 13) % 256
            ),
            Isp::Bouygues,
        ),
    };

    ViewingEvent {
        log_id: Uuid::new_v4(),
        channel: tables::CHANNEL.to_string(),
        event_time,
        slot_start_time,
        programme_id: format!(
            "{}-{}",
            tables::CHANNEL,
            slot_start_time.format("%Y%m%d-%H")
        ),
        customer_id,
        device_type,
        os_name: os_name.to_string(),
        connection_type,
        bitrate_kbps,
        buffer_events,
        rebuffer_ratio,
        watch_seconds,
        ad_breaks,
        ad_total_seconds,
        event_type,
        ip_address,
        isp,
        country: tables::COUNTRY.to_string(),
        region: tables::REGIONS_8[(event_id % 8) as usize].to_string(),
        city: tables::CITIES_10[(event_id % 10) as usize].to_string(),
        device: DeviceMeta {
            device_id: format!("dev_{}", event_id % 100_000),
            session_id: format!("sess_{}", event_id % 10_000),
            app_name: tables::APP_NAME.to_string(),
            app_version: format!("2.{}", event_id % 5),
            player_version: format!("5.{}", event_id % 3),
            resolution: fields::resolution_for_bitrate(bitrate_kbps).to_string(),
            drm: fields::drm_for_os(os_name).to_string(),
            manufacturer: match event_id % 4 {
                0 => "Samsung",
                1 => "Apple",
                2 => "LG",
                _ => "Sony",
            }
            .to_string(),
            model: fields::model_for_device(device_type).to_string(),
        },
    }
}
