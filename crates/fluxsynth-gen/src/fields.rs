//! Shared per-event field derivations.
//!
//! [`draw`] expands one per-event generator into the full device/network/geo
//! field set through a fixed decision tree: a fixed draw order and cumulative
//! thresholds, so fixing the seed fixes every field. The pure helpers at the
//! bottom (`resolution_for_bitrate`, `drm_for_os`, …) are shared by both
//! event synthesizers.

use fluxsynth_model::{ConnectionType, DeviceType, EventType, Isp};

use crate::rng::XorShift64;
use crate::tables::{AD_BREAK_DURATION_SECS, AD_BREAK_INTERVAL_SECS};

/// Randomized portion of one event, before slot/geo/meta assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub device_type: DeviceType,
    pub os_name: &'static str,
    pub connection_type: ConnectionType,
    pub bitrate_kbps: u32,
    pub buffer_events: u32,
    pub rebuffer_ratio: f64,
    pub watch_seconds: u32,
    pub event_type: EventType,
    pub ip_address: String,
    pub isp: Isp,
}

/// Draw every randomized field from `rng` in fixed order.
pub fn draw(rng: &mut XorShift64) -> EventFields {
    // Device type: 45/25/15/15.
    let device_type = match rng.unit_f64() {
        u if u < 0.45 => DeviceType::SmartTv,
        u if u < 0.70 => DeviceType::Mobile,
        u if u < 0.85 => DeviceType::Web,
        _ => DeviceType::Tablet,
    };

    // OS conditioned on device type.
    let os_name = match device_type {
        DeviceType::SmartTv => match rng.unit_f64() {
            u if u < 0.5 => "Tizen",
            u if u < 0.8 => "webOS",
            _ => "Android TV",
        },
        DeviceType::Mobile => {
            if rng.unit_f64() < 0.5 {
                "Android"
            } else {
                "iOS"
            }
        }
        DeviceType::Tablet => {
            if rng.unit_f64() < 0.5 {
                "Android"
            } else {
                "iPadOS"
            }
        }
        DeviceType::Web => "ChromeOS",
    };

    // Connection: 70/20/10.
    let connection_type = match rng.unit_f64() {
        u if u < 0.70 => ConnectionType::Wifi,
        u if u < 0.90 => ConnectionType::Ethernet,
        _ => ConnectionType::Cellular,
    };

    let bitrate_kbps = rng.gen_range_u32(800, 6500);
    let buffer_events = rng.gen_range_u32(0, 5);
    let rebuffer_ratio = round3(rng.unit_f64() * 0.08);
    let watch_seconds = rng.gen_range_u32(30, 1800);

    // Event type: 5/75/10/7/3.
    let event_type = match rng.unit_f64() {
        u if u < 0.05 => EventType::PlayStart,
        u if u < 0.80 => EventType::Play,
        u if u < 0.90 => EventType::Pause,
        u if u < 0.97 => EventType::Seek,
        _ => EventType::PlayEnd,
    };

    // IP from three French-ISP prefix families: 40/30/30.
    let (ip_address, isp) = match rng.unit_f64() {
        u if u < 0.4 => (
            format!(
                "81.{}.{}.{}",
                rng.gen_range_u32(48, 63),
                rng.gen_range_u32(0, 255),
                rng.gen_range_u32(0, 255)
            ),
            Isp::Orange,
        ),
        u if u < 0.7 => (
            format!(
                "82.{}.{}.{}",
                rng.gen_range_u32(64, 127),
                rng.gen_range_u32(0, 255),
                rng.gen_range_u32(0, 255)
            ),
            Isp::Free,
        ),
        _ => (
            format!(
                "90.{}.{}.{}",
                rng.gen_range_u32(0, 255),
                rng.gen_range_u32(0, 255),
                rng.gen_range_u32(0, 255)
            ),
            Isp::Bouygues,
        ),
    };

    EventFields {
        device_type,
        os_name,
        connection_type,
        bitrate_kbps,
        buffer_events,
        rebuffer_ratio,
        watch_seconds,
        event_type,
        ip_address,
        isp,
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// `(ad_breaks, ad_total_seconds)` for a watch duration.
pub fn ad_counters(watch_seconds: u32) -> (u32, u32) {
    let breaks = watch_seconds / AD_BREAK_INTERVAL_SECS;
    (breaks, breaks * AD_BREAK_DURATION_SECS)
}

pub fn resolution_for_bitrate(bitrate_kbps: u32) -> &'static str {
    if bitrate_kbps > 4000 {
        "1920x1080"
    } else if bitrate_kbps > 2000 {
        "1280x720"
    } else {
        "854x480"
    }
}

pub fn drm_for_os(os_name: &str) -> &'static str {
    match os_name {
        "Android TV" | "Android" | "ChromeOS" => "widevine",
        "iOS" | "iPadOS" => "fairplay",
        _ => "playready",
    }
}

pub fn manufacturer_for_device(device_type: DeviceType) -> &'static str {
    match device_type {
        DeviceType::SmartTv => "Samsung",
        DeviceType::Mobile => "Apple",
        _ => "LG",
    }
}

pub fn model_for_device(device_type: DeviceType) -> &'static str {
    match device_type {
        DeviceType::SmartTv => "QE55",
        DeviceType::Mobile => "iPhone",
        _ => "web",
    }
}
