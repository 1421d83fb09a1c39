//! Viewing-event row types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "SmartTV")]
    SmartTv,
    Mobile,
    Web,
    Tablet,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::SmartTv => "SmartTV",
            DeviceType::Mobile => "Mobile",
            DeviceType::Web => "Web",
            DeviceType::Tablet => "Tablet",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Wifi,
    Ethernet,
    Cellular,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Wifi => "wifi",
            ConnectionType::Ethernet => "ethernet",
            ConnectionType::Cellular => "cellular",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PlayStart,
    Play,
    Pause,
    Seek,
    PlayEnd,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PlayStart => "play_start",
            EventType::Play => "play",
            EventType::Pause => "pause",
            EventType::Seek => "seek",
            EventType::PlayEnd => "play_end",
        }
    }
}

/// French ISP, a pure function of the generated IP prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Isp {
    Orange,
    Free,
    Bouygues,
}

impl Isp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Isp::Orange => "Orange",
            Isp::Free => "Free",
            Isp::Bouygues => "Bouygues",
        }
    }

    /// Recover the ISP from an address generated by the synthesizers.
    ///
    /// `81.x` addresses belong to Orange, `82.x` to Free and `90.x` to
    /// Bouygues; anything else is not ours.
    pub fn from_ip(ip: &str) -> Option<Isp> {
        match ip.split('.').next() {
            Some("81") => Some(Isp::Orange),
            Some("82") => Some(Isp::Free),
            Some("90") => Some(Isp::Bouygues),
            _ => None,
        }
    }
}

impl fmt::Display for Isp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nested device-metadata payload attached to every event.
///
/// `resolution` is a pure function of the event's bitrate and `drm` a pure
/// function of its OS; the ids are per-event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceMeta {
    pub device_id: String,
    pub session_id: String,
    pub app_name: String,
    pub app_version: String,
    pub player_version: String,
    pub resolution: String,
    pub drm: String,
    pub manufacturer: String,
    pub model: String,
}

/// One synthetic playback event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewingEvent {
    pub log_id: Uuid,
    pub channel: String,
    pub event_time: NaiveDateTime,
    /// `event_time` truncated to its containing time bucket.
    pub slot_start_time: NaiveDateTime,
    /// Derived deterministically from `slot_start_time`.
    pub programme_id: String,
    pub customer_id: Option<String>,
    pub device_type: DeviceType,
    pub os_name: String,
    pub connection_type: ConnectionType,
    pub bitrate_kbps: u32,
    pub buffer_events: u32,
    pub rebuffer_ratio: f64,
    pub watch_seconds: u32,
    pub ad_breaks: u32,
    pub ad_total_seconds: u32,
    pub event_type: EventType,
    pub ip_address: String,
    pub isp: Isp,
    pub country: String,
    pub region: String,
    pub city: String,
    pub device: DeviceMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isp_recovered_from_prefix() {
        assert_eq!(Isp::from_ip("81.52.10.4"), Some(Isp::Orange));
        assert_eq!(Isp::from_ip("82.101.0.255"), Some(Isp::Free));
        assert_eq!(Isp::from_ip("90.3.18.200"), Some(Isp::Bouygues));
        assert_eq!(Isp::from_ip("10.0.0.1"), None);
    }

    #[test]
    fn device_type_serializes_with_tv_casing() {
        let json = serde_json::to_string(&DeviceType::SmartTv).unwrap();
        assert_eq!(json, "\"SmartTV\"");
        let json = serde_json::to_string(&ConnectionType::Wifi).unwrap();
        assert_eq!(json, "\"wifi\"");
        let json = serde_json::to_string(&EventType::PlayStart).unwrap();
        assert_eq!(json, "\"play_start\"");
    }
}
