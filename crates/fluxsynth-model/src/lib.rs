//! Fluxsynth record types
//!
//! This crate defines the row types the generators produce and the store
//! materializes:
//!
//! - [`CustomerRecord`]: one synthetic CRM row, tagged with its
//!   [`OverlapCategory`] provenance
//! - [`ReferenceRecord`]: one row of the externally-owned reference
//!   population that overlap categories borrow identity fields from
//! - [`ViewingEvent`]: one synthetic playback event, including the nested
//!   [`DeviceMeta`] payload
//!
//! Types here are pure data: serde derives plus display/parse impls, no
//! generation logic.

pub mod customer;
pub mod event;

pub use customer::{CustomerRecord, OverlapCategory, ReferenceRecord, SubscriptionLevel};
pub use event::{ConnectionType, DeviceMeta, DeviceType, EventType, Isp, ViewingEvent};
