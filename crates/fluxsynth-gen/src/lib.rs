//! Fluxsynth synthesizers
//!
//! Three generation pipelines compose around a shared customer population:
//!
//! - [`customers`]: fixed-size CRM population with a controlled overlap
//!   fraction against an external reference population, controlled
//!   missingness and a controlled fraction of near-duplicate records
//! - [`events`]: one calendar week of viewing events, volume modulated by a
//!   time-of-day/day-of-week weight curve, with a target fraction attached to
//!   sampled customers
//! - [`bulk`]: N viewing events with pure index-modulo field derivation,
//!   trading statistical nuance for throughput at large N
//!
//! Every derivation is a pure function of (row index, run parameters) or of
//! (row index, a small pre-sampled lookup table); see [`rng`] for how
//! per-row pseudo-randomness is derived from the run seed. This keeps the
//! pipelines arbitrarily partitionable without changing output semantics.

pub mod alloc;
pub mod bulk;
pub mod customers;
pub mod events;
pub mod fields;
pub mod reference;
pub mod rng;
pub mod schedule;
pub mod summary;
pub mod tables;

pub use alloc::PopulationPlan;
pub use bulk::BulkConfig;
pub use customers::CustomerConfig;
pub use events::{AttachmentStats, CalendarConfig};
pub use reference::ReferencePopulation;

/// Error taxonomy for the synthesizers.
///
/// `Configuration` and `DataSource` are surfaced immediately and never
/// retried; `Execution` wraps a failed store operation and is propagated to
/// the caller, who owns retry policy.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("data source error: {0}")]
    DataSource(String),

    #[error("execution error: {0}")]
    Execution(#[from] anyhow::Error),
}
