//! Proportional allocation of the customer population.
//!
//! The plan fixes every count up front so the generators can treat category
//! assignment as a pure threshold comparison on the dense row index. Rounding
//! error is absorbed so the parts always sum exactly:
//!
//! - `dup_count = target_rows - base_count` (not independently rounded)
//! - `phone_count = overlap_total - triple_count - email_count`

use crate::SynthError;
use fluxsynth_model::OverlapCategory;

/// Fraction of `target_rows` that are base (non-duplicate) records.
pub const BASE_FRACTION: f64 = 0.90;
/// Fraction of `target_rows` that overlap the reference population.
pub const OVERLAP_FRACTION: f64 = 0.25;
/// Overlap split TRIPLE:EMAIL:PHONE.
pub const OVERLAP_SHARES: (u64, u64, u64) = (8, 10, 7);

/// Precomputed counts for one customer-population run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationPlan {
    pub target_rows: u64,
    pub base_count: u64,
    pub dup_count: u64,
    pub overlap_total: u64,
    pub triple_count: u64,
    pub email_count: u64,
    pub phone_count: u64,
}

impl PopulationPlan {
    /// Compute the allocation for `target_rows` and validate it.
    ///
    /// The guards on `overlap_total <= base_count` and
    /// `dup_count <= none_count` hold trivially for the fixed 90/25
    /// fractions, but are checked explicitly so the arithmetic stays safe if
    /// the fractions are ever made configurable.
    pub fn for_target(target_rows: u64) -> Result<Self, SynthError> {
        if target_rows == 0 {
            return Err(SynthError::Configuration(
                "target_rows must be > 0".to_string(),
            ));
        }

        let base_count = (target_rows as f64 * BASE_FRACTION).round() as u64;
        let dup_count = target_rows - base_count;

        let overlap_total = (target_rows as f64 * OVERLAP_FRACTION).round() as u64;
        let (triple_share, email_share, phone_share) = OVERLAP_SHARES;
        let sum_share = triple_share + email_share + phone_share;
        let triple_count =
            (overlap_total as f64 * triple_share as f64 / sum_share as f64).round() as u64;
        let email_count =
            (overlap_total as f64 * email_share as f64 / sum_share as f64).round() as u64;

        let phone_count = overlap_total as i64 - triple_count as i64 - email_count as i64;
        if phone_count < 0 {
            return Err(SynthError::Configuration(format!(
                "allocation produced a negative phone-overlap count ({phone_count}) \
                 for target_rows={target_rows}"
            )));
        }
        let phone_count = phone_count as u64;

        if overlap_total > base_count {
            return Err(SynthError::Configuration(format!(
                "overlap_total ({overlap_total}) exceeds base_count ({base_count})"
            )));
        }

        let plan = Self {
            target_rows,
            base_count,
            dup_count,
            overlap_total,
            triple_count,
            email_count,
            phone_count,
        };

        if plan.dup_count > plan.none_count() {
            return Err(SynthError::Configuration(format!(
                "duplicate count ({}) exceeds the NONE-category population ({})",
                plan.dup_count,
                plan.none_count()
            )));
        }

        Ok(plan)
    }

    /// Base records that overlap nothing; duplicates are sampled from these.
    pub fn none_count(&self) -> u64 {
        self.base_count - self.overlap_total
    }

    /// Category of the 1-based dense row index, by threshold comparison
    /// against the cumulative boundaries.
    pub fn category_for_index(&self, index: u64) -> OverlapCategory {
        debug_assert!(index >= 1 && index <= self.base_count);
        if index <= self.triple_count {
            OverlapCategory::Triple
        } else if index <= self.triple_count + self.email_count {
            OverlapCategory::Email
        } else if index <= self.overlap_total {
            OverlapCategory::Phone
        } else {
            OverlapCategory::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_from_thousand_rows() {
        let plan = PopulationPlan::for_target(1000).unwrap();
        assert_eq!(plan.base_count, 900);
        assert_eq!(plan.dup_count, 100);
        assert_eq!(plan.overlap_total, 250);
        assert_eq!(plan.triple_count, 80);
        assert_eq!(plan.email_count, 100);
        assert_eq!(plan.phone_count, 70);
        assert_eq!(plan.none_count(), 650);

        assert_eq!(plan.category_for_index(1), OverlapCategory::Triple);
        assert_eq!(plan.category_for_index(80), OverlapCategory::Triple);
        assert_eq!(plan.category_for_index(81), OverlapCategory::Email);
        assert_eq!(plan.category_for_index(180), OverlapCategory::Email);
        assert_eq!(plan.category_for_index(181), OverlapCategory::Phone);
        assert_eq!(plan.category_for_index(250), OverlapCategory::Phone);
        assert_eq!(plan.category_for_index(251), OverlapCategory::None);
        assert_eq!(plan.category_for_index(900), OverlapCategory::None);
    }

    #[test]
    fn zero_target_is_rejected() {
        assert!(matches!(
            PopulationPlan::for_target(0),
            Err(SynthError::Configuration(_))
        ));
    }

    #[test]
    fn tiny_targets_still_sum_exactly() {
        for target in 1..=50 {
            let plan = PopulationPlan::for_target(target).unwrap();
            assert_eq!(plan.base_count + plan.dup_count, target);
            assert_eq!(
                plan.triple_count + plan.email_count + plan.phone_count,
                plan.overlap_total
            );
        }
    }
}
