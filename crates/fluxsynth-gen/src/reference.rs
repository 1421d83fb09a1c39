//! The externally-owned reference population.

use crate::SynthError;
use fluxsynth_model::ReferenceRecord;

/// Read-only reference rows that overlap categories borrow identity fields
/// from.
///
/// Rows carrying neither email nor phone are dropped on construction; every
/// base row then maps to a well-defined partner via a cyclic index, even
/// when the reference population is smaller than the base population.
#[derive(Debug, Clone)]
pub struct ReferencePopulation {
    rows: Vec<ReferenceRecord>,
}

impl ReferencePopulation {
    pub fn new(rows: Vec<ReferenceRecord>) -> Result<Self, SynthError> {
        let rows: Vec<ReferenceRecord> = rows.into_iter().filter(|r| r.is_usable()).collect();
        if rows.is_empty() {
            return Err(SynthError::DataSource(
                "reference population is empty or carries no usable email/phone".to_string(),
            ));
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Reference partner of the 1-based dense row index.
    pub fn partner(&self, index: u64) -> &ReferenceRecord {
        let k = (index % self.rows.len() as u64) as usize;
        &self.rows[k]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usable(email: &str) -> ReferenceRecord {
        ReferenceRecord {
            email: Some(email.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn unusable_rows_are_dropped() {
        let pop = ReferencePopulation::new(vec![
            usable("a@ref.test"),
            ReferenceRecord::default(),
            usable("b@ref.test"),
        ])
        .unwrap();
        assert_eq!(pop.len(), 2);
    }

    #[test]
    fn all_null_population_is_a_data_source_error() {
        let err = ReferencePopulation::new(vec![ReferenceRecord::default()]).unwrap_err();
        assert!(matches!(err, SynthError::DataSource(_)));
    }

    #[test]
    fn partner_cycles_when_reference_is_small() {
        let pop =
            ReferencePopulation::new(vec![usable("a@ref.test"), usable("b@ref.test")]).unwrap();
        assert_eq!(pop.partner(1), pop.partner(3));
        assert_eq!(pop.partner(2), pop.partner(4));
        assert_ne!(pop.partner(1), pop.partner(2));
    }
}
