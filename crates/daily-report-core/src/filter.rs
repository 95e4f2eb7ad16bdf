//! Specialty filter over the fetched census.

use crate::models::CensusRecord;

/// Derive the visible set from the fetched set.
///
/// An empty `specialty` means "all specialties" and returns the input
/// unchanged. Otherwise keeps records whose specialty (admitting specialty
/// for patients, consulted specialty for consultations) equals `specialty`
/// exactly. No trimming or case folding.
pub fn filter_by_specialty(records: &[CensusRecord], specialty: &str) -> Vec<CensusRecord> {
    if specialty.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| record.specialty() == specialty)
        .cloned()
        .collect()
}
