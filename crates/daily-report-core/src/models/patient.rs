//! Patient models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An admitted patient, identified by medical record number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Medical record number - stable identity
    pub mrn: String,
    /// Patient name
    pub patient_name: String,
    /// Age in years
    pub age: u32,
    /// Gender as recorded at admission
    pub gender: String,
    /// Admission timestamp
    pub admission_date: DateTime<Utc>,
    /// Admitting specialty
    pub specialty: String,
    /// Ward status (e.g., "Active", "Discharged")
    pub patient_status: String,
    /// Working diagnosis, if recorded
    pub diagnosis: Option<String>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Create a patient admitted at the given time with required fields.
    pub fn new(
        mrn: String,
        patient_name: String,
        specialty: String,
        admission_date: DateTime<Utc>,
    ) -> Self {
        Self {
            mrn,
            patient_name,
            age: 0,
            gender: String::new(),
            admission_date,
            specialty,
            patient_status: "Active".into(),
            diagnosis: None,
            updated_at: admission_date,
        }
    }
}

/// Denormalized patient fields carried by joined rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRef {
    pub patient_name: String,
    pub mrn: String,
}
