//! Consultation models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inter-department consultation request for a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consultation {
    /// Medical record number of the consulted patient
    pub mrn: String,
    /// Patient name
    pub patient_name: String,
    /// Age in years
    pub age: u32,
    /// Gender
    pub gender: String,
    /// Request timestamp
    pub created_at: DateTime<Utc>,
    /// Specialty being consulted
    pub consultation_specialty: String,
    /// Consultation status (e.g., "Pending", "Completed")
    pub status: String,
    /// Department that raised the request
    pub requesting_department: Option<String>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Consultation {
    /// Create a pending consultation raised at the given time.
    pub fn new(
        mrn: String,
        patient_name: String,
        consultation_specialty: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            mrn,
            patient_name,
            age: 0,
            gender: String::new(),
            created_at,
            consultation_specialty,
            status: "Pending".into(),
            requesting_department: None,
            updated_at: created_at,
        }
    }
}
