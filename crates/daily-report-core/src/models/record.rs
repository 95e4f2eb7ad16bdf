//! The merged patient/consultation census.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::consultation::Consultation;
use super::patient::Patient;

/// Which table a census record came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Patient,
    Consultation,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Patient => "patient",
            RecordKind::Consultation => "consultation",
        }
    }
}

/// One entry of the day's census: an admission or a consultation.
///
/// Each variant keeps its own field set. Code that needs the shared display
/// shape goes through the accessors below rather than probing optional
/// fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CensusRecord {
    Patient(Patient),
    Consultation(Consultation),
}

impl CensusRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            CensusRecord::Patient(_) => RecordKind::Patient,
            CensusRecord::Consultation(_) => RecordKind::Consultation,
        }
    }

    pub fn mrn(&self) -> &str {
        match self {
            CensusRecord::Patient(p) => &p.mrn,
            CensusRecord::Consultation(c) => &c.mrn,
        }
    }

    pub fn patient_name(&self) -> &str {
        match self {
            CensusRecord::Patient(p) => &p.patient_name,
            CensusRecord::Consultation(c) => &c.patient_name,
        }
    }

    pub fn age(&self) -> u32 {
        match self {
            CensusRecord::Patient(p) => p.age,
            CensusRecord::Consultation(c) => c.age,
        }
    }

    pub fn gender(&self) -> &str {
        match self {
            CensusRecord::Patient(p) => &p.gender,
            CensusRecord::Consultation(c) => &c.gender,
        }
    }

    /// Admitting specialty for patients, consulted specialty for consultations.
    pub fn specialty(&self) -> &str {
        match self {
            CensusRecord::Patient(p) => &p.specialty,
            CensusRecord::Consultation(c) => &c.consultation_specialty,
        }
    }

    /// Diagnosis for patients, requesting department for consultations.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CensusRecord::Patient(p) => p.diagnosis.as_deref(),
            CensusRecord::Consultation(c) => c.requesting_department.as_deref(),
        }
    }

    /// Admission time for patients, request time for consultations.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CensusRecord::Patient(p) => p.admission_date,
            CensusRecord::Consultation(c) => c.created_at,
        }
    }
}

impl From<Patient> for CensusRecord {
    fn from(patient: Patient) -> Self {
        CensusRecord::Patient(patient)
    }
}

impl From<Consultation> for CensusRecord {
    fn from(consultation: Consultation) -> Self {
        CensusRecord::Consultation(consultation)
    }
}
