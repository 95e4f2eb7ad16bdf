//! Display rows derived from domain records.

use serde::{Deserialize, Serialize};

use crate::models::{Appointment, CensusRecord, RecordKind};

/// One line of the patients/consultations table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CensusRow {
    pub kind: RecordKind,
    pub mrn: String,
    pub patient_name: String,
    /// `"<age> / <gender>"`
    pub age_gender: String,
    pub specialty: String,
    /// Diagnosis for patients, requesting department for consultations
    pub diagnosis_or_department: String,
}

impl CensusRow {
    /// Cells in column order: MRN, name, age/gender, specialty, diagnosis/department.
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.mrn,
            &self.patient_name,
            &self.age_gender,
            &self.specialty,
            &self.diagnosis_or_department,
        ]
    }
}

impl From<&CensusRecord> for CensusRow {
    fn from(record: &CensusRecord) -> Self {
        Self {
            kind: record.kind(),
            mrn: record.mrn().to_string(),
            patient_name: record.patient_name().to_string(),
            age_gender: format!("{} / {}", record.age(), record.gender()),
            specialty: record.specialty().to_string(),
            diagnosis_or_department: record.detail().unwrap_or_default().to_string(),
        }
    }
}

/// Column titles shared by the HTML table and the exported document.
pub const CENSUS_COLUMNS: [&str; 5] = [
    "MRN",
    "Patient Name",
    "Age/Gender",
    "Specialty",
    "Diagnosis/Department",
];

pub const APPOINTMENT_COLUMNS: [&str; 5] = [
    "Patient Name",
    "Medical Number",
    "Specialty",
    "Type",
    "Notes",
];

/// Cells in column order: name, medical number, specialty, type, notes.
pub fn appointment_cells(appointment: &Appointment) -> [String; 5] {
    [
        appointment.patient_name.clone(),
        appointment.patient_medical_number.clone(),
        appointment.clinic_specialty.clone(),
        appointment.appointment_type.to_string(),
        appointment.notes.clone().unwrap_or_default(),
    ]
}

pub fn census_rows(records: &[CensusRecord]) -> Vec<CensusRow> {
    records.iter().map(CensusRow::from).collect()
}
