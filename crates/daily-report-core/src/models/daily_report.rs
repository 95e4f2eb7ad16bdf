//! Daily progress report models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::patient::PatientRef;

/// A free-text daily report written against a patient.
///
/// Fetched with the rest of the day's data but not rendered by the
/// current screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyReport {
    /// Unique report ID
    pub report_id: String,
    /// MRN of the patient the report is about
    pub patient_id: String,
    /// Calendar day the report covers
    pub report_date: NaiveDate,
    /// Report body
    pub report_content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Joined patient fields (None if the patient row is missing)
    pub patient: Option<PatientRef>,
}

impl DailyReport {
    /// Create a new report for a patient.
    pub fn new(patient_id: String, report_date: NaiveDate, report_content: String) -> Self {
        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            report_date,
            report_content,
            created_at: Utc::now(),
            patient: None,
        }
    }
}
