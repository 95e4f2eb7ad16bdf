//! Machine-readable renditions of the visible report.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::ExportInput;
use crate::models::{Appointment, DailyReport};
use crate::view::{census_rows, CensusRow};

/// The report as shown on screen, for JSON/CSV export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportSnapshot {
    pub metadata: SnapshotMetadata,
    /// Visible patients and consultations
    pub census: Vec<CensusRow>,
    /// All appointments of the day (not filtered by specialty)
    pub appointments: Vec<Appointment>,
    pub daily_reports: Vec<DailyReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Report day, `YYYY-MM-DD`
    pub report_date: String,
    /// `None` when all specialties are shown
    pub specialty: Option<String>,
    /// RFC 3339 in the clinic's offset
    pub exported_at: String,
}

impl DailyReportSnapshot {
    pub fn new(
        input: &ExportInput,
        daily_reports: &[DailyReport],
        exported_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            metadata: SnapshotMetadata {
                report_date: input.selected_date.format("%Y-%m-%d").to_string(),
                specialty: Some(input.selected_specialty.clone()).filter(|s| !s.is_empty()),
                exported_at: exported_at.to_rfc3339(),
            },
            census: census_rows(&input.visible),
            appointments: input.appointments.clone(),
            daily_reports: daily_reports.to_vec(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Patients and consultations as CSV.
    pub fn census_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("report_date,kind,mrn,patient_name,age_gender,specialty,diagnosis_or_department\n");

        for row in &self.census {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                self.metadata.report_date,
                row.kind.as_str(),
                escape_csv(&row.mrn),
                escape_csv(&row.patient_name),
                escape_csv(&row.age_gender),
                escape_csv(&row.specialty),
                escape_csv(&row.diagnosis_or_department),
            ));
        }

        csv
    }

    /// Appointments as CSV.
    pub fn appointments_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("report_date,appointment_id,patient_name,medical_number,specialty,type,notes,created_at\n");

        for appointment in &self.appointments {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                self.metadata.report_date,
                appointment.appointment_id,
                escape_csv(&appointment.patient_name),
                escape_csv(&appointment.patient_medical_number),
                escape_csv(&appointment.clinic_specialty),
                appointment.appointment_type,
                escape_csv(appointment.notes.as_deref().unwrap_or("")),
                appointment.created_at.to_rfc3339(),
            ));
        }

        csv
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
