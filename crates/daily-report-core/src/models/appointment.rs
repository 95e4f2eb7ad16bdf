//! Clinic appointment models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Appointment urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentType {
    Urgent,
    Regular,
}

impl AppointmentType {
    /// Stored and displayed text.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentType::Urgent => "Urgent",
            AppointmentType::Regular => "Regular",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown appointment type text.
#[derive(Debug, thiserror::Error)]
#[error("Unknown appointment type: {0}")]
pub struct ParseAppointmentTypeError(pub String);

impl FromStr for AppointmentType {
    type Err = ParseAppointmentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Urgent" => Ok(AppointmentType::Urgent),
            "Regular" => Ok(AppointmentType::Regular),
            other => Err(ParseAppointmentTypeError(other.to_string())),
        }
    }
}

impl ToSql for AppointmentType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AppointmentType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A clinic appointment booked for a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    /// Unique appointment ID
    pub appointment_id: String,
    /// Patient name
    pub patient_name: String,
    /// Patient medical number
    pub patient_medical_number: String,
    /// Clinic specialty
    pub clinic_specialty: String,
    /// Urgent or regular
    pub appointment_type: AppointmentType,
    /// Free-text notes
    pub notes: Option<String>,
    /// Booking timestamp
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Create a new appointment booked at the given time.
    pub fn new(
        patient_name: String,
        patient_medical_number: String,
        clinic_specialty: String,
        appointment_type: AppointmentType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            appointment_id: uuid::Uuid::new_v4().to_string(),
            patient_name,
            patient_medical_number,
            clinic_specialty,
            appointment_type,
            notes: None,
            created_at,
        }
    }
}
