//! Clinic appointment database operations.

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{Database, DbResult};
use crate::models::Appointment;

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO clinic_appointments (
                appointment_id, patient_name, patient_medical_number,
                clinic_specialty, appointment_type, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                appointment.appointment_id,
                appointment.patient_name,
                appointment.patient_medical_number,
                appointment.clinic_specialty,
                appointment.appointment_type,
                appointment.notes,
                appointment.created_at,
            ],
        )?;
        Ok(())
    }

    /// Appointments booked within `[start, end]`, newest first.
    pub fn appointments_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT appointment_id, patient_name, patient_medical_number,
                   clinic_specialty, appointment_type, notes, created_at
            FROM clinic_appointments
            WHERE created_at >= ?1 AND created_at <= ?2
            ORDER BY created_at DESC
            "#,
        )?;

        let rows = stmt.query_map(params![start, end], |row| {
            Ok(Appointment {
                appointment_id: row.get(0)?,
                patient_name: row.get(1)?,
                patient_medical_number: row.get(2)?,
                clinic_specialty: row.get(3)?,
                appointment_type: row.get(4)?,
                notes: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
