//! Patient database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use super::{Database, DbResult};
use crate::models::Patient;

const PATIENT_COLUMNS: &str = "mrn, patient_name, age, gender, admission_date, specialty, \
     patient_status, diagnosis, updated_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        mrn: row.get(0)?,
        patient_name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        admission_date: row.get(4)?,
        specialty: row.get(5)?,
        patient_status: row.get(6)?,
        diagnosis: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                mrn, patient_name, age, gender, admission_date, specialty,
                patient_status, diagnosis, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                patient.mrn,
                patient.patient_name,
                patient.age,
                patient.gender,
                patient.admission_date,
                patient.specialty,
                patient.patient_status,
                patient.diagnosis,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Patients admitted within `[start, end]`, newest admission first.
    pub fn patients_admitted_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {PATIENT_COLUMNS}
            FROM patients
            WHERE admission_date >= ?1 AND admission_date <= ?2
            ORDER BY admission_date DESC
            "#
        ))?;

        let rows = stmt.query_map(params![start, end], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
