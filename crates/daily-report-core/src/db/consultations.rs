//! Consultation database operations.

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{Database, DbResult};
use crate::models::Consultation;

impl Database {
    /// Insert a new consultation.
    pub fn insert_consultation(&self, consultation: &Consultation) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO consultations (
                mrn, patient_name, age, gender, created_at, consultation_specialty,
                status, requesting_department, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                consultation.mrn,
                consultation.patient_name,
                consultation.age,
                consultation.gender,
                consultation.created_at,
                consultation.consultation_specialty,
                consultation.status,
                consultation.requesting_department,
                consultation.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Consultations requested within `[start, end]`, newest first.
    pub fn consultations_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Consultation>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT mrn, patient_name, age, gender, created_at, consultation_specialty,
                   status, requesting_department, updated_at
            FROM consultations
            WHERE created_at >= ?1 AND created_at <= ?2
            ORDER BY created_at DESC
            "#,
        )?;

        let rows = stmt.query_map(params![start, end], |row| {
            Ok(Consultation {
                mrn: row.get(0)?,
                patient_name: row.get(1)?,
                age: row.get(2)?,
                gender: row.get(3)?,
                created_at: row.get(4)?,
                consultation_specialty: row.get(5)?,
                status: row.get(6)?,
                requesting_department: row.get(7)?,
                updated_at: row.get(8)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_consultations_in_window_newest_first() {
        let db = Database::open_in_memory().unwrap();

        for (mrn, hour) in [("C-1", 8), ("C-2", 17), ("C-3", 11)] {
            let mut consult = Consultation::new(
                mrn.into(),
                format!("Consulted {mrn}"),
                "Nephrology".into(),
                Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
            );
            consult.requesting_department = Some("Internal Medicine".into());
            db.insert_consultation(&consult).unwrap();
        }

        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap();
        let rows = db.consultations_created_between(start, end).unwrap();

        let mrns: Vec<&str> = rows.iter().map(|c| c.mrn.as_str()).collect();
        assert_eq!(mrns, vec!["C-2", "C-3", "C-1"]);
        assert_eq!(rows[0].requesting_department.as_deref(), Some("Internal Medicine"));
    }

    #[test]
    fn test_same_mrn_may_have_several_consultations() {
        let db = Database::open_in_memory().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        db.insert_consultation(&Consultation::new("MRN-9".into(), "X".into(), "Cardiology".into(), at))
            .unwrap();
        db.insert_consultation(&Consultation::new("MRN-9".into(), "X".into(), "Neurology".into(), at))
            .unwrap();

        let rows = db
            .consultations_created_between(at, at)
            .unwrap();
        assert_eq!(rows.len(), 2);
    }
}
