//! Daily report database operations.

use chrono::NaiveDate;
use rusqlite::params;

use super::{Database, DbResult};
use crate::models::{DailyReport, PatientRef};

impl Database {
    /// Insert a new daily report.
    pub fn insert_daily_report(&self, report: &DailyReport) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO daily_reports (
                report_id, patient_id, report_date, report_content, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                report.report_id,
                report.patient_id,
                report.report_date,
                report.report_content,
                report.created_at,
            ],
        )?;
        Ok(())
    }

    /// Reports dated exactly `date`, newest first, joined with patient name and MRN.
    pub fn daily_reports_on(&self, date: NaiveDate) -> DbResult<Vec<DailyReport>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT r.report_id, r.patient_id, r.report_date, r.report_content, r.created_at,
                   p.patient_name, p.mrn
            FROM daily_reports r
            LEFT JOIN patients p ON p.mrn = r.patient_id
            WHERE r.report_date = ?1
            ORDER BY r.created_at DESC
            "#,
        )?;

        let rows = stmt.query_map(params![date], |row| {
            let patient_name: Option<String> = row.get(5)?;
            let mrn: Option<String> = row.get(6)?;
            Ok(DailyReport {
                report_id: row.get(0)?,
                patient_id: row.get(1)?,
                report_date: row.get(2)?,
                report_content: row.get(3)?,
                created_at: row.get(4)?,
                patient: patient_name
                    .zip(mrn)
                    .map(|(patient_name, mrn)| PatientRef { patient_name, mrn }),
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
