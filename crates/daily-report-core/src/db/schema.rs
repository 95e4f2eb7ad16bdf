//! SQLite schema definition.

/// Complete database schema for the daily report store.
///
/// Timestamp columns hold rusqlite's chrono text encoding
/// (`YYYY-MM-DD HH:MM:SS[.fff]+00:00`), always UTC, so inclusive range
/// filters compare correctly as text.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients (admissions)
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    mrn TEXT PRIMARY KEY,
    patient_name TEXT NOT NULL,
    age INTEGER NOT NULL DEFAULT 0,
    gender TEXT NOT NULL DEFAULT '',
    admission_date TEXT NOT NULL,
    specialty TEXT NOT NULL,
    patient_status TEXT NOT NULL DEFAULT 'Active',
    diagnosis TEXT,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patients_admission_date ON patients(admission_date);
CREATE INDEX IF NOT EXISTS idx_patients_specialty ON patients(specialty);

-- ============================================================================
-- Consultations
-- ============================================================================

CREATE TABLE IF NOT EXISTS consultations (
    mrn TEXT NOT NULL,
    patient_name TEXT NOT NULL,
    age INTEGER NOT NULL DEFAULT 0,
    gender TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    consultation_specialty TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Pending',
    requesting_department TEXT,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_consultations_created_at ON consultations(created_at);
CREATE INDEX IF NOT EXISTS idx_consultations_mrn ON consultations(mrn);

-- ============================================================================
-- Clinic Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS clinic_appointments (
    appointment_id TEXT PRIMARY KEY,
    patient_name TEXT NOT NULL,
    patient_medical_number TEXT NOT NULL,
    clinic_specialty TEXT NOT NULL,
    appointment_type TEXT NOT NULL,              -- Urgent, Regular
    notes TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_appointments_created_at ON clinic_appointments(created_at);

-- ============================================================================
-- Daily Reports
-- ============================================================================

CREATE TABLE IF NOT EXISTS daily_reports (
    report_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(mrn),
    report_date TEXT NOT NULL,                   -- YYYY-MM-DD
    report_content TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_daily_reports_date ON daily_reports(report_date);
CREATE INDEX IF NOT EXISTS idx_daily_reports_patient ON daily_reports(patient_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_report_requires_known_patient() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO daily_reports (report_id, patient_id, report_date, created_at) VALUES ('r1', 'missing', '2024-05-01', '2024-05-01 08:00:00+00:00')",
            [],
        );
        assert!(result.is_err());
    }
}
