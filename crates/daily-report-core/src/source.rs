//! Data source contract for the screen.
//!
//! The screen never talks to SQL directly. It asks a [`ReportSource`] for
//! the day's rows; [`Database`] is the bundled implementation and a shared
//! `Mutex<Database>` lets concurrent fetches use one connection.

use std::sync::Mutex;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{Appointment, Consultation, DailyReport, Patient};
use crate::query::DayWindow;

/// Failure to retrieve rows. Distinct from an empty (successful) result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<DbError> for SourceError {
    fn from(e: DbError) -> Self {
        if e.is_malformed_row() {
            SourceError::Malformed(e.to_string())
        } else {
            SourceError::Unavailable(e.to_string())
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Filtered, ordered row retrieval for the four tables the screen reads.
pub trait ReportSource {
    /// Patients admitted inside the window, newest admission first.
    fn fetch_patients(&self, window: &DayWindow) -> SourceResult<Vec<Patient>>;

    /// Consultations created inside the window, newest first.
    fn fetch_consultations(&self, window: &DayWindow) -> SourceResult<Vec<Consultation>>;

    /// Clinic appointments created inside the window, newest first.
    fn fetch_appointments(&self, window: &DayWindow) -> SourceResult<Vec<Appointment>>;

    /// Daily reports dated exactly `date`, newest first, with patient name/MRN joined.
    fn fetch_daily_reports(&self, date: NaiveDate) -> SourceResult<Vec<DailyReport>>;
}

impl ReportSource for Database {
    fn fetch_patients(&self, window: &DayWindow) -> SourceResult<Vec<Patient>> {
        Ok(self.patients_admitted_between(window.start(), window.end())?)
    }

    fn fetch_consultations(&self, window: &DayWindow) -> SourceResult<Vec<Consultation>> {
        Ok(self.consultations_created_between(window.start(), window.end())?)
    }

    fn fetch_appointments(&self, window: &DayWindow) -> SourceResult<Vec<Appointment>> {
        Ok(self.appointments_created_between(window.start(), window.end())?)
    }

    fn fetch_daily_reports(&self, date: NaiveDate) -> SourceResult<Vec<DailyReport>> {
        Ok(self.daily_reports_on(date)?)
    }
}

impl<S: ReportSource> ReportSource for Mutex<S> {
    fn fetch_patients(&self, window: &DayWindow) -> SourceResult<Vec<Patient>> {
        self.lock().map_err(poisoned)?.fetch_patients(window)
    }

    fn fetch_consultations(&self, window: &DayWindow) -> SourceResult<Vec<Consultation>> {
        self.lock().map_err(poisoned)?.fetch_consultations(window)
    }

    fn fetch_appointments(&self, window: &DayWindow) -> SourceResult<Vec<Appointment>> {
        self.lock().map_err(poisoned)?.fetch_appointments(window)
    }

    fn fetch_daily_reports(&self, date: NaiveDate) -> SourceResult<Vec<DailyReport>> {
        self.lock().map_err(poisoned)?.fetch_daily_reports(date)
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> SourceError {
    SourceError::Unavailable(format!("Lock poisoned: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_empty_result_is_ok() {
        let db = Database::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let window = DayWindow::for_date(date, FixedOffset::east_opt(0).unwrap());

        assert_eq!(db.fetch_patients(&window), Ok(vec![]));
        assert_eq!(db.fetch_daily_reports(date), Ok(vec![]));
    }

    #[test]
    fn test_mutex_source_delegates() {
        let shared = Mutex::new(Database::open_in_memory().unwrap());
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let window = DayWindow::for_date(date, FixedOffset::east_opt(0).unwrap());

        assert_eq!(shared.fetch_appointments(&window), Ok(vec![]));
    }

    #[test]
    fn test_missing_table_is_unavailable() {
        let db = Database::open_in_memory().unwrap();
        db.conn().execute_batch("DROP TABLE consultations").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let window = DayWindow::for_date(date, FixedOffset::east_opt(0).unwrap());

        let err = db.fetch_consultations(&window).unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
