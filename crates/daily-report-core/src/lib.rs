//! Daily Report Core Library
//!
//! Data and export layer for a hospital's daily report screen: the day's
//! admitted patients and consultations (filterable by specialty), the day's
//! clinic appointments, the daily progress reports, and a PDF export of what
//! is on screen.
//!
//! # Architecture
//!
//! ```text
//!     date / specialty change
//!               │
//!   ┌───────────▼─────────┐  tickets   ┌──────────────────┐
//!   │  DailyReportScreen  ├───────────►│ QueryCoordinator ├──► ReportSource (SQLite)
//!   │   (filter state)    │◄───────────┤  one per thread  │
//!   └───────────┬─────────┘  outcomes  └──────────────────┘
//!               │  (stale outcomes dropped)
//!        ┌──────┴────────────┐
//!        ▼                   ▼
//!    HTML view        Export: document → layout → PDF
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite tables and day-range queries
//! - [`models`]: Patient, Consultation, Appointment, DailyReport, CensusRecord
//! - [`source`]: data source contract used by the coordinator
//! - [`query`]: day windows, fetch tickets and the coordinator
//! - [`filter`]: specialty filter over the census
//! - [`view`]: display rows and HTML rendering
//! - [`export`]: report document, pagination, PDF/JSON/CSV output
//! - [`screen`]: screen state machine
//! - [`config`], [`telemetry`]: configuration and logging setup

pub mod config;
pub mod db;
pub mod export;
pub mod filter;
pub mod models;
pub mod query;
pub mod screen;
pub mod source;
pub mod telemetry;
pub mod view;

// Re-export commonly used types
pub use config::ReportConfig;
pub use db::Database;
pub use export::{Artifact, DailyReportSnapshot, DocumentRenderer, ExportState, PdfRenderer};
pub use models::{Appointment, AppointmentType, CensusRecord, Consultation, DailyReport, Patient};
pub use query::{DayWindow, FetchKind, FetchOutcome, FetchTicket, QueryCoordinator};
pub use screen::{ApplyResult, DailyReportScreen, Notification};
pub use source::{ReportSource, SourceError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;

use chrono::{NaiveDate, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DailyReportError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<db::DbError> for DailyReportError {
    fn from(e: db::DbError) -> Self {
        DailyReportError::Database(e.to_string())
    }
}

impl From<export::ExportError> for DailyReportError {
    fn from(e: export::ExportError) -> Self {
        DailyReportError::Export(e.to_string())
    }
}

impl From<config::ConfigError> for DailyReportError {
    fn from(e: config::ConfigError) -> Self {
        DailyReportError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for DailyReportError {
    fn from(e: serde_json::Error) -> Self {
        DailyReportError::Serialization(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DailyReportError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DailyReportError::Database(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open the screen over a database file. `config_path` is an optional JSON
/// config; defaults apply without one. The initial fetch runs before return.
#[uniffi::export]
pub fn open_report_screen(
    db_path: String,
    config_path: Option<String>,
) -> Result<Arc<DailyReportCore>, DailyReportError> {
    let config = match config_path {
        Some(path) => ReportConfig::load(&path)?,
        None => ReportConfig::default(),
    };
    config.init_logging();
    let core = DailyReportCore::new(Database::open(&db_path)?, config)?;
    core.refresh()?;
    Ok(Arc::new(core))
}

/// Open the screen over an empty in-memory database (for testing).
#[uniffi::export]
pub fn open_report_screen_in_memory() -> Result<Arc<DailyReportCore>, DailyReportError> {
    let core = DailyReportCore::new(Database::open_in_memory()?, ReportConfig::default())?;
    core.refresh()?;
    Ok(Arc::new(core))
}

/// Install the log subscriber. `RUST_LOG` takes precedence over `filter`.
/// Returns false if logging was already initialised.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    telemetry::init_tracing(filter.as_deref().unwrap_or(config::DEFAULT_LOG_FILTER))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe screen controller for FFI.
#[derive(uniffi::Object)]
pub struct DailyReportCore {
    db: Arc<Mutex<Database>>,
    screen: Mutex<DailyReportScreen>,
    config: ReportConfig,
}

impl DailyReportCore {
    /// Wrap an open database. The screen starts on today's date in the
    /// configured offset; nothing is fetched until [`refresh`](Self::refresh)
    /// or a date change.
    pub fn new(db: Database, config: ReportConfig) -> Result<Self, DailyReportError> {
        let today = config.today()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            screen: Mutex::new(DailyReportScreen::new(today)),
            config,
        })
    }

    /// Shared handle to the database, for seeding by the host.
    pub fn database(&self) -> Arc<Mutex<Database>> {
        Arc::clone(&self.db)
    }

    /// Run tickets concurrently, one thread each, applying outcomes in
    /// arrival order.
    fn run_tickets(&self, tickets: Vec<FetchTicket>) -> Result<(), DailyReportError> {
        if tickets.is_empty() {
            return Ok(());
        }

        let offset = self.config.offset()?;
        let source: &Mutex<Database> = &self.db;
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| -> Result<(), DailyReportError> {
            for ticket in tickets {
                let tx = tx.clone();
                scope.spawn(move || {
                    let outcome = QueryCoordinator::new(source, offset).run(ticket);
                    // Receiver outlives every sender inside the scope
                    let _ = tx.send(outcome);
                });
            }
            drop(tx);

            for outcome in rx {
                self.screen.lock()?.apply(outcome);
            }
            Ok(())
        })
    }

    fn export_title(&self) -> &str {
        &self.config.report_title
    }
}

#[uniffi::export]
impl DailyReportCore {
    // =========================================================================
    // Filter Operations
    // =========================================================================

    /// Select a date (`YYYY-MM-DD`). Fetches only if the date changed.
    pub fn set_date(&self, date: String) -> Result<(), DailyReportError> {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|e| DailyReportError::InvalidInput(format!("{date}: {e}")))?;
        let tickets = self.screen.lock()?.set_date(date);
        self.run_tickets(tickets)
    }

    /// Select a specialty; empty string means all. Never fetches.
    pub fn set_specialty(&self, specialty: String) -> Result<(), DailyReportError> {
        self.screen.lock()?.set_specialty(&specialty);
        Ok(())
    }

    /// Re-run all three fetches for the selected date.
    pub fn refresh(&self) -> Result<(), DailyReportError> {
        let tickets = self.screen.lock()?.refresh();
        self.run_tickets(tickets)
    }

    // =========================================================================
    // Screen State
    // =========================================================================

    pub fn selected_date(&self) -> Result<String, DailyReportError> {
        Ok(self.screen.lock()?.selected_date().format("%Y-%m-%d").to_string())
    }

    pub fn selected_specialty(&self) -> Result<String, DailyReportError> {
        Ok(self.screen.lock()?.selected_specialty().to_string())
    }

    /// Specialties offered by the selector.
    pub fn specialties(&self) -> Vec<String> {
        self.config.specialties.clone()
    }

    pub fn is_loading(&self) -> Result<bool, DailyReportError> {
        Ok(self.screen.lock()?.is_loading())
    }

    /// Patients and consultations matching the specialty filter.
    pub fn visible_records(&self) -> Result<Vec<FfiCensusRow>, DailyReportError> {
        let screen = self.screen.lock()?;
        Ok(screen.visible().iter().map(FfiCensusRow::from).collect())
    }

    pub fn appointments(&self) -> Result<Vec<FfiAppointment>, DailyReportError> {
        let screen = self.screen.lock()?;
        Ok(screen.appointments().iter().map(FfiAppointment::from).collect())
    }

    pub fn daily_reports(&self) -> Result<Vec<FfiDailyReport>, DailyReportError> {
        let screen = self.screen.lock()?;
        Ok(screen.daily_reports().iter().map(FfiDailyReport::from).collect())
    }

    /// Drain pending notifications.
    pub fn take_notifications(&self) -> Result<Vec<FfiNotification>, DailyReportError> {
        let notifications = self.screen.lock()?.take_notifications();
        Ok(notifications.into_iter().map(FfiNotification::from).collect())
    }

    pub fn render_html(&self) -> Result<String, DailyReportError> {
        Ok(self.screen.lock()?.render_html(&self.config.specialties))
    }

    pub fn download_label(&self) -> Result<String, DailyReportError> {
        Ok(self.screen.lock()?.download_label().to_string())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Render the visible report to PDF.
    ///
    /// Returns `None` if an export is already generating. Rendering happens
    /// outside the screen lock so state reads stay responsive.
    pub fn export_pdf(&self) -> Result<Option<FfiArtifact>, DailyReportError> {
        let now = Utc::now().with_timezone(&self.config.offset()?);
        let Some(job) = self.screen.lock()?.begin_export(self.export_title(), now) else {
            return Ok(None);
        };

        let result = job.run(&PdfRenderer);
        let reply = match &result {
            Ok(artifact) => Ok(Some(FfiArtifact::from(artifact.clone()))),
            Err(e) => Err(DailyReportError::Export(e.to_string())),
        };
        finish_export_on(&self.screen, job.id, result);
        reply
    }

    /// Visible report as pretty JSON.
    pub fn export_json(&self) -> Result<String, DailyReportError> {
        Ok(self.snapshot()?.to_json()?)
    }

    /// Visible report as two CSV files: census and appointments.
    pub fn export_csv(&self) -> Result<Vec<FfiArtifact>, DailyReportError> {
        let snapshot = self.snapshot()?;
        let stem = {
            let screen = self.screen.lock()?;
            export::artifact_stem(screen.selected_date(), screen.selected_specialty())
        };

        Ok(vec![
            FfiArtifact {
                filename: format!("{stem}_census.csv"),
                mime_type: "text/csv".into(),
                bytes: snapshot.census_csv().into_bytes(),
            },
            FfiArtifact {
                filename: format!("{stem}_appointments.csv"),
                mime_type: "text/csv".into(),
                bytes: snapshot.appointments_csv().into_bytes(),
            },
        ])
    }

    /// Write an artifact into `dir`; returns the full path.
    pub fn save_artifact(&self, artifact: FfiArtifact, dir: String) -> Result<String, DailyReportError> {
        let path = export::export_to_dir(&artifact.into(), Path::new(&dir))?;
        Ok(path.to_string_lossy().into_owned())
    }
}

impl DailyReportCore {
    fn snapshot(&self) -> Result<DailyReportSnapshot, DailyReportError> {
        let now = Utc::now().with_timezone(&self.config.offset()?);
        let screen = self.screen.lock()?;
        Ok(DailyReportSnapshot::new(&screen.export_input(), screen.daily_reports(), now))
    }
}

/// Record an export result even if another caller panicked while holding the
/// screen, so the download control never stays on "Generating".
fn finish_export_on(
    screen: &Mutex<DailyReportScreen>,
    job_id: u64,
    result: Result<Artifact, export::ExportError>,
) -> bool {
    screen
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .finish_export(job_id, result)
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe census row (patient or consultation).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCensusRow {
    /// "patient" or "consultation"
    pub kind: String,
    pub mrn: String,
    pub patient_name: String,
    pub age_gender: String,
    pub specialty: String,
    pub diagnosis_or_department: String,
}

impl From<&CensusRecord> for FfiCensusRow {
    fn from(record: &CensusRecord) -> Self {
        let row = view::CensusRow::from(record);
        Self {
            kind: row.kind.as_str().to_string(),
            mrn: row.mrn,
            patient_name: row.patient_name,
            age_gender: row.age_gender,
            specialty: row.specialty,
            diagnosis_or_department: row.diagnosis_or_department,
        }
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub appointment_id: String,
    pub patient_name: String,
    pub patient_medical_number: String,
    pub clinic_specialty: String,
    /// "Urgent" or "Regular"
    pub appointment_type: String,
    pub notes: Option<String>,
    /// RFC 3339
    pub created_at: String,
}

impl From<&Appointment> for FfiAppointment {
    fn from(a: &Appointment) -> Self {
        Self {
            appointment_id: a.appointment_id.clone(),
            patient_name: a.patient_name.clone(),
            patient_medical_number: a.patient_medical_number.clone(),
            clinic_specialty: a.clinic_specialty.clone(),
            appointment_type: a.appointment_type.to_string(),
            notes: a.notes.clone(),
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// FFI-safe daily report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDailyReport {
    pub report_id: String,
    pub patient_id: String,
    pub report_date: String,
    pub report_content: String,
    pub created_at: String,
    pub patient_name: Option<String>,
    pub patient_mrn: Option<String>,
}

impl From<&DailyReport> for FfiDailyReport {
    fn from(r: &DailyReport) -> Self {
        Self {
            report_id: r.report_id.clone(),
            patient_id: r.patient_id.clone(),
            report_date: r.report_date.format("%Y-%m-%d").to_string(),
            report_content: r.report_content.clone(),
            created_at: r.created_at.to_rfc3339(),
            patient_name: r.patient.as_ref().map(|p| p.patient_name.clone()),
            patient_mrn: r.patient.as_ref().map(|p| p.mrn.clone()),
        }
    }
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    /// "info" or "error"
    pub level: String,
    pub message: String,
}

impl From<Notification> for FfiNotification {
    fn from(n: Notification) -> Self {
        let level = match n.level {
            screen::NotificationLevel::Info => "info",
            screen::NotificationLevel::Error => "error",
        };
        Self {
            level: level.to_string(),
            message: n.message,
        }
    }
}

/// FFI-safe downloadable file.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiArtifact {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl From<Artifact> for FfiArtifact {
    fn from(a: Artifact) -> Self {
        Self {
            filename: a.filename,
            mime_type: a.mime_type,
            bytes: a.bytes,
        }
    }
}

impl From<FfiArtifact> for Artifact {
    fn from(a: FfiArtifact) -> Self {
        Artifact {
            filename: a.filename,
            mime_type: a.mime_type,
            bytes: a.bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_finishes_on_poisoned_screen() {
        let core = Arc::new(
            DailyReportCore::new(Database::open_in_memory().unwrap(), ReportConfig::default()).unwrap(),
        );
        let now = Utc::now().fixed_offset();
        let job = core.screen.lock().unwrap().begin_export("Daily Patient Report", now).unwrap();

        let holder = Arc::clone(&core);
        let _ = thread::spawn(move || {
            let _guard = holder.screen.lock().unwrap();
            panic!("screen poisoned while exporting");
        })
        .join();
        assert!(core.screen.is_poisoned());

        assert!(finish_export_on(&core.screen, job.id, job.run(&PdfRenderer)));
        let screen = core.screen.lock().unwrap_or_else(PoisonError::into_inner);
        assert!(!screen.export_state().is_generating());
        assert!(screen.export_state().artifact().is_some());
        assert_eq!(screen.download_label(), "Download PDF Report");
    }
}
