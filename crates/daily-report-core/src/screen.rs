//! State of the daily report screen.
//!
//! The screen owns the filter values and the last good result of each
//! fetch. It never performs I/O: filter changes hand back [`FetchTicket`]s
//! for the caller to run, and the outcomes come back through
//! [`DailyReportScreen::apply`].

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::export::{artifact_filename, Artifact, ExportError, ExportInput, ExportJob, ExportState};
use crate::filter::filter_by_specialty;
use crate::models::{Appointment, CensusRecord, DailyReport};
use crate::query::{FetchKind, FetchOutcome, FetchPayload, FetchTicket, FilterTag};
use crate::view::{render_page, PageModel};

pub const PATIENTS_FETCH_FAILED: &str = "Failed to fetch patients";
pub const APPOINTMENTS_FETCH_FAILED: &str = "Failed to fetch appointments";
pub const DAILY_REPORTS_FETCH_FAILED: &str = "Failed to fetch daily reports";
pub const PDF_EXPORT_FAILED: &str = "Failed to generate PDF report";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Whether an outcome changed the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    Applied,
    /// Issued for a filter that is no longer current; ignored
    Stale,
}

#[derive(Debug, Clone)]
pub struct DailyReportScreen {
    selected_date: NaiveDate,
    /// Empty means all specialties
    selected_specialty: String,
    /// Census as fetched, before the specialty filter
    fetched: Vec<CensusRecord>,
    /// `fetched` filtered by `selected_specialty`
    visible: Vec<CensusRecord>,
    appointments: Vec<Appointment>,
    daily_reports: Vec<DailyReport>,
    loading: bool,
    /// Latest issued sequence number per fetch kind
    latest: HashMap<FetchKind, u64>,
    next_seq: u64,
    notifications: Vec<Notification>,
    export: ExportState,
    next_job: u64,
}

impl DailyReportScreen {
    /// A fresh screen for `today`. Loading until the first census outcome;
    /// call [`refresh`](Self::refresh) to get the initial tickets.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected_date: today,
            selected_specialty: String::new(),
            fetched: Vec::new(),
            visible: Vec::new(),
            appointments: Vec::new(),
            daily_reports: Vec::new(),
            loading: true,
            latest: HashMap::new(),
            next_seq: 0,
            notifications: Vec::new(),
            export: ExportState::Idle,
            next_job: 0,
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn selected_specialty(&self) -> &str {
        &self.selected_specialty
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn visible(&self) -> &[CensusRecord] {
        &self.visible
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn daily_reports(&self) -> &[DailyReport] {
        &self.daily_reports
    }

    pub fn export_state(&self) -> &ExportState {
        &self.export
    }

    pub fn download_label(&self) -> &'static str {
        self.export.download_label()
    }

    /// Change the selected date. Returns the three fetches to run, or
    /// nothing if the date did not change.
    pub fn set_date(&mut self, date: NaiveDate) -> Vec<FetchTicket> {
        if date == self.selected_date {
            return Vec::new();
        }
        self.selected_date = date;
        self.discard_artifact();
        self.refresh()
    }

    /// Change the specialty filter. Re-filters the already fetched census;
    /// never fetches.
    pub fn set_specialty(&mut self, specialty: &str) {
        if specialty == self.selected_specialty {
            return;
        }
        self.selected_specialty = specialty.to_string();
        self.visible = filter_by_specialty(&self.fetched, &self.selected_specialty);
        self.discard_artifact();
    }

    /// Issue the three fetches for the current date.
    pub fn refresh(&mut self) -> Vec<FetchTicket> {
        self.loading = true;
        FetchKind::ALL
            .iter()
            .map(|&kind| {
                self.next_seq += 1;
                self.latest.insert(kind, self.next_seq);
                FetchTicket {
                    kind,
                    tag: FilterTag {
                        date: self.selected_date,
                        seq: self.next_seq,
                    },
                }
            })
            .collect()
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.tag.date == self.selected_date && self.latest.get(&ticket.kind) == Some(&ticket.tag.seq)
    }

    /// Apply a finished fetch.
    ///
    /// On failure the previous rows of that kind stay in place and an error
    /// notification is queued.
    pub fn apply(&mut self, outcome: FetchOutcome) -> ApplyResult {
        let FetchOutcome { ticket, result } = outcome;
        if !self.is_current(&ticket) {
            debug!(
                kind = ?ticket.kind,
                seq = ticket.tag.seq,
                date = %ticket.tag.date,
                "Discarding stale fetch outcome"
            );
            return ApplyResult::Stale;
        }

        if ticket.kind == FetchKind::Census {
            self.loading = false;
        }

        match result {
            Ok(FetchPayload::Census(records)) => {
                self.fetched = records;
                self.visible = filter_by_specialty(&self.fetched, &self.selected_specialty);
                self.discard_artifact();
            }
            Ok(FetchPayload::Appointments(rows)) => {
                self.appointments = rows;
                self.discard_artifact();
            }
            Ok(FetchPayload::DailyReports(rows)) => self.daily_reports = rows,
            Err(e) => {
                let message = match ticket.kind {
                    FetchKind::Census => PATIENTS_FETCH_FAILED,
                    FetchKind::Appointments => APPOINTMENTS_FETCH_FAILED,
                    FetchKind::DailyReports => DAILY_REPORTS_FETCH_FAILED,
                };
                warn!(kind = ?ticket.kind, error = %e, "{message}");
                self.notifications.push(Notification::error(message));
            }
        }

        ApplyResult::Applied
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Snapshot of what the export captures.
    pub fn export_input(&self) -> ExportInput {
        ExportInput {
            selected_date: self.selected_date,
            selected_specialty: self.selected_specialty.clone(),
            visible: self.visible.clone(),
            appointments: self.appointments.clone(),
        }
    }

    /// Start an export. Returns `None` while one is already generating.
    pub fn begin_export(&mut self, title: &str, generated_at: DateTime<FixedOffset>) -> Option<ExportJob> {
        if self.export.is_generating() {
            debug!("Export already in progress; trigger ignored");
            return None;
        }

        self.next_job += 1;
        self.export = ExportState::Generating { job_id: self.next_job };
        Some(ExportJob {
            id: self.next_job,
            input: self.export_input(),
            title: title.to_string(),
            generated_at,
        })
    }

    /// Record the result of an export job. Results for any job other than
    /// the one generating are ignored.
    pub fn finish_export(&mut self, job_id: u64, result: Result<Artifact, ExportError>) -> bool {
        if self.export != (ExportState::Generating { job_id }) {
            return false;
        }

        self.export = match result {
            Ok(artifact) => ExportState::Ready(artifact),
            Err(e) => {
                error!(job = job_id, error = %e, "PDF export failed");
                self.notifications.push(Notification::error(PDF_EXPORT_FAILED));
                ExportState::Failed(e.to_string())
            }
        };
        true
    }

    /// A finished artifact no longer matches the screen once the filters or
    /// the exported rows change. An export in flight is left alone.
    fn discard_artifact(&mut self) {
        if !self.export.is_generating() {
            self.export = ExportState::Idle;
        }
    }

    /// Filename the download control offers for the current filters.
    pub fn download_filename(&self) -> String {
        artifact_filename(self.selected_date, &self.selected_specialty, "pdf")
    }

    pub fn render_html(&self, specialties: &[String]) -> String {
        let filename = self.download_filename();
        render_page(&PageModel {
            selected_date: self.selected_date,
            selected_specialty: &self.selected_specialty,
            specialties,
            loading: self.loading,
            visible: &self.visible,
            appointments: &self.appointments,
            download_label: self.download_label(),
            download_filename: &filename,
        })
    }
}
