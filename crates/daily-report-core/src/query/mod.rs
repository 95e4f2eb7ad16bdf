//! Query coordination for the daily report screen.
//!
//! Flow: filter change → tickets issued by the screen → [`QueryCoordinator`]
//! runs each ticket against a [`ReportSource`](crate::source::ReportSource)
//! → outcomes applied back to the screen (stale ones dropped).

mod coordinator;
mod window;

pub use coordinator::*;
pub use window::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Appointment, CensusRecord, DailyReport};
use crate::source::SourceError;

/// The three independent fetches behind the screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// Patients and consultations together
    Census,
    Appointments,
    DailyReports,
}

impl FetchKind {
    pub const ALL: [FetchKind; 3] = [FetchKind::Census, FetchKind::Appointments, FetchKind::DailyReports];
}

/// Filter values a request was issued for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FilterTag {
    /// Selected date at issue time
    pub date: NaiveDate,
    /// Per-kind issue sequence number (monotonic)
    pub seq: u64,
}

/// One fetch to perform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchTicket {
    pub kind: FetchKind,
    pub tag: FilterTag,
}

/// Rows returned by a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    Census(Vec<CensusRecord>),
    Appointments(Vec<Appointment>),
    DailyReports(Vec<DailyReport>),
}

impl FetchPayload {
    pub fn len(&self) -> usize {
        match self {
            FetchPayload::Census(rows) => rows.len(),
            FetchPayload::Appointments(rows) => rows.len(),
            FetchPayload::DailyReports(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of running one ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<FetchPayload, SourceError>,
}
