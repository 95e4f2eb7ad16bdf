//! Declarative document tree for the exported report.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::ExportInput;
use crate::view::{appointment_cells, census_rows, APPOINTMENT_COLUMNS, CENSUS_COLUMNS};

/// A table with a header row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Body block of the document, laid out top to bottom.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Block {
    SectionTitle(String),
    Table(Table),
}

/// The whole report before it is laid out on pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDocument {
    /// Title line (also used as document metadata title)
    pub title: String,
    /// Centered lines under the title
    pub subtitles: Vec<String>,
    pub blocks: Vec<Block>,
    /// Stamped at the bottom of every page
    pub footer: String,
}

/// Build the report document from the visible census and the day's appointments.
///
/// Appointments are included as given; the specialty filter applies to the
/// census only.
pub fn build_document(
    input: &ExportInput,
    title: &str,
    generated_at: DateTime<FixedOffset>,
) -> ReportDocument {
    let mut subtitles = vec![format!("Date: {}", input.selected_date.format("%Y-%m-%d"))];
    if !input.selected_specialty.is_empty() {
        subtitles.push(format!("Specialty: {}", input.selected_specialty));
    }

    let census = Table {
        columns: CENSUS_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: census_rows(&input.visible)
            .iter()
            .map(|row| row.cells().iter().map(|c| c.to_string()).collect())
            .collect(),
    };

    let appointments = Table {
        columns: APPOINTMENT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: input
            .appointments
            .iter()
            .map(|a| appointment_cells(a).to_vec())
            .collect(),
    };

    ReportDocument {
        title: title.to_string(),
        subtitles,
        blocks: vec![
            Block::SectionTitle("Patients and Consultations".into()),
            Block::Table(census),
            Block::SectionTitle("Appointments".into()),
            Block::Table(appointments),
        ],
        footer: format!("Generated on {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
    }
}
