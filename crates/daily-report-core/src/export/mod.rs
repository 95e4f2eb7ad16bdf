//! Report export: document model, page layout, PDF rendering and
//! JSON/CSV snapshots.

mod document;
mod filename;
mod layout;
mod pdf;
mod snapshot;
mod state;

pub use document::*;
pub use filename::*;
pub use layout::{layout_document, LaidOutPage, Placed};
pub use pdf::*;
pub use snapshot::*;
pub use state::*;

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::models::{Appointment, CensusRecord};

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid artifact filename: {0}")]
    InvalidFilename(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// The data an export captures: the visible census and the day's
/// appointments as they were when the export was triggered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportInput {
    pub selected_date: NaiveDate,
    /// Empty means all specialties
    pub selected_specialty: String,
    pub visible: Vec<CensusRecord>,
    pub appointments: Vec<Appointment>,
}

/// A rendered, downloadable file.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// One export request, detached from the screen so it can render off-thread.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Matches the `Generating` state that issued it
    pub id: u64,
    pub input: ExportInput,
    pub title: String,
    pub generated_at: DateTime<FixedOffset>,
}

impl ExportJob {
    /// Build the document and render it into an artifact.
    pub fn run<R: DocumentRenderer + ?Sized>(&self, renderer: &R) -> ExportResult<Artifact> {
        let document = build_document(&self.input, &self.title, self.generated_at);
        let bytes = renderer.render(&document).map_err(|e| {
            error!(job = self.id, error = %e, "Report rendering failed");
            e
        })?;

        let filename = artifact_filename(
            self.input.selected_date,
            &self.input.selected_specialty,
            renderer.extension(),
        );
        info!(job = self.id, %filename, size = bytes.len(), "Report rendered");

        Ok(Artifact {
            filename,
            mime_type: renderer.mime_type().to_string(),
            bytes,
        })
    }
}

/// Write an artifact into `dir` (created if missing) under its own filename.
pub fn export_to_dir(artifact: &Artifact, dir: &Path) -> ExportResult<PathBuf> {
    let name = artifact.filename.as_str();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ExportError::InvalidFilename(artifact.filename.clone()));
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, &artifact.bytes)?;
    info!(path = %path.display(), "Report saved");
    Ok(path)
}
