//! Export lifecycle behind the download control.

use super::Artifact;

pub const DOWNLOAD_LABEL: &str = "Download PDF Report";
pub const GENERATING_LABEL: &str = "Generating PDF...";

/// Export lifecycle as seen by the download control.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExportState {
    #[default]
    Idle,
    Generating {
        job_id: u64,
    },
    Ready(Artifact),
    /// Rendering failed; the control is usable again
    Failed(String),
}

impl ExportState {
    pub fn is_generating(&self) -> bool {
        matches!(self, Self::Generating { .. })
    }

    pub fn download_label(&self) -> &'static str {
        if self.is_generating() {
            GENERATING_LABEL
        } else {
            DOWNLOAD_LABEL
        }
    }

    /// The last finished artifact, if the most recent export succeeded.
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            Self::Ready(artifact) => Some(artifact),
            _ => None,
        }
    }
}
