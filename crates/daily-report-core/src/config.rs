//! Screen configuration.
//!
//! Loaded from a JSON file supplied by the host; every field is optional and
//! falls back to [`ReportConfig::default`].

use std::path::Path;

use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default tracing filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "daily_report_core=info";

/// Largest accepted UTC offset, in minutes (UTC+14:00).
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("UTC offset out of range: {0} minutes")]
    InvalidOffset(i32),

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Title printed at the top of the exported document
    pub report_title: String,
    /// Specialties offered by the selector, in display order
    pub specialties: Vec<String>,
    /// Clinic UTC offset; defines where a calendar day starts and ends
    pub utc_offset_minutes: i32,
    /// tracing `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_title: "Daily Patient Report".into(),
            specialties: default_specialties(),
            utc_offset_minutes: 0,
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl ReportConfig {
    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ReportConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::InvalidOffset(self.utc_offset_minutes));
        }
        EnvFilter::try_new(&self.log_filter)
            .map_err(|e| ConfigError::InvalidLogFilter(format!("{}: {e}", self.log_filter)))?;
        Ok(())
    }

    /// Install the log subscriber with `log_filter` as the fallback
    /// directive. Returns false if logging was already initialised.
    pub fn init_logging(&self) -> bool {
        crate::telemetry::init_tracing(&self.log_filter)
    }

    /// Clinic offset as a chrono offset.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        self.validate()?;
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_minutes))
    }

    /// Today's date at the clinic.
    pub fn today(&self) -> Result<NaiveDate, ConfigError> {
        Ok(Utc::now().with_timezone(&self.offset()?).date_naive())
    }
}

fn default_specialties() -> Vec<String> {
    [
        "Internal Medicine",
        "Cardiology",
        "Neurology",
        "Pulmonology",
        "Gastroenterology",
        "Nephrology",
        "Endocrinology",
        "Hematology",
        "Oncology",
        "Infectious Diseases",
        "Rheumatology",
        "General Surgery",
        "Orthopedics",
        "Neurosurgery",
        "Urology",
        "Obstetrics and Gynecology",
        "Pediatrics",
        "Psychiatry",
        "Dermatology",
        "ENT",
        "Ophthalmology",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
