//! Calendar-day windows for range queries.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive `[00:00:00.000, 23:59:59.999]` span of one calendar day.
///
/// The day is taken in the clinic's UTC offset and stored as UTC instants,
/// which is what the store compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    date: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate, offset: FixedOffset) -> Self {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let start_utc = local_midnight - offset;
        let end_utc = start_utc + Duration::days(1) - Duration::milliseconds(1);

        Self {
            date,
            start: DateTime::from_naive_utc_and_offset(start_utc, Utc),
            end: DateTime::from_naive_utc_and_offset(end_utc, Utc),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Bounds as ISO-8601 UTC strings with millisecond precision.
    pub fn to_iso_bounds(&self) -> (String, String) {
        const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
        (
            self.start.format(FORMAT).to_string(),
            self.end.format(FORMAT).to_string(),
        )
    }
}
