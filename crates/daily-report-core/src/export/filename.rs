//! Download filename for an exported report.

use chrono::NaiveDate;

/// `daily_report_<date>` or `daily_report_<date>_<specialty>`.
///
/// Characters that are unsafe in a filename are replaced with `-`.
pub fn artifact_stem(date: NaiveDate, specialty: &str) -> String {
    let mut stem = format!("daily_report_{}", date.format("%Y-%m-%d"));
    if !specialty.is_empty() {
        stem.push('_');
        stem.extend(specialty.chars().map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        }));
    }
    stem
}

pub fn artifact_filename(date: NaiveDate, specialty: &str, extension: &str) -> String {
    format!("{}.{extension}", artifact_stem(date, specialty))
}
