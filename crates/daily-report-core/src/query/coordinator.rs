//! Runs fetch tickets against a data source.

use chrono::FixedOffset;

use super::{DayWindow, FetchKind, FetchOutcome, FetchPayload, FetchTicket};
use crate::models::CensusRecord;
use crate::source::{ReportSource, SourceResult};

/// Executes the screen's fetches against a [`ReportSource`].
///
/// Holds no state between calls; every ticket is self-contained so the
/// three fetches can run on different threads.
pub struct QueryCoordinator<'a, S: ReportSource + ?Sized> {
    source: &'a S,
    offset: FixedOffset,
}

impl<'a, S: ReportSource + ?Sized> QueryCoordinator<'a, S> {
    /// Create a coordinator; `offset` defines where calendar days start.
    pub fn new(source: &'a S, offset: FixedOffset) -> Self {
        Self { source, offset }
    }

    /// Run one ticket. Never panics on source failure; the error travels in the outcome.
    pub fn run(&self, ticket: FetchTicket) -> FetchOutcome {
        let window = DayWindow::for_date(ticket.tag.date, self.offset);
        let (start, end) = window.to_iso_bounds();
        tracing::debug!(
            kind = ?ticket.kind,
            seq = ticket.tag.seq,
            %start,
            %end,
            "Issuing fetch"
        );

        let result = match ticket.kind {
            FetchKind::Census => self.fetch_census(&window).map(FetchPayload::Census),
            FetchKind::Appointments => self
                .source
                .fetch_appointments(&window)
                .map(FetchPayload::Appointments),
            FetchKind::DailyReports => self
                .source
                .fetch_daily_reports(window.date())
                .map(FetchPayload::DailyReports),
        };

        match &result {
            Ok(payload) => tracing::info!(
                kind = ?ticket.kind,
                date = %ticket.tag.date,
                rows = payload.len(),
                "Fetch complete"
            ),
            Err(e) => tracing::error!(
                kind = ?ticket.kind,
                date = %ticket.tag.date,
                error = %e,
                "Fetch failed"
            ),
        }

        FetchOutcome { ticket, result }
    }

    /// Patients (newest admission first) followed by consultations (newest first).
    fn fetch_census(&self, window: &DayWindow) -> SourceResult<Vec<CensusRecord>> {
        let patients = self.source.fetch_patients(window)?;
        let consultations = self.source.fetch_consultations(window)?;

        let mut census = Vec::with_capacity(patients.len() + consultations.len());
        census.extend(patients.into_iter().map(CensusRecord::from));
        census.extend(consultations.into_iter().map(CensusRecord::from));
        Ok(census)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Appointment, AppointmentType, Consultation, DailyReport, Patient, RecordKind};
    use crate::query::FilterTag;
    use crate::source::SourceError;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn ticket(kind: FetchKind) -> FetchTicket {
        FetchTicket {
            kind,
            tag: FilterTag {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                seq: 1,
            },
        }
    }

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        let at = |h| Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).unwrap();

        db.insert_patient(&Patient::new("P-1".into(), "Early".into(), "Cardiology".into(), at(7)))
            .unwrap();
        db.insert_patient(&Patient::new("P-2".into(), "Late".into(), "Neurology".into(), at(19)))
            .unwrap();
        db.insert_consultation(&Consultation::new("C-1".into(), "Consult".into(), "Cardiology".into(), at(12)))
            .unwrap();
        db.insert_appointment(&Appointment::new(
            "Clinic".into(),
            "MN-1".into(),
            "ENT".into(),
            AppointmentType::Regular,
            at(9),
        ))
        .unwrap();
        db
    }

    #[test]
    fn test_census_merges_patients_then_consultations() {
        let db = seeded();
        let coordinator = QueryCoordinator::new(&db, utc());

        let outcome = coordinator.run(ticket(FetchKind::Census));
        let Ok(FetchPayload::Census(records)) = outcome.result else {
            panic!("expected census payload");
        };

        let order: Vec<(RecordKind, &str)> = records.iter().map(|r| (r.kind(), r.mrn())).collect();
        assert_eq!(
            order,
            vec![
                (RecordKind::Patient, "P-2"),
                (RecordKind::Patient, "P-1"),
                (RecordKind::Consultation, "C-1"),
            ]
        );
    }

    #[test]
    fn test_outcome_carries_ticket() {
        let db = seeded();
        let coordinator = QueryCoordinator::new(&db, utc());
        let t = ticket(FetchKind::Appointments);

        let outcome = coordinator.run(t);
        assert_eq!(outcome.ticket, t);
        assert_eq!(outcome.result.unwrap().len(), 1);
    }

    #[test]
    fn test_daily_reports_fetch() {
        let db = seeded();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        db.insert_daily_report(&DailyReport::new("P-1".into(), date, "Comfortable".into()))
            .unwrap();

        let outcome = QueryCoordinator::new(&db, utc()).run(ticket(FetchKind::DailyReports));
        let Ok(FetchPayload::DailyReports(reports)) = outcome.result else {
            panic!("expected daily reports payload");
        };
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].patient.as_ref().unwrap().patient_name, "Early");
    }

    #[test]
    fn test_consultation_failure_fails_census() {
        let db = seeded();
        db.conn().execute_batch("DROP TABLE consultations").unwrap();

        let outcome = QueryCoordinator::new(&db, utc()).run(ticket(FetchKind::Census));
        assert!(matches!(outcome.result, Err(SourceError::Unavailable(_))));
    }

    #[test]
    fn test_offset_moves_day_boundary() {
        let db = Database::open_in_memory().unwrap();
        // 22:30 UTC on Apr 30 is already May 1 at UTC+03:00
        db.insert_patient(&Patient::new(
            "P-9".into(),
            "Night".into(),
            "Cardiology".into(),
            Utc.with_ymd_and_hms(2024, 4, 30, 22, 30, 0).unwrap(),
        ))
        .unwrap();

        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        let outcome = QueryCoordinator::new(&db, plus_three).run(ticket(FetchKind::Census));
        assert_eq!(outcome.result.unwrap().len(), 1);

        let outcome = QueryCoordinator::new(&db, utc()).run(ticket(FetchKind::Census));
        assert!(outcome.result.unwrap().is_empty());
    }
}
