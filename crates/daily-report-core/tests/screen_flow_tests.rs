//! End-to-end screen tests: SQLite → concurrent fetch → screen state → export.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use daily_report_core::db::Database;
use daily_report_core::models::{Appointment, AppointmentType, Consultation, DailyReport, Patient};
use daily_report_core::{DailyReportCore, ReportConfig};

fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, d, h, m, 0).unwrap()
}

fn patient(mrn: &str, name: &str, specialty: &str, admitted: DateTime<Utc>) -> Patient {
    let mut p = Patient::new(mrn.to_string(), name.to_string(), specialty.to_string(), admitted);
    p.age = 60;
    p.gender = "Female".to_string();
    p.diagnosis = Some("Observation".to_string());
    p
}

fn consultation(mrn: &str, specialty: &str, created: DateTime<Utc>) -> Consultation {
    let mut c = Consultation::new(mrn.to_string(), format!("Consult {mrn}"), specialty.to_string(), created);
    c.requesting_department = Some("Emergency".to_string());
    c
}

/// Five census records on 2024-05-01 (three Cardiology), one the day before,
/// two appointments and one daily report.
fn seeded_db() -> Database {
    let db = Database::open_in_memory().unwrap();

    db.insert_patient(&patient("P-1", "Amal", "Cardiology", at(1, 8, 0))).unwrap();
    db.insert_patient(&patient("P-2", "Basil", "Neurology", at(1, 12, 0))).unwrap();
    db.insert_patient(&patient("P-3", "Carla", "Cardiology", at(1, 23, 59))).unwrap();
    db.insert_patient(&patient("P-0", "Yesterday", "Cardiology", at(1, 0, 0) - chrono::Duration::minutes(30)))
        .unwrap();

    db.insert_consultation(&consultation("P-1", "Cardiology", at(1, 9, 0))).unwrap();
    db.insert_consultation(&consultation("P-2", "Oncology", at(1, 15, 0))).unwrap();

    let mut urgent = Appointment::new(
        "Dina".into(),
        "MN-1".into(),
        "Dermatology".into(),
        AppointmentType::Urgent,
        at(1, 10, 0),
    );
    urgent.notes = Some("Rash, spreading".into());
    db.insert_appointment(&urgent).unwrap();
    db.insert_appointment(&Appointment::new(
        "Emad".into(),
        "MN-2".into(),
        "Cardiology".into(),
        AppointmentType::Regular,
        at(1, 11, 0),
    ))
    .unwrap();

    db.insert_daily_report(&DailyReport::new(
        "P-1".into(),
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        "Stable overnight".into(),
    ))
    .unwrap();

    db
}

fn core_with(db: Database, config: ReportConfig) -> DailyReportCore {
    let core = DailyReportCore::new(db, config).unwrap();
    core.set_date("2024-05-01".into()).unwrap();
    core
}

fn core() -> DailyReportCore {
    core_with(seeded_db(), ReportConfig::default())
}

#[test]
fn test_date_change_loads_all_three_fetches() {
    let core = core();

    assert_eq!(core.selected_date().unwrap(), "2024-05-01");
    assert!(!core.is_loading().unwrap());

    let visible = core.visible_records().unwrap();
    assert_eq!(visible.len(), 5);
    // Patients first, newest admission first, then consultations
    let mrns: Vec<&str> = visible.iter().map(|r| r.mrn.as_str()).collect();
    assert_eq!(mrns, vec!["P-3", "P-2", "P-1", "P-2", "P-1"]);
    assert_eq!(visible[0].kind, "patient");
    assert_eq!(visible[3].kind, "consultation");
    assert_eq!(visible[3].diagnosis_or_department, "Emergency");

    let appointments = core.appointments().unwrap();
    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0].patient_name, "Emad");

    let reports = core.daily_reports().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].patient_name.as_deref(), Some("Amal"));
    assert_eq!(reports[0].patient_mrn.as_deref(), Some("P-1"));

    assert!(core.take_notifications().unwrap().is_empty());
}

#[test]
fn test_specialty_filter_without_refetch() {
    let core = core();
    core.set_specialty("Cardiology".into()).unwrap();

    let visible = core.visible_records().unwrap();
    assert_eq!(visible.len(), 3);
    assert!(visible.iter().all(|r| r.specialty == "Cardiology"));

    // Appointments are not filtered
    assert_eq!(core.appointments().unwrap().len(), 2);

    core.set_specialty("Urology".into()).unwrap();
    assert!(core.visible_records().unwrap().is_empty());
    assert!(core
        .render_html()
        .unwrap()
        .contains("No patients found for the selected criteria."));
}

#[test]
fn test_clinic_offset_shifts_day_boundary() {
    let config = ReportConfig {
        utc_offset_minutes: 60,
        ..ReportConfig::default()
    };
    let core = core_with(seeded_db(), config);

    // At UTC+1, 2024-05-01 runs from 2024-04-30T23:00Z to 2024-05-01T22:59:59.999Z
    let mrns: Vec<String> = core
        .visible_records()
        .unwrap()
        .into_iter()
        .filter(|r| r.kind == "patient")
        .map(|r| r.mrn)
        .collect();
    assert_eq!(mrns, vec!["P-2", "P-1", "P-0"]);
}

#[test]
fn test_empty_day() {
    let core = core();
    core.set_date("2024-06-15".into()).unwrap();

    assert!(core.visible_records().unwrap().is_empty());
    assert!(core.appointments().unwrap().is_empty());
    assert!(core.daily_reports().unwrap().is_empty());
    assert!(core.take_notifications().unwrap().is_empty());

    let html = core.render_html().unwrap();
    assert!(html.contains("No patients found for the selected criteria."));
    assert!(html.contains("No appointments found for the selected date."));
}

#[test]
fn test_malformed_appointment_keeps_previous_rows() {
    let core = core();
    assert_eq!(core.appointments().unwrap().len(), 2);

    {
        let db = core.database();
        let db = db.lock().unwrap();
        db.conn()
            .execute(
                "INSERT INTO clinic_appointments (appointment_id, patient_name, patient_medical_number, \
                 clinic_specialty, appointment_type, notes, created_at) \
                 VALUES ('bad', 'X', 'MN-9', 'ENT', 'Walk-in', NULL, '2024-05-01 13:00:00+00:00')",
                [],
            )
            .unwrap();
    }

    core.refresh().unwrap();

    assert_eq!(core.appointments().unwrap().len(), 2);
    assert_eq!(core.visible_records().unwrap().len(), 5);
    let notifications = core.take_notifications().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, "error");
    assert_eq!(notifications[0].message, "Failed to fetch appointments");
}

#[test]
fn test_invalid_date_rejected() {
    let core = core();
    assert!(core.set_date("01/05/2024".into()).is_err());
    assert_eq!(core.selected_date().unwrap(), "2024-05-01");
}

#[test]
fn test_export_pdf_and_save() {
    let core = core();
    core.set_specialty("Cardiology".into()).unwrap();

    let artifact = core.export_pdf().unwrap().unwrap();
    assert_eq!(artifact.filename, "daily_report_2024-05-01_Cardiology.pdf");
    assert_eq!(&artifact.bytes[0..4], b"%PDF");
    assert_eq!(core.download_label().unwrap(), "Download PDF Report");

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("exports");
    let path = core.save_artifact(artifact, dir.to_string_lossy().into_owned()).unwrap();
    assert!(std::path::Path::new(&path).exists());
}

#[test]
fn test_export_json_and_csv() {
    let core = core();
    core.set_specialty("Neurology".into()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&core.export_json().unwrap()).unwrap();
    assert_eq!(json["metadata"]["report_date"], "2024-05-01");
    assert_eq!(json["metadata"]["specialty"], "Neurology");
    assert_eq!(json["census"].as_array().unwrap().len(), 1);
    assert_eq!(json["appointments"].as_array().unwrap().len(), 2);

    let csv = core.export_csv().unwrap();
    assert_eq!(csv.len(), 2);
    assert_eq!(csv[0].filename, "daily_report_2024-05-01_Neurology_census.csv");
    assert_eq!(csv[1].filename, "daily_report_2024-05-01_Neurology_appointments.csv");

    let appointments = String::from_utf8(csv[1].bytes.clone()).unwrap();
    assert!(appointments.contains("\"Rash, spreading\""));
}

#[test]
fn test_in_memory_factory_starts_loaded_and_empty() {
    let core = daily_report_core::open_report_screen_in_memory().unwrap();
    assert!(!core.is_loading().unwrap());
    assert!(core.visible_records().unwrap().is_empty());
    assert_eq!(core.specialties().len(), ReportConfig::default().specialties.len());
}

#[test]
fn test_file_factory_with_config() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("report.db");
    let config_path = tmp.path().join("config.json");
    std::fs::write(&config_path, r#"{"report_title": "Ward 4 Report", "specialties": ["Cardiology"]}"#).unwrap();

    let core = daily_report_core::open_report_screen(
        db_path.to_string_lossy().into_owned(),
        Some(config_path.to_string_lossy().into_owned()),
    )
    .unwrap();
    assert_eq!(core.specialties(), vec!["Cardiology".to_string()]);
    assert!(core.render_html().unwrap().contains(r#"<option value="Cardiology">Cardiology</option>"#));
}

#[test]
fn test_bad_config_offset_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("config.json");
    std::fs::write(&config_path, r#"{"utc_offset_minutes": 5000}"#).unwrap();

    let result = daily_report_core::open_report_screen(
        tmp.path().join("report.db").to_string_lossy().into_owned(),
        Some(config_path.to_string_lossy().into_owned()),
    );
    assert!(matches!(result, Err(daily_report_core::DailyReportError::Config(_))));
}
