//! HTML rendering of the daily report screen.

use chrono::NaiveDate;

use super::rows::{appointment_cells, census_rows, APPOINTMENT_COLUMNS, CENSUS_COLUMNS};
use crate::models::{Appointment, AppointmentType, CensusRecord};

pub const NO_PATIENTS_MESSAGE: &str = "No patients found for the selected criteria.";
pub const NO_APPOINTMENTS_MESSAGE: &str = "No appointments found for the selected date.";
pub const LOADING_MESSAGE: &str = "Loading...";

const TH_CLASS: &str = "px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider";
const TD_LEAD_CLASS: &str = "px-6 py-4 whitespace-nowrap text-sm font-medium text-gray-900";
const TD_CLASS: &str = "px-6 py-4 whitespace-nowrap text-sm text-gray-500";

/// Everything the page needs, borrowed from the screen state.
#[derive(Debug, Clone, Copy)]
pub struct PageModel<'a> {
    pub selected_date: NaiveDate,
    pub selected_specialty: &'a str,
    pub specialties: &'a [String],
    pub loading: bool,
    pub visible: &'a [CensusRecord],
    pub appointments: &'a [Appointment],
    pub download_label: &'a str,
    pub download_filename: &'a str,
}

/// Render the full screen. While the census is loading only the loading
/// placeholder is shown.
pub fn render_page(model: &PageModel<'_>) -> String {
    if model.loading {
        return format!(r#"<div class="p-6">{LOADING_MESSAGE}</div>"#);
    }

    format!(
        r#"<div class="max-w-7xl mx-auto py-6 sm:px-6 lg:px-8">
  <div class="px-4 py-6 sm:px-0">
    <h1 class="text-3xl font-bold text-gray-900 mb-6">Daily Report Management</h1>
{controls}
    <div class="mb-6">
      <a id="download-report" download="{filename}" class="inline-flex items-center px-4 py-2 border border-transparent text-sm font-medium rounded-md shadow-sm text-white bg-indigo-600 hover:bg-indigo-700">{label}</a>
    </div>
{census}
{appointments}
  </div>
</div>"#,
        controls = render_controls(model.selected_date, model.selected_specialty, model.specialties),
        filename = escape_html(model.download_filename),
        label = escape_html(model.download_label),
        census = section(
            "bg-white shadow overflow-hidden sm:rounded-lg mb-6",
            "Active Patients and Consultations",
            &render_census_table(model.visible),
        ),
        appointments = section(
            "bg-white shadow overflow-hidden sm:rounded-lg",
            "Clinic Appointments",
            &render_appointments_table(model.appointments),
        ),
    )
}

/// Date picker and specialty selector.
pub fn render_controls(date: NaiveDate, selected: &str, specialties: &[String]) -> String {
    let mut options = String::new();
    options.push_str(&option_tag("", "All Specialties", selected.is_empty()));
    for specialty in specialties {
        options.push_str(&option_tag(specialty, specialty, specialty == selected));
    }

    format!(
        r#"    <div class="mb-6 flex flex-col sm:flex-row sm:items-center">
      <div class="flex items-center mb-2 sm:mb-0 sm:mr-4">
        <input type="date" name="date" value="{date}" class="shadow-sm sm:text-sm border-gray-300 rounded-md"/>
      </div>
      <div class="flex items-center">
        <select name="specialty" class="shadow-sm sm:text-sm border-gray-300 rounded-md">{options}</select>
      </div>
    </div>"#,
        date = date.format("%Y-%m-%d"),
    )
}

/// Patients and consultations table, or the empty-state message.
pub fn render_census_table(records: &[CensusRecord]) -> String {
    if records.is_empty() {
        return empty_state(NO_PATIENTS_MESSAGE);
    }

    let mut body = String::new();
    for row in census_rows(records) {
        let cells = row.cells();
        body.push_str("<tr>");
        body.push_str(&format!(r#"<td class="{TD_LEAD_CLASS}">{}</td>"#, escape_html(cells[0])));
        for cell in &cells[1..] {
            body.push_str(&format!(r#"<td class="{TD_CLASS}">{}</td>"#, escape_html(cell)));
        }
        body.push_str("</tr>");
    }

    table(&CENSUS_COLUMNS, &body)
}

/// Appointments table with an Urgent/Regular badge, or the empty-state message.
pub fn render_appointments_table(appointments: &[Appointment]) -> String {
    if appointments.is_empty() {
        return empty_state(NO_APPOINTMENTS_MESSAGE);
    }

    let mut body = String::new();
    for appointment in appointments {
        let [name, number, specialty, kind, notes] = appointment_cells(appointment);
        body.push_str("<tr>");
        body.push_str(&format!(r#"<td class="{TD_LEAD_CLASS}">{}</td>"#, escape_html(&name)));
        body.push_str(&format!(r#"<td class="{TD_CLASS}">{}</td>"#, escape_html(&number)));
        body.push_str(&format!(r#"<td class="{TD_CLASS}">{}</td>"#, escape_html(&specialty)));
        body.push_str(&format!(
            r#"<td class="{TD_CLASS}"><span class="px-2 inline-flex text-xs leading-5 font-semibold rounded-full {}">{}</span></td>"#,
            badge_class(appointment.appointment_type),
            escape_html(&kind),
        ));
        body.push_str(&format!(r#"<td class="{TD_CLASS}">{}</td>"#, escape_html(&notes)));
        body.push_str("</tr>");
    }

    table(&APPOINTMENT_COLUMNS, &body)
}

/// Badge colours for the appointment type.
pub fn badge_class(kind: AppointmentType) -> &'static str {
    match kind {
        AppointmentType::Urgent => "bg-red-100 text-red-800",
        AppointmentType::Regular => "bg-green-100 text-green-800",
    }
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn option_tag(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape_html(value),
        if selected { " selected" } else { "" },
        escape_html(label),
    )
}

fn section(class: &str, heading: &str, content: &str) -> String {
    format!(
        r#"    <div class="{class}">
      <div class="px-4 py-5 sm:px-6">
        <h2 class="text-lg font-medium text-gray-900">{heading}</h2>
      </div>
      <div class="border-t border-gray-200">
        {content}
      </div>
    </div>"#
    )
}

fn table(columns: &[&str], body: &str) -> String {
    let header: String = columns
        .iter()
        .map(|c| format!(r#"<th scope="col" class="{TH_CLASS}">{c}</th>"#))
        .collect();

    format!(
        r#"<div class="overflow-x-auto"><table class="min-w-full divide-y divide-gray-200"><thead class="bg-gray-50"><tr>{header}</tr></thead><tbody class="bg-white divide-y divide-gray-200">{body}</tbody></table></div>"#
    )
}

fn empty_state(message: &str) -> String {
    format!(r#"<p class="px-6 py-4 text-sm text-gray-500">{message}</p>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Consultation, Patient};
    use chrono::{TimeZone, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn model<'a>(
        visible: &'a [CensusRecord],
        appointments: &'a [Appointment],
        specialties: &'a [String],
    ) -> PageModel<'a> {
        PageModel {
            selected_date: date(),
            selected_specialty: "",
            specialties,
            loading: false,
            visible,
            appointments,
            download_label: "Download PDF Report",
            download_filename: "daily_report_2024-05-01.pdf",
        }
    }

    #[test]
    fn test_empty_tables_show_messages() {
        let html = render_page(&model(&[], &[], &[]));
        assert!(html.contains(NO_PATIENTS_MESSAGE));
        assert!(html.contains(NO_APPOINTMENTS_MESSAGE));
        assert!(!html.contains("<table"));
        assert!(!html.contains("<tr>"));
    }

    #[test]
    fn test_loading_hides_tables() {
        let mut m = model(&[], &[], &[]);
        m.loading = true;
        assert_eq!(render_page(&m), r#"<div class="p-6">Loading...</div>"#);
    }

    #[test]
    fn test_census_table_rows() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let records: Vec<CensusRecord> = vec![
            Patient::new("P-1".into(), "A".into(), "Cardiology".into(), at).into(),
            Consultation::new("C-1".into(), "B".into(), "Neurology".into(), at).into(),
        ];

        let html = render_census_table(&records);
        assert_eq!(html.matches("<tr>").count(), 3); // header + 2 rows
        assert!(html.contains("Diagnosis/Department"));
        assert!(html.contains(">P-1<"));
        assert!(html.contains(">Neurology<"));
    }

    #[test]
    fn test_urgent_badge() {
        let appointments = vec![
            Appointment::new("A".into(), "MN-1".into(), "ENT".into(), AppointmentType::Urgent, Utc::now()),
            Appointment::new("B".into(), "MN-2".into(), "ENT".into(), AppointmentType::Regular, Utc::now()),
        ];

        let html = render_appointments_table(&appointments);
        assert!(html.contains("bg-red-100 text-red-800\">Urgent<"));
        assert!(html.contains("bg-green-100 text-green-800\">Regular<"));
    }

    #[test]
    fn test_text_is_escaped() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let records: Vec<CensusRecord> =
            vec![Patient::new("P-1".into(), "<script>x</script>".into(), "ENT".into(), at).into()];

        let html = render_census_table(&records);
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_controls_mark_selection() {
        let specialties = vec!["Cardiology".to_string(), "Neurology".to_string()];
        let html = render_controls(date(), "Neurology", &specialties);

        assert!(html.contains(r#"value="2024-05-01""#));
        assert!(html.contains(r#"<option value="">All Specialties</option>"#));
        assert!(html.contains(r#"<option value="Neurology" selected>Neurology</option>"#));
        assert!(html.contains(r#"<option value="Cardiology">Cardiology</option>"#));
    }

    #[test]
    fn test_download_label_rendered() {
        let mut m = model(&[], &[], &[]);
        m.download_label = "Generating PDF...";
        let html = render_page(&m);
        assert!(html.contains(">Generating PDF...</a>"));
        assert!(html.contains(r#"download="daily_report_2024-05-01.pdf""#));
    }
}
