use appointment_db::models::hhmm;
use appointment_db::{
    Appointment, AppointmentMode, AppointmentQuery, AppointmentStatus, Tab, DEFAULT_DOCTOR,
    DEFAULT_DURATION,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Query string of `GET /appointments`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub date: Option<String>,
    pub tab: Option<String>,
    pub status: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> Result<AppointmentQuery, ApiError> {
        let date = non_empty(self.date)
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                    ApiError::validation("date", format!("expected YYYY-MM-DD, got '{raw}'"))
                })
            })
            .transpose()?;
        let tab = non_empty(self.tab).map(|raw| raw.parse::<Tab>()).transpose()?;
        let status = non_empty(self.status)
            .map(|raw| raw.parse::<AppointmentStatus>())
            .transpose()?;

        Ok(AppointmentQuery {
            search: non_empty(self.search),
            date,
            tab,
            status,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentList {
    pub total: usize,
    pub appointments: Vec<Appointment>,
}

impl AppointmentList {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self {
            total: appointments.len(),
            appointments,
        }
    }
}

/// Body of `POST /appointments`.
///
/// Only patient, date and time are required; the rest falls back to the
/// clinic defaults. Without an `id` the server assigns a UUID.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewAppointment {
    #[serde(default)]
    pub id: Option<String>,
    pub patient_name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub mode: Option<AppointmentMode>,
}

impl NewAppointment {
    pub fn into_appointment(self) -> Appointment {
        let id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        Appointment {
            id,
            patient_name: self.patient_name,
            date: self.date,
            time: self.time,
            duration: self.duration.unwrap_or_else(|| DEFAULT_DURATION.to_string()),
            doctor_name: self.doctor_name.unwrap_or_else(|| DEFAULT_DOCTOR.to_string()),
            status: self.status.unwrap_or(AppointmentStatus::Scheduled),
            mode: self.mode.unwrap_or(AppointmentMode::InPerson),
        }
    }
}

/// Body of `PATCH /appointments/:id/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: AppointmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_params_mean_no_filters() {
        let params = ListParams {
            search: Some(String::new()),
            date: Some(String::new()),
            tab: Some(String::new()),
            status: None,
        };
        assert_eq!(params.into_query().unwrap(), AppointmentQuery::default());
    }

    #[test]
    fn params_parse_into_typed_query() {
        let params = ListParams {
            search: Some("jane".to_string()),
            date: Some("2023-10-25".to_string()),
            tab: Some("Past".to_string()),
            status: Some("Scheduled".to_string()),
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.search.as_deref(), Some("jane"));
        assert_eq!(query.date, NaiveDate::from_ymd_opt(2023, 10, 25));
        assert_eq!(query.tab, Some(Tab::Past));
        assert_eq!(query.status, Some(AppointmentStatus::Scheduled));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let params = ListParams {
            date: Some("2023-13-01".to_string()),
            ..ListParams::default()
        };
        let error = params.into_query().unwrap_err();
        assert_eq!(error.body.field.as_deref(), Some("date"));
    }

    #[test]
    fn new_appointment_fills_clinic_defaults() {
        let body: NewAppointment = serde_json::from_value(json!({
            "patientName": "Kara Thrace",
            "date": "2023-10-31",
            "time": "12:30"
        }))
        .unwrap();
        let appointment = body.into_appointment();

        assert!(Uuid::parse_str(&appointment.id).is_ok());
        assert_eq!(appointment.duration, DEFAULT_DURATION);
        assert_eq!(appointment.doctor_name, DEFAULT_DOCTOR);
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.mode, AppointmentMode::InPerson);
    }

    #[test]
    fn new_appointment_keeps_caller_id() {
        let body: NewAppointment = serde_json::from_value(json!({
            "id": "1698400000000",
            "patientName": "Kara Thrace",
            "date": "2023-10-31",
            "time": "12:30",
            "mode": "Virtual"
        }))
        .unwrap();
        let appointment = body.into_appointment();
        assert_eq!(appointment.id, "1698400000000");
        assert_eq!(appointment.mode, AppointmentMode::Virtual);
    }
}
