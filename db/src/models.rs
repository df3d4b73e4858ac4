use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{require_path_segment, require_text, StoreError, StoreResult};

pub const DEFAULT_DURATION: &str = "30 min";
pub const DEFAULT_DOCTOR: &str = "Dr. Rath";

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Cancelled,
    Completed,
    /// Read by the `Upcoming` tab predicate. No mutation ever assigns it.
    Upcoming,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
            Self::Upcoming => "Upcoming",
        }
    }

    /// Whether a status update from `self` to `next` is a valid clinic action.
    ///
    /// Confirming and cancelling are allowed while the visit is open, a
    /// cancellation can be undone back to `Scheduled`, and a completed visit is
    /// final. Setting the current status again is always allowed so retries
    /// stay idempotent.
    pub fn can_transition_to(self, next: Self) -> bool {
        use AppointmentStatus::*;

        if next == Upcoming {
            return false;
        }
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Scheduled, Confirmed | Cancelled | Completed)
                | (Confirmed, Cancelled | Completed)
                | (Cancelled, Scheduled)
                | (Upcoming, _)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Scheduled,
            Self::Confirmed,
            Self::Cancelled,
            Self::Completed,
            Self::Upcoming,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| StoreError::validation("status", format!("unknown status '{s}'")))
    }
}

/// How the visit takes place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentMode {
    #[serde(rename = "In-Person")]
    InPerson,
    Virtual,
}

/// A single booked visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration: String,
    pub doctor_name: String,
    pub status: AppointmentStatus,
    pub mode: AppointmentMode,
}

impl Appointment {
    /// Create a scheduled in-person appointment with the clinic defaults
    pub fn new(
        id: impl Into<String>,
        patient_name: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            id: id.into(),
            patient_name: patient_name.into(),
            date,
            time,
            duration: DEFAULT_DURATION.to_string(),
            doctor_name: DEFAULT_DOCTOR.to_string(),
            status: AppointmentStatus::Scheduled,
            mode: AppointmentMode::InPerson,
        }
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_mode(mut self, mode: AppointmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_doctor(mut self, doctor_name: impl Into<String>) -> Self {
        self.doctor_name = doctor_name.into();
        self
    }

    /// Check the text fields a record must carry before it enters a store.
    pub fn validate(&self) -> StoreResult<()> {
        require_text("id", &self.id)?;
        require_path_segment("id", &self.id)?;
        require_text("patientName", &self.patient_name)?;
        require_text("duration", &self.duration)?;
        require_text("doctorName", &self.doctor_name)?;
        Ok(())
    }
}

/// Partial update of an appointment's details.
///
/// Only the named fields can be changed; `id` and `status` are not part of
/// this shape, and unknown JSON keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppointmentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AppointmentMode>,
}

impl AppointmentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patient_name(mut self, patient_name: impl Into<String>) -> Self {
        self.patient_name = Some(patient_name.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_doctor(mut self, doctor_name: impl Into<String>) -> Self {
        self.doctor_name = Some(doctor_name.into());
        self
    }

    pub fn with_mode(mut self, mode: AppointmentMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> StoreResult<()> {
        if let Some(name) = &self.patient_name {
            require_text("patientName", name)?;
        }
        if let Some(duration) = &self.duration {
            require_text("duration", duration)?;
        }
        if let Some(doctor) = &self.doctor_name {
            require_text("doctorName", doctor)?;
        }
        Ok(())
    }

    /// Shallow-merge the present fields into `appointment`.
    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(name) = &self.patient_name {
            appointment.patient_name = name.clone();
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(time) = self.time {
            appointment.time = time;
        }
        if let Some(duration) = &self.duration {
            appointment.duration = duration.clone();
        }
        if let Some(doctor) = &self.doctor_name {
            appointment.doctor_name = doctor.clone();
        }
        if let Some(mode) = self.mode {
            appointment.mode = mode;
        }
    }
}

/// `HH:MM` wire format for times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }

    pub mod option {
        use super::FORMAT;
        use chrono::NaiveTime;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.collect_str(&time.format(FORMAT)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| NaiveTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Appointment {
        Appointment::new(
            "1",
            "Alice Johnson",
            NaiveDate::from_ymd_opt(2023, 10, 27).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn serializes_with_reference_field_names() {
        let value = serde_json::to_value(sample().with_mode(AppointmentMode::Virtual)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "1",
                "patientName": "Alice Johnson",
                "date": "2023-10-27",
                "time": "09:00",
                "duration": "30 min",
                "doctorName": "Dr. Rath",
                "status": "Scheduled",
                "mode": "Virtual"
            })
        );
    }

    #[test]
    fn deserializes_in_person_mode() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": "7",
            "patientName": "George Martin",
            "date": "2023-10-30",
            "time": "13:00",
            "duration": "45 min",
            "doctorName": "Dr. Rath",
            "status": "Confirmed",
            "mode": "In-Person"
        }))
        .unwrap();
        assert_eq!(appt.mode, AppointmentMode::InPerson);
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
        assert_eq!(appt.time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    }

    #[test]
    fn rejects_malformed_date_and_time() {
        let bad_date = json!({
            "id": "x", "patientName": "A", "date": "27/10/2023", "time": "09:00",
            "duration": "30 min", "doctorName": "Dr. Rath", "status": "Scheduled", "mode": "Virtual"
        });
        assert!(serde_json::from_value::<Appointment>(bad_date).is_err());

        let bad_time = json!({
            "id": "x", "patientName": "A", "date": "2023-10-27", "time": "9am",
            "duration": "30 min", "doctorName": "Dr. Rath", "status": "Scheduled", "mode": "Virtual"
        });
        assert!(serde_json::from_value::<Appointment>(bad_time).is_err());
    }

    #[test]
    fn validate_rejects_blank_patient_name() {
        let mut appt = sample();
        appt.patient_name = "  ".to_string();
        let err = appt.validate().unwrap_err();
        assert_eq!(err.field(), Some("patientName"));
    }

    #[test]
    fn validate_rejects_ids_that_break_the_resource_path() {
        for id in ["a/b", "11?x=1"] {
            let mut appt = sample();
            appt.id = id.to_string();
            assert_eq!(appt.validate().unwrap_err().field(), Some("id"));
        }
    }

    #[test]
    fn update_rejects_unknown_and_identity_fields() {
        assert!(serde_json::from_value::<AppointmentUpdate>(json!({ "patientName": "X" })).is_ok());
        assert!(serde_json::from_value::<AppointmentUpdate>(json!({ "id": "2" })).is_err());
        assert!(serde_json::from_value::<AppointmentUpdate>(json!({ "status": "Cancelled" })).is_err());
        assert!(serde_json::from_value::<AppointmentUpdate>(json!({ "room": "4B" })).is_err());
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut appt = sample();
        let update = AppointmentUpdate::new()
            .with_patient_name("X")
            .with_time(NaiveTime::from_hms_opt(11, 15, 0).unwrap());
        update.apply_to(&mut appt);

        assert_eq!(appt.patient_name, "X");
        assert_eq!(appt.time, NaiveTime::from_hms_opt(11, 15, 0).unwrap());
        assert_eq!(appt.date, sample().date);
        assert_eq!(appt.duration, "30 min");
        assert_eq!(appt.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn status_transitions_follow_clinic_actions() {
        use AppointmentStatus::*;

        assert!(Scheduled.can_transition_to(Confirmed));
        assert!(Scheduled.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Cancelled.can_transition_to(Scheduled));
        assert!(Confirmed.can_transition_to(Confirmed));
        assert!(Upcoming.can_transition_to(Confirmed));
        assert!(Upcoming.can_transition_to(Cancelled));

        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Scheduled));
        assert!(!Scheduled.can_transition_to(Upcoming));
        assert!(!Upcoming.can_transition_to(Upcoming));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("confirmed".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Confirmed);
        assert!("Rescheduled".parse::<AppointmentStatus>().is_err());
    }
}
