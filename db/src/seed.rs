//! Reference clinic data used to bootstrap a store.

use chrono::{NaiveDate, NaiveTime};

use crate::models::{Appointment, AppointmentMode, DEFAULT_DOCTOR};

/// "Today" for the reference data set.
pub const REFERENCE_DATE: NaiveDate = date(2023, 10, 27);

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid seed date"),
    }
}

const fn time(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => panic!("invalid seed time"),
    }
}

struct SeedRow {
    id: &'static str,
    patient_name: &'static str,
    date: NaiveDate,
    time: NaiveTime,
    duration: &'static str,
    mode: AppointmentMode,
}

const SEED: [SeedRow; 10] = [
    SeedRow {
        id: "1",
        patient_name: "Alice Johnson",
        date: date(2023, 10, 27),
        time: time(9, 0),
        duration: "30 min",
        mode: AppointmentMode::InPerson,
    },
    SeedRow {
        id: "2",
        patient_name: "Bob Williams",
        date: date(2023, 10, 27),
        time: time(10, 30),
        duration: "45 min",
        mode: AppointmentMode::Virtual,
    },
    SeedRow {
        id: "3",
        patient_name: "Charlie Brown",
        date: date(2023, 10, 28),
        time: time(14, 0),
        duration: "30 min",
        mode: AppointmentMode::InPerson,
    },
    SeedRow {
        id: "4",
        patient_name: "Diana Prince",
        date: date(2023, 10, 26),
        time: time(11, 0),
        duration: "60 min",
        mode: AppointmentMode::InPerson,
    },
    SeedRow {
        id: "5",
        patient_name: "Evan Wright",
        date: date(2023, 10, 29),
        time: time(9, 30),
        duration: "30 min",
        mode: AppointmentMode::Virtual,
    },
    SeedRow {
        id: "6",
        patient_name: "Fiona Gallagher",
        date: date(2023, 10, 27),
        time: time(16, 0),
        duration: "30 min",
        mode: AppointmentMode::Virtual,
    },
    SeedRow {
        id: "7",
        patient_name: "George Martin",
        date: date(2023, 10, 30),
        time: time(13, 0),
        duration: "45 min",
        mode: AppointmentMode::InPerson,
    },
    SeedRow {
        id: "8",
        patient_name: "Hannah Abbott",
        date: date(2023, 10, 27),
        time: time(8, 0),
        duration: "15 min",
        mode: AppointmentMode::InPerson,
    },
    SeedRow {
        id: "9",
        patient_name: "Ian Somerhalder",
        date: date(2023, 11, 1),
        time: time(10, 0),
        duration: "60 min",
        mode: AppointmentMode::Virtual,
    },
    SeedRow {
        id: "10",
        patient_name: "Jane Doe",
        date: date(2023, 10, 25),
        time: time(15, 0),
        duration: "30 min",
        mode: AppointmentMode::InPerson,
    },
];

/// The ten reference appointments, all `Scheduled` with the clinic's doctor.
pub fn reference_appointments() -> Vec<Appointment> {
    SEED.iter()
        .map(|row| {
            Appointment::new(row.id, row.patient_name, row.date, row.time)
                .with_duration(row.duration)
                .with_doctor(DEFAULT_DOCTOR)
                .with_mode(row.mode)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_ids_are_unique_and_valid() {
        let seed = reference_appointments();
        assert_eq!(seed.len(), 10);

        let ids: HashSet<_> = seed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), seed.len());
        assert!(seed.iter().all(|a| a.validate().is_ok()));
    }

    #[test]
    fn seed_spans_reference_window() {
        let seed = reference_appointments();
        let min = seed.iter().map(|a| a.date).min().unwrap();
        let max = seed.iter().map(|a| a.date).max().unwrap();
        assert_eq!(min, NaiveDate::from_ymd_opt(2023, 10, 25).unwrap());
        assert_eq!(max, NaiveDate::from_ymd_opt(2023, 11, 1).unwrap());
    }
}
