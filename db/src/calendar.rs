use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::Appointment;

/// Number of appointments per calendar day, ordered by date.
pub type DateCounts = BTreeMap<NaiveDate, usize>;

/// Count appointments per date. Always pass the full listing; the map is
/// rebuilt from scratch rather than patched after each mutation.
pub fn counts_by_date<'a>(appointments: impl IntoIterator<Item = &'a Appointment>) -> DateCounts {
    let mut counts = DateCounts::new();
    for appointment in appointments {
        *counts.entry(appointment.date).or_insert(0) += 1;
    }
    counts
}
