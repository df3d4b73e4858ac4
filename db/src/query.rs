//! Filter resolution over an appointment listing.
//!
//! Every filter is an independent predicate and a record is kept only when
//! all of them hold. An explicit `date` takes over date narrowing entirely;
//! otherwise the tab is evaluated against a caller-supplied reference date.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{Appointment, AppointmentStatus};

/// Coarse time window relative to the reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    Today,
    Upcoming,
    Past,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Upcoming => "Upcoming",
            Self::Past => "Past",
        }
    }

    fn admits(self, appointment: &Appointment, reference_date: NaiveDate) -> bool {
        match self {
            Self::Today => appointment.date == reference_date,
            Self::Past => appointment.date < reference_date,
            // The same-day disjunct only fires for `Upcoming` status, which no
            // mutation produces.
            Self::Upcoming => {
                appointment.date > reference_date
                    || (appointment.date == reference_date
                        && appointment.status == AppointmentStatus::Upcoming)
            }
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Today, Self::Upcoming, Self::Past]
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StoreError::validation("tab", format!("unknown tab '{s}'")))
    }
}

/// Filter options for listing appointments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentQuery {
    pub search: Option<String>,
    pub date: Option<NaiveDate>,
    pub tab: Option<Tab>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add case-insensitive patient name search
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Add exact date filter
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Add tab filter
    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.tab = Some(tab);
        self
    }

    /// Add exact status filter
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether a single record passes every filter.
    pub fn matches(&self, appointment: &Appointment, reference_date: NaiveDate) -> bool {
        Filter::compile(self, reference_date).admits(appointment)
    }
}

/// Query with the search needle lowercased once.
struct Filter<'q> {
    needle: Option<String>,
    query: &'q AppointmentQuery,
    reference_date: NaiveDate,
}

impl<'q> Filter<'q> {
    fn compile(query: &'q AppointmentQuery, reference_date: NaiveDate) -> Self {
        let needle = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self {
            needle,
            query,
            reference_date,
        }
    }

    fn admits(&self, appointment: &Appointment) -> bool {
        if let Some(needle) = &self.needle {
            if !appointment.patient_name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        let in_window = match (self.query.date, self.query.tab) {
            (Some(date), _) => appointment.date == date,
            (None, Some(tab)) => tab.admits(appointment, self.reference_date),
            (None, None) => true,
        };
        if !in_window {
            return false;
        }

        self.query
            .status
            .map_or(true, |status| appointment.status == status)
    }
}

/// Narrow `appointments` to the records selected by `query`, in input order.
pub fn resolve(
    appointments: &[Appointment],
    query: &AppointmentQuery,
    reference_date: NaiveDate,
) -> Vec<Appointment> {
    let filter = Filter::compile(query, reference_date);
    appointments
        .iter()
        .filter(|appointment| filter.admits(appointment))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{reference_appointments, REFERENCE_DATE};

    fn ids(appointments: &[Appointment]) -> Vec<&str> {
        appointments.iter().map(|a| a.id.as_str()).collect()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, d).unwrap()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let seed = reference_appointments();
        let result = resolve(&seed, &AppointmentQuery::new(), REFERENCE_DATE);
        assert_eq!(result, seed);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let seed = reference_appointments();
        let query = AppointmentQuery::new().with_search("JANE");
        assert_eq!(ids(&resolve(&seed, &query, REFERENCE_DATE)), ["10"]);

        let query = AppointmentQuery::new().with_search("an");
        assert_eq!(
            ids(&resolve(&seed, &query, REFERENCE_DATE)),
            ["4", "5", "8", "9", "10"]
        );
    }

    #[test]
    fn empty_search_does_not_filter() {
        let seed = reference_appointments();
        let query = AppointmentQuery::new().with_search("");
        assert_eq!(resolve(&seed, &query, REFERENCE_DATE).len(), seed.len());
    }

    #[test]
    fn explicit_date_dominates_every_tab() {
        let seed = reference_appointments();
        for tab in [None, Some(Tab::Today), Some(Tab::Upcoming), Some(Tab::Past)] {
            let query = AppointmentQuery {
                date: Some(day(26)),
                tab,
                ..AppointmentQuery::default()
            };
            assert_eq!(ids(&resolve(&seed, &query, REFERENCE_DATE)), ["4"], "tab {tab:?}");
        }
    }

    #[test]
    fn tabs_partition_by_reference_date() {
        let seed = reference_appointments();
        let run = |tab| ids(&resolve(&seed, &AppointmentQuery::new().with_tab(tab), REFERENCE_DATE))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        assert_eq!(run(Tab::Today), ["1", "2", "6", "8"]);
        assert_eq!(run(Tab::Past), ["4", "10"]);
        assert_eq!(run(Tab::Upcoming), ["3", "5", "7", "9"]);
    }

    #[test]
    fn upcoming_includes_same_day_upcoming_status() {
        let mut seed = reference_appointments();
        seed[0].status = AppointmentStatus::Upcoming;
        let query = AppointmentQuery::new().with_tab(Tab::Upcoming);
        assert_eq!(
            ids(&resolve(&seed, &query, REFERENCE_DATE)),
            ["1", "3", "5", "7", "9"]
        );
    }

    #[test]
    fn reference_date_is_injected() {
        let seed = reference_appointments();
        let query = AppointmentQuery::new().with_tab(Tab::Today);
        assert_eq!(ids(&resolve(&seed, &query, day(30))), ["7"]);
        assert_eq!(ids(&resolve(&seed, &query.clone().with_tab(Tab::Past), day(26))), ["10"]);
    }

    #[test]
    fn filters_combine_as_conjunction() {
        let mut seed = reference_appointments();
        seed[1].status = AppointmentStatus::Confirmed;
        let query = AppointmentQuery::new()
            .with_tab(Tab::Today)
            .with_status(AppointmentStatus::Confirmed)
            .with_search("bob");
        assert_eq!(ids(&resolve(&seed, &query, REFERENCE_DATE)), ["2"]);

        let query = query.with_search("alice");
        assert!(resolve(&seed, &query, REFERENCE_DATE).is_empty());
    }

    #[test]
    fn matches_agrees_with_resolve() {
        let seed = reference_appointments();
        let query = AppointmentQuery::new().with_tab(Tab::Past);
        let matched: Vec<_> = seed
            .iter()
            .filter(|a| query.matches(a, REFERENCE_DATE))
            .cloned()
            .collect();
        assert_eq!(matched, resolve(&seed, &query, REFERENCE_DATE));
    }

    #[test]
    fn tab_parses_from_query_text() {
        assert_eq!("today".parse::<Tab>().unwrap(), Tab::Today);
        assert_eq!("Past".parse::<Tab>().unwrap(), Tab::Past);
        assert!("Tomorrow".parse::<Tab>().is_err());
    }
}
