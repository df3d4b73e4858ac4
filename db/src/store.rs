//! In-memory appointment store.
//!
//! # Invariants
//! - `id` is unique across the collection.
//! - Records keep insertion order; nothing here sorts them.
//! - A missing target id is a normal outcome (`Ok(None)` / `false`), never an
//!   error, and leaves the collection untouched.
//! - Validation runs before any mutation, so a rejected call changes nothing.
//! - `create` and `update_status` never produce `Upcoming`; only seed or
//!   imported data passed to `with_appointments` / `reset` can carry it.

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::{self, DateCounts};
use crate::error::{StoreError, StoreResult};
use crate::models::{Appointment, AppointmentStatus, AppointmentUpdate};
use crate::query::AppointmentQuery;
use crate::seed;

/// Ordered appointment collection owned by a single writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentStore {
    appointments: Vec<Appointment>,
}

impl AppointmentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from seed or imported records.
    ///
    /// Applies the same validation and id uniqueness as `create`, but keeps
    /// whatever status the records already carry.
    pub fn with_appointments(seed: impl IntoIterator<Item = Appointment>) -> StoreResult<Self> {
        let mut store = Self::new();
        for appointment in seed {
            store.insert(appointment)?;
        }
        Ok(store)
    }

    /// Create a store holding the reference clinic data
    pub fn seeded() -> Self {
        Self {
            appointments: seed::reference_appointments(),
        }
    }

    /// Replace the whole collection. On error the current contents are kept.
    pub fn reset(&mut self, seed: impl IntoIterator<Item = Appointment>) -> StoreResult<()> {
        let fresh = Self::with_appointments(seed)?;
        debug!(count = fresh.len(), "appointment store reset");
        *self = fresh;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.appointments.clear();
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Borrowing iterator over the records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.iter()
    }

    /// Snapshot of every record in insertion order
    pub fn list(&self) -> Vec<Appointment> {
        self.appointments.clone()
    }

    pub fn get(&self, id: &str) -> Option<Appointment> {
        self.position(id).map(|index| self.appointments[index].clone())
    }

    /// Records selected by `query`, with tabs evaluated against `reference_date`
    pub fn query(&self, query: &AppointmentQuery, reference_date: NaiveDate) -> Vec<Appointment> {
        crate::query::resolve(&self.appointments, query, reference_date)
    }

    /// Per-date counts over the full, unfiltered collection
    pub fn counts_by_date(&self) -> DateCounts {
        calendar::counts_by_date(&self.appointments)
    }

    /// Append a new record.
    ///
    /// # Errors
    /// - `Validation` when a required text field is blank.
    /// - `Validation` on `status` when the record is `Upcoming`.
    /// - `DuplicateId` when a record with the same id already exists.
    pub fn create(&mut self, appointment: Appointment) -> StoreResult<Appointment> {
        if appointment.status == AppointmentStatus::Upcoming {
            return Err(upcoming_rejected());
        }
        let created = self.insert(appointment)?;
        debug!(id = %created.id, date = %created.date, "appointment created");
        Ok(created)
    }

    /// Replace the status of the record with `id`.
    ///
    /// Returns `Ok(None)` when no record matches. `Upcoming` is rejected since
    /// it is only ever read by the tab filter.
    pub fn update_status(
        &mut self,
        id: &str,
        status: AppointmentStatus,
    ) -> StoreResult<Option<Appointment>> {
        if status == AppointmentStatus::Upcoming {
            return Err(upcoming_rejected());
        }

        let Some(appointment) = self.find_mut(id) else {
            debug!(id, "status update target not found");
            return Ok(None);
        };
        let previous = appointment.status;
        appointment.status = status;
        debug!(id, from = %previous, to = %status, "appointment status updated");
        Ok(Some(appointment.clone()))
    }

    /// Merge `update` into the record with `id`.
    ///
    /// Returns `Ok(None)` when no record matches.
    pub fn update_details(
        &mut self,
        id: &str,
        update: &AppointmentUpdate,
    ) -> StoreResult<Option<Appointment>> {
        update.validate()?;

        let Some(appointment) = self.find_mut(id) else {
            debug!(id, "details update target not found");
            return Ok(None);
        };
        update.apply_to(appointment);
        debug!(id, "appointment details updated");
        Ok(Some(appointment.clone()))
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.appointments.remove(index);
                debug!(id, "appointment deleted");
                true
            }
            None => false,
        }
    }

    fn insert(&mut self, appointment: Appointment) -> StoreResult<Appointment> {
        appointment.validate()?;
        if self.contains(&appointment.id) {
            return Err(StoreError::DuplicateId(appointment.id));
        }
        self.appointments.push(appointment.clone());
        Ok(appointment)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.appointments.iter().position(|a| a.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Appointment> {
        self.appointments.iter_mut().find(|a| a.id == id)
    }
}

fn upcoming_rejected() -> StoreError {
    StoreError::validation("status", "Upcoming cannot be assigned to an appointment")
}
