//! Caller-side optimistic updates.
//!
//! A client keeps its own copy of the listing and applies a change to it
//! before the authoritative store has answered. `OptimisticView::attempt`
//! snapshots the local list, applies the change and hands back a `Pending`
//! handle; the handle is then resolved with `commit` or `rollback` (or
//! `settle` with the store's outcome). A handle dropped unresolved rolls back.

use tracing::debug;

use crate::error::StoreResult;
use crate::models::{Appointment, AppointmentStatus, AppointmentUpdate};
use crate::store::AppointmentStore;

/// A single mutation, applicable both locally and to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Create(Appointment),
    SetStatus {
        id: String,
        status: AppointmentStatus,
    },
    UpdateDetails {
        id: String,
        update: AppointmentUpdate,
    },
    Delete {
        id: String,
    },
}

/// What the authoritative store did with a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The target id was not in the store.
    NoOp,
}

impl Change {
    pub fn set_status(id: impl Into<String>, status: AppointmentStatus) -> Self {
        Self::SetStatus {
            id: id.into(),
            status,
        }
    }

    pub fn update_details(id: impl Into<String>, update: AppointmentUpdate) -> Self {
        Self::UpdateDetails {
            id: id.into(),
            update,
        }
    }

    pub fn delete(id: impl Into<String>) -> Self {
        Self::Delete { id: id.into() }
    }

    pub fn target_id(&self) -> &str {
        match self {
            Self::Create(appointment) => &appointment.id,
            Self::SetStatus { id, .. } | Self::UpdateDetails { id, .. } | Self::Delete { id } => id,
        }
    }

    /// Run the change against the authoritative store.
    pub fn apply(&self, store: &mut AppointmentStore) -> StoreResult<Outcome> {
        let applied = match self {
            Self::Create(appointment) => {
                store.create(appointment.clone())?;
                true
            }
            Self::SetStatus { id, status } => store.update_status(id, *status)?.is_some(),
            Self::UpdateDetails { id, update } => store.update_details(id, update)?.is_some(),
            Self::Delete { id } => store.delete(id),
        };
        Ok(if applied { Outcome::Applied } else { Outcome::NoOp })
    }

    fn apply_local(&self, appointments: &mut Vec<Appointment>) {
        match self {
            Self::Create(appointment) => appointments.push(appointment.clone()),
            Self::SetStatus { id, status } => {
                for appointment in appointments.iter_mut().filter(|a| &a.id == id) {
                    appointment.status = *status;
                }
            }
            Self::UpdateDetails { id, update } => {
                for appointment in appointments.iter_mut().filter(|a| &a.id == id) {
                    update.apply_to(appointment);
                }
            }
            Self::Delete { id } => appointments.retain(|a| &a.id != id),
        }
    }
}

/// A caller's local copy of the appointment listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimisticView {
    appointments: Vec<Appointment>,
}

impl OptimisticView {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        Self { appointments }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Replace the local copy after a fresh fetch.
    pub fn replace(&mut self, appointments: Vec<Appointment>) {
        self.appointments = appointments;
    }

    /// Apply `change` locally and return the handle that decides its fate.
    pub fn attempt(&mut self, change: Change) -> Pending<'_> {
        let snapshot = self.appointments.clone();
        change.apply_local(&mut self.appointments);
        Pending {
            view: self,
            snapshot: Some(snapshot),
            change,
        }
    }
}

/// An optimistically applied change awaiting the store's answer.
#[must_use = "an unresolved pending change is rolled back when dropped"]
#[derive(Debug)]
pub struct Pending<'v> {
    view: &'v mut OptimisticView,
    snapshot: Option<Vec<Appointment>>,
    change: Change,
}

impl Pending<'_> {
    pub fn change(&self) -> &Change {
        &self.change
    }

    /// The local listing with the change applied.
    pub fn appointments(&self) -> &[Appointment] {
        self.view.appointments()
    }

    /// The listing as it was before the change.
    pub fn snapshot(&self) -> &[Appointment] {
        self.snapshot.as_deref().unwrap_or_default()
    }

    /// Keep the local change.
    pub fn commit(mut self) {
        self.snapshot = None;
    }

    /// Restore the pre-change listing.
    pub fn rollback(mut self) {
        self.restore();
    }

    /// Commit or roll back from the store's answer. Returns whether the
    /// change was kept.
    ///
    /// A delete the store reports as `NoOp` is kept: the record is absent
    /// either way. Any other `NoOp` means the local view was stale.
    pub fn settle(self, outcome: &StoreResult<Outcome>) -> bool {
        let keep = match outcome {
            Ok(Outcome::Applied) => true,
            Ok(Outcome::NoOp) => matches!(self.change, Change::Delete { .. }),
            Err(_) => false,
        };
        debug!(target_id = self.change.target_id(), keep, "optimistic change settled");
        if keep {
            self.commit();
        } else {
            self.rollback();
        }
        keep
    }

    fn restore(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.view.appointments = snapshot;
        }
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.restore();
    }
}
