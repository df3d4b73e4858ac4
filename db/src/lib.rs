//! In-memory appointment store and query resolution for a single clinic.
//!
//! The store is an explicitly constructed value: build it empty, from seed
//! data or from the reference set, and pass it to whoever needs it. Filtering
//! by tab is always evaluated against a reference date supplied by the caller.

pub mod calendar;
pub mod error;
pub mod models;
pub mod optimistic;
pub mod query;
pub mod seed;
pub mod store;

pub use calendar::{counts_by_date, DateCounts};
pub use error::{StoreError, StoreResult};
pub use models::{
    Appointment, AppointmentMode, AppointmentStatus, AppointmentUpdate, DEFAULT_DOCTOR,
    DEFAULT_DURATION,
};
pub use optimistic::{Change, OptimisticView, Outcome, Pending};
pub use query::{resolve, AppointmentQuery, Tab};
pub use seed::{reference_appointments, REFERENCE_DATE};
pub use store::AppointmentStore;
