//! Port interfaces for appointment scheduling
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use agenda_domain::{
    Appointment, AppointmentFilter, AppointmentId, NewAppointment, Notification, Result,
};
use async_trait::async_trait;

/// Trait for persisting appointments
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Store a validated appointment and return the id assigned to it
    async fn insert_appointment(&self, appointment: &NewAppointment) -> Result<AppointmentId>;

    /// Overwrite every mutable field of an existing appointment
    async fn update_appointment(&self, appointment: &Appointment) -> Result<()>;

    /// Fetch a single appointment by id
    async fn get_appointment(&self, id: &AppointmentId) -> Result<Option<Appointment>>;

    /// Fetch appointments matching `filter`
    ///
    /// Implementations may return a superset of the matching rows (callers
    /// that need exact semantics re-check with [`AppointmentFilter::matches`]),
    /// but must never drop a matching row.
    async fn query_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>>;
}

/// Trait for telling a seller about changes to their appointments
///
/// Delivery is best-effort. Errors are reported to the caller, which logs
/// them and carries on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<()>;
}
