//! Appointment lifecycle commands

use agenda_domain::{
    Appointment, AppointmentChanges, AppointmentId, AppointmentListEntry, AppointmentRequest,
    Result,
};
use tracing::info;

use crate::utils::command_helpers::execute_logged;
use crate::AppContext;

/// Schedule a new appointment.
pub async fn create_appointment(
    ctx: &AppContext,
    request: AppointmentRequest,
) -> Result<Appointment> {
    execute_logged("appointments::create_appointment", move || async move {
        ctx.appointments.create(request).await
    })
    .await
}

/// Apply a field patch to an existing appointment.
pub async fn update_appointment(
    ctx: &AppContext,
    id: String,
    changes: AppointmentChanges,
) -> Result<Appointment> {
    let id = AppointmentId::from(id);
    execute_logged("appointments::update_appointment", move || async move {
        if changes.is_empty() {
            info!(appointment_id = %id, "empty patch, revalidating stored values");
        }
        ctx.appointments.update(&id, changes).await
    })
    .await
}

pub async fn cancel_appointment(ctx: &AppContext, id: String) -> Result<Appointment> {
    let id = AppointmentId::from(id);
    execute_logged("appointments::cancel_appointment", move || async move {
        ctx.appointments.cancel(&id).await
    })
    .await
}

pub async fn get_appointment(ctx: &AppContext, id: String) -> Result<Appointment> {
    let id = AppointmentId::from(id);
    execute_logged("appointments::get_appointment", move || async move {
        ctx.appointments.get(&id).await
    })
    .await
}

/// Every appointment, ordered by start date.
pub async fn list_appointments(ctx: &AppContext) -> Result<Vec<AppointmentListEntry>> {
    execute_logged("appointments::list_appointments", move || async move {
        ctx.appointments.list().await
    })
    .await
}
