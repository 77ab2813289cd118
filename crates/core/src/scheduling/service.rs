//! Appointment lifecycle service - core business logic
//!
//! Every write runs the same sequence under the seller's lock: derive the end
//! date, check for conflicts, write. Notifications go out after the lock is
//! released and can never fail the write.

use std::sync::Arc;

use agenda_domain::{
    AgendaError, Appointment, AppointmentChanges, AppointmentFilter, AppointmentId,
    AppointmentListEntry, AppointmentRequest, AppointmentStatus, NewAppointment, Notification,
    NotificationKind, Result, SchedulingError,
};
use tracing::{debug, info, instrument, warn};

use super::conflicts::ConflictDetector;
use super::end_date::{compute_end_date, end_after};
use super::lifecycle::{Lifecycle, LifecyclePhase};
use super::locks::{SellerGuard, SellerLocks};
use super::ports::{AppointmentRepository, Notifier};

/// Appointment lifecycle service
pub struct AppointmentService {
    repository: Arc<dyn AppointmentRepository>,
    notifier: Arc<dyn Notifier>,
    conflicts: ConflictDetector,
    locks: SellerLocks,
}

impl AppointmentService {
    /// Create a new appointment service
    pub fn new(repository: Arc<dyn AppointmentRepository>, notifier: Arc<dyn Notifier>) -> Self {
        let conflicts = ConflictDetector::new(Arc::clone(&repository));
        Self { repository, notifier, conflicts, locks: SellerLocks::new() }
    }

    /// Validate and store a new appointment, then notify its seller.
    ///
    /// # Errors
    /// - `MissingRequiredField` for a blank client name, seller, start date or
    ///   duration
    /// - `InvalidDurationFormat` for a malformed duration
    /// - `SchedulingConflict` when a `Scheduled` appointment would overlap
    ///   another of the same seller
    ///
    /// Nothing is written when any of these is returned.
    #[instrument(skip(self, request), fields(seller = request.seller.as_deref().unwrap_or_default()))]
    pub async fn create(&self, request: AppointmentRequest) -> Result<Appointment> {
        let mut lifecycle = Lifecycle::draft();

        let client_name = required_text(request.client_name.as_deref(), "client_name")
            .map_err(|err| lifecycle.reject(err))?;
        let seller =
            required_text(request.seller.as_deref(), "seller").map_err(|err| lifecycle.reject(err))?;

        let guard = self.locks.acquire(&[seller.as_str()]).await;

        let derived = compute_end_date(request.start_date, request.duration.as_deref())
            .map_err(|err| lifecycle.reject(err))?;
        lifecycle.advance(LifecyclePhase::EndDateComputed)?;

        let candidate = NewAppointment {
            client_name,
            seller,
            start_date: derived.start_date,
            duration: derived.duration,
            end_date: derived.end_date,
            status: request.status.unwrap_or_default(),
        };

        if candidate.status == AppointmentStatus::Scheduled {
            self.conflicts
                .ensure_available(&candidate.seller, candidate.start_date, candidate.end_date, None)
                .await
                .map_err(|err| lifecycle.reject(err))?;
        }
        lifecycle.advance(LifecyclePhase::Validated)?;

        let id = self.repository.insert_appointment(&candidate).await?;
        lifecycle.advance(LifecyclePhase::Persisted)?;
        drop(guard);

        let appointment = candidate.into_appointment(id);
        info!(
            appointment_id = %appointment.id,
            start = %appointment.start_date,
            duration = %appointment.duration,
            status = %appointment.status,
            "appointment created"
        );

        self.dispatch(NotificationKind::Created, &appointment).await;
        Ok(appointment)
    }

    /// Apply `changes` to a stored appointment and revalidate it.
    ///
    /// The end date is always recomputed, and the appointment is excluded from
    /// its own conflict check. Moving the status to `Canceled` sends the
    /// cancellation notice instead of the update notice.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `InvalidInput` for a canceled
    /// appointment, and the same validation errors as [`Self::create`].
    #[instrument(skip(self, changes), fields(appointment_id = %id))]
    pub async fn update(
        &self,
        id: &AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<Appointment> {
        let (guard, current) = self.lock_existing(id, changes.seller.as_deref()).await?;
        ensure_not_canceled(&current)?;

        let mut lifecycle = Lifecycle::persisted();

        let client_name = changes.client_name.as_deref().unwrap_or(&current.client_name);
        let client_name =
            required_text(Some(client_name), "client_name").map_err(|err| lifecycle.reject(err))?;
        let seller = changes.seller.as_deref().unwrap_or(&current.seller);
        let seller = required_text(Some(seller), "seller").map_err(|err| lifecycle.reject(err))?;
        let duration = changes.duration.clone().unwrap_or_else(|| current.duration.to_string());
        let start_date = changes.start_date.unwrap_or(current.start_date);

        let derived = compute_end_date(Some(start_date), Some(&duration))
            .map_err(|err| lifecycle.reject(err))?;
        lifecycle.advance(LifecyclePhase::EndDateComputed)?;

        let candidate = Appointment {
            id: current.id.clone(),
            client_name,
            seller,
            start_date: derived.start_date,
            duration: derived.duration,
            end_date: Some(derived.end_date),
            status: changes.status.unwrap_or(current.status),
        };

        if candidate.is_scheduled() {
            self.conflicts
                .ensure_available(
                    &candidate.seller,
                    derived.start_date,
                    derived.end_date,
                    Some(&candidate.id),
                )
                .await
                .map_err(|err| lifecycle.reject(err))?;
        }
        lifecycle.advance(LifecyclePhase::Validated)?;

        self.repository.update_appointment(&candidate).await?;
        lifecycle.advance(LifecyclePhase::Persisted)?;

        let kind = if candidate.status == AppointmentStatus::Canceled {
            lifecycle.advance(LifecyclePhase::Canceled)?;
            NotificationKind::Canceled
        } else {
            NotificationKind::Updated
        };
        drop(guard);

        info!(
            appointment_id = %candidate.id,
            start = %candidate.start_date,
            status = %candidate.status,
            "appointment updated"
        );

        self.dispatch(kind, &candidate).await;
        Ok(candidate)
    }

    /// Cancel a stored appointment, releasing its slot.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `InvalidInput` if it is already canceled.
    #[instrument(skip(self), fields(appointment_id = %id))]
    pub async fn cancel(&self, id: &AppointmentId) -> Result<Appointment> {
        let (guard, current) = self.lock_existing(id, None).await?;
        ensure_not_canceled(&current)?;

        let mut lifecycle = Lifecycle::persisted();
        let mut canceled = current;
        canceled.end_date = Some(end_after(canceled.start_date, &canceled.duration)?);
        canceled.status = AppointmentStatus::Canceled;

        self.repository.update_appointment(&canceled).await?;
        lifecycle.advance(LifecyclePhase::Canceled)?;
        drop(guard);

        info!(appointment_id = %canceled.id, seller = %canceled.seller, "appointment canceled");

        self.dispatch(NotificationKind::Canceled, &canceled).await;
        Ok(canceled)
    }

    /// Fetch one appointment.
    ///
    /// # Errors
    /// `NotFound` for an unknown id.
    pub async fn get(&self, id: &AppointmentId) -> Result<Appointment> {
        self.repository
            .get_appointment(id)
            .await?
            .ok_or_else(|| AgendaError::NotFound(format!("appointment {id}")))
    }

    /// Every appointment as a list row, ordered by start date.
    pub async fn list(&self) -> Result<Vec<AppointmentListEntry>> {
        let mut appointments = self.repository.query_appointments(&AppointmentFilter::new()).await?;
        appointments.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
        Ok(appointments.iter().map(Appointment::list_entry).collect())
    }

    /// Lock the appointment's current seller (and `target_seller`, when it is
    /// being reassigned) and return the record as seen under the lock.
    async fn lock_existing(
        &self,
        id: &AppointmentId,
        target_seller: Option<&str>,
    ) -> Result<(SellerGuard, Appointment)> {
        loop {
            let snapshot = self.get(id).await?;
            let target = target_seller.unwrap_or(&snapshot.seller);
            let guard = self.locks.acquire(&[snapshot.seller.as_str(), target]).await;

            let current = self.get(id).await?;
            if current.seller == snapshot.seller {
                return Ok((guard, current));
            }
            debug!(appointment_id = %id, "seller changed while waiting for lock, retrying");
        }
    }

    async fn dispatch(&self, kind: NotificationKind, appointment: &Appointment) {
        if appointment.seller.trim().is_empty() {
            debug!(appointment_id = %appointment.id, "no seller to notify");
            return;
        }

        let notification = Notification::new(kind, appointment.clone());
        if let Err(err) = self.notifier.notify(&notification).await {
            warn!(
                appointment_id = %appointment.id,
                seller = %appointment.seller,
                subject = %notification.subject,
                error = %err,
                "failed to send appointment notification"
            );
        }
    }
}

fn required_text(value: Option<&str>, field: &str) -> std::result::Result<String, SchedulingError> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SchedulingError::missing(field))
}

fn ensure_not_canceled(appointment: &Appointment) -> Result<()> {
    if appointment.status == AppointmentStatus::Canceled {
        return Err(AgendaError::InvalidInput(format!(
            "appointment {} is canceled and can no longer be changed",
            appointment.id
        )));
    }
    Ok(())
}
