//! In-memory implementations of the core ports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use agenda_core::{AppointmentRepository, Notifier};
use agenda_domain::{
    AgendaError, Appointment, AppointmentFilter, AppointmentId, NewAppointment, Notification,
    NotificationKind, Result as DomainResult,
};
use async_trait::async_trait;

/// In-memory appointment store.
///
/// Ids are assigned sequentially as `APT-0001`, `APT-0002`, ... Queries
/// yield to the scheduler before reading so concurrent writers interleave
/// the way they would against a real store.
#[derive(Default, Clone)]
pub struct InMemoryAppointmentRepository {
    rows: Arc<Mutex<Vec<Appointment>>>,
    next_id: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row directly, bypassing validation.
    pub fn with_row(self, appointment: Appointment) -> Self {
        self.rows.lock().unwrap().push(appointment);
        self
    }

    pub fn rows(&self) -> Vec<Appointment> {
        self.rows.lock().unwrap().clone()
    }

    /// Number of inserts and updates that reached the store.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn insert_appointment(&self, appointment: &NewAppointment) -> DomainResult<AppointmentId> {
        tokio::task::yield_now().await;
        let seq = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = AppointmentId::new(format!("APT-{seq:04}"));
        self.rows.lock().unwrap().push(appointment.clone().into_appointment(id.clone()));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn update_appointment(&self, appointment: &Appointment) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|row| row.id == appointment.id)
            .ok_or_else(|| AgendaError::NotFound(format!("appointment {}", appointment.id)))?;
        *slot = appointment.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_appointment(&self, id: &AppointmentId) -> DomainResult<Option<Appointment>> {
        Ok(self.rows.lock().unwrap().iter().find(|row| &row.id == id).cloned())
    }

    async fn query_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> DomainResult<Vec<Appointment>> {
        tokio::task::yield_now().await;
        Ok(self.rows.lock().unwrap().iter().filter(|row| filter.matches(row)).cloned().collect())
    }
}

/// Notifier that records every notification it receives.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.sent.lock().unwrap().iter().map(|n| n.kind).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> DomainResult<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Notifier whose delivery always fails.
#[derive(Default, Clone)]
pub struct FailingNotifier {
    attempts: Arc<AtomicUsize>,
}

impl FailingNotifier {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notification: &Notification) -> DomainResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AgendaError::Internal("mail relay unavailable".into()))
    }
}
