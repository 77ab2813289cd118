//! Notifier used when outbound notifications are disabled.

use agenda_core::Notifier;
use agenda_domain::{Notification, Result};
use async_trait::async_trait;
use tracing::info;

/// Logs each notification instead of queueing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        info!(
            seller = %notification.seller,
            subject = %notification.subject,
            appointment_id = %notification.appointment.id,
            "notification delivery disabled, logging only"
        );
        Ok(())
    }
}
