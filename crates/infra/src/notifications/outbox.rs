//! Queues seller notifications in the database outbox.

use std::sync::Arc;

use agenda_core::Notifier;
use agenda_domain::constants::DISPLAY_DATETIME_FORMAT;
use agenda_domain::{DeliveryStatus, Notification, OutboxMessage, Result};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::database::{SqliteOutboxRepository, SqliteSellerRepository};

/// Resolves the seller's address and writes a pending outbox row.
///
/// Sellers without a registered e-mail are skipped.
pub struct OutboxNotifier {
    sellers: Arc<SqliteSellerRepository>,
    outbox: Arc<SqliteOutboxRepository>,
}

impl OutboxNotifier {
    pub fn new(sellers: Arc<SqliteSellerRepository>, outbox: Arc<SqliteOutboxRepository>) -> Self {
        Self { sellers, outbox }
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    #[instrument(skip(self, notification), fields(seller = %notification.seller, kind = ?notification.kind))]
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let Some(recipient) = self.sellers.seller_email(&notification.seller).await? else {
            debug!("seller has no registered e-mail, skipping notification");
            return Ok(());
        };

        let message = OutboxMessage {
            id: Uuid::now_v7().to_string(),
            recipient,
            subject: notification.subject.clone(),
            body: render_body(notification),
            reference_id: notification.appointment.id.to_string(),
            status: DeliveryStatus::Pending,
            created_at: Utc::now().timestamp(),
        };

        self.outbox.enqueue(&message).await
    }
}

/// Plain-text summary of the appointment.
pub fn render_body(notification: &Notification) -> String {
    let appointment = &notification.appointment;
    let end = appointment
        .end_date
        .map_or_else(|| "-".to_string(), |end| end.format(DISPLAY_DATETIME_FORMAT).to_string());

    format!(
        "{subject}\n\nClient: {client}\nStart: {start}\nEnd: {end}\nDuration: {duration}\nStatus: {status}\nReference: {id}\n",
        subject = notification.subject,
        client = appointment.client_name,
        start = appointment.start_date.format(DISPLAY_DATETIME_FORMAT),
        duration = appointment.duration,
        status = appointment.status,
        id = appointment.id,
    )
}

#[cfg(test)]
mod tests {
    use agenda_domain::{Appointment, AppointmentDuration, AppointmentStatus, NotificationKind};
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn body_lists_the_appointment_details() {
        let start = Utc.with_ymd_and_hms(2025, 7, 1, 14, 0, 0).unwrap();
        let notification = Notification::new(
            NotificationKind::Created,
            Appointment {
                id: "apt-1".into(),
                client_name: "Carla".into(),
                seller: "s".into(),
                start_date: start,
                duration: AppointmentDuration::new(0, 45, 0),
                end_date: Some(start + chrono::Duration::minutes(45)),
                status: AppointmentStatus::Scheduled,
            },
        );

        let body = render_body(&notification);
        assert!(body.starts_with("New Appointment Scheduled\n"));
        assert!(body.contains("Client: Carla"));
        assert!(body.contains("Start: 01/07/2025 14:00:00"));
        assert!(body.contains("End: 01/07/2025 14:45:00"));
        assert!(body.contains("Duration: 0:45:00"));
        assert!(body.contains("Reference: apt-1"));
    }
}
