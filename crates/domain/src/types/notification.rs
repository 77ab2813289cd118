//! Notification messages emitted by the appointment lifecycle.

use serde::{Deserialize, Serialize};

use super::appointment::Appointment;
use crate::constants::{SUBJECT_CANCELED, SUBJECT_CREATED, SUBJECT_UPDATED};

/// Lifecycle event that triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Created,
    Updated,
    Canceled,
}

impl NotificationKind {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Created => SUBJECT_CREATED,
            Self::Updated => SUBJECT_UPDATED,
            Self::Canceled => SUBJECT_CANCELED,
        }
    }
}

/// Message handed to a notifier after a successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Seller reference; resolving it to an address is the notifier's job.
    pub seller: String,
    pub subject: String,
    pub kind: NotificationKind,
    pub appointment: Appointment,
}

impl Notification {
    pub fn new(kind: NotificationKind, appointment: Appointment) -> Self {
        Self {
            seller: appointment.seller.clone(),
            subject: kind.subject().to_string(),
            kind,
            appointment,
        }
    }
}

/// Delivery state of a queued notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

crate::impl_status_conversions!(DeliveryStatus {
    Pending => "pending",
    Sent => "sent",
    Failed => "failed",
});

/// Notification queued for delivery to a resolved recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub id: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub reference_id: String,
    pub status: DeliveryStatus,
    pub created_at: i64,
}

/// Seller contact registered in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: String,
    pub email: Option<String>,
}
