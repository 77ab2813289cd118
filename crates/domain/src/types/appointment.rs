//! Appointment records and the requests that create or change them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::duration::AppointmentDuration;

/// Store-assigned appointment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(String);

impl AppointmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppointmentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AppointmentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Appointment status. Only `Scheduled` appointments hold a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Finished,
    Canceled,
}

crate::impl_status_conversions!(AppointmentStatus {
    Scheduled => "Scheduled",
    Finished => "Finished",
    Canceled => "Canceled",
});

/// Persisted appointment.
///
/// `end_date` is derived from `start_date + duration` by the scheduling
/// service on every write. It is only `None` for rows written by other tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub client_name: String,
    pub seller: String,
    pub start_date: DateTime<Utc>,
    pub duration: AppointmentDuration,
    pub end_date: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }

    /// Strict half-open overlap against `[start, end)`.
    ///
    /// Touching endpoints do not overlap. A record without an end date never
    /// overlaps anything.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|stored_end| stored_end > start) && self.start_date < end
    }

    pub fn list_entry(&self) -> AppointmentListEntry {
        AppointmentListEntry {
            id: self.id.clone(),
            client_name: self.client_name.clone(),
            start_date: self.start_date,
            status: self.status,
        }
    }
}

/// Validated appointment that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub client_name: String,
    pub seller: String,
    pub start_date: DateTime<Utc>,
    pub duration: AppointmentDuration,
    pub end_date: DateTime<Utc>,
    pub status: AppointmentStatus,
}

impl NewAppointment {
    pub fn into_appointment(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            client_name: self.client_name,
            seller: self.seller,
            start_date: self.start_date,
            duration: self.duration,
            end_date: Some(self.end_date),
            status: self.status,
        }
    }
}

/// Caller input for a new appointment.
///
/// Every field is optional on the wire so that missing values surface as
/// `MissingRequiredField` instead of a deserialization failure. There is no
/// end date field: it is always derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub client_name: Option<String>,
    pub seller: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub status: Option<AppointmentStatus>,
}

/// Field patch applied to an existing appointment. `None` keeps the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentChanges {
    pub client_name: Option<String>,
    pub seller: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Row of the public appointment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentListEntry {
    pub id: AppointmentId,
    pub client_name: String,
    pub start_date: DateTime<Utc>,
    pub status: AppointmentStatus,
}

/// Query predicates understood by appointment stores.
///
/// All set predicates must hold. Range predicates on the end date never match
/// a record without one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub seller: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub exclude_id: Option<AppointmentId>,
    /// `start_date < value`
    pub starts_before: Option<DateTime<Utc>>,
    /// `start_date >= value`
    pub starts_at_or_after: Option<DateTime<Utc>>,
    /// `end_date > value`
    pub ends_after: Option<DateTime<Utc>>,
    /// `end_date <= value`
    pub ends_at_or_before: Option<DateTime<Utc>>,
}

impl AppointmentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_seller(mut self, seller: impl Into<String>) -> Self {
        self.seller = Some(seller.into());
        self
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn excluding(mut self, id: Option<AppointmentId>) -> Self {
        self.exclude_id = id;
        self
    }

    pub fn starting_before(mut self, instant: DateTime<Utc>) -> Self {
        self.starts_before = Some(instant);
        self
    }

    pub fn starting_at_or_after(mut self, instant: DateTime<Utc>) -> Self {
        self.starts_at_or_after = Some(instant);
        self
    }

    pub fn ending_after(mut self, instant: DateTime<Utc>) -> Self {
        self.ends_after = Some(instant);
        self
    }

    pub fn ending_at_or_before(mut self, instant: DateTime<Utc>) -> Self {
        self.ends_at_or_before = Some(instant);
        self
    }

    /// Evaluate the filter against a single record.
    pub fn matches(&self, appointment: &Appointment) -> bool {
        if self.seller.as_deref().is_some_and(|seller| seller != appointment.seller) {
            return false;
        }
        if self.status.is_some_and(|status| status != appointment.status) {
            return false;
        }
        if self.exclude_id.as_ref().is_some_and(|id| id == &appointment.id) {
            return false;
        }
        if self.starts_before.is_some_and(|limit| appointment.start_date >= limit) {
            return false;
        }
        if self.starts_at_or_after.is_some_and(|limit| appointment.start_date < limit) {
            return false;
        }
        if let Some(limit) = self.ends_after {
            if !appointment.end_date.is_some_and(|end| end > limit) {
                return false;
            }
        }
        if let Some(limit) = self.ends_at_or_before {
            if !appointment.end_date.is_some_and(|end| end <= limit) {
                return false;
            }
        }
        true
    }
}
