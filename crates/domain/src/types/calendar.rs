//! Calendar view projection types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::appointment::{AppointmentId, AppointmentStatus};
use crate::constants::{
    COLOR_CANCELED, COLOR_DEFAULT, COLOR_FINISHED, COLOR_SCHEDULED, STYLE_CANCELED,
    STYLE_DEFAULT, STYLE_FINISHED, STYLE_SCHEDULED,
};

/// Extra view filters. Accepted for forward compatibility; the window bounds
/// are the only predicate applied today.
pub type EventFilters = HashMap<String, serde_json::Value>;

/// Renderable calendar event built from a stored appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Appointment id.
    pub name: AppointmentId,
    pub title: String,
    pub client_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub color: String,
    pub style: String,
    pub status: AppointmentStatus,
    pub seller: String,
}

/// Hex color for a status label. Unknown labels render gray.
pub fn event_color(status: &str) -> &'static str {
    match status.parse::<AppointmentStatus>() {
        Ok(AppointmentStatus::Scheduled) => COLOR_SCHEDULED,
        Ok(AppointmentStatus::Finished) => COLOR_FINISHED,
        Ok(AppointmentStatus::Canceled) => COLOR_CANCELED,
        Err(_) => COLOR_DEFAULT,
    }
}

/// Calendar style class for a status label.
pub fn event_style(status: &str) -> &'static str {
    match status.parse::<AppointmentStatus>() {
        Ok(AppointmentStatus::Scheduled) => STYLE_SCHEDULED,
        Ok(AppointmentStatus::Finished) => STYLE_FINISHED,
        Ok(AppointmentStatus::Canceled) => STYLE_CANCELED,
        Err(_) => STYLE_DEFAULT,
    }
}

/// Event title shown on the calendar: `"{client} ({seller})"`.
pub fn event_title(client_name: &str, seller: &str) -> String {
    format!("{client_name} ({seller})")
}
