//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Calendar projection
/// Length given to an event whose stored record has no end date.
pub const DEFAULT_EVENT_LENGTH_MINUTES: i64 = 60;

pub const COLOR_SCHEDULED: &str = "#98d85b";
pub const COLOR_FINISHED: &str = "#5b8ff7";
pub const COLOR_CANCELED: &str = "#ff6b6b";
pub const COLOR_DEFAULT: &str = "#cccccc";

pub const STYLE_SCHEDULED: &str = "success";
pub const STYLE_FINISHED: &str = "info";
pub const STYLE_CANCELED: &str = "danger";
pub const STYLE_DEFAULT: &str = "default";

// Notification subjects
pub const SUBJECT_CREATED: &str = "New Appointment Scheduled";
pub const SUBJECT_UPDATED: &str = "Appointment Updated";
pub const SUBJECT_CANCELED: &str = "Appointment Canceled";

/// Day-first timestamp format used in user-facing messages.
pub const DISPLAY_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
