//! Domain types and models

pub mod appointment;
pub mod calendar;
pub mod notification;

pub use appointment::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentId, AppointmentListEntry,
    AppointmentRequest, AppointmentStatus, NewAppointment,
};
pub use calendar::{event_color, event_style, event_title, CalendarEvent, EventFilters};
pub use notification::{DeliveryStatus, Notification, NotificationKind, OutboxMessage, Seller};
