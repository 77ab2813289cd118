//! Commands exposed by the application layer
//!
//! Each command wraps one service call with timing and outcome logging.

pub mod appointments;
pub mod calendar;
pub mod sellers;

pub use appointments::{
    cancel_appointment, create_appointment, get_appointment, list_appointments,
    update_appointment,
};
pub use calendar::get_calendar_events;
pub use sellers::{list_pending_notifications, register_seller};
