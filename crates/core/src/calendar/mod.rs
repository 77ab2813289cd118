//! Read-only calendar view over stored appointments.

pub mod projector;

pub use projector::CalendarProjector;
