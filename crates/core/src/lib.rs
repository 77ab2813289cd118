//! # Agenda Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for appointment storage and seller notification
//! - End date derivation and interval conflict detection
//! - The appointment lifecycle service
//! - The calendar event projection
//!
//! ## Architecture Principles
//! - Only depends on `agenda-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod calendar;
pub mod scheduling;

pub use calendar::CalendarProjector;
pub use scheduling::ports::{AppointmentRepository, Notifier};
pub use scheduling::{
    compute_end_date, ConflictDetector, DerivedSchedule, Lifecycle, LifecyclePhase,
    AppointmentService, SellerLocks,
};
