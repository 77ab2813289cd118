//! Appointment scheduling: end date derivation, conflict detection and the
//! lifecycle service that orders them.

pub mod conflicts;
pub mod end_date;
pub mod lifecycle;
pub mod locks;
pub mod ports;
pub mod service;

pub use conflicts::ConflictDetector;
pub use end_date::{compute_end_date, end_after, DerivedSchedule};
pub use lifecycle::{Lifecycle, LifecyclePhase};
pub use locks::{SellerGuard, SellerLocks};
pub use service::AppointmentService;
