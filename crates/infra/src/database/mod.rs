//! Database implementations

pub mod appointment_repository;
pub mod manager;
pub mod outbox_repository;
pub mod seller_repository;

pub use appointment_repository::SqliteAppointmentRepository;
pub use manager::{DbManager, SqliteConnection};
pub use outbox_repository::SqliteOutboxRepository;
pub use seller_repository::SqliteSellerRepository;
