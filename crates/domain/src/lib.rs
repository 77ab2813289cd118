//! # Agenda Domain
//!
//! Business domain types and models for seller appointment scheduling.
//!
//! This crate contains:
//! - Appointment, calendar event and notification types
//! - The duration expression parser
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other Agenda crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod duration;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use duration::AppointmentDuration;
pub use errors::*;
pub use types::*;
