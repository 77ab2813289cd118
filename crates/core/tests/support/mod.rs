//! Shared test helpers for `agenda-core` integration tests.
//!
//! In-memory port implementations so the scenario suites can focus on
//! scheduling behaviour instead of storage.

#![allow(dead_code)]

pub mod repositories;

use chrono::{DateTime, TimeZone, Utc};

pub use repositories::{FailingNotifier, InMemoryAppointmentRepository, RecordingNotifier};

/// Fixed instant on the shared test day.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 14, hour, minute, 0).unwrap()
}
