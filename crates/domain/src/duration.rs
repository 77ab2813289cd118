//! Appointment duration expressions.
//!
//! A duration is written `hours:minutes:seconds`. A `.` may stand in for a
//! colon, so `"1.30:00"` and `"1:30:00"` describe the same span. Hours are
//! unbounded and minutes/seconds above 59 simply carry over.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::SchedulingError;

/// Fixed time span decomposed into its written components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AppointmentDuration {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl AppointmentDuration {
    pub const fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self { hours, minutes, seconds }
    }

    /// Parse a duration expression.
    ///
    /// Only the first three components are read; anything after them (for
    /// example a fractional seconds part) is ignored.
    ///
    /// # Errors
    /// Returns [`SchedulingError::InvalidDurationFormat`] when fewer than
    /// three components are present or one of them is not an unsigned
    /// integer.
    pub fn parse(input: &str) -> Result<Self, SchedulingError> {
        let normalized = input.replace('.', ":");
        let parts: Vec<&str> = normalized.split(':').collect();
        if parts.len() < 3 {
            return Err(SchedulingError::invalid_duration(input));
        }

        let component = |raw: &str| {
            raw.trim().parse::<u32>().map_err(|_| SchedulingError::invalid_duration(input))
        };

        Ok(Self {
            hours: component(parts[0])?,
            minutes: component(parts[1])?,
            seconds: component(parts[2])?,
        })
    }

    pub fn total_seconds(&self) -> i64 {
        i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60 + i64::from(self.seconds)
    }

    pub fn to_chrono(&self) -> Duration {
        Duration::seconds(self.total_seconds())
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl FromStr for AppointmentDuration {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AppointmentDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl Serialize for AppointmentDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AppointmentDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
