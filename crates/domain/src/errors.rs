//! Error types used throughout the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DISPLAY_DATETIME_FORMAT;

/// Validation failures raised before any store mutation.
///
/// Every variant blocks persistence; none of them is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchedulingError {
    #[error("invalid duration '{input}': expected hours:minutes:seconds")]
    InvalidDurationFormat { input: String },

    #[error("{field} is required to schedule an appointment")]
    MissingRequiredField { field: String },

    #[error(
        "seller {seller} already has an appointment at this time: {conflicting_id} (from {} to {})",
        .conflicting_start.format(DISPLAY_DATETIME_FORMAT),
        .conflicting_end.format(DISPLAY_DATETIME_FORMAT)
    )]
    SchedulingConflict {
        seller: String,
        conflicting_id: String,
        conflicting_start: DateTime<Utc>,
        conflicting_end: DateTime<Utc>,
    },
}

impl SchedulingError {
    pub fn missing(field: &str) -> Self {
        Self::MissingRequiredField { field: field.to_string() }
    }

    pub fn invalid_duration(input: impl Into<String>) -> Self {
        Self::InvalidDurationFormat { input: input.into() }
    }
}

/// Main error type for Agenda
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AgendaError {
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgendaError {
    /// Borrow the scheduling failure, if this error carries one.
    pub fn as_scheduling(&self) -> Option<&SchedulingError> {
        match self {
            Self::Scheduling(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for Agenda operations
pub type Result<T> = std::result::Result<T, AgendaError>;
