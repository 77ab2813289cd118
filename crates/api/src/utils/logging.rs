use std::time::Duration;

use agenda_domain::{AgendaError, LoggingConfig, Result, SchedulingError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV_VAR: &str = "AGENDA_LOG";

/// Install the global `tracing` subscriber.
///
/// `AGENDA_LOG` takes precedence over `config.level`. Output goes to stderr so
/// command results on stdout stay machine-readable.
///
/// # Errors
/// `Config` for an unparsable filter, `Internal` if a subscriber is already
/// installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_env(LOG_ENV_VAR) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            AgendaError::Config(format!("invalid log filter '{}': {e}", config.level))
        })?,
    };

    let builder =
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| AgendaError::Internal(format!("failed to install log subscriber: {e}")))
}

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&AgendaError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = error_label(err),
            error = %err,
            "command_execution_failure"
        ),
    }
}

/// Convert an `AgendaError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &AgendaError) -> &'static str {
    match error {
        AgendaError::Scheduling(SchedulingError::InvalidDurationFormat { .. }) => {
            "invalid_duration_format"
        }
        AgendaError::Scheduling(SchedulingError::MissingRequiredField { .. }) => {
            "missing_required_field"
        }
        AgendaError::Scheduling(SchedulingError::SchedulingConflict { .. }) => "scheduling_conflict",
        AgendaError::Database(_) => "database",
        AgendaError::Config(_) => "config",
        AgendaError::NotFound(_) => "not_found",
        AgendaError::InvalidInput(_) => "invalid_input",
        AgendaError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_distinguish_scheduling_failures() {
        assert_eq!(
            error_label(&SchedulingError::invalid_duration("x").into()),
            "invalid_duration_format"
        );
        assert_eq!(error_label(&SchedulingError::missing("seller").into()), "missing_required_field");
        assert_eq!(error_label(&AgendaError::NotFound("a".into())), "not_found");
    }

    #[test]
    fn bad_filter_is_a_config_error() {
        std::env::remove_var(LOG_ENV_VAR);
        let config = LoggingConfig { level: "info,[".into(), json: false };
        assert!(matches!(init_tracing(&config), Err(AgendaError::Config(_))));
    }
}
