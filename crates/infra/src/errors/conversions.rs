//! Conversions from external infrastructure errors into domain errors.

use agenda_domain::AgendaError;
use rusqlite::Error as SqlError;
use tokio::task::JoinError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AgendaError);

impl From<InfraError> for AgendaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AgendaError> for InfraError {
    fn from(value: AgendaError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAgendaError {
    fn into_agenda(self) -> AgendaError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → AgendaError */
/* -------------------------------------------------------------------------- */

impl IntoAgendaError for SqlError {
    fn into_agenda(self) -> AgendaError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => AgendaError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        AgendaError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        AgendaError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        AgendaError::Database("foreign key constraint violation".into())
                    }
                    _ => AgendaError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => AgendaError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                AgendaError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                AgendaError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => AgendaError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => AgendaError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_agenda())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → AgendaError */
/* -------------------------------------------------------------------------- */

impl IntoAgendaError for r2d2::Error {
    fn into_agenda(self) -> AgendaError {
        AgendaError::Database(format!("failed to acquire database connection: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_agenda())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → AgendaError */
/* -------------------------------------------------------------------------- */

impl IntoAgendaError for JoinError {
    fn into_agenda(self) -> AgendaError {
        if self.is_cancelled() {
            AgendaError::Internal("blocking database task was cancelled".into())
        } else {
            AgendaError::Internal(format!("blocking database task panicked: {self}"))
        }
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(value.into_agenda())
    }
}

pub(crate) fn map_sql_error(err: SqlError) -> AgendaError {
    AgendaError::from(InfraError::from(err))
}

pub(crate) fn map_join_error(err: JoinError) -> AgendaError {
    AgendaError::from(InfraError::from(err))
}
