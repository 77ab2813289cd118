//! Application context - dependency injection container

use std::fs;
use std::path::Path;
use std::sync::Arc;

use agenda_core::{AppointmentRepository, AppointmentService, CalendarProjector, Notifier};
use agenda_domain::{AgendaError, Config, Result};
use agenda_infra::{
    config, DbManager, OutboxNotifier, SqliteAppointmentRepository, SqliteOutboxRepository,
    SqliteSellerRepository, TracingNotifier,
};
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub appointments: Arc<AppointmentService>,
    pub calendar: Arc<CalendarProjector>,
    pub sellers: Arc<SqliteSellerRepository>,
    pub outbox: Arc<SqliteOutboxRepository>,
}

impl AppContext {
    /// Build the context from the loaded configuration.
    ///
    /// # Errors
    /// Fails if the configuration is invalid or the database cannot be opened.
    pub fn new() -> Result<Self> {
        Self::new_with_config(config::load()?)
    }

    /// Build the context from an explicit configuration.
    ///
    /// Creates the database directory if needed, applies migrations and runs a
    /// health check before wiring the services.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let db_path = Path::new(&config.database.path);
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Config(format!(
                    "failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db = Arc::new(DbManager::new(db_path, config.database.pool_size)?);
        db.run_migrations()?;
        db.health_check()?;

        let repository: Arc<dyn AppointmentRepository> =
            Arc::new(SqliteAppointmentRepository::new(Arc::clone(&db)));
        let sellers = Arc::new(SqliteSellerRepository::new(Arc::clone(&db)));
        let outbox = Arc::new(SqliteOutboxRepository::new(Arc::clone(&db)));

        let notifier: Arc<dyn Notifier> = if config.notifications.enabled {
            Arc::new(OutboxNotifier::new(Arc::clone(&sellers), Arc::clone(&outbox)))
        } else {
            Arc::new(TracingNotifier)
        };

        let appointments = Arc::new(AppointmentService::new(Arc::clone(&repository), notifier));
        let calendar = Arc::new(CalendarProjector::new(repository));

        info!(
            db_path = %db.path().display(),
            notifications_enabled = config.notifications.enabled,
            "application context initialised"
        );

        Ok(Self { config, db, appointments, calendar, sellers, outbox })
    }
}
