use std::sync::Arc;

use agenda_infra::database::DbManager;
use tempfile::TempDir;

/// Isolated database with migrations applied.
pub struct DbHarness {
    /// Keep temporary directory alive for the lifetime of the harness.
    _temp_dir: TempDir,
    pub manager: Arc<DbManager>,
}

impl DbHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temporary directory should be created");
        let db_path = temp_dir.path().join("agenda-integration.db");

        let manager =
            Arc::new(DbManager::new(&db_path, 4).expect("database manager should initialise"));
        manager.run_migrations().expect("schema migrations should apply");

        Self { _temp_dir: temp_dir, manager }
    }
}
