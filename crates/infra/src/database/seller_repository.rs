//! Seller directory: maps seller ids to notification addresses.

use std::sync::Arc;

use agenda_domain::{AgendaError, Result, Seller};
use rusqlite::{named_params, OptionalExtension};
use tokio::task;
use tracing::{info, instrument};

use super::manager::DbManager;
use crate::errors::conversions::{map_join_error, map_sql_error};

/// SQLite-backed seller directory.
pub struct SqliteSellerRepository {
    db: Arc<DbManager>,
}

impl SqliteSellerRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Create or replace a seller entry.
    ///
    /// # Errors
    /// `InvalidInput` for a blank id.
    #[instrument(skip(self, seller), fields(seller_id = %seller.id))]
    pub async fn register_seller(&self, seller: &Seller) -> Result<()> {
        if seller.id.trim().is_empty() {
            return Err(AgendaError::InvalidInput("seller id must not be empty".into()));
        }

        let db = Arc::clone(&self.db);
        let seller = Seller {
            id: seller.id.trim().to_string(),
            email: seller.email.as_deref().map(str::trim).filter(|e| !e.is_empty()).map(String::from),
        };

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO sellers (id, email) VALUES (:id, :email)
                 ON CONFLICT(id) DO UPDATE SET email = excluded.email",
                named_params! { ":id": seller.id, ":email": seller.email },
            )
            .map_err(map_sql_error)?;
            info!(seller_id = %seller.id, has_email = seller.email.is_some(), "seller registered");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Registered e-mail address of `seller_id`, if any.
    pub async fn seller_email(&self, seller_id: &str) -> Result<Option<String>> {
        let db = Arc::clone(&self.db);
        let seller_id = seller_id.to_string();

        task::spawn_blocking(move || -> Result<Option<String>> {
            let conn = db.get_connection()?;
            let email: Option<Option<String>> = conn
                .query_row("SELECT email FROM sellers WHERE id = ?1", [&seller_id], |row| row.get(0))
                .optional()
                .map_err(map_sql_error)?;
            Ok(email.flatten())
        })
        .await
        .map_err(map_join_error)?
    }
}
