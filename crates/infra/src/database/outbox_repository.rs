//! SQLite-backed notification outbox.
//!
//! Rows are written as `pending`; delivering them is left to an external
//! relay.

use std::sync::Arc;

use agenda_domain::{DeliveryStatus, OutboxMessage, Result};
use rusqlite::{named_params, Row};
use tokio::task;
use tracing::{debug, warn};

use super::manager::DbManager;
use crate::errors::conversions::{map_join_error, map_sql_error};

/// Notification outbox repository.
pub struct SqliteOutboxRepository {
    db: Arc<DbManager>,
}

impl SqliteOutboxRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Queue a message.
    pub async fn enqueue(&self, message: &OutboxMessage) -> Result<()> {
        let db = Arc::clone(&self.db);
        let message = message.clone();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO notification_outbox (
                    id, recipient, subject, body, reference_id, status, created_at
                ) VALUES (:id, :recipient, :subject, :body, :reference_id, :status, :created_at)",
                named_params! {
                    ":id": message.id,
                    ":recipient": message.recipient,
                    ":subject": message.subject,
                    ":body": message.body,
                    ":reference_id": message.reference_id,
                    ":status": message.status.as_str(),
                    ":created_at": message.created_at,
                },
            )
            .map_err(map_sql_error)?;
            debug!(message_id = %message.id, recipient = %message.recipient, "notification queued");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Oldest pending messages first, at most `limit`.
    pub async fn pending_notifications(&self, limit: usize) -> Result<Vec<OutboxMessage>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        task::spawn_blocking(move || -> Result<Vec<OutboxMessage>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT id, recipient, subject, body, reference_id, status, created_at
                     FROM notification_outbox
                     WHERE status = 'pending'
                     ORDER BY created_at ASC, id ASC
                     LIMIT ?1",
                )
                .map_err(map_sql_error)?;
            let rows = stmt.query_map([limit], map_outbox_row).map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_outbox_row(row: &Row<'_>) -> rusqlite::Result<OutboxMessage> {
    let id: String = row.get(0)?;
    let status_raw: String = row.get(5)?;
    let status = parse_status(&id, &status_raw);

    Ok(OutboxMessage {
        id,
        recipient: row.get(1)?,
        subject: row.get(2)?,
        body: row.get(3)?,
        reference_id: row.get(4)?,
        status,
        created_at: row.get(6)?,
    })
}

fn parse_status(id: &str, raw: &str) -> DeliveryStatus {
    match raw.parse::<DeliveryStatus>() {
        Ok(status) => status,
        Err(err) => {
            warn!(
                message_id = %id,
                raw_status = %raw,
                error = %err,
                "invalid outbox status in database, defaulting to pending"
            );
            DeliveryStatus::Pending
        }
    }
}
