//! SQLite-backed implementation of the `AppointmentRepository` port.

use std::sync::Arc;

use agenda_core::AppointmentRepository;
use agenda_domain::{
    AgendaError, Appointment, AppointmentDuration, AppointmentFilter, AppointmentId,
    AppointmentStatus, NewAppointment, Result, SchedulingError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{named_params, params_from_iter, OptionalExtension, Row, Transaction, TransactionBehavior};
use tokio::task;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::{DbManager, SqliteConnection};
use crate::errors::conversions::{map_join_error, map_sql_error};

const APPOINTMENT_COLUMNS: &str =
    "id, client_name, seller, start_date, duration, end_date, status";

/// SQLite appointment store.
///
/// Writes of `Scheduled` rows re-check the seller's calendar inside an
/// `IMMEDIATE` transaction, so two processes sharing the database file
/// cannot both commit overlapping slots.
pub struct SqliteAppointmentRepository {
    db: Arc<DbManager>,
}

impl SqliteAppointmentRepository {
    /// Construct a repository backed by the shared manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    fn insert_row(conn: &mut SqliteConnection, appointment: &NewAppointment) -> Result<AppointmentId> {
        let id = AppointmentId::new(Uuid::now_v7().to_string());
        let now = Utc::now().timestamp();

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate).map_err(map_sql_error)?;
        if appointment.status == AppointmentStatus::Scheduled {
            ensure_slot_free(
                &tx,
                &appointment.seller,
                appointment.start_date,
                appointment.end_date,
                &id,
            )?;
        }

        tx.execute(
            "INSERT INTO appointments (
                id, client_name, seller, start_date, duration, end_date, status, created_at, modified_at
            ) VALUES (
                :id, :client_name, :seller, :start_date, :duration, :end_date, :status, :now, :now
            )",
            named_params! {
                ":id": id.as_str(),
                ":client_name": appointment.client_name,
                ":seller": appointment.seller,
                ":start_date": appointment.start_date.timestamp(),
                ":duration": appointment.duration.to_string(),
                ":end_date": appointment.end_date.timestamp(),
                ":status": appointment.status.as_str(),
                ":now": now,
            },
        )
        .map_err(map_sql_error)?;
        tx.commit().map_err(map_sql_error)?;

        Ok(id)
    }

    fn update_row(conn: &mut SqliteConnection, appointment: &Appointment) -> Result<()> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate).map_err(map_sql_error)?;
        if let (AppointmentStatus::Scheduled, Some(end)) = (appointment.status, appointment.end_date) {
            ensure_slot_free(&tx, &appointment.seller, appointment.start_date, end, &appointment.id)?;
        }

        let changed = tx
            .execute(
                "UPDATE appointments
                 SET client_name = :client_name, seller = :seller, start_date = :start_date,
                     duration = :duration, end_date = :end_date, status = :status,
                     modified_at = :now
                 WHERE id = :id",
                named_params! {
                    ":id": appointment.id.as_str(),
                    ":client_name": appointment.client_name,
                    ":seller": appointment.seller,
                    ":start_date": appointment.start_date.timestamp(),
                    ":duration": appointment.duration.to_string(),
                    ":end_date": appointment.end_date.map(|end| end.timestamp()),
                    ":status": appointment.status.as_str(),
                    ":now": Utc::now().timestamp(),
                },
            )
            .map_err(map_sql_error)?;
        if changed == 0 {
            return Err(AgendaError::NotFound(format!("appointment {}", appointment.id)));
        }

        tx.commit().map_err(map_sql_error)
    }

    fn fetch_one(conn: &SqliteConnection, id: &AppointmentId) -> Result<Option<Appointment>> {
        conn.query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
            [id.as_str()],
            map_appointment_row,
        )
        .optional()
        .map_err(map_sql_error)
    }

    fn fetch_matching(
        conn: &SqliteConnection,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>> {
        let (where_clause, values) = build_where_clause(filter);
        let sql = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments{where_clause} ORDER BY start_date ASC, id ASC"
        );

        let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
        let rows = stmt
            .query_map(params_from_iter(values), map_appointment_row)
            .map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepository {
    #[instrument(skip(self, appointment), fields(seller = %appointment.seller))]
    async fn insert_appointment(&self, appointment: &NewAppointment) -> Result<AppointmentId> {
        let db = Arc::clone(&self.db);
        let to_insert = appointment.clone();

        task::spawn_blocking(move || -> Result<AppointmentId> {
            let mut conn = db.get_connection()?;
            Self::insert_row(&mut conn, &to_insert)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, appointment), fields(appointment_id = %appointment.id))]
    async fn update_appointment(&self, appointment: &Appointment) -> Result<()> {
        let db = Arc::clone(&self.db);
        let to_update = appointment.clone();

        task::spawn_blocking(move || -> Result<()> {
            let mut conn = db.get_connection()?;
            Self::update_row(&mut conn, &to_update)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self), fields(appointment_id = %id))]
    async fn get_appointment(&self, id: &AppointmentId) -> Result<Option<Appointment>> {
        let db = Arc::clone(&self.db);
        let id = id.clone();

        task::spawn_blocking(move || -> Result<Option<Appointment>> {
            let conn = db.get_connection()?;
            Self::fetch_one(&conn, &id)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, filter))]
    async fn query_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let db = Arc::clone(&self.db);
        let filter = filter.clone();

        let rows = task::spawn_blocking(move || -> Result<Vec<Appointment>> {
            let conn = db.get_connection()?;
            Self::fetch_matching(&conn, &filter)
        })
        .await
        .map_err(map_join_error)??;

        debug!(rows = rows.len(), "queried appointments");
        Ok(rows)
    }
}

/// Translate a filter into a `WHERE` clause and its positional values.
fn build_where_clause(filter: &AppointmentFilter) -> (String, Vec<Value>) {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(seller) = &filter.seller {
        clauses.push("seller = ?");
        values.push(Value::Text(seller.clone()));
    }
    if let Some(status) = filter.status {
        clauses.push("status = ?");
        values.push(Value::Text(status.as_str().to_string()));
    }
    if let Some(id) = &filter.exclude_id {
        clauses.push("id <> ?");
        values.push(Value::Text(id.to_string()));
    }
    if let Some(instant) = filter.starts_before {
        clauses.push("start_date < ?");
        values.push(Value::Integer(ceil_timestamp(instant)));
    }
    if let Some(instant) = filter.starts_at_or_after {
        clauses.push("start_date >= ?");
        values.push(Value::Integer(ceil_timestamp(instant)));
    }
    if let Some(instant) = filter.ends_after {
        clauses.push("end_date > ?");
        values.push(Value::Integer(instant.timestamp()));
    }
    if let Some(instant) = filter.ends_at_or_before {
        clauses.push("end_date <= ?");
        values.push(Value::Integer(instant.timestamp()));
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

/// Whole-second bound for columns stored as unix seconds.
///
/// `floor` is exact for `>` and `<=` comparisons, `ceil` for `<` and `>=`.
fn ceil_timestamp(instant: DateTime<Utc>) -> i64 {
    let secs = instant.timestamp();
    if instant.timestamp_subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}

/// Fail if another scheduled row of `seller` overlaps `[start, end)`.
fn ensure_slot_free(
    tx: &Transaction<'_>,
    seller: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    own_id: &AppointmentId,
) -> Result<()> {
    let conflict = tx
        .query_row(
            "SELECT id, start_date, end_date FROM appointments
             WHERE seller = :seller AND status = 'Scheduled' AND id <> :id
               AND end_date > :start AND start_date < :end
             ORDER BY start_date ASC, id ASC
             LIMIT 1",
            named_params! {
                ":seller": seller,
                ":id": own_id.as_str(),
                ":start": start.timestamp(),
                ":end": end.timestamp(),
            },
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    timestamp_column(row, 1)?,
                    timestamp_column(row, 2)?,
                ))
            },
        )
        .optional()
        .map_err(map_sql_error)?;

    match conflict {
        None => Ok(()),
        Some((conflicting_id, conflicting_start, conflicting_end)) => {
            debug!(seller, %conflicting_id, "write rejected by store-level overlap check");
            Err(SchedulingError::SchedulingConflict {
                seller: seller.to_string(),
                conflicting_id,
                conflicting_start,
                conflicting_end,
            }
            .into())
        }
    }
}

fn map_appointment_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let duration_raw: String = row.get(4)?;
    let duration = AppointmentDuration::parse(&duration_raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err)))?;

    let status_raw: String = row.get(6)?;
    let status = status_raw
        .parse::<AppointmentStatus>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, err.into()))?;

    let end_date = match row.get::<_, Option<i64>>(5)? {
        Some(secs) => Some(from_unix(5, secs)?),
        None => None,
    };

    Ok(Appointment {
        id: AppointmentId::new(row.get::<_, String>(0)?),
        client_name: row.get(1)?,
        seller: row.get(2)?,
        start_date: timestamp_column(row, 3)?,
        duration,
        end_date,
        status,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    from_unix(idx, row.get(idx)?)
}

fn from_unix(idx: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp {secs} out of range").into(),
        )
    })
}
