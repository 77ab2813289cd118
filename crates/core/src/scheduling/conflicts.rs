//! Interval conflict detection for a seller's scheduled appointments.

use std::sync::Arc;

use agenda_domain::{
    Appointment, AppointmentFilter, AppointmentId, AppointmentStatus, Result, SchedulingError,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::ports::AppointmentRepository;

/// Finds scheduled appointments that would overlap a candidate slot.
pub struct ConflictDetector {
    repository: Arc<dyn AppointmentRepository>,
}

impl ConflictDetector {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    /// Appointments of `seller` that overlap `[start, end)`.
    ///
    /// Matches rows with `status == Scheduled`, `id != exclude` and
    /// `stored_end > start AND stored_start < end`. Touching endpoints are not
    /// conflicts. Results are ordered by start date, then id.
    pub async fn find_conflicts(
        &self,
        seller: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<&AppointmentId>,
    ) -> Result<Vec<Appointment>> {
        let filter = AppointmentFilter::new()
            .for_seller(seller)
            .with_status(AppointmentStatus::Scheduled)
            .excluding(exclude.cloned())
            .ending_after(start)
            .starting_before(end);

        let mut conflicts = self.repository.query_appointments(&filter).await?;
        conflicts.retain(|existing| filter.matches(existing));
        conflicts.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));

        debug!(seller, %start, %end, conflicts = conflicts.len(), "checked seller availability");

        Ok(conflicts)
    }

    /// Fail with [`SchedulingError::SchedulingConflict`] naming the first
    /// conflicting appointment, if any.
    pub async fn ensure_available(
        &self,
        seller: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<&AppointmentId>,
    ) -> Result<()> {
        let conflicts = self.find_conflicts(seller, start, end, exclude).await?;
        match conflicts.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(SchedulingError::SchedulingConflict {
                seller: seller.to_string(),
                conflicting_id: first.id.to_string(),
                conflicting_start: first.start_date,
                conflicting_end: first.end_date.unwrap_or(first.start_date),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use agenda_domain::{AgendaError, AppointmentDuration, NewAppointment};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    use super::*;

    /// Returns every stored row regardless of the filter, like an
    /// unindexed scan.
    #[derive(Default)]
    struct ScanRepository {
        rows: Mutex<Vec<Appointment>>,
    }

    #[async_trait]
    impl AppointmentRepository for ScanRepository {
        async fn insert_appointment(&self, _appointment: &NewAppointment) -> Result<AppointmentId> {
            unreachable!("conflict detection never writes")
        }

        async fn update_appointment(&self, _appointment: &Appointment) -> Result<()> {
            unreachable!("conflict detection never writes")
        }

        async fn get_appointment(&self, id: &AppointmentId) -> Result<Option<Appointment>> {
            Ok(self.rows.lock().unwrap().iter().find(|row| &row.id == id).cloned())
        }

        async fn query_appointments(
            &self,
            _filter: &AppointmentFilter,
        ) -> Result<Vec<Appointment>> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 12, hour, minute, 0).unwrap()
    }

    fn row(id: &str, seller: &str, start: DateTime<Utc>, minutes: i64) -> Appointment {
        Appointment {
            id: id.into(),
            client_name: format!("client {id}"),
            seller: seller.into(),
            start_date: start,
            duration: AppointmentDuration::new(0, 0, 0),
            end_date: Some(start + Duration::minutes(minutes)),
            status: AppointmentStatus::Scheduled,
        }
    }

    fn detector(rows: Vec<Appointment>) -> ConflictDetector {
        ConflictDetector::new(Arc::new(ScanRepository { rows: Mutex::new(rows) }))
    }

    #[tokio::test]
    async fn overlapping_scheduled_rows_conflict() {
        let detector = detector(vec![row("x", "s", at(10, 0), 60)]);

        let found = detector.find_conflicts("s", at(10, 30), at(11, 0), None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "x");
    }

    #[tokio::test]
    async fn touching_endpoints_do_not_conflict() {
        let detector = detector(vec![row("x", "s", at(10, 0), 60)]);

        assert!(detector.find_conflicts("s", at(11, 0), at(12, 0), None).await.unwrap().is_empty());
        assert!(detector.find_conflicts("s", at(9, 0), at(10, 0), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_sellers_and_inactive_rows_are_ignored() {
        let mut finished = row("f", "s", at(10, 0), 60);
        finished.status = AppointmentStatus::Finished;
        let mut canceled = row("c", "s", at(10, 0), 60);
        canceled.status = AppointmentStatus::Canceled;
        let detector = detector(vec![finished, canceled, row("t", "other", at(10, 0), 60)]);

        assert!(detector.find_conflicts("s", at(10, 0), at(11, 0), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn excluded_id_never_conflicts_with_itself() {
        let detector = detector(vec![row("x", "s", at(10, 0), 60)]);
        let own_id = AppointmentId::from("x");

        let found =
            detector.find_conflicts("s", at(10, 0), at(11, 0), Some(&own_id)).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn zero_length_candidate_inside_existing_interval_conflicts() {
        let detector = detector(vec![row("x", "s", at(10, 0), 60)]);

        let inside = detector.find_conflicts("s", at(10, 30), at(10, 30), None).await.unwrap();
        assert_eq!(inside.len(), 1);

        let on_start = detector.find_conflicts("s", at(10, 0), at(10, 0), None).await.unwrap();
        assert!(on_start.is_empty());

        let on_end = detector.find_conflicts("s", at(11, 0), at(11, 0), None).await.unwrap();
        assert!(on_end.is_empty());
    }

    #[tokio::test]
    async fn zero_length_existing_row_blocks_only_when_strictly_inside() {
        let detector = detector(vec![row("z", "s", at(10, 30), 0)]);

        let found = detector.find_conflicts("s", at(10, 0), at(11, 0), None).await.unwrap();
        assert_eq!(found.len(), 1);

        let same_instant = detector.find_conflicts("s", at(10, 30), at(10, 30), None).await.unwrap();
        assert!(same_instant.is_empty());
    }

    #[tokio::test]
    async fn conflicts_are_ordered_and_first_is_reported() {
        let detector = detector(vec![
            row("late", "s", at(11, 0), 60),
            row("early", "s", at(9, 30), 60),
        ]);

        let found = detector.find_conflicts("s", at(10, 0), at(11, 30), None).await.unwrap();
        let ids: Vec<_> = found.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);

        let err = detector.ensure_available("s", at(10, 0), at(11, 30), None).await.unwrap_err();
        match err {
            AgendaError::Scheduling(SchedulingError::SchedulingConflict {
                seller,
                conflicting_id,
                conflicting_start,
                conflicting_end,
            }) => {
                assert_eq!(seller, "s");
                assert_eq!(conflicting_id, "early");
                assert_eq!(conflicting_start, at(9, 30));
                assert_eq!(conflicting_end, at(10, 30));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn free_slot_passes() {
        let detector = detector(vec![row("x", "s", at(10, 0), 60)]);
        detector.ensure_available("s", at(12, 0), at(13, 0), None).await.unwrap();
    }
}
