//! Projects stored appointments into color-coded calendar events.

use std::sync::Arc;

use agenda_domain::constants::DEFAULT_EVENT_LENGTH_MINUTES;
use agenda_domain::{
    event_color, event_style, event_title, Appointment, AppointmentFilter, CalendarEvent,
    EventFilters, Result,
};
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument};

use crate::scheduling::ports::AppointmentRepository;

/// Builds calendar events for a time window.
pub struct CalendarProjector {
    repository: Arc<dyn AppointmentRepository>,
}

impl CalendarProjector {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    /// Events for every appointment fully inside `[window_start, window_end]`.
    ///
    /// An appointment is included when `start_date >= window_start` and
    /// `end_date <= window_end`. `filters` is accepted but not applied.
    #[instrument(skip(self, filters), fields(filter_keys = filters.map_or(0, |f| f.len())))]
    pub async fn get_events(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        filters: Option<&EventFilters>,
    ) -> Result<Vec<CalendarEvent>> {
        let filter = AppointmentFilter::new()
            .starting_at_or_after(window_start)
            .ending_at_or_before(window_end);

        let mut rows = self.repository.query_appointments(&filter).await?;
        rows.retain(|row| filter.matches(row));
        let mut events: Vec<CalendarEvent> = rows.into_iter().map(Self::project_event).collect();
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.name.cmp(&b.name)));

        debug!(%window_start, %window_end, events = events.len(), "projected calendar events");
        Ok(events)
    }

    /// Map one appointment to its calendar event.
    ///
    /// Appointments without an end date are drawn as one hour long.
    pub fn project_event(appointment: Appointment) -> CalendarEvent {
        let end = appointment.end_date.unwrap_or_else(|| {
            appointment.start_date + Duration::minutes(DEFAULT_EVENT_LENGTH_MINUTES)
        });
        let status = appointment.status.as_str();

        CalendarEvent {
            title: event_title(&appointment.client_name, &appointment.seller),
            color: event_color(status).to_string(),
            style: event_style(status).to_string(),
            start: appointment.start_date,
            end,
            status: appointment.status,
            name: appointment.id,
            client_name: appointment.client_name,
            seller: appointment.seller,
        }
    }
}
