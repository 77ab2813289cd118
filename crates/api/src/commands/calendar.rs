//! Calendar view commands

use agenda_domain::{AgendaError, CalendarEvent, EventFilters, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::utils::command_helpers::execute_logged;
use crate::AppContext;

/// Calendar events fully contained in `[start, end]`.
///
/// `filters` is passed through to the projector unchanged.
pub async fn get_calendar_events(
    ctx: &AppContext,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    filters: Option<EventFilters>,
) -> Result<Vec<CalendarEvent>> {
    let command_name = "calendar::get_calendar_events";
    execute_logged(command_name, move || async move {
        if end < start {
            return Err(AgendaError::InvalidInput(format!(
                "calendar window ends before it starts: {start} > {end}"
            )));
        }

        info!(command = command_name, %start, %end, "Fetching calendar events");
        ctx.calendar.get_events(start, end, filters.as_ref()).await
    })
    .await
}
