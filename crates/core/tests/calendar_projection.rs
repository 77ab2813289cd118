//! Calendar window projection over the in-memory store.

mod support;

use std::sync::Arc;

use agenda_core::CalendarProjector;
use agenda_domain::{Appointment, AppointmentDuration, AppointmentStatus, EventFilters};
use chrono::{DateTime, Utc};

use support::{at, InMemoryAppointmentRepository};

fn row(id: &str, start: DateTime<Utc>, end: Option<DateTime<Utc>>, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: id.into(),
        client_name: format!("Client {id}"),
        seller: "ana".into(),
        start_date: start,
        duration: AppointmentDuration::new(1, 0, 0),
        end_date: end,
        status,
    }
}

fn projector(rows: Vec<Appointment>) -> CalendarProjector {
    let repository = rows.into_iter().fold(InMemoryAppointmentRepository::new(), |repo, row| repo.with_row(row));
    CalendarProjector::new(Arc::new(repository))
}

#[tokio::test]
async fn only_fully_contained_appointments_are_returned() {
    let projector = projector(vec![
        row("inside", at(9, 0), Some(at(10, 0)), AppointmentStatus::Scheduled),
        row("spills-over", at(11, 30), Some(at(12, 30)), AppointmentStatus::Scheduled),
        row("starts-early", at(7, 30), Some(at(8, 30)), AppointmentStatus::Scheduled),
        row("exact-bounds", at(8, 0), Some(at(12, 0)), AppointmentStatus::Finished),
    ]);

    let events = projector.get_events(at(8, 0), at(12, 0), None).await.unwrap();
    let names: Vec<_> = events.iter().map(|event| event.name.as_str()).collect();
    assert_eq!(names, vec!["exact-bounds", "inside"]);
}

#[tokio::test]
async fn events_carry_status_colors_and_titles() {
    let projector = projector(vec![
        row("c", at(11, 0), Some(at(11, 30)), AppointmentStatus::Canceled),
        row("s", at(9, 0), Some(at(9, 30)), AppointmentStatus::Scheduled),
        row("f", at(10, 0), Some(at(10, 30)), AppointmentStatus::Finished),
    ]);

    let events = projector.get_events(at(0, 0), at(23, 0), None).await.unwrap();
    let rendered: Vec<_> =
        events.iter().map(|e| (e.name.as_str(), e.color.as_str(), e.style.as_str())).collect();
    assert_eq!(rendered, vec![
        ("s", "#98d85b", "success"),
        ("f", "#5b8ff7", "info"),
        ("c", "#ff6b6b", "danger"),
    ]);
    assert_eq!(events[0].title, "Client s (ana)");
    assert_eq!(events[0].seller, "ana");
}

#[tokio::test]
async fn extra_filters_are_accepted_and_ignored() {
    let projector = projector(vec![row("a", at(9, 0), Some(at(10, 0)), AppointmentStatus::Scheduled)]);

    let mut filters = EventFilters::new();
    filters.insert("seller".into(), serde_json::json!("someone-else"));

    let events = projector.get_events(at(8, 0), at(12, 0), Some(&filters)).await.unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn rows_without_end_date_fall_outside_any_window() {
    let projector = projector(vec![row("open", at(9, 0), None, AppointmentStatus::Scheduled)]);

    let events = projector.get_events(at(0, 0), at(23, 0), None).await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn empty_window_yields_no_events() {
    let projector = projector(vec![row("a", at(9, 0), Some(at(10, 0)), AppointmentStatus::Scheduled)]);

    assert!(projector.get_events(at(13, 0), at(14, 0), None).await.unwrap().is_empty());
}
