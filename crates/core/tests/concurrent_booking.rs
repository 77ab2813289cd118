//! Concurrent writers competing for the same seller's time.

mod support;

use std::sync::Arc;

use agenda_core::AppointmentService;
use agenda_domain::{AppointmentChanges, AppointmentRequest, AppointmentStatus};
use futures::future::join_all;

use support::{at, InMemoryAppointmentRepository, RecordingNotifier};

fn request(client: String, seller: &str, minute: u32) -> AppointmentRequest {
    AppointmentRequest {
        client_name: Some(client),
        seller: Some(seller.to_string()),
        start_date: Some(at(10, minute)),
        duration: Some("1:00:00".into()),
        status: None,
    }
}

fn service() -> (Arc<AppointmentService>, InMemoryAppointmentRepository) {
    let repository = InMemoryAppointmentRepository::new();
    let service = AppointmentService::new(
        Arc::new(repository.clone()),
        Arc::new(RecordingNotifier::new()),
    );
    (Arc::new(service), repository)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_creates_for_one_seller_admit_exactly_one() {
    let (service, repository) = service();

    let attempts = (0..16u32).map(|n| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.create(request(format!("client-{n}"), "S", n % 30)).await })
    });
    let results: Vec<_> = join_all(attempts).await.into_iter().map(|joined| joined.unwrap()).collect();

    let successes = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results
        .iter()
        .filter_map(|result| result.as_ref().err())
        .all(|err| err.as_scheduling().is_some()));
    assert_eq!(repository.rows().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_sellers_book_in_parallel() {
    let (service, repository) = service();

    let attempts = (0..8u32).map(|n| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service.create(request(format!("client-{n}"), &format!("seller-{n}"), 0)).await
        })
    });
    let results = join_all(attempts).await;

    assert!(results.into_iter().all(|joined| joined.unwrap().is_ok()));
    assert_eq!(repository.rows().len(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_moves_into_the_same_slot_admit_one() {
    let (service, repository) = service();
    let mut ids = Vec::new();
    for hour_offset in 0..6u32 {
        let mut booking = request(format!("client-{hour_offset}"), "S", 0);
        booking.start_date = Some(at(12 + hour_offset, 0));
        ids.push(service.create(booking).await.unwrap().id);
    }

    let moves = ids.into_iter().map(|id| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            let changes = AppointmentChanges { start_date: Some(at(9, 0)), ..Default::default() };
            service.update(&id, changes).await
        })
    });
    let moved = join_all(moves).await.into_iter().filter(|joined| {
        joined.as_ref().is_ok_and(|result| result.is_ok())
    });

    assert_eq!(moved.count(), 1);
    let at_nine = repository
        .rows()
        .into_iter()
        .filter(|row| row.status == AppointmentStatus::Scheduled && row.start_date == at(9, 0))
        .count();
    assert_eq!(at_nine, 1);
}
