#![allow(dead_code)]

use agenda_api::AppContext;
use agenda_domain::{AppointmentRequest, Config, DatabaseConfig};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

/// Application context over a throwaway database.
pub struct TestApp {
    _temp_dir: TempDir,
    pub ctx: AppContext,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_notifications(true)
    }

    pub fn with_notifications(enabled: bool) -> Self {
        let temp_dir = TempDir::new().expect("temporary directory should be created");
        let mut config = Config {
            database: DatabaseConfig {
                path: temp_dir.path().join("data").join("agenda.db").display().to_string(),
                pool_size: 4,
            },
            ..Config::default()
        };
        config.notifications.enabled = enabled;

        let ctx = AppContext::new_with_config(config).expect("context should initialise");
        Self { _temp_dir: temp_dir, ctx }
    }
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, hour, minute, 0).unwrap()
}

pub fn request(client: &str, seller: &str, start: DateTime<Utc>, duration: &str) -> AppointmentRequest {
    AppointmentRequest {
        client_name: Some(client.into()),
        seller: Some(seller.into()),
        start_date: Some(start),
        duration: Some(duration.into()),
        status: None,
    }
}
