//! Drives the real poll loop with a fast tick against a schedule matching
//! the current minute.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{Datelike, Timelike, Utc};
use uuid::Uuid;

use rankwatch::{
    Database, GeoProvider, LocationResolver, ObservationFilter, ResultEntry, ResultPageAdapter,
    ScheduleConfig, SchedulerController, TrackedTarget, TrackerError, TrackingJob,
};

struct FakeGeo;

#[async_trait]
impl GeoProvider for FakeGeo {
    async fn list_countries(&self) -> Result<Vec<rankwatch::location::Country>, TrackerError> {
        Err(TrackerError::Transport("geo down".into()))
    }

    async fn list_cities(&self, _country_code: &str) -> Result<Vec<String>, TrackerError> {
        Err(TrackerError::Transport("geo down".into()))
    }
}

struct FakeAdapter;

#[async_trait]
impl ResultPageAdapter for FakeAdapter {
    async fn fetch(
        &self,
        _keyword: &str,
        _location_encoding: &str,
        _result_count: u32,
    ) -> Result<Vec<ResultEntry>, TrackerError> {
        Ok(vec![ResultEntry {
            url: "example.com/gym".into(),
            title: String::new(),
        }])
    }
}

#[tokio::test]
async fn fires_exactly_once_within_a_matching_minute() {
    // The assertion below needs the whole test to sit inside one wall-clock
    // minute; wait out the boundary if we are too close to it.
    if Utc::now().second() > 55 {
        tokio::time::sleep(Duration::from_secs(6)).await;
    }
    let now = Utc::now();

    let path = std::env::temp_dir().join(format!("rankwatch-loop-{}.db", Uuid::new_v4()));
    let db = Database::new(path).unwrap();

    db.replace_tracking_settings(vec![TrackedTarget::new("gym", "example.com", "PH", None)])
        .await
        .unwrap();

    let mut schedule = ScheduleConfig::parse(
        &format!("{:?}", now.weekday()),
        &format!("{:02}:{:02}", now.hour(), now.minute()),
        1,
    )
    .unwrap();
    schedule.last_run_at = None;
    db.save_schedule(schedule).await.unwrap();

    let locations = LocationResolver::new(db.clone(), Arc::new(FakeGeo));
    let job = Arc::new(TrackingJob::new(
        db.clone(),
        locations,
        Arc::new(FakeAdapter),
        100,
        Duration::from_millis(0),
        Duration::from_secs(2),
    ));

    let mut controller = SchedulerController::new(job);
    controller
        .start(db.clone(), Duration::from_millis(50))
        .unwrap();

    // Plenty of ticks land inside the matching minute; only the first may
    // fire.
    tokio::time::sleep(Duration::from_millis(400)).await;
    controller.stop().await.unwrap();

    let observations = db
        .list_observations(ObservationFilter::default())
        .await
        .unwrap();
    assert_eq!(observations.len(), 1);

    // The run stamp was persisted for the interval check.
    let stamped = db.load_schedule().await.unwrap().unwrap();
    assert!(stamped.last_run_at.is_some());
}
