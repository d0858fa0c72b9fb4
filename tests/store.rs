//! Storage-layer behavior: schema evolution, atomic settings replacement,
//! the schedule singleton, and trend-read ordering.

use std::path::PathBuf;

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use rankwatch::{
    Database, Observation, ObservationFilter, RankOutcome, ScheduleConfig, TrackedTarget,
    TrackerError,
};

fn temp_path() -> PathBuf {
    std::env::temp_dir().join(format!("rankwatch-store-{}.db", Uuid::new_v4()))
}

fn observation(keyword: &str, city: Option<&str>, outcome: RankOutcome) -> Observation {
    Observation {
        id: None,
        run_id: Uuid::new_v4().to_string(),
        keyword: keyword.to_string(),
        country: "PH".to_string(),
        city: city.map(str::to_string),
        target: "example.com".to_string(),
        outcome,
        device: "desktop".to_string(),
        engine: "google".to_string(),
        observed_at: Utc::now(),
    }
}

#[tokio::test]
async fn legacy_v1_rows_survive_migration_with_defaults() {
    let path = temp_path();

    // Build a database the way the first schema version laid it out, with
    // one row written before country/status/run_id existed.
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE rankings (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 keyword TEXT NOT NULL,
                 city TEXT,
                 target_url TEXT NOT NULL,
                 rank INTEGER,
                 date TEXT NOT NULL
             );
             CREATE TABLE settings (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 keyword TEXT NOT NULL,
                 city TEXT,
                 target_url TEXT NOT NULL
             );
             CREATE TABLE schedule_config (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 day TEXT NOT NULL,
                 time TEXT NOT NULL
             );
             INSERT INTO rankings (keyword, city, target_url, rank, date)
                 VALUES ('gym', 'Cebu City', 'example.com', 4, '2024-01-15');
             INSERT INTO rankings (keyword, city, target_url, rank, date)
                 VALUES ('gym', 'Cebu City', 'example.com', NULL, '2024-01-22');",
        )
        .unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();
    }

    let db = Database::new(path).unwrap();
    let observations = db
        .list_observations(ObservationFilter {
            keyword: Some("gym".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(observations.len(), 2);
    assert_eq!(observations[0].outcome, RankOutcome::Ranked(4));
    // NULL rank in the old encoding meant "not found".
    assert_eq!(observations[1].outcome, RankOutcome::NotFound);
    // Columns added later read back as defaults.
    assert_eq!(observations[0].country, "");
    assert_eq!(observations[0].device, "desktop");
    assert_eq!(observations[0].run_id, "");
}

#[tokio::test]
async fn observations_read_back_in_time_order() {
    let db = Database::new(temp_path()).unwrap();

    let mut second = observation("gym", Some("Cebu City"), RankOutcome::Ranked(3));
    second.observed_at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
    let mut first = observation("gym", Some("Cebu City"), RankOutcome::Ranked(5));
    first.observed_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();

    // Insert newest first; the read path must order by observed time.
    db.insert_observation(&second).await.unwrap();
    db.insert_observation(&first).await.unwrap();
    db.insert_observation(&observation("other", None, RankOutcome::NotFound))
        .await
        .unwrap();

    let trend = db
        .list_observations(ObservationFilter {
            keyword: Some("gym".into()),
            country: Some("PH".into()),
            city: Some("Cebu City".into()),
        })
        .await
        .unwrap();

    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].outcome, RankOutcome::Ranked(5));
    assert_eq!(trend[1].outcome, RankOutcome::Ranked(3));

    let groups = db.list_tracked_groups().await.unwrap();
    assert_eq!(groups.len(), 2);
}

#[tokio::test]
async fn settings_replacement_is_whole_set_or_nothing() {
    let db = Database::new(temp_path()).unwrap();

    db.replace_tracking_settings(vec![
        TrackedTarget::new("gym", "example.com", "PH", Some("Cebu City".into())),
        TrackedTarget::new("yoga", "example.com", "PH", None),
    ])
    .await
    .unwrap();
    assert_eq!(db.load_tracking_settings().await.unwrap().len(), 2);

    // A batch containing an invalid entry is rejected before anything is
    // written; the previous set stays installed.
    let err = db
        .replace_tracking_settings(vec![
            TrackedTarget::new("pilates", "example.com", "PH", None),
            TrackedTarget::new("", "example.com", "PH", None),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Config(_)));

    let kept = db.load_tracking_settings().await.unwrap();
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].keyword, "gym");

    // A valid replacement fully discards the old set.
    db.replace_tracking_settings(vec![TrackedTarget::new(
        "crossfit",
        "example.com",
        "US",
        None,
    )])
    .await
    .unwrap();
    let replaced = db.load_tracking_settings().await.unwrap();
    assert_eq!(replaced.len(), 1);
    assert_eq!(replaced[0].keyword, "crossfit");
}

#[tokio::test]
async fn schedule_is_a_singleton_replaced_atomically() {
    let db = Database::new(temp_path()).unwrap();
    assert!(db.load_schedule().await.unwrap().is_none());

    db.save_schedule(ScheduleConfig::parse("Monday", "09:00", 1).unwrap())
        .await
        .unwrap();
    db.save_schedule(ScheduleConfig::parse("Friday", "18:30", 2).unwrap())
        .await
        .unwrap();

    let loaded = db.load_schedule().await.unwrap().unwrap();
    assert_eq!(loaded.day_str(), "Friday");
    assert_eq!(loaded.time_str(), "18:30");
    assert_eq!(loaded.interval_weeks, 2);
    assert!(loaded.last_run_at.is_none());

    let ran_at = Utc::now() - Duration::minutes(5);
    db.mark_schedule_run(ran_at).await.unwrap();
    let stamped = db.load_schedule().await.unwrap().unwrap();
    assert_eq!(
        stamped.last_run_at.unwrap().timestamp(),
        ran_at.timestamp()
    );
}
