use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::db::{
    connection::Database,
    helpers::parse_optional_datetime,
    models::{
        schedule::{parse_time_of_day, parse_weekday},
        ScheduleConfig,
    },
};
use crate::error::TrackerError;

impl Database {
    /// Installs the schedule as the single active definition, replacing any
    /// previous one. The stored row is the source of truth; the scheduler
    /// loop reloads it every tick.
    pub async fn save_schedule(&self, config: ScheduleConfig) -> Result<(), TrackerError> {
        let day = config.day_str().to_string();
        let time = config.time_str();
        let interval = i64::from(config.interval_weeks);
        let last_run_at = config.last_run_at.map(|dt| dt.to_rfc3339());

        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM schedule_config", [])?;
            tx.execute(
                "INSERT INTO schedule_config (day, time, interval_weeks, last_run_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![day, time, interval, last_run_at],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(TrackerError::Storage)
    }

    pub async fn load_schedule(&self) -> Result<Option<ScheduleConfig>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT day, time, interval_weeks, last_run_at
                 FROM schedule_config
                 ORDER BY id ASC
                 LIMIT 1",
            )?;

            let mut rows = stmt.query([])?;
            let Some(row) = rows.next()? else {
                return Ok(None);
            };

            let day: String = row.get(0)?;
            let time: String = row.get(1)?;
            let interval_weeks: i64 = row.get(2)?;
            let last_run_at: Option<String> = row.get(3)?;

            Ok(Some(ScheduleConfig {
                day: parse_weekday(&day).map_err(|err| anyhow!(err.to_string()))?,
                time_of_day: parse_time_of_day(&time).map_err(|err| anyhow!(err.to_string()))?,
                interval_weeks: u32::try_from(interval_weeks)
                    .map_err(|_| anyhow!("interval_weeks {interval_weeks} out of range"))?,
                last_run_at: parse_optional_datetime(last_run_at, "last_run_at")?,
            }))
        })
        .await
    }

    /// Stamps the time the last scheduled run started, so the interval check
    /// holds across restarts.
    pub async fn mark_schedule_run(&self, ran_at: DateTime<Utc>) -> Result<()> {
        self.execute(move |conn| {
            conn.execute(
                "UPDATE schedule_config SET last_run_at = ?1",
                params![ran_at.to_rfc3339()],
            )?;
            Ok(())
        })
        .await
    }
}
