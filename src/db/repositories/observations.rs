use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{outcome_from_parts, parse_observed_at},
    models::{Observation, ObservationFilter, TrackedGroup},
};

fn row_to_observation(row: &Row) -> Result<Observation> {
    let status: String = row.get("status")?;
    let rank: Option<i64> = row.get("rank")?;
    let observed_at: String = row.get("date")?;
    let country: String = row.get("country")?;

    Ok(Observation {
        id: Some(row.get("id")?),
        run_id: row
            .get::<_, Option<String>>("run_id")?
            .unwrap_or_default(),
        keyword: row.get("keyword")?,
        country,
        city: row.get("city")?,
        target: row.get("target_url")?,
        outcome: outcome_from_parts(&status, rank)?,
        device: row.get("device")?,
        engine: row.get("engine")?,
        observed_at: parse_observed_at(&observed_at)?,
    })
}

impl Database {
    /// Appends one observation. The history is append-only: there is no
    /// update or delete path for this table.
    pub async fn insert_observation(&self, observation: &Observation) -> Result<i64> {
        let record = observation.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO rankings
                     (keyword, country, city, target_url, rank, status, device, engine, run_id, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.keyword,
                    record.country,
                    record.city,
                    record.target,
                    record.outcome.rank().map(i64::from),
                    record.outcome.status_str(),
                    record.device,
                    record.engine,
                    record.run_id,
                    record.observed_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Trend read: matching observations ordered by observation time
    /// ascending, oldest first.
    pub async fn list_observations(&self, filter: ObservationFilter) -> Result<Vec<Observation>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, keyword, country, city, target_url, rank, status, device, engine, run_id, date
                 FROM rankings
                 WHERE (?1 IS NULL OR keyword = ?1)
                   AND (?2 IS NULL OR country = ?2)
                   AND (?3 IS NULL OR city = ?3)
                 ORDER BY date ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![filter.keyword, filter.country, filter.city])?;
            let mut observations = Vec::new();
            while let Some(row) = rows.next()? {
                observations.push(row_to_observation(row)?);
            }

            Ok(observations)
        })
        .await
    }

    /// Distinct (keyword, country, city) combinations present in the
    /// history, for trend selectors.
    pub async fn list_tracked_groups(&self) -> Result<Vec<TrackedGroup>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT keyword, country, city
                 FROM rankings
                 ORDER BY keyword, country, city",
            )?;

            let mut rows = stmt.query([])?;
            let mut groups = Vec::new();
            while let Some(row) = rows.next()? {
                groups.push(TrackedGroup {
                    keyword: row.get(0)?,
                    country: row.get(1)?,
                    city: row.get(2)?,
                });
            }

            Ok(groups)
        })
        .await
    }
}
