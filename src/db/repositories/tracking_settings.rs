use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{connection::Database, models::TrackedTarget};
use crate::error::TrackerError;

fn row_to_target(row: &Row) -> Result<TrackedTarget> {
    Ok(TrackedTarget {
        keyword: row.get("keyword")?,
        target: row.get("target_url")?,
        country: row.get("country")?,
        city: row.get("city")?,
        device: row.get("device")?,
        engine: row.get("engine")?,
    })
}

impl Database {
    /// Replaces the full tracked set in one transaction: the old set is
    /// discarded and the new one installed, never a partial merge. Every
    /// target is validated first so nothing is written on a bad entry.
    pub async fn replace_tracking_settings(
        &self,
        targets: Vec<TrackedTarget>,
    ) -> Result<(), TrackerError> {
        for target in &targets {
            target.validate()?;
        }

        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM settings", [])?;
            for target in &targets {
                tx.execute(
                    "INSERT INTO settings (keyword, country, city, target_url, device, engine)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        target.keyword,
                        target.country,
                        target.city,
                        target.target,
                        target.device,
                        target.engine,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(TrackerError::Storage)
    }

    pub async fn load_tracking_settings(&self) -> Result<Vec<TrackedTarget>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT keyword, country, city, target_url, device, engine
                 FROM settings
                 ORDER BY id ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut targets = Vec::new();
            while let Some(row) = rows.next()? {
                targets.push(row_to_target(row)?);
            }

            Ok(targets)
        })
        .await
    }
}
