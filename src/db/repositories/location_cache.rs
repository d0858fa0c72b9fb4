use anyhow::Result;
use rusqlite::params;

use crate::db::{
    connection::Database,
    helpers::{cities_from_json, cities_to_json, parse_datetime},
    models::LocationCacheEntry,
};

impl Database {
    /// Full-row replace: a successful remote resolution overwrites whatever
    /// was cached for that country, it never merges city lists.
    pub async fn upsert_location_cache(&self, entry: &LocationCacheEntry) -> Result<()> {
        let record = entry.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO location_cache
                     (country_code, country_name, cities, last_updated)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.country_code,
                    record.country_name,
                    cities_to_json(&record.cities)?,
                    record.last_updated.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_location_cache(
        &self,
        country_code: &str,
    ) -> Result<Option<LocationCacheEntry>> {
        let country_code = country_code.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT country_code, country_name, cities, last_updated
                 FROM location_cache
                 WHERE country_code = ?1",
            )?;

            let mut rows = stmt.query(params![country_code])?;
            let Some(row) = rows.next()? else {
                return Ok(None);
            };

            let cities: String = row.get(2)?;
            let last_updated: String = row.get(3)?;

            Ok(Some(LocationCacheEntry {
                country_code: row.get(0)?,
                country_name: row.get(1)?,
                cities: cities_from_json(&cities)?,
                last_updated: parse_datetime(&last_updated, "last_updated")?,
            }))
        })
        .await
    }
}
