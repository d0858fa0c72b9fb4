use std::sync::Arc;

use chrono::{Duration, Utc};
use log::warn;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::db::{Database, LocationCacheEntry};
use crate::error::TrackerError;
use crate::location::{fallback, GeoProvider};

/// Cache entries older than this are considered stale and trigger a remote
/// refresh. A stale entry is still served when the remote tier is down.
const CACHE_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationTier {
    Cache,
    Remote,
    Fallback,
}

/// A resolved location plus the tier that supplied it. The encoding is the
/// opaque string handed to the result-page adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub encoding: String,
    pub tier: LocationTier,
    pub country_code: String,
    pub country_name: String,
    /// The canonical city name when the requested city was found in the
    /// supplying tier's list; `None` means the encoding is country-only.
    pub city: Option<String>,
}

/// Tiered resolver: fresh cache, then remote provider, then stale cache,
/// then the embedded table. Remote failures never escape this type; the only
/// errors surfaced are storage failures and `NoLocation`.
pub struct LocationResolver {
    db: Database,
    provider: Arc<dyn GeoProvider>,
    ttl: Duration,
}

impl LocationResolver {
    pub fn new(db: Database, provider: Arc<dyn GeoProvider>) -> Self {
        Self {
            db,
            provider,
            ttl: Duration::days(CACHE_TTL_DAYS),
        }
    }

    #[cfg(test)]
    fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn resolve(
        &self,
        country: &str,
        city: Option<&str>,
    ) -> Result<ResolvedLocation, TrackerError> {
        let code = country_code_of(country);
        let now = Utc::now();

        let cached = self.db.get_location_cache(&code).await?;

        if let Some(entry) = cached.as_ref() {
            if entry.is_fresh(self.ttl, now) {
                return Ok(finish(LocationTier::Cache, entry, city));
            }
        }

        match self.provider.list_cities(&code).await {
            Ok(cities) => {
                let country_name = self
                    .remote_country_name(&code)
                    .await
                    .or_else(|| cached.as_ref().map(|entry| entry.country_name.clone()))
                    .or_else(|| fallback::lookup(country).map(|f| f.name.to_string()))
                    .unwrap_or_else(|| country.trim().to_string());

                let entry = LocationCacheEntry {
                    country_code: code,
                    country_name,
                    cities,
                    last_updated: now,
                };

                // Persist before returning so a later remote outage is
                // masked by this entry.
                self.db.upsert_location_cache(&entry).await?;

                Ok(finish(LocationTier::Remote, &entry, city))
            }
            Err(err) => {
                warn!("geo provider unavailable for {country}: {err}");

                if let Some(entry) = cached.as_ref() {
                    return Ok(finish(LocationTier::Cache, entry, city));
                }

                let Some(fb) = fallback::lookup(country) else {
                    return Err(TrackerError::NoLocation);
                };

                let entry = LocationCacheEntry {
                    country_code: fb.code.to_string(),
                    country_name: fb.name.to_string(),
                    cities: fb.cities.iter().map(|c| c.to_string()).collect(),
                    last_updated: now,
                };
                Ok(finish(LocationTier::Fallback, &entry, city))
            }
        }
    }

    async fn remote_country_name(&self, code: &str) -> Option<String> {
        match self.provider.list_countries().await {
            Ok(countries) => countries
                .into_iter()
                .find(|c| c.code.eq_ignore_ascii_case(code))
                .map(|c| c.name),
            Err(err) => {
                warn!("country listing unavailable: {err}");
                None
            }
        }
    }
}

fn country_code_of(country: &str) -> String {
    let trimmed = country.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return trimmed.to_ascii_uppercase();
    }
    if let Some(fb) = fallback::lookup(trimmed) {
        return fb.code.to_string();
    }
    trimmed.to_ascii_uppercase()
}

fn finish(tier: LocationTier, entry: &LocationCacheEntry, city: Option<&str>) -> ResolvedLocation {
    let matched_city = city.and_then(|wanted| {
        entry
            .cities
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(wanted.trim()))
            .cloned()
    });

    let plain = match &matched_city {
        Some(city) => format!("{city},{}", entry.country_name),
        None => entry.country_name.clone(),
    };

    ResolvedLocation {
        encoding: utf8_percent_encode(&plain, NON_ALPHANUMERIC).to_string(),
        tier,
        country_code: entry.country_code.clone(),
        country_name: entry.country_name.clone(),
        city: matched_city,
    }
}
