use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Cached city list for one country, written back whenever a remote
/// resolution succeeds. The store itself never expires entries; staleness is
/// judged by the resolver against `last_updated`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocationCacheEntry {
    pub country_code: String,
    pub country_name: String,
    pub cities: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl LocationCacheEntry {
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_updated) <= ttl
    }
}
