use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one rank resolution.
///
/// `NotFound` is a valid measurement (the target is absent from the fetched
/// page), distinct from `FetchFailed` which means the result page could not
/// be obtained at all. Ranks are 1-based; there is no rank 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RankOutcome {
    Ranked(u32),
    NotFound,
    FetchFailed,
}

impl RankOutcome {
    pub fn status_str(&self) -> &'static str {
        match self {
            RankOutcome::Ranked(_) => "ranked",
            RankOutcome::NotFound => "not_found",
            RankOutcome::FetchFailed => "fetch_failed",
        }
    }

    pub fn rank(&self) -> Option<u32> {
        match self {
            RankOutcome::Ranked(rank) => Some(*rank),
            _ => None,
        }
    }
}

/// One persisted rank measurement. Append-only: never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: Option<i64>,
    pub run_id: String,
    pub keyword: String,
    pub country: String,
    pub city: Option<String>,
    pub target: String,
    pub outcome: RankOutcome,
    pub device: String,
    pub engine: String,
    pub observed_at: DateTime<Utc>,
}

/// Filter for trend reads. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ObservationFilter {
    pub keyword: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// One distinct (keyword, country, city) combination present in the history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackedGroup {
    pub keyword: String,
    pub country: String,
    pub city: Option<String>,
}
