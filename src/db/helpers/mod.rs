use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::db::models::RankOutcome;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

/// Observation timestamps are stored as RFC 3339, but rows written before
/// schema v2 carry a bare `YYYY-MM-DD` date. Both must stay readable.
pub fn parse_observed_at(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| anyhow!("unrecognized observation timestamp '{value}'"))?;
    Ok(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("invalid midnight for date '{value}'"))?,
        Utc,
    ))
}

/// Reassembles a `RankOutcome` from its stored (status, rank) pair. Rows
/// written before the status column existed default to 'ranked'; when such a
/// row has no rank it was a not-found measurement in the old encoding.
pub fn outcome_from_parts(status: &str, rank: Option<i64>) -> Result<RankOutcome> {
    match (status, rank) {
        ("ranked", Some(rank)) => {
            let rank = u32::try_from(rank).map_err(|_| anyhow!("rank {rank} out of range"))?;
            if rank == 0 {
                return Err(anyhow!("rank 0 is not a valid position"));
            }
            Ok(RankOutcome::Ranked(rank))
        }
        ("ranked", None) => Ok(RankOutcome::NotFound),
        ("not_found", _) => Ok(RankOutcome::NotFound),
        ("fetch_failed", _) => Ok(RankOutcome::FetchFailed),
        (other, _) => Err(anyhow!("unknown observation status '{other}'")),
    }
}

pub fn cities_to_json(cities: &[String]) -> Result<String> {
    serde_json::to_string(cities).context("failed to serialize city list")
}

pub fn cities_from_json(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).context("failed to deserialize city list")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_date_parses_as_midnight() {
        let dt = parse_observed_at("2024-03-09").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-09T00:00:00+00:00");
    }

    #[test]
    fn rfc3339_parses_unchanged() {
        let dt = parse_observed_at("2024-03-09T13:45:00+00:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-09T13:45:00+00:00");
    }

    #[test]
    fn legacy_null_rank_reads_as_not_found() {
        assert_eq!(
            outcome_from_parts("ranked", None).unwrap(),
            RankOutcome::NotFound
        );
    }

    #[test]
    fn rank_zero_is_rejected() {
        assert!(outcome_from_parts("ranked", Some(0)).is_err());
    }
}
