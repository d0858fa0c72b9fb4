use std::{sync::Arc, time::Duration};

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::db::{Database, Observation, RankOutcome, TrackedTarget};
use crate::error::TrackerError;
use crate::location::LocationResolver;
use crate::rank::resolve_rank;
use crate::tracking::ResultPageAdapter;

const ENABLE_LOGS: bool = true;
use crate::{log_info, log_warn};

/// Random extra delay stacked on the pacing base, so successive fetches do
/// not land on a fixed cadence.
const PACING_JITTER_MAX_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub total: usize,
    pub ranked: usize,
    pub not_found: usize,
    pub failed: usize,
}

/// One tracking batch: for every configured target, resolve the location,
/// fetch the result page, resolve the rank, append an observation.
pub struct TrackingJob {
    db: Database,
    locations: LocationResolver,
    adapter: Arc<dyn ResultPageAdapter>,
    result_count: u32,
    pacing: Duration,
    fetch_timeout: Duration,
}

impl TrackingJob {
    pub fn new(
        db: Database,
        locations: LocationResolver,
        adapter: Arc<dyn ResultPageAdapter>,
        result_count: u32,
        pacing: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            db,
            locations,
            adapter,
            result_count,
            pacing,
            fetch_timeout,
        }
    }

    /// Runs the batch to completion. A failed fetch for one target is
    /// recorded and the batch moves on; only storage failures abort.
    pub async fn run(&self) -> Result<RunSummary, TrackerError> {
        let targets = self
            .db
            .load_tracking_settings()
            .await
            .map_err(TrackerError::Storage)?;

        let run_id = Uuid::new_v4().to_string();
        let mut summary = RunSummary {
            run_id: run_id.clone(),
            total: targets.len(),
            ranked: 0,
            not_found: 0,
            failed: 0,
        };

        log_info!("tracking run {run_id} starting: {} targets", targets.len());

        for (index, target) in targets.iter().enumerate() {
            // Pacing between external fetches keeps the adapter's upstream
            // from tripping anti-automation defenses.
            if index > 0 {
                let jitter = rand::thread_rng().gen_range(0..=PACING_JITTER_MAX_MS);
                tokio::time::sleep(self.pacing + Duration::from_millis(jitter)).await;
            }

            let outcome = self.observe_target(target).await;

            match outcome {
                RankOutcome::Ranked(_) => summary.ranked += 1,
                RankOutcome::NotFound => summary.not_found += 1,
                RankOutcome::FetchFailed => summary.failed += 1,
            }

            let observation = Observation {
                id: None,
                run_id: run_id.clone(),
                keyword: target.keyword.clone(),
                country: target.country.clone(),
                city: target.city.clone(),
                target: target.target.clone(),
                outcome,
                device: target.device.clone(),
                engine: target.engine.clone(),
                observed_at: Utc::now(),
            };

            self.db
                .insert_observation(&observation)
                .await
                .map_err(TrackerError::Storage)?;
        }

        log_info!(
            "tracking run {run_id} done: {} ranked, {} not found, {} failed",
            summary.ranked,
            summary.not_found,
            summary.failed
        );

        Ok(summary)
    }

    async fn observe_target(&self, target: &TrackedTarget) -> RankOutcome {
        let location = match self
            .locations
            .resolve(&target.country, target.city.as_deref())
            .await
        {
            Ok(location) => location,
            Err(err) => {
                log_warn!(
                    "location resolution failed for '{}' ({}): {err}",
                    target.keyword,
                    target.country
                );
                return RankOutcome::FetchFailed;
            }
        };

        let fetch = self
            .adapter
            .fetch(&target.keyword, &location.encoding, self.result_count);

        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(results)) => resolve_rank(&results, &target.target),
            Ok(Err(err)) => {
                log_warn!("fetch failed for '{}': {err}", target.keyword);
                RankOutcome::FetchFailed
            }
            Err(_) => {
                log_warn!(
                    "fetch timeout (> {:?}) for '{}'",
                    self.fetch_timeout,
                    target.keyword
                );
                RankOutcome::FetchFailed
            }
        }
    }
}
