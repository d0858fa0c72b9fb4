use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::db::Database;
use crate::error::TrackerError;
use crate::tracking::{RunSummary, TrackingJob};

use super::loop_worker::scheduler_loop;

/// Owns the scheduler loop task and the at-most-one-job flag. The same flag
/// gates both the loop's triggers and manual `run_now` calls, so at no point
/// do two tracking runs overlap.
pub struct SchedulerController {
    job: Arc<TrackingJob>,
    job_running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SchedulerController {
    pub fn new(job: Arc<TrackingJob>) -> Self {
        Self {
            job,
            job_running: Arc::new(AtomicBool::new(false)),
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start(&mut self, db: Database, poll_interval: Duration) -> Result<()> {
        if self.handle.is_some() {
            bail!("scheduler already running");
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(scheduler_loop(
            db,
            self.job.clone(),
            self.job_running.clone(),
            poll_interval,
            token_clone,
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("scheduler loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }

    /// Immediate run, outside the schedule. Returns `Ok(None)` when a run is
    /// already in progress; the request is dropped, not queued.
    pub async fn run_now(&self) -> Result<Option<RunSummary>, TrackerError> {
        if self
            .job_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(None);
        }

        let result = self.job.run().await;
        self.job_running.store(false, Ordering::SeqCst);
        result.map(Some)
    }

    pub fn is_job_running(&self) -> bool {
        self.job_running.load(Ordering::SeqCst)
    }
}
