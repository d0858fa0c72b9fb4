use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::{DateTime, Datelike, Timelike, Utc};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::db::{Database, ScheduleConfig};
use crate::tracking::TrackingJob;

const ENABLE_LOGS: bool = true;
use crate::{log_error, log_info, log_warn};

/// Pure trigger decision. Fires when `now` lands on the configured weekday
/// and minute, the minute has not already been consumed, and enough weeks
/// have passed since the last run. `last_fired` is the loop's own in-memory
/// state; `cfg.last_run_at` is the persisted stamp that survives restarts.
pub fn should_fire(
    cfg: &ScheduleConfig,
    now: DateTime<Utc>,
    last_fired: Option<DateTime<Utc>>,
) -> bool {
    if now.weekday() != cfg.day {
        return false;
    }
    if now.hour() != cfg.time_of_day.hour() || now.minute() != cfg.time_of_day.minute() {
        return false;
    }

    let reference = match (last_fired, cfg.last_run_at) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    if let Some(last) = reference {
        if same_minute(last, now) {
            return false;
        }
        if cfg.interval_weeks > 1 {
            let days = (now.date_naive() - last.date_naive()).num_days();
            if days < i64::from(cfg.interval_weeks) * 7 {
                return false;
            }
        }
    }

    true
}

fn same_minute(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive() && a.hour() == b.hour() && a.minute() == b.minute()
}

/// The single polling loop. Every tick it reloads the persisted schedule
/// (the store is the source of truth, so edits apply without restart),
/// evaluates the trigger, and runs the job inline. The `job_running` flag is
/// shared with the manual run path; whichever side wins the compare-exchange
/// runs, the other drops its trigger.
pub(crate) async fn scheduler_loop(
    db: Database,
    job: Arc<TrackingJob>,
    job_running: Arc<AtomicBool>,
    poll_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_fired: Option<DateTime<Utc>> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let config = match db.load_schedule().await {
                    Ok(Some(config)) => config,
                    Ok(None) => continue,
                    Err(err) => {
                        // Storage hiccups must not kill the loop; retry on
                        // the next tick.
                        log_error!("failed to load schedule: {err:?}");
                        continue;
                    }
                };

                let now = Utc::now();
                if !should_fire(&config, now, last_fired) {
                    continue;
                }

                if job_running
                    .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                    .is_err()
                {
                    log_warn!("trigger at {now} dropped: a tracking run is already in progress");
                    last_fired = Some(now);
                    continue;
                }

                last_fired = Some(now);
                if let Err(err) = db.mark_schedule_run(now).await {
                    log_error!("failed to persist last_run_at: {err:?}");
                }

                log_info!("schedule matched at {now}, running tracking job");
                match job.run().await {
                    Ok(summary) => log_info!(
                        "scheduled run {} finished ({} targets)",
                        summary.run_id,
                        summary.total
                    ),
                    Err(err) => log_error!("scheduled tracking run failed: {err}"),
                }
                job_running.store(false, Ordering::SeqCst);
            }
            _ = cancel_token.cancelled() => {
                log_info!("scheduler loop shutting down");
                break;
            }
        }
    }
}
