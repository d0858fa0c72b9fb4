use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use log::info;

use rankwatch::{
    AppConfig, Database, HttpGeoProvider, JsonFileAdapter, LocationResolver, SchedulerController,
    TrackingJob,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::var("RANKWATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("rankwatch.json"));
    let config = AppConfig::load(&config_path)?;

    let db = Database::new(config.db_path.clone())?;

    let provider = HttpGeoProvider::new(
        config.geo_base_url.clone(),
        Some(Duration::from_secs(config.geo_timeout_secs)),
    )
    .context("failed to build geo client")?;
    let locations = LocationResolver::new(db.clone(), Arc::new(provider));

    let adapter = Arc::new(JsonFileAdapter::new(config.results_dir.clone()));
    let job = Arc::new(TrackingJob::new(
        db.clone(),
        locations,
        adapter,
        config.result_count,
        Duration::from_secs(config.pacing_secs),
        Duration::from_secs(config.fetch_timeout_secs),
    ));

    let mut scheduler = SchedulerController::new(job);
    scheduler.start(db, Duration::from_secs(config.poll_interval_secs))?;
    info!(
        "rankwatch running, polling every {}s",
        config.poll_interval_secs
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("shutdown requested");
    scheduler.stop().await?;

    Ok(())
}
