use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Daemon configuration, read from a JSON file at startup. Missing fields
/// fall back to defaults, so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database location.
    pub db_path: PathBuf,
    /// Directory the JSON-file result adapter reads pages from.
    pub results_dir: PathBuf,
    /// Base URL of the geo-data service (`/countries`,
    /// `/countries/{code}/cities`).
    pub geo_base_url: String,
    /// How many results to request per fetch; ranks beyond this are
    /// reported as not found.
    pub result_count: u32,
    /// Scheduler poll tick in seconds.
    pub poll_interval_secs: u64,
    /// Upper bound on one result-page fetch.
    pub fetch_timeout_secs: u64,
    /// Upper bound on one geo-data call.
    pub geo_timeout_secs: u64,
    /// Minimum delay between successive fetches within a run.
    pub pacing_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("rankwatch.db"),
            results_dir: PathBuf::from("results"),
            geo_base_url: "http://127.0.0.1:4280".to_string(),
            result_count: 100,
            poll_interval_secs: 60,
            fetch_timeout_secs: 10,
            geo_timeout_secs: 5,
            pacing_secs: 2,
        }
    }
}

impl AppConfig {
    pub fn load(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }
}
