use thiserror::Error;

/// Failure taxonomy for the tracking engine.
///
/// `Transport` and `NoLocation` are absorbed wherever a fallback exists
/// (location tiers, per-target fetch); only `Storage` and `Config` are
/// surfaced to callers.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("no location data available from any tier")]
    NoLocation,
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        TrackerError::Transport(err.to_string())
    }
}
