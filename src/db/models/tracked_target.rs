use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

pub const DEFAULT_DEVICE: &str = "desktop";
pub const DEFAULT_ENGINE: &str = "google";

/// One keyword/location/target combination to measure on every trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackedTarget {
    pub keyword: String,
    pub target: String,
    pub country: String,
    pub city: Option<String>,
    pub device: String,
    pub engine: String,
}

impl TrackedTarget {
    pub fn new(
        keyword: impl Into<String>,
        target: impl Into<String>,
        country: impl Into<String>,
        city: Option<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            target: target.into(),
            country: country.into(),
            city,
            device: DEFAULT_DEVICE.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
        }
    }

    /// Rejects unusable combinations before they are saved. Runs at the
    /// settings-save boundary so a bad entry never reaches a job.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.keyword.trim().is_empty() {
            return Err(TrackerError::Config("keyword must not be empty".into()));
        }
        if self.target.trim().is_empty() {
            return Err(TrackerError::Config(
                "target identifier must not be empty".into(),
            ));
        }
        if self.country.trim().is_empty() {
            return Err(TrackerError::Config("country must not be empty".into()));
        }
        if matches!(&self.city, Some(city) if city.trim().is_empty()) {
            return Err(TrackerError::Config(
                "city must be omitted rather than blank".into(),
            ));
        }
        Ok(())
    }
}
