pub mod config;
pub mod db;
pub mod error;
pub mod location;
pub mod rank;
pub mod scheduler;
pub mod tracking;
pub mod utils;

pub use config::AppConfig;
pub use db::{
    Database, LocationCacheEntry, Observation, ObservationFilter, RankOutcome, ScheduleConfig,
    TrackedGroup, TrackedTarget,
};
pub use error::TrackerError;
pub use location::{GeoProvider, HttpGeoProvider, LocationResolver};
pub use rank::{resolve_rank, ResultEntry};
pub use scheduler::SchedulerController;
pub use tracking::{JsonFileAdapter, ResultPageAdapter, RunSummary, TrackingJob};
