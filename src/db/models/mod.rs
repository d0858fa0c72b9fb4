pub mod location_cache;
pub mod observation;
pub mod schedule;
pub mod tracked_target;

pub use location_cache::LocationCacheEntry;
pub use observation::{Observation, ObservationFilter, RankOutcome, TrackedGroup};
pub use schedule::ScheduleConfig;
pub use tracked_target::TrackedTarget;
