pub mod adapter;
pub mod job;

pub use adapter::{JsonFileAdapter, ResultPageAdapter};
pub use job::{RunSummary, TrackingJob};
