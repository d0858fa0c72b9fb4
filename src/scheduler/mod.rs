pub mod controller;
pub mod loop_worker;

pub use controller::SchedulerController;
pub use loop_worker::should_fire;
