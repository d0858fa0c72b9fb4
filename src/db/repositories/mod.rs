mod location_cache;
mod observations;
mod schedule;
mod tracking_settings;
