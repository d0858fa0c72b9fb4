pub mod fallback;
pub mod geo_client;
pub mod resolver;

pub use geo_client::{Country, GeoProvider, HttpGeoProvider};
pub use resolver::{LocationResolver, LocationTier, ResolvedLocation};
