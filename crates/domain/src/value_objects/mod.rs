//! Value Objects - Immutable, identity-less domain primitives

mod location;
mod sky;
mod station_id;

pub use location::{Location, LocationResult};
pub use sky::{SkyData, WindData};
pub use station_id::StationId;
