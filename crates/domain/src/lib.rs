//! Domain layer for kachelmann-wetter
//!
//! Contains the forecast records produced by the parser and the value objects
//! used to resolve a user supplied location to a weather station.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
