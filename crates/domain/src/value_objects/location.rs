//! Location input and lookup outcome
//!
//! A [`Location`] is what a caller asks a forecast for. Resolving a name
//! against the forecast service yields a [`LocationResult`], which keeps the
//! difference between "the service knows no such place" and "the service
//! could not be asked" even though both carry no station id.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StationId;

/// Outcome of looking up a location name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "station_id", rename_all = "snake_case")]
pub enum LocationResult {
    /// The service resolved the name to a station
    StationId(StationId),
    /// The service affirmatively reported that no location matches
    NoSuchLocation,
    /// The lookup failed (transport error or unexpected status); never cached
    CouldNotRetrieve,
}

impl LocationResult {
    /// The station id, if the lookup found one
    #[must_use]
    pub const fn station_id(&self) -> Option<StationId> {
        match self {
            Self::StationId(id) => Some(*id),
            Self::NoSuchLocation | Self::CouldNotRetrieve => None,
        }
    }

    /// Whether the lookup produced a station id
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::StationId(_))
    }

    /// Whether this outcome may be stored in a lookup cache
    ///
    /// Station ids are always cacheable, negative answers only when negative
    /// caching is enabled and lookup failures never.
    #[must_use]
    pub const fn is_cacheable(&self, cache_negative: bool) -> bool {
        match self {
            Self::StationId(_) => true,
            Self::NoSuchLocation => cache_negative,
            Self::CouldNotRetrieve => false,
        }
    }
}

impl fmt::Display for LocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StationId(id) => write!(f, "station {id}"),
            Self::NoSuchLocation => write!(f, "no such location"),
            Self::CouldNotRetrieve => write!(f, "could not retrieve"),
        }
    }
}

/// A location a forecast can be requested for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// A free-form place name, or a numeric id given as text
    Name(String),
    /// A known station id
    Id(StationId),
    /// The outcome of an earlier lookup
    Resolved(LocationResult),
}

impl From<&str> for Location {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Location {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<StationId> for Location {
    fn from(id: StationId) -> Self {
        Self::Id(id)
    }
}

impl From<u32> for Location {
    fn from(id: u32) -> Self {
        Self::Id(StationId::new(id))
    }
}

impl From<LocationResult> for Location {
    fn from(result: LocationResult) -> Self {
        Self::Resolved(result)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Resolved(result) => write!(f, "{result}"),
        }
    }
}
