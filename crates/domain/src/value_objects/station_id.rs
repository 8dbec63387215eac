//! Weather station identifier
//!
//! The forecast service addresses every location by a numeric station id
//! (`city_id` in its query strings).
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::StationId;
//!
//! let id: StationId = " 2950159 ".parse().expect("numeric id");
//! assert_eq!(id.get(), 2_950_159);
//! assert!("Berlin".parse::<StationId>().is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Numeric identifier of a forecast station
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(u32);

impl StationId {
    /// Wrap a raw station number
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw station number
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl FromStr for StationId {
    type Err = DomainError;

    /// Parse a decimal station number, ignoring surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| DomainError::InvalidStationId(s.to_string()))
    }
}

impl From<u32> for StationId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<StationId> for u32 {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_digits() {
        assert_eq!("12345".parse::<StationId>(), Ok(StationId::new(12345)));
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        assert_eq!(" 42\n".parse::<StationId>(), Ok(StationId::new(42)));
    }

    #[test]
    fn rejects_names_and_empty_input() {
        assert!("Berlin".parse::<StationId>().is_err());
        assert!("".parse::<StationId>().is_err());
        assert!("12345-berlin".parse::<StationId>().is_err());
        assert!("-5".parse::<StationId>().is_err());
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(StationId::new(2_950_159).to_string(), "2950159");
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&StationId::new(7)).expect("should serialize");
        assert_eq!(json, "7");
    }
}
