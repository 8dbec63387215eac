//! Sky condition and wind value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sky condition as shown by a forecast symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkyData {
    /// Human readable condition, e.g. "bedeckt" (absent for risk symbols)
    pub friendly_name: Option<String>,
    /// Short condition code taken from the symbol file name, e.g. "overcast"
    pub symbol: String,
}

impl SkyData {
    /// Create a condition with a human readable name
    #[must_use]
    pub fn named(friendly_name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            friendly_name: Some(friendly_name.into()),
            symbol: symbol.into(),
        }
    }

    /// Create a condition that only carries a symbol code
    #[must_use]
    pub fn symbol_only(symbol: impl Into<String>) -> Self {
        Self {
            friendly_name: None,
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for SkyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.friendly_name {
            Some(name) => write!(f, "{name} ({})", self.symbol),
            None => write!(f, "{}", self.symbol),
        }
    }
}

/// Wind speed with an optional compass direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindData {
    /// Compass direction in lower case, e.g. "sw", when the page states one
    pub direction: Option<String>,
    /// Speed in km/h
    pub speed: f64,
}

impl fmt::Display for WindData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.direction {
            Some(direction) => write!(f, "{} km/h {}", self.speed, direction.to_uppercase()),
            None => write!(f, "{} km/h", self.speed),
        }
    }
}
