//! Short-term forecast records
//!
//! One [`NextHoursDaysData`] is produced per forecast page: the upcoming
//! hours followed by the upcoming days, both in page (chronological) order.

use serde::{Deserialize, Serialize};

use crate::value_objects::{SkyData, WindData};

/// Forecast for a single upcoming hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextHoursData {
    /// Hour of day (0-23)
    pub hours: u8,
    /// Minute of the hour
    pub minutes: u8,
    /// Expected sky condition
    pub sky: SkyData,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Probability of rain as a fraction in [0, 1]
    pub chance_of_rain: f64,
}

impl NextHoursData {
    /// Time of day formatted as `HH:MM`
    #[must_use]
    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Forecast for a single upcoming day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextDaysData {
    /// Day label, e.g. "Montag"
    pub friendly_name: String,
    /// Date label, e.g. "2. April"
    pub date: String,
    /// Minimum temperature in degrees Celsius
    pub temp_min: f64,
    /// Maximum temperature in degrees Celsius
    pub temp_max: f64,
    /// Average wind
    pub avg_wind: WindData,
    /// Maximum wind speed in km/h
    pub max_wind: f64,
    /// Rainfall in millimeters
    pub amount_rain: f64,
    /// Weather risks (symbol only)
    pub risks: Vec<SkyData>,
    /// Morning condition
    pub morning: SkyData,
    /// Afternoon condition
    pub afternoon: SkyData,
    /// Evening condition
    pub evening: SkyData,
}

/// Hourly and daily forecast for one station
///
/// Immutable once built; the caller owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextHoursDaysData {
    hours: Vec<NextHoursData>,
    days: Vec<NextDaysData>,
}

impl NextHoursDaysData {
    /// Assemble a forecast from hours and days in chronological order
    #[must_use]
    pub const fn new(hours: Vec<NextHoursData>, days: Vec<NextDaysData>) -> Self {
        Self { hours, days }
    }

    /// Upcoming hours, earliest first
    #[must_use]
    pub fn hours(&self) -> &[NextHoursData] {
        &self.hours
    }

    /// Upcoming days, earliest first
    #[must_use]
    pub fn days(&self) -> &[NextDaysData] {
        &self.days
    }

    /// Whether the page contained neither hours nor days
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty() && self.days.is_empty()
    }

    /// Split into the hourly and daily parts
    #[must_use]
    pub fn into_parts(self) -> (Vec<NextHoursData>, Vec<NextDaysData>) {
        (self.hours, self.days)
    }
}
