//! Entities - forecast records assembled from the forecast page

mod forecast;

pub use forecast::{NextDaysData, NextHoursData, NextHoursDaysData};
