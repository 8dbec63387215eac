//! Plain-text forecast output

use std::fmt;

use domain::{NextDaysData, NextHoursDaysData};

/// Displays a forecast as an hourly and a daily section
#[derive(Debug)]
pub struct ForecastTable<'a>(pub &'a NextHoursDaysData);

impl fmt::Display for ForecastTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let forecast = self.0;

        if !forecast.hours().is_empty() {
            writeln!(f, "🕐 Next hours:")?;
            for hour in forecast.hours() {
                writeln!(
                    f,
                    "   {}  {:>5.1} °C  {:>3.0} %  {}",
                    hour.time_label(),
                    hour.temperature,
                    hour.chance_of_rain * 100.0,
                    hour.sky
                )?;
            }
        }

        if !forecast.days().is_empty() {
            if !forecast.hours().is_empty() {
                writeln!(f)?;
            }
            writeln!(f, "📅 Next days:")?;
            for day in forecast.days() {
                write_day(f, day)?;
            }
        }

        Ok(())
    }
}

fn write_day(f: &mut fmt::Formatter<'_>, day: &NextDaysData) -> fmt::Result {
    writeln!(
        f,
        "   {} {}: {} to {} °C, wind {} (max {} km/h), rain {} mm",
        day.friendly_name,
        day.date,
        day.temp_min,
        day.temp_max,
        day.avg_wind,
        day.max_wind,
        day.amount_rain
    )?;
    writeln!(
        f,
        "      morning {}, afternoon {}, evening {}",
        day.morning, day.afternoon, day.evening
    )?;
    if !day.risks.is_empty() {
        let risks: Vec<&str> = day.risks.iter().map(|risk| risk.symbol.as_str()).collect();
        writeln!(f, "      ⚠️  risks: {}", risks.join(", "))?;
    }
    Ok(())
}
