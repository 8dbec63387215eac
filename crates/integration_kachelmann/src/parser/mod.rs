//! Forecast fragment parser
//!
//! The forecast endpoint returns an HTML fragment with two containers: the
//! upcoming hours below `div.nexthours-scroll` and the upcoming days below
//! `div.day-row`. Every field is read through a named [`Query`] and a missing
//! or duplicated landmark fails the whole parse, so a changed page layout is
//! never mistaken for an empty forecast.

mod query;
mod text;

use domain::{NextDaysData, NextHoursData, NextHoursDaysData, SkyData, WindData};
use scraper::{ElementRef, Html};
use tracing::debug;

use self::query::{Query, Step};
use self::text::{number_before, parse_time};
pub use self::text::{TextSource, extract_symbol, text_content};
use crate::error::ParseError;

const HOURS_CONTAINER: Query = Query::new("nexthours-scroll", &[Step::div("nexthours-scroll")]);
const HOUR_BLOCKS: Query = Query::new("hour", &[Step::any_div(), Step::any_div()]);
const HOUR_TIME: Query = Query::new("fc-hours", &[Step::div("fc-hours")]);
const HOUR_SYMBOL: Query = Query::new("fc-symbol", &[Step::div("fc-symbol")]);
const HOUR_SYMBOL_IMAGE: Query = Query::new("fc-symbol img", &[Step::img()]);
const HOUR_TEMP: Query = Query::new("fc-temp", &[Step::div("fc-temp")]);
const HOUR_RAIN: Query = Query::new("fc-rain", &[Step::div("fc-rain")]);

const DAYS_CONTAINER: Query = Query::new("day-row", &[Step::div("day-row")]);
const DAY_BLOCKS: Query = Query::new("day", &[Step::any_div(), Step::any_div()]);
const DAY_HEADING: Query = Query::new("panel-heading", &[Step::div("panel-heading")]);
const DAY_BODY: Query = Query::new("panel-body", &[Step::div("panel-body")]);
const DAY_MORNING: Query = Query::new(
    "wsymbol-morning img",
    &[Step::div("wsymbol-morning"), Step::img()],
);
const DAY_AFTERNOON: Query = Query::new(
    "wsymbol-afternoon img",
    &[Step::div("wsymbol-afternoon"), Step::img()],
);
const DAY_EVENING: Query = Query::new(
    "wsymbol-evening img",
    &[Step::div("wsymbol-evening"), Step::img()],
);
const DAY_MINMAX: Query = Query::new("day-temp-maxmin", &[Step::div("day-temp-maxmin")]);
const DAY_TEMP_MAX: Query = Query::new(
    "day-temp-max",
    &[Step::div("day-temp-max"), Step::div("day-fc-temp")],
);
const DAY_TEMP_MIN: Query = Query::new(
    "day-temp-min",
    &[Step::div("day-temp-min"), Step::div("day-fc-temp")],
);
const DAY_RISKS_WINDRAIN: Query = Query::new("day-risks", &[Step::div("day-risks"), Step::any_div()]);
const DAY_RISK_IMAGES: Query = Query::new(
    "day-fc-symbol img",
    &[Step::div("day-fc-symbol"), Step::img()],
);
const DAY_WINDRAIN: Query = Query::new("windrain fc-rain", &[Step::div("fc-rain")]);

/// Parse a forecast fragment into hours and days in page order
///
/// # Errors
///
/// Returns a [`ParseError`] naming the first field whose landmark is missing
/// or whose value cannot be read.
pub fn parse_next_hours_days(html: &str) -> Result<NextHoursDaysData, ParseError> {
    let fragment = Html::parse_fragment(html);
    let root = fragment.root_element();

    let mut hours = Vec::new();
    for container in HOURS_CONTAINER.at_least_one(root)? {
        for block in HOUR_BLOCKS.elements(container) {
            hours.push(parse_hour(block)?);
        }
    }

    let mut days = Vec::new();
    for container in DAYS_CONTAINER.at_least_one(root)? {
        for block in DAY_BLOCKS.elements(container) {
            days.push(parse_day(block)?);
        }
    }

    debug!(hours = hours.len(), days = days.len(), "Parsed forecast fragment");
    Ok(NextHoursDaysData::new(hours, days))
}

/// Parse one hourly block
///
/// # Errors
///
/// Returns a [`ParseError`] for the first missing or malformed field.
pub fn parse_hour(block: ElementRef<'_>) -> Result<NextHoursData, ParseError> {
    let (hours, minutes) = parse_time(
        HOUR_TIME.field(),
        &text_content(HOUR_TIME.one_text(block)?),
    )?;

    let symbol = HOUR_SYMBOL.one(block)?;
    let img = HOUR_SYMBOL_IMAGE.one(symbol)?;
    let friendly_name = symbol
        .value()
        .attr("title")
        .or_else(|| img.value().attr("title"))
        .or_else(|| img.value().attr("alt"));
    let sky = SkyData {
        friendly_name: non_empty(friendly_name),
        symbol: image_symbol(HOUR_SYMBOL_IMAGE.field(), img)?,
    };

    let temperature = number_before(
        HOUR_TEMP.field(),
        &text_content(HOUR_TEMP.one_text(block)?),
        '°',
    )?;
    let chance_of_rain = number_before(
        HOUR_RAIN.field(),
        &text_content(HOUR_RAIN.one_text(block)?),
        '%',
    )? / 100.0;

    Ok(NextHoursData {
        hours,
        minutes,
        sky,
        temperature,
        chance_of_rain,
    })
}

/// Parse one daily panel
///
/// # Errors
///
/// Returns a [`ParseError`] for the first missing or malformed field.
pub fn parse_day(block: ElementRef<'_>) -> Result<NextDaysData, ParseError> {
    let [friendly_name, date] = DAY_HEADING.texts_exactly(block)?;
    let body = DAY_BODY.one(block)?;

    let morning = day_sky(DAY_MORNING, body)?;
    let afternoon = day_sky(DAY_AFTERNOON, body)?;
    let evening = day_sky(DAY_EVENING, body)?;

    let minmax = DAY_MINMAX.one(body)?;
    let temp_max = number_before(
        DAY_TEMP_MAX.field(),
        &text_content(DAY_TEMP_MAX.one_text(minmax)?),
        '°',
    )?;
    let temp_min = number_before(
        DAY_TEMP_MIN.field(),
        &text_content(DAY_TEMP_MIN.one_text(minmax)?),
        '°',
    )?;

    let [risks, windrain] = DAY_RISKS_WINDRAIN.exactly(body)?;
    let risks = DAY_RISK_IMAGES
        .elements(risks)
        .into_iter()
        .map(|img| image_symbol(DAY_RISK_IMAGES.field(), img).map(SkyData::symbol_only))
        .collect::<Result<Vec<_>, _>>()?;

    let [avg_wind, max_wind, amount_rain] = DAY_WINDRAIN.texts_exactly(windrain)?;
    let avg_wind = parse_wind("avg_wind", &text_content(avg_wind))?;
    let max_wind = number_before("max_wind", &text_content(max_wind), 'k')?;
    let amount_rain = number_before("amount_rain", &text_content(amount_rain), 'm')?;

    Ok(NextDaysData {
        friendly_name: text_content(friendly_name),
        date: text_content(date),
        temp_min,
        temp_max,
        avg_wind,
        max_wind,
        amount_rain,
        risks,
        morning,
        afternoon,
        evening,
    })
}

/// Condition of a day period; the image's alt text is its name
fn day_sky(query: Query, body: ElementRef<'_>) -> Result<SkyData, ParseError> {
    let img = query.one(body)?;
    Ok(SkyData {
        friendly_name: non_empty(img.value().attr("alt")),
        symbol: image_symbol(query.field(), img)?,
    })
}

fn image_symbol(field: &'static str, img: ElementRef<'_>) -> Result<String, ParseError> {
    let src = img.value().attr("src").ok_or(ParseError::MissingAttribute {
        field,
        attribute: "src",
    })?;
    extract_symbol(field, src)
}

/// Speed in front of the unit and the direction word after it
///
/// `"16 km/h SW"` gives 16 km/h from `sw`.
fn parse_wind(field: &'static str, text: &str) -> Result<WindData, ParseError> {
    let speed = number_before(field, text, 'k')?;
    let direction = text
        .split_once('k')
        .and_then(|(_, unit_and_rest)| unit_and_rest.split_whitespace().nth(1))
        .map(str::to_lowercase);

    Ok(WindData { direction, speed })
}

fn non_empty(text: Option<&str>) -> Option<String> {
    Some(text_content(text)).filter(|text| !text.is_empty())
}
