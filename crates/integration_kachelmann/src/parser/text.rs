//! Text extraction and number parsing helpers

use std::borrow::Cow;

use scraper::ElementRef;

use crate::error::ParseError;

/// Anything text can be taken from
#[derive(Debug, Clone, Copy)]
pub enum TextSource<'a> {
    /// Rendered text of an element and its descendants
    Element(ElementRef<'a>),
    /// UTF-8 bytes, decoded lossily
    Bytes(&'a [u8]),
    /// Text as is
    Str(&'a str),
    /// Nothing; yields an empty string
    Absent,
}

impl<'a> From<ElementRef<'a>> for TextSource<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self::Element(element)
    }
}

impl<'a> From<&'a str> for TextSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::Str(text)
    }
}

impl<'a> From<&'a [u8]> for TextSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a, T: Into<TextSource<'a>>> From<Option<T>> for TextSource<'a> {
    fn from(source: Option<T>) -> Self {
        source.map_or(Self::Absent, Into::into)
    }
}

/// Text of `source` with non-breaking spaces turned into spaces, trimmed
pub fn text_content<'a>(source: impl Into<TextSource<'a>>) -> String {
    let raw: Cow<'_, str> = match source.into() {
        TextSource::Element(element) => Cow::Owned(element.text().collect()),
        TextSource::Bytes(bytes) => String::from_utf8_lossy(bytes),
        TextSource::Str(text) => Cow::Borrowed(text),
        TextSource::Absent => Cow::Borrowed(""),
    };

    raw.replace('\u{A0}', " ").trim().to_string()
}

/// Parse a decimal number, accepting a comma as decimal separator
pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim();
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ParseError::invalid(field, trimmed))
}

/// Parse the number in front of the first `unit` character
///
/// `"3.5 °C"` with `'°'` gives `3.5`, as does `"3.5"` without any unit.
pub fn number_before(field: &'static str, text: &str, unit: char) -> Result<f64, ParseError> {
    let head = text.split_once(unit).map_or(text, |(head, _)| head);
    parse_number(field, head)
}

/// Parse `HH:MM` from the first word of `text`
pub fn parse_time(field: &'static str, text: &str) -> Result<(u8, u8), ParseError> {
    let invalid = || ParseError::invalid(field, text);

    let word = text.split_whitespace().next().ok_or_else(invalid)?;
    let (hours, minutes) = word.split_once(':').ok_or_else(invalid)?;
    let hours: u8 = hours.parse().map_err(|_| invalid())?;
    let minutes: u8 = minutes.parse().map_err(|_| invalid())?;

    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok((hours, minutes))
}

/// Condition code from a symbol image path
///
/// The file stem is split on `_`; the leading prefix and any numeric
/// segments after it are dropped and the rest is kept, so
/// `.../wsymbol_0_overcast.png` gives `overcast` and `risk_1_heavy_rain.svg`
/// gives `heavy_rain`.
pub fn extract_symbol(field: &'static str, src: &str) -> Result<String, ParseError> {
    let file = src.rsplit('/').next().unwrap_or_default();
    let stem = file.split('.').next().unwrap_or_default();

    let code = stem
        .split('_')
        .skip(1)
        .skip_while(|segment| segment.bytes().all(|b| b.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join("_");

    if code.is_empty() {
        return Err(ParseError::invalid(field, src));
    }
    Ok(code)
}
