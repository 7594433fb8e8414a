// used for date values and date spans
use chrono::{Datelike, NaiveDate};
// used to escape values embedded in the path and the fragment
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
// used to (de)serialize the schema and the state
use serde::{Deserialize, Serialize};
// used to print out readable forms of a data type
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::schema::FindKey;

lazy_static! {
    static ref SPAN_CHARACTERS: Regex = Regex::new(r"^[0-9.:,-]+$").unwrap();
    static ref DIGIT_HYPHEN: Regex = Regex::new(r"[0-9]-").unwrap();
    static ref SEVEN_DIGITS: Regex = Regex::new(r"^[0-9]{7}$").unwrap();
    static ref BARE_INTEGER: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

// ------------- Value Types --------------
/// The type of a searchable field, deciding how condition values are canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Boolean,
    Date,
    Enum,
    Float,
    Integer,
    String,
    Text,
    Time,
    Year,
}

impl ValueType {
    /// Whether a comma in a condition value denotes a `from,to` range.
    pub fn is_rangeable(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::Enum | Self::Float | Self::Integer | Self::Time | Self::Year
        )
    }
}
impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Enum => "enum",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Text => "text",
            Self::Time => "time",
            Self::Year => "year",
        };
        write!(f, "{}", name)
    }
}

/// Turns a decoded condition value into its canonical form for the given key.
///
/// Enum values are canonicalized to the index of the matching declared value
/// (case-insensitive, falling back to the first one).
pub fn parse_value(raw: &str, key: &FindKey) -> String {
    match key.value_type() {
        ValueType::Boolean => (!(raw.is_empty() || raw == "false")).to_string(),
        ValueType::Date => match parse_date(raw) {
            Some(date) => format_date(&date),
            None => raw.to_owned(),
        },
        ValueType::Enum => {
            let lower = raw.to_lowercase();
            key.values()
                .iter()
                .position(|value| value.to_lowercase() == lower)
                .unwrap_or(0)
                .to_string()
        }
        ValueType::Float => parse_number(raw).unwrap_or(0.).to_string(),
        ValueType::Integer => parse_number(raw).map(|n| n.round() as i64).unwrap_or(0).to_string(),
        ValueType::Time => format_duration(parse_duration(raw).unwrap_or(0)),
        ValueType::Year => parse_number(raw).map(|n| n.round() as i64).unwrap_or(1970).to_string(),
        ValueType::String | ValueType::Text => raw.to_owned(),
    }
}

/// The inverse of [`parse_value`], before escaping.
pub fn construct_value(value: &str, key: &FindKey) -> String {
    match key.value_type() {
        ValueType::Enum => value
            .parse::<usize>()
            .ok()
            .and_then(|index| key.values().get(index))
            .cloned()
            .unwrap_or_else(|| value.to_owned()),
        _ => value.to_owned(),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

// ------------- Escaping --------------
/*
Values embedded in a path travel through the find grammar, so every character
that is meaningful to it is percent-escaped. On top of that, spaces become
underscores for readability, which requires literal underscores to be moved
out of the way first (they travel as a tab, %09). The comparison characters
< and > would otherwise be read as operators, so they are carried as the two
control bytes %0E and %0F.

Tabs and the bytes 0x0E, 0x0F can therefore not be represented in a value.
*/
const VALUE: &AsciiSet = &CONTROLS
    .add(b'%')
    .add(b'&')
    .add(b'|')
    .add(b'(')
    .add(b')')
    .add(b'=')
    .add(b'*')
    .add(b'/')
    .add(b'#')
    .add(b',');

pub fn encode_value(value: &str) -> String {
    let mapped: String = value
        .chars()
        .map(|c| match c {
            '_' => '\t',
            ' ' => '_',
            '<' => '\u{0E}',
            '>' => '\u{0F}',
            c => c,
        })
        .collect();
    utf8_percent_encode(&mapped, VALUE).to_string()
}

pub fn decode_value(value: &str) -> String {
    percent_decode(value)
        .replace('_', " ")
        .replace('\t', "_")
        .replace('\u{0E}', "<")
        .replace('\u{0F}', ">")
}

/// Percent-decodes, keeping the raw text when the escapes do not form valid UTF-8.
pub fn percent_decode(value: &str) -> String {
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_owned(),
    }
}

// ------------- Dates and Durations --------------
/// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, missing components defaulting to the first.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(month) => month.parse::<u32>().ok()?,
        None => 1,
    };
    let day = match parts.next() {
        Some(day) => day.parse::<u32>().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Years past 9999 are written without the sign chrono would put in front.
pub fn format_date(date: &NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parses `[[[D:]H:]M:]S[.fff]` into whole milliseconds.
pub fn parse_duration(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, body) = match raw.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, raw),
    };
    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() > 4 {
        return None;
    }
    let mut seconds = 0.;
    for (part, factor) in parts.iter().rev().zip([1., 60., 3600., 86400.]) {
        if part.is_empty() || part.starts_with(['-', '+']) {
            return None;
        }
        seconds += part.parse::<f64>().ok().filter(|n| n.is_finite())? * factor;
    }
    let millis = (seconds * 1000.).round() as i64;
    Some(if negative { -millis } else { millis })
}

/// Formats milliseconds as `H:MM:SS`, adding `.mmm` only when there is a fraction.
pub fn format_duration(millis: i64) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let millis = millis.unsigned_abs();
    let (hours, rest) = (millis / 3_600_000, millis % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    let (seconds, fraction) = (rest / 1000, rest % 1000);
    if fraction == 0 {
        format!("{}{}:{:02}:{:02}", sign, hours, minutes, seconds)
    } else {
        format!("{}{}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, fraction)
    }
}

// ------------- Span Types --------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanType {
    Date,
    Duration,
    Location,
    Number,
}
impl fmt::Display for SpanType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Date => "date",
            Self::Duration => "duration",
            Self::Location => "location",
            Self::Number => "number",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: lat.clamp(-90., 90.),
            lng: lng.clamp(-180., 180.),
        }
    }
}

/// One position within a view. A span is one or two of these: a time range,
/// a calendar range, a map point or a bounding box given by two corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanPoint {
    Date(NaiveDate),
    /// Seconds, with millisecond precision.
    Duration(f64),
    Location(LatLng),
    Number(i64),
    /// A span the host resolved from a name, such as an annotation or place id.
    Name(String),
}

impl SpanPoint {
    pub fn span_type(&self) -> Option<SpanType> {
        match self {
            Self::Date(_) => Some(SpanType::Date),
            Self::Duration(_) => Some(SpanType::Duration),
            Self::Location(_) => Some(SpanType::Location),
            Self::Number(_) => Some(SpanType::Number),
            Self::Name(_) => None,
        }
    }
}
impl fmt::Display for SpanPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", format_date(date)),
            Self::Duration(seconds) => write!(f, "{}", format_duration((seconds * 1000.).round() as i64)),
            Self::Location(point) => write!(f, "{},{}", point.lat, point.lng),
            Self::Number(number) => write!(f, "{}", number),
            Self::Name(name) => write!(f, "{}", encode_value(name)),
        }
    }
}

/// Whether a path segment consists only of characters a numerical span may use.
pub fn is_numerical_span(segment: &str) -> bool {
    SPAN_CHARACTERS.is_match(segment)
}

/// Guesses the span type of a numerical literal, restricted to the candidate types.
pub fn infer_span_type(raw: &str, candidates: &[SpanType]) -> Option<SpanType> {
    let can_be = |span_type: SpanType| candidates.contains(&span_type);
    let length = raw.split(',').count();
    if can_be(SpanType::Date) && DIGIT_HYPHEN.is_match(raw) {
        Some(SpanType::Date)
    } else if can_be(SpanType::Duration) && raw.contains(':') {
        Some(SpanType::Duration)
    } else if can_be(SpanType::Location) && length == 4 {
        Some(SpanType::Location)
    }
    // leaves us with [-]D[.D][,[-]D[.D]]
    else if can_be(SpanType::Duration) {
        Some(SpanType::Duration)
    } else if can_be(SpanType::Date) && !raw.contains('.') && !SEVEN_DIGITS.is_match(raw) {
        Some(SpanType::Date)
    } else if can_be(SpanType::Location) && length == 2 {
        Some(SpanType::Location)
    } else if can_be(SpanType::Number) && BARE_INTEGER.is_match(raw) {
        Some(SpanType::Number)
    } else {
        None
    }
}

pub fn parse_span(raw: &str, span_type: SpanType) -> Option<Vec<SpanPoint>> {
    let parts: Vec<&str> = raw.split(',').collect();
    match span_type {
        SpanType::Location => {
            if parts.len() != 2 && parts.len() != 4 {
                return None;
            }
            parts
                .chunks(2)
                .map(|pair| {
                    let lat = parse_number(pair[0])?;
                    let lng = parse_number(pair[1])?;
                    Some(SpanPoint::Location(LatLng::new(lat, lng)))
                })
                .collect()
        }
        SpanType::Date => parts.iter().map(|part| parse_date(part).map(SpanPoint::Date)).collect(),
        SpanType::Duration => parts
            .iter()
            .map(|part| parse_duration(part).map(|millis| SpanPoint::Duration(millis as f64 / 1000.)))
            .collect(),
        SpanType::Number => parts
            .iter()
            .map(|part| {
                part.parse::<i64>()
                    .ok()
                    .or_else(|| parse_number(part).map(|n| n.trunc() as i64))
                    .map(SpanPoint::Number)
            })
            .collect(),
    }
}

pub fn format_span(span: &[SpanPoint]) -> String {
    span.iter().map(|point| point.to_string()).collect::<Vec<_>>().join(",")
}
