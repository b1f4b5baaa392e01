//! Date conversions between the form (`YYYY-MM-DD`), the astrology API
//! (`DD/MM/YYYY`) and the assorted timestamp shapes the API hands back.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const FORM_FORMAT: &str = "%Y-%m-%d";
const API_FORMAT: &str = "%d/%m/%Y";

const DATE_FORMATS: &[&str] = &[
    "%a %b %d %Y",
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%b %d %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%a %b %d %Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// `1994-03-11` -> `11/03/1994`.
pub fn to_api_date(iso: &str) -> Option<String> {
    NaiveDate::parse_from_str(iso.trim(), FORM_FORMAT)
        .ok()
        .map(format_api_date)
}

/// `11/03/1994` -> `1994-03-11`.
pub fn from_api_date(api: &str) -> Option<String> {
    NaiveDate::parse_from_str(api.trim(), API_FORMAT)
        .ok()
        .map(|date| date.format(FORM_FORMAT).to_string())
}

pub fn format_api_date(date: NaiveDate) -> String {
    date.format(API_FORMAT).to_string()
}

/// Date as printed in report tables.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Parses the dates that appear inside API payloads (dasha boundaries,
/// sade sati phases). Any time-of-day part is dropped.
pub fn parse_api_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        })
}

/// Reformats an API timestamp for display, leaving unknown shapes untouched.
pub fn display_api_timestamp(raw: &str) -> String {
    parse_api_timestamp(raw)
        .map(display_date)
        .unwrap_or_else(|| raw.trim().to_string())
}
