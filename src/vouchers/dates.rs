use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::Cell;

/// Spreadsheet serial for 1970-01-01 in the 1900 date system.
const UNIX_EPOCH_SERIAL: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

const TEXT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Normalizes a cell to Tally's 8-digit `YYYYMMDD` date format.
///
/// Blank cells (and numeric zero) give an empty string. When the cell
/// cannot be read as a date at all, the raw value is returned with `-`
/// and `/` stripped. That branch is a lossy best effort, not a calendar
/// date, and callers must not treat it as one.
pub fn normalize(value: &Cell) -> String {
    match value {
        Cell::Empty => String::new(),
        Cell::Number(n) if *n == 0.0 => String::new(),
        Cell::Number(n) => from_serial(*n).unwrap_or_else(|| strip_separators(&value.as_text())),
        Cell::Text(s) if s.trim().is_empty() => String::new(),
        Cell::Text(s) => from_text(s.trim()).unwrap_or_else(|| strip_separators(s.trim())),
    }
}

fn from_serial(serial: f64) -> Option<String> {
    let seconds = ((serial - UNIX_EPOCH_SERIAL) * SECONDS_PER_DAY).round() as i64;
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.format("%Y%m%d").to_string())
}

fn from_text(text: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.format("%Y%m%d").to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.format("%Y%m%d").to_string());
    }

    TEXT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(|d| d.format("%Y%m%d").to_string())
}

fn strip_separators(text: &str) -> String {
    text.chars().filter(|c| *c != '-' && *c != '/').collect()
}
