//! Flexible calendar-date parsing for the formats ingestion accepts.
//!
//! Dates stay in the record as original text; this parse exists for the
//! monthly aggregation, which skips anything it cannot read.

use chrono::NaiveDate;

/// Formats tried in order: ISO, numeric slash/dash (two- and four-digit
/// years), "Mon D, YYYY" and "D Mon YYYY".
const FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%m-%d-%y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
];

/// Parse a date in any supported form, or `None`.
pub fn parse_flexible(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `YYYY-MM` aggregation key for a raw date string, when parseable.
pub fn month_key(raw: &str) -> Option<String> {
    parse_flexible(raw).map(|d| d.format("%Y-%m").to_string())
}
