//! Structured-row adapter: tabular statements with bank-specific headers.
//!
//! Column resolution is by case-insensitive substring against known header
//! aliases, so "Transaction Date", "Posted Date" and plain "Date" all
//! resolve. Amount comes from a single amount column when present,
//! otherwise from a debit/credit pair as `credit - debit`.

use std::io::Read;

use anyhow::{Result, bail};
use log::debug;

use crate::types::ExtractedRecord;

const DATE_HEADERS: &[&str] = &[
    "date",
    "transaction date",
    "posted date",
    "trans date",
    "posting date",
];

const DESCRIPTION_HEADERS: &[&str] = &[
    "description",
    "memo",
    "transaction description",
    "details",
    "payee",
];

const AMOUNT_HEADERS: &[&str] = &["amount", "transaction amount"];

const DEBIT_HEADERS: &[&str] = &["debit", "withdrawal", "withdrawals"];

const CREDIT_HEADERS: &[&str] = &["credit", "deposit", "deposits"];

/// First header containing any candidate alias, in alias priority order.
fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    for &candidate in candidates {
        let found = headers
            .iter()
            .position(|h| h.to_lowercase().trim().contains(candidate));
        if found.is_some() {
            return found;
        }
    }
    None
}

fn cell<'a>(row: &'a [String], col: usize) -> &'a str {
    row.get(col).map(String::as_str).unwrap_or("").trim()
}

/// Strip currency symbols, comma grouping and whitespace, then parse.
/// `None` means non-numeric.
fn parse_money(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse().ok()
}

/// An empty cell is zero; a present-but-unparseable one is `None`.
fn money_or_zero(row: &[String], col: usize) -> Option<f64> {
    let raw = cell(row, col);
    if raw.is_empty() {
        Some(0.0)
    } else {
        parse_money(raw)
    }
}

/// Extract records from header-named rows.
///
/// Fails the whole file when the date or description column cannot be
/// resolved. Individual rows with an empty date, a non-numeric amount or a
/// zero amount are silently dropped; ingestion is best-effort, not
/// all-or-nothing.
pub fn parse_rows(headers: &[String], rows: &[Vec<String>]) -> Result<Vec<ExtractedRecord>> {
    let date_col = find_column(headers, DATE_HEADERS);
    let description_col = find_column(headers, DESCRIPTION_HEADERS);
    let (date_col, description_col) = match (date_col, description_col) {
        (Some(d), Some(c)) => (d, c),
        _ => bail!("Missing date or description column"),
    };
    let amount_col = find_column(headers, AMOUNT_HEADERS);
    let debit_col = find_column(headers, DEBIT_HEADERS);
    let credit_col = find_column(headers, CREDIT_HEADERS);

    let mut out = Vec::new();
    for row in rows {
        let date = cell(row, date_col);
        let description = cell(row, description_col);

        let amount_cell = amount_col.map(|c| cell(row, c)).filter(|s| !s.is_empty());
        let amount = if let Some(raw) = amount_cell {
            parse_money(raw)
        } else if let (Some(d), Some(c)) = (debit_col, credit_col) {
            match (money_or_zero(row, d), money_or_zero(row, c)) {
                (Some(debit), Some(credit)) => Some(credit - debit),
                _ => None,
            }
        } else {
            None
        };

        match amount {
            Some(amount) if !date.is_empty() && amount != 0.0 && amount.is_finite() => {
                out.push(ExtractedRecord {
                    date: date.to_string(),
                    description: description.to_string(),
                    amount,
                });
            }
            _ => debug!("dropping row with date {date:?}: no usable amount"),
        }
    }
    Ok(out)
}

/// Read a CSV statement: header row first, then data rows.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<ExtractedRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    parse_rows(&headers, &rows)
}
