//! Unstructured-text adapter: line-pattern extraction from extracted
//! statement text.
//!
//! Each line needs a recognizable date and at least one amount-like token
//! after it. When a line carries several amounts (say a charge followed by
//! a running balance), the last one is the transaction amount. That
//! tie-break is deliberate, not an accident of iteration order.

use anyhow::Result;
use log::debug;
use regex::Regex;

use crate::types::ExtractedRecord;

const MIN_LINE_LEN: usize = 10;
const MAX_DESCRIPTION_LEN: usize = 100;

/// An amount-like token and where it sits in the remainder.
struct AmountHit {
    start: usize,
    end: usize,
    value: f64,
}

/// Parse extracted statement text into records, one per matching line.
pub fn parse_text(text: &str) -> Result<Vec<ExtractedRecord>> {
    // Priority order: numeric slash/dash, ISO, "Mon D, YYYY", "D Mon YYYY".
    let date_patterns = [
        Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}")?,
        Regex::new(r"\d{4}[/-]\d{1,2}[/-]\d{1,2}")?,
        Regex::new(r"[A-Za-z]{3}\s+\d{1,2},?\s+\d{4}")?,
        Regex::new(r"\d{1,2}\s+[A-Za-z]{3}\s+\d{4}")?,
    ];
    let plain_amount = Regex::new(r"\$?\s*(-?\d{1,3}(?:,\d{3})*(?:\.\d{2})?)")?;
    let paren_amount = Regex::new(r"\((\d{1,3}(?:,\d{3})*(?:\.\d{2})?)\)")?;

    let mut out = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.len() < MIN_LINE_LEN {
            continue;
        }

        let Some(date_match) = date_patterns.iter().find_map(|p| p.find(line)) else {
            continue;
        };
        let remainder = &line[date_match.end()..];

        // Plain hits first, then parenthesized (negative) ones, so a
        // parenthesized amount wins the tie-break over anything before it.
        let mut hits: Vec<AmountHit> = Vec::new();
        for (pattern, negate) in [(&plain_amount, false), (&paren_amount, true)] {
            for caps in pattern.captures_iter(remainder) {
                let whole = caps.get(0).unwrap();
                let token = caps.get(1).unwrap().as_str().replace(',', "");
                if let Ok(value) = token.parse::<f64>() {
                    hits.push(AmountHit {
                        start: whole.start(),
                        end: whole.end(),
                        value: if negate { -value } else { value },
                    });
                }
            }
        }
        let Some(amount) = hits.last().map(|h| h.value) else {
            continue;
        };

        let description = strip_amounts(remainder, &hits);
        if description.is_empty() || amount == 0.0 || !amount.is_finite() {
            debug!("dropping line {line:?}: empty description or zero amount");
            continue;
        }

        out.push(ExtractedRecord {
            date: date_match.as_str().to_string(),
            description,
            amount,
        });
    }

    Ok(out)
}

/// The remainder with every amount token and stray currency symbol
/// removed, trimmed and truncated to the description limit.
fn strip_amounts(remainder: &str, hits: &[AmountHit]) -> String {
    let mut spans: Vec<(usize, usize)> = hits.iter().map(|h| (h.start, h.end)).collect();
    spans.sort_unstable();

    let mut kept = String::new();
    let mut pos = 0;
    for (start, end) in spans {
        if end <= pos {
            continue;
        }
        kept.push_str(&remainder[pos..start.max(pos)]);
        pos = end;
    }
    kept.push_str(&remainder[pos..]);

    kept.retain(|c| c != '$' && c != ',');
    kept.trim().chars().take(MAX_DESCRIPTION_LEN).collect()
}
