//! Transaction splitting with amount reconciliation.
//!
//! A split replaces one record with several children whose absolute amounts
//! sum back to the original's. Any shortfall between the requested parts
//! and the original total becomes an implicit remainder part; the
//! reconciliation is mandatory, not a validation error.

use anyhow::{Context, Result, bail};

use crate::store::TransactionStore;
use crate::transaction::Transaction;

/// Where the implicit remainder lands.
pub const REMAINDER_CATEGORY: &str = "Other Operating Expenses";

/// One requested slice of the original amount, always positive.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPart {
    pub category: String,
    pub amount: f64,
}

impl SplitPart {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// Split a record into `parts`, plus an implicit remainder when the parts
/// do not cover the original's absolute amount within a cent.
///
/// Children keep the original's date, direction, confidence and excluded
/// flag, get a `(Split i/N)` description suffix, and are auto-approved,
/// bypassing the pending-review stage. Returns the child ids.
pub fn split_transaction(
    store: &mut TransactionStore,
    id: u64,
    parts: Vec<SplitPart>,
) -> Result<Vec<u64>> {
    if parts.is_empty() {
        bail!("Please add at least one split part.");
    }
    for part in &parts {
        if part.category.trim().is_empty() || !part.amount.is_finite() || part.amount <= 0.0 {
            bail!("Please complete all split parts.");
        }
    }

    let original = store.get(id).context("transaction not found")?.clone();

    let transaction_total = original.amount.abs();
    let split_total: f64 = parts.iter().map(|p| p.amount).sum();
    let difference = transaction_total - split_total;

    let mut final_parts = parts;
    if difference.abs() > 0.01 {
        final_parts.push(SplitPart::new(REMAINDER_CATEGORY, difference));
    }

    store.remove(id);

    let count = final_parts.len();
    let sign = if original.amount > 0.0 { 1.0 } else { -1.0 };
    let mut child_ids = Vec::with_capacity(count);
    for (i, part) in final_parts.into_iter().enumerate() {
        let child = Transaction {
            id: 0, // assigned by the store
            date: original.date.clone(),
            description: format!("{} (Split {}/{})", original.description, i + 1, count),
            amount: sign * part.amount,
            category: part.category,
            confidence: original.confidence,
            approved: true,
            excluded: original.excluded,
            is_split: true,
        };
        child_ids.push(store.push_raw(child));
    }
    Ok(child_ids)
}
