//! The transaction record and its lifecycle flags.

use serde::{Deserialize, Serialize};

use crate::classifier::Confidence;
use crate::dates;
use crate::merchant::normalize_merchant;

/// A single ingested record.
///
/// `approved` and `excluded` are deliberately independent booleans: a record
/// can be both at once, and exclusion always wins for calculation inclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique and stable for the record's lifetime.
    pub id: u64,
    /// Date text as it appeared in the source.
    pub date: String,
    pub description: String,
    /// Positive = inflow, negative = outflow. Never zero after ingestion.
    pub amount: f64,
    pub category: String,
    pub confidence: Confidence,
    pub approved: bool,
    pub excluded: bool,
    #[serde(rename = "isSplit")]
    pub is_split: bool,
}

impl Transaction {
    pub fn is_inflow(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }

    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    /// Normalized merchant key for grouping and learned rules.
    pub fn merchant(&self) -> String {
        normalize_merchant(&self.description)
    }

    /// `YYYY-MM` aggregation key, `None` when the date text is unreadable.
    pub fn month_key(&self) -> Option<String> {
        dates::month_key(&self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(amount: f64) -> Transaction {
        Transaction {
            id: 1,
            date: "2024-01-15".to_string(),
            description: "Stripe Payment".to_string(),
            amount,
            category: "Payment Processing Fees".to_string(),
            confidence: Confidence::High,
            approved: false,
            excluded: false,
            is_split: false,
        }
    }

    #[test]
    fn test_direction_from_sign() {
        assert!(txn(100.0).is_inflow());
        assert!(txn(-100.0).is_outflow());
        assert_eq!(txn(-29.99).abs_amount(), 29.99);
    }

    #[test]
    fn test_month_key() {
        assert_eq!(txn(-1.0).month_key().as_deref(), Some("2024-01"));
        let mut t = txn(-1.0);
        t.date = "??".to_string();
        assert_eq!(t.month_key(), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let original = txn(-29.99);
        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("\"isSplit\":false"));
        assert!(json.contains("\"confidence\":\"high\""));
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_flags_are_orthogonal() {
        let mut t = txn(-1.0);
        t.approved = true;
        t.excluded = true;
        // Approved-and-excluded stays representable.
        assert!(t.approved && t.excluded);
    }
}
