//! Categorization rule engine: learned merchant rules plus an ordered
//! keyword classifier.
//!
//! Keyword rules are data, not an if/else chain: each entry pairs a set of
//! substring needles with the category it assigns. The first matching entry
//! wins, so table order is the tie-break policy ("loan payment" is tested
//! before "payment" ever could be).

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::merchant::normalize_merchant;

/// Heuristic trust level attached to an auto-assigned category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(rename = "high")]
    High,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "low")]
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// Ordered inflow rules (amount > 0). First match wins.
const INFLOW_RULES: &[(&[&str], &str)] = &[
    (&["equity", "investment", "investor"], "Equity Investment"),
    (&["loan", "borrowed", "debt received"], "Loan/Debt Received"),
    (&["grant"], "Grant Funding"),
    (&["interest income", "interest earned"], "Interest Income"),
    (&["subscription", "recurring"], "SaaS/Subscription Revenue"),
    (&["consulting"], "Consulting Revenue"),
    (&["service"], "Service Revenue"),
];

const INFLOW_FALLBACK: &str = "Other Income";

/// Ordered outflow rules (amount <= 0). First match wins.
const OUTFLOW_RULES: &[(&[&str], &str)] = &[
    (
        &["loan payment", "principal", "loan repayment"],
        "Loan Principal Repayment",
    ),
    (&["interest payment", "interest expense"], "Interest Payments"),
    (&["dividend"], "Dividend Payments"),
    (&["aws", "hosting", "server"], "Hosting & Infrastructure"),
    (&["stripe", "payment"], "Payment Processing Fees"),
    (&["api", "software"], "Third-party Software/APIs"),
    (&["salary", "payroll"], "Salaries & Payroll"),
    (&["marketing", "ads", "advertising"], "Sales & Marketing"),
    (&["rent", "lease"], "Rent & Leasing"),
    (&["office"], "Office & Facilities"),
    (&["legal", "accounting"], "Professional Services"),
    (&["insurance"], "Insurance"),
    (&["travel"], "Travel & Entertainment"),
];

const OUTFLOW_FALLBACK: &str = "Other Operating Expenses";

/// Keywords that mark a classification as high confidence on their own.
const HIGH_SIGNAL_KEYWORDS: &[&str] =
    &["subscription", "payroll", "rent", "aws", "stripe", "hosting"];

/// A category plus the confidence it was assigned with.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    pub confidence: Confidence,
}

/// Classify by keyword alone, ignoring learned rules. Branches on the sign
/// of `amount`, then walks the matching rule table in order.
pub fn keyword_category(description: &str, amount: f64) -> &'static str {
    let desc = description.to_lowercase();
    let (rules, fallback) = if amount > 0.0 {
        (INFLOW_RULES, INFLOW_FALLBACK)
    } else {
        (OUTFLOW_RULES, OUTFLOW_FALLBACK)
    };
    rules
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| desc.contains(needle)))
        .map(|(_, category)| *category)
        .unwrap_or(fallback)
}

/// The session's rule engine. Owns the learned merchant → category map,
/// which grows only and lives for the session.
#[derive(Debug, Default)]
pub struct Classifier {
    learned: HashMap<String, String>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a description. A learned rule for the normalized merchant
    /// takes priority over the keyword tables.
    pub fn classify(&self, description: &str, amount: f64) -> Classification {
        let merchant = normalize_merchant(description);
        let category = match self.learned.get(&merchant) {
            Some(learned) => learned.clone(),
            None => keyword_category(description, amount).to_string(),
        };
        Classification {
            category,
            confidence: self.confidence_for(description),
        }
    }

    fn confidence_for(&self, description: &str) -> Confidence {
        if self.learned.contains_key(&normalize_merchant(description)) {
            return Confidence::High;
        }
        let desc = description.to_lowercase();
        if HIGH_SIGNAL_KEYWORDS.iter().any(|kw| desc.contains(kw)) {
            Confidence::High
        } else if description.chars().count() > 5 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Remember a user correction: future classifications of this merchant
    /// return `category` at high confidence. The most recent correction
    /// wins. Already-assigned categories elsewhere are untouched.
    pub fn learn(&mut self, description: &str, category: &str) {
        let merchant = normalize_merchant(description);
        debug!("learned rule: {merchant:?} -> {category}");
        self.learned.insert(merchant, category.to_string());
    }

    /// The learned category for a merchant key, if any.
    pub fn rule_for(&self, merchant: &str) -> Option<&str> {
        self.learned.get(merchant).map(String::as_str)
    }

    pub fn rule_count(&self) -> usize {
        self.learned.len()
    }
}
