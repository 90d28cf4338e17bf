//! Category taxonomy: five disjoint groups of category names.
//!
//! Built-in names are fixed; user-defined extensions live on the session's
//! [`Taxonomy`] and must not collide with any existing name in any group.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// The five aggregation groups, in the order membership is tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "cogs")]
    Cogs,
    #[serde(rename = "opex")]
    Opex,
    #[serde(rename = "funding")]
    Funding,
    #[serde(rename = "financing")]
    Financing,
}

impl Group {
    /// Membership test order for aggregation. Income is checked first so
    /// "Interest Income" never lands in another group.
    pub const ALL: [Group; 5] = [
        Group::Income,
        Group::Cogs,
        Group::Opex,
        Group::Funding,
        Group::Financing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Group::Income => "Income",
            Group::Cogs => "COGS",
            Group::Opex => "OpEx",
            Group::Funding => "Funding In",
            Group::Financing => "Funding Out",
        }
    }
}

pub const INCOME_CATEGORIES: &[&str] = &[
    "SaaS/Subscription Revenue",
    "Service Revenue",
    "Consulting Revenue",
    "One-time Sales",
    "Other Income",
];

pub const COGS_CATEGORIES: &[&str] = &[
    "Hosting & Infrastructure",
    "Third-party Software/APIs",
    "Payment Processing Fees",
    "Direct Labor",
    "Materials & Supplies",
];

pub const OPEX_CATEGORIES: &[&str] = &[
    "Sales & Marketing",
    "Salaries & Payroll",
    "Rent & Leasing",
    "Office & Facilities",
    "Professional Services",
    "Software & Subscriptions",
    "Travel & Entertainment",
    "Insurance",
    "Utilities & Telecommunications",
    "Other Operating Expenses",
];

pub const FUNDING_CATEGORIES: &[&str] = &[
    "Equity Investment",
    "Loan/Debt Received",
    "Grant Funding",
    "Other Funding",
];

pub const FINANCING_CATEGORIES: &[&str] = &[
    "Loan Principal Repayment",
    "Interest Payments",
    "Dividend Payments",
];

/// Always part of the Income group; not user-editable.
pub const INTEREST_INCOME: &str = "Interest Income";

fn builtin(group: Group) -> &'static [&'static str] {
    match group {
        Group::Income => INCOME_CATEGORIES,
        Group::Cogs => COGS_CATEGORIES,
        Group::Opex => OPEX_CATEGORIES,
        Group::Funding => FUNDING_CATEGORIES,
        Group::Financing => FINANCING_CATEGORIES,
    }
}

/// Session-scoped taxonomy: the built-in groups plus user-added names.
///
/// Created empty at session start; custom names grow only.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    custom: Vec<(String, Group)>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The group a category belongs to, or `None` for unknown names.
    pub fn group_of(&self, category: &str) -> Option<Group> {
        if category == INTEREST_INCOME {
            return Some(Group::Income);
        }
        for group in Group::ALL {
            if builtin(group).contains(&category) {
                return Some(group);
            }
        }
        self.custom
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, group)| *group)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.group_of(category).is_some()
    }

    /// Add a user-defined category. Rejects blank names and names already
    /// present in any group, leaving the taxonomy unchanged.
    pub fn add_custom(&mut self, name: &str, group: Group) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Please enter a category name.");
        }
        if self.contains(name) {
            bail!("This category already exists.");
        }
        self.custom.push((name.to_string(), group));
        Ok(())
    }

    /// All names in a group: built-ins first, then custom additions.
    pub fn categories_in(&self, group: Group) -> Vec<&str> {
        let mut names: Vec<&str> = builtin(group).to_vec();
        if group == Group::Income {
            names.push(INTEREST_INCOME);
        }
        names.extend(
            self.custom
                .iter()
                .filter(|(_, g)| *g == group)
                .map(|(name, _)| name.as_str()),
        );
        names
    }

    pub fn all_categories(&self) -> Vec<&str> {
        Group::ALL
            .iter()
            .flat_map(|g| self.categories_in(*g))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_membership() {
        let tax = Taxonomy::new();
        assert_eq!(tax.group_of("SaaS/Subscription Revenue"), Some(Group::Income));
        assert_eq!(tax.group_of("Hosting & Infrastructure"), Some(Group::Cogs));
        assert_eq!(tax.group_of("Rent & Leasing"), Some(Group::Opex));
        assert_eq!(tax.group_of("Equity Investment"), Some(Group::Funding));
        assert_eq!(tax.group_of("Dividend Payments"), Some(Group::Financing));
        assert_eq!(tax.group_of("Not A Category"), None);
    }

    #[test]
    fn test_interest_income_is_income() {
        let tax = Taxonomy::new();
        assert_eq!(tax.group_of(INTEREST_INCOME), Some(Group::Income));
        assert!(tax.categories_in(Group::Income).contains(&INTEREST_INCOME));
    }

    #[test]
    fn test_add_custom_category() {
        let mut tax = Taxonomy::new();
        tax.add_custom("Donations Received", Group::Income).unwrap();
        assert_eq!(tax.group_of("Donations Received"), Some(Group::Income));
    }

    #[test]
    fn test_duplicate_custom_rejected() {
        let mut tax = Taxonomy::new();
        tax.add_custom("Equipment", Group::Opex).unwrap();
        // Same name cannot join a second group.
        let err = tax.add_custom("Equipment", Group::Cogs).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        // Built-in names are off limits too.
        assert!(tax.add_custom("Insurance", Group::Cogs).is_err());
        assert_eq!(tax.group_of("Equipment"), Some(Group::Opex));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut tax = Taxonomy::new();
        assert!(tax.add_custom("   ", Group::Income).is_err());
    }
}
