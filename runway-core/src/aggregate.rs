//! Monthly aggregation of approved activity into taxonomy-group totals.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::store::TransactionStore;
use crate::taxonomy::{Group, Taxonomy};
use crate::transaction::Transaction;

/// One month of approved activity, keyed `YYYY-MM`.
///
/// Group totals are sums of absolute amounts; direction already picked the
/// group, so the totals are non-negative by construction. Recomputed in
/// full whenever the approved set changes, never patched in place.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyAggregate {
    pub month: String,
    pub income: f64,
    pub cogs: f64,
    pub opex: f64,
    pub funding: f64,
    pub financing: f64,
    pub net_cash_flow: f64,
    /// Running balance carried from the very first month.
    pub cash_balance: f64,
    /// The approved records that landed in this month.
    pub transactions: Vec<Transaction>,
}

impl MonthlyAggregate {
    fn new(month: String) -> Self {
        Self {
            month,
            income: 0.0,
            cogs: 0.0,
            opex: 0.0,
            funding: 0.0,
            financing: 0.0,
            net_cash_flow: 0.0,
            cash_balance: 0.0,
            transactions: Vec::new(),
        }
    }

    pub fn total_for(&self, group: Group) -> f64 {
        match group {
            Group::Income => self.income,
            Group::Cogs => self.cogs,
            Group::Opex => self.opex,
            Group::Funding => self.funding,
            Group::Financing => self.financing,
        }
    }
}

/// Aggregate the store's approved, non-excluded records by month,
/// ascending. Records with unreadable dates contribute nothing; a category
/// in no taxonomy group is counted in no total (it still rides along in
/// `transactions`).
pub fn monthly_aggregates(store: &TransactionStore, taxonomy: &Taxonomy) -> Vec<MonthlyAggregate> {
    let mut months: BTreeMap<String, MonthlyAggregate> = BTreeMap::new();

    for t in store.approved() {
        let Some(key) = t.month_key() else {
            debug!("skipping unparseable date {:?} (id {})", t.date, t.id);
            continue;
        };
        let bucket = months
            .entry(key.clone())
            .or_insert_with(|| MonthlyAggregate::new(key));
        bucket.transactions.push(t.clone());
        match taxonomy.group_of(&t.category) {
            Some(Group::Income) => bucket.income += t.abs_amount(),
            Some(Group::Cogs) => bucket.cogs += t.abs_amount(),
            Some(Group::Opex) => bucket.opex += t.abs_amount(),
            Some(Group::Funding) => bucket.funding += t.abs_amount(),
            Some(Group::Financing) => bucket.financing += t.abs_amount(),
            None => {}
        }
    }

    let mut running_balance = 0.0;
    let mut out: Vec<MonthlyAggregate> = months.into_values().collect();
    for m in &mut out {
        m.net_cash_flow = m.income + m.funding - m.cogs - m.opex - m.financing;
        running_balance += m.net_cash_flow;
        m.cash_balance = running_balance;
    }
    out
}

/// Per-category absolute totals over the approved set, largest first.
pub fn category_breakdown(store: &TransactionStore) -> Vec<(String, f64)> {
    let mut breakdown: Vec<(String, f64)> = Vec::new();
    for t in store.approved() {
        match breakdown.iter_mut().find(|(name, _)| *name == t.category) {
            Some((_, total)) => *total += t.abs_amount(),
            None => breakdown.push((t.category.clone(), t.abs_amount())),
        }
    }
    breakdown.sort_by(|a, b| b.1.total_cmp(&a.1));
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;

    fn approved(store: &mut TransactionStore, date: &str, desc: &str, amount: f64) -> u64 {
        let classifier = Classifier::new();
        let id = store
            .add_manual(&classifier, date, desc, &amount.to_string())
            .unwrap();
        store.approve(id);
        id
    }

    #[test]
    fn test_months_sorted_ascending_with_running_balance() {
        let mut store = TransactionStore::new();
        let tax = Taxonomy::new();
        approved(&mut store, "2024-03-10", "Consulting invoice", 4_000.0);
        approved(&mut store, "2024-01-05", "Office rent", -2_000.0);
        approved(&mut store, "2024-02-14", "Office rent", -2_000.0);

        let months = monthly_aggregates(&store, &tax);
        let keys: Vec<_> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(months[0].cash_balance, -2_000.0);
        assert_eq!(months[1].cash_balance, -4_000.0);
        assert_eq!(months[2].cash_balance, 0.0);
        assert_eq!(months[2].income, 4_000.0);
        assert_eq!(months[2].net_cash_flow, 4_000.0);
    }

    #[test]
    fn test_only_approved_non_excluded_counted() {
        let mut store = TransactionStore::new();
        let tax = Taxonomy::new();
        let id = approved(&mut store, "2024-02-01", "Office rent", -2_000.0);
        let classifier = Classifier::new();
        store
            .add_manual(&classifier, "2024-02-02", "Office rent pending", "-500")
            .unwrap();

        let months = monthly_aggregates(&store, &tax);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].opex, 2_000.0);

        store.toggle_excluded(id);
        assert!(monthly_aggregates(&store, &tax).is_empty());
        store.toggle_excluded(id);
        assert_eq!(monthly_aggregates(&store, &tax)[0].opex, 2_000.0);
    }

    #[test]
    fn test_funding_and_financing_groups() {
        let mut store = TransactionStore::new();
        let tax = Taxonomy::new();
        approved(&mut store, "2024-04-01", "Seed equity investment", 100_000.0);
        approved(&mut store, "2024-04-15", "Loan payment April", -1_200.0);

        let m = &monthly_aggregates(&store, &tax)[0];
        assert_eq!(m.funding, 100_000.0);
        assert_eq!(m.financing, 1_200.0);
        assert_eq!(m.net_cash_flow, 98_800.0);
    }

    #[test]
    fn test_unknown_category_counts_in_no_group() {
        let mut store = TransactionStore::new();
        let mut classifier = Classifier::new();
        let tax = Taxonomy::new();
        let id = approved(&mut store, "2024-05-01", "Mystery spend", -300.0);
        store.set_category(&mut classifier, id, "Typo'd Custom Category");

        let months = monthly_aggregates(&store, &tax);
        let m = &months[0];
        assert_eq!(m.income + m.cogs + m.opex + m.funding + m.financing, 0.0);
        // The record is still part of the month.
        assert_eq!(m.transactions.len(), 1);
    }

    #[test]
    fn test_unparseable_date_skipped() {
        let mut store = TransactionStore::new();
        let tax = Taxonomy::new();
        approved(&mut store, "sometime soon", "Office rent", -2_000.0);
        assert!(monthly_aggregates(&store, &tax).is_empty());
    }

    #[test]
    fn test_category_breakdown_sorted() {
        let mut store = TransactionStore::new();
        approved(&mut store, "2024-01-02", "Office rent", -2_000.0);
        approved(&mut store, "2024-01-03", "Stripe fees", -40.0);
        approved(&mut store, "2024-02-02", "Office rent", -2_000.0);

        let breakdown = category_breakdown(&store);
        assert_eq!(breakdown[0], ("Rent & Leasing".to_string(), 4_000.0));
        assert_eq!(breakdown[1], ("Payment Processing Fees".to_string(), 40.0));
    }
}
