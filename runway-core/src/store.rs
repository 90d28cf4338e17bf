//! The mutable transaction collection and its approval/exclusion lifecycle.

use anyhow::{Result, bail};
use log::debug;

use crate::classifier::{Classification, Classifier, Confidence};
use crate::merchant::normalize_merchant;
use crate::transaction::Transaction;

/// A classified record not yet committed to the store.
#[derive(Debug, Clone)]
pub struct PendingRecord {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub confidence: Confidence,
}

impl PendingRecord {
    pub fn new(date: String, description: String, amount: f64, class: Classification) -> Self {
        Self {
            date,
            description,
            amount,
            category: class.category,
            confidence: class.confidence,
        }
    }
}

/// Pending / approved / excluded totals for the review header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub excluded: usize,
}

/// Owns every transaction record. All mutations go through here so no
/// caller can observe a partially-updated collection.
#[derive(Debug)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    next_id: u64,
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_id: 1,
        }
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert one record at the front of the collection as pending.
    pub fn insert(&mut self, record: PendingRecord) -> u64 {
        let id = self.fresh_id();
        self.transactions.insert(
            0,
            Transaction {
                id,
                date: record.date,
                description: record.description,
                amount: record.amount,
                category: record.category,
                confidence: record.confidence,
                approved: false,
                excluded: false,
                is_split: false,
            },
        );
        id
    }

    /// Insert a parsed batch at the front, preserving its internal order
    /// (newest-parsed-first relative to what was already in the store).
    pub fn insert_batch(&mut self, records: Vec<PendingRecord>) -> usize {
        let count = records.len();
        let mut block: Vec<Transaction> = Vec::with_capacity(count);
        for record in records {
            let id = self.fresh_id();
            block.push(Transaction {
                id,
                date: record.date,
                description: record.description,
                amount: record.amount,
                category: record.category,
                confidence: record.confidence,
                approved: false,
                excluded: false,
                is_split: false,
            });
        }
        self.transactions.splice(0..0, block);
        count
    }

    /// Validate and insert a manually entered record. Rejects incomplete
    /// fields and non-numeric or zero amounts without mutating anything.
    pub fn add_manual(
        &mut self,
        classifier: &Classifier,
        date: &str,
        description: &str,
        amount: &str,
    ) -> Result<u64> {
        let date = date.trim();
        let description = description.trim();
        let amount = amount.trim();
        if date.is_empty() || description.is_empty() || amount.is_empty() {
            bail!("Please fill in all fields for manual entry.");
        }
        let amount: f64 = match amount.parse() {
            Ok(v) => v,
            Err(_) => bail!("Please enter a valid amount."),
        };
        if !amount.is_finite() || amount == 0.0 {
            bail!("Please enter a valid amount.");
        }
        let class = classifier.classify(description, amount);
        Ok(self.insert(PendingRecord::new(
            date.to_string(),
            description.to_string(),
            amount,
            class,
        )))
    }

    pub fn get(&self, id: u64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|t| t.id == id)
    }

    /// Mark a record approved. Idempotent.
    pub fn approve(&mut self, id: u64) {
        if let Some(t) = self.get_mut(id) {
            t.approved = true;
        }
    }

    /// Flip the excluded flag; re-including is the same call again.
    pub fn toggle_excluded(&mut self, id: u64) {
        if let Some(t) = self.get_mut(id) {
            t.excluded = !t.excluded;
        }
    }

    /// Change a record's category. A real change is a user correction, so
    /// the classifier learns the merchant rule before the record updates.
    pub fn set_category(&mut self, classifier: &mut Classifier, id: u64, category: &str) {
        if let Some(t) = self.get_mut(id) {
            if t.category != category {
                let description = t.description.clone();
                classifier.learn(&description, category);
                t.category = category.to_string();
            }
        }
    }

    /// Re-categorize every pending, non-excluded record for a merchant and
    /// learn the rule once for that merchant key.
    pub fn bulk_set_category(&mut self, classifier: &mut Classifier, merchant: &str, category: &str) {
        let mut touched = 0;
        for t in &mut self.transactions {
            if !t.approved && !t.excluded && normalize_merchant(&t.description) == merchant {
                t.category = category.to_string();
                touched += 1;
            }
        }
        debug!("bulk re-categorized {touched} records for {merchant:?}");
        classifier.learn(merchant, category);
    }

    /// Approve every pending, non-excluded record for a merchant, stamping
    /// all of them with the first member's current category. No
    /// re-classification happens here.
    pub fn approve_all_in_group(&mut self, merchant: &str) {
        let category = self
            .transactions
            .iter()
            .find(|t| !t.approved && !t.excluded && normalize_merchant(&t.description) == merchant)
            .map(|t| t.category.clone());
        let Some(category) = category else { return };
        for t in &mut self.transactions {
            if !t.approved && !t.excluded && normalize_merchant(&t.description) == merchant {
                t.approved = true;
                t.category = category.clone();
            }
        }
    }

    /// Permanently remove a record. Irreversible; callers are expected to
    /// only delete records they have already excluded.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        self.transactions.len() != before
    }

    pub fn remove(&mut self, id: u64) -> Option<Transaction> {
        let idx = self.transactions.iter().position(|t| t.id == id)?;
        Some(self.transactions.remove(idx))
    }

    /// Append records at the end of the collection, assigning fresh ids.
    /// Used by the splitter, whose children replace a removed original.
    pub fn push_raw(&mut self, mut transaction: Transaction) -> u64 {
        let id = self.fresh_id();
        transaction.id = id;
        self.transactions.push(transaction);
        id
    }

    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Not approved and not excluded.
    pub fn pending(&self) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| !t.approved && !t.excluded)
            .collect()
    }

    /// Approved and not excluded: the calculation set.
    pub fn approved(&self) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.approved && !t.excluded)
            .collect()
    }

    /// Excluded, whether approved or not.
    pub fn excluded(&self) -> Vec<&Transaction> {
        self.transactions.iter().filter(|t| t.excluded).collect()
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts {
            pending: self.pending().len(),
            approved: self.approved().len(),
            excluded: self.excluded().len(),
        }
    }

    /// Pending records grouped by merchant key, largest group first.
    pub fn by_merchant(&self) -> Vec<(String, Vec<&Transaction>)> {
        group_pending(self.pending(), |t| normalize_merchant(&t.description))
    }

    /// Pending records grouped by current category, largest group first.
    pub fn by_category(&self) -> Vec<(String, Vec<&Transaction>)> {
        group_pending(self.pending(), |t| t.category.clone())
    }
}

fn group_pending<'a>(
    pending: Vec<&'a Transaction>,
    key: impl Fn(&Transaction) -> String,
) -> Vec<(String, Vec<&'a Transaction>)> {
    let mut groups: Vec<(String, Vec<&Transaction>)> = Vec::new();
    for t in pending {
        let k = key(t);
        match groups.iter_mut().find(|(name, _)| *name == k) {
            Some((_, members)) => members.push(t),
            None => groups.push((k, vec![t])),
        }
    }
    // Stable: ties keep first-seen order.
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, desc: &str, amount: f64) -> PendingRecord {
        PendingRecord {
            date: date.to_string(),
            description: desc.to_string(),
            amount,
            category: "Other Operating Expenses".to_string(),
            confidence: Confidence::Medium,
        }
    }

    fn seeded() -> TransactionStore {
        let mut store = TransactionStore::new();
        store.insert_batch(vec![
            record("2024-01-10", "Stripe fees Jan", -29.0),
            record("2024-01-11", "Stripe fees extra", -3.0),
            record("2024-01-12", "Figma subscription", -15.0),
        ]);
        store
    }

    #[test]
    fn test_insert_batch_front_preserves_order() {
        let mut store = TransactionStore::new();
        store.insert(record("2024-01-01", "old", -1.0));
        store.insert_batch(vec![
            record("2024-02-01", "first", -1.0),
            record("2024-02-02", "second", -1.0),
        ]);
        let descs: Vec<_> = store.all().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["first", "second", "old"]);
    }

    #[test]
    fn test_ids_unique_and_stable() {
        let store = seeded();
        let mut ids: Vec<_> = store.all().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_approve_idempotent() {
        let mut store = seeded();
        let id = store.all()[0].id;
        store.approve(id);
        store.approve(id);
        assert!(store.get(id).unwrap().approved);
        assert_eq!(store.approved().len(), 1);
    }

    #[test]
    fn test_toggle_excluded_reversible() {
        let mut store = seeded();
        let id = store.all()[0].id;
        store.toggle_excluded(id);
        assert!(store.get(id).unwrap().excluded);
        store.toggle_excluded(id);
        assert!(!store.get(id).unwrap().excluded);
    }

    #[test]
    fn test_set_category_learns_on_change_only() {
        let mut store = seeded();
        let mut classifier = Classifier::new();
        let id = store.all()[0].id;
        let current = store.get(id).unwrap().category.clone();

        store.set_category(&mut classifier, id, &current);
        assert_eq!(classifier.rule_count(), 0);

        store.set_category(&mut classifier, id, "Payment Processing Fees");
        assert_eq!(classifier.rule_count(), 1);
        assert_eq!(store.get(id).unwrap().category, "Payment Processing Fees");
    }

    #[test]
    fn test_bulk_set_category_skips_approved_and_excluded() {
        let mut store = seeded();
        let mut classifier = Classifier::new();
        let approved_id = store.all()[0].id;
        store.approve(approved_id);

        store.bulk_set_category(&mut classifier, "Stripe", "Payment Processing Fees");
        // The approved record keeps its category; the pending one changes.
        assert_eq!(store.get(approved_id).unwrap().category, "Other Operating Expenses");
        let pending_stripe: Vec<_> = store
            .pending()
            .into_iter()
            .filter(|t| t.merchant() == "Stripe")
            .collect();
        assert!(pending_stripe.iter().all(|t| t.category == "Payment Processing Fees"));
        assert_eq!(classifier.rule_for("Stripe"), Some("Payment Processing Fees"));
    }

    #[test]
    fn test_approve_all_in_group_uses_first_category() {
        let mut store = seeded();
        let mut classifier = Classifier::new();
        // Give the first Stripe record a distinct category; the group adopts it.
        let first = store.all()[0].id;
        store.set_category(&mut classifier, first, "Payment Processing Fees");

        store.approve_all_in_group("Stripe");
        let stripe: Vec<_> = store
            .all()
            .iter()
            .filter(|t| t.merchant() == "Stripe")
            .collect();
        assert_eq!(stripe.len(), 2);
        assert!(stripe.iter().all(|t| t.approved));
        assert!(stripe.iter().all(|t| t.category == "Payment Processing Fees"));
        // The Figma record is untouched.
        assert_eq!(store.pending().len(), 1);
    }

    #[test]
    fn test_delete() {
        let mut store = seeded();
        let id = store.all()[0].id;
        store.toggle_excluded(id);
        assert!(store.delete(id));
        assert!(store.get(id).is_none());
        assert!(!store.delete(id));
    }

    #[test]
    fn test_add_manual_validation() {
        let mut store = TransactionStore::new();
        let classifier = Classifier::new();
        assert!(store.add_manual(&classifier, "", "Office Rent", "-2000").is_err());
        assert!(store.add_manual(&classifier, "2024-02-01", "Office Rent", "abc").is_err());
        assert!(store.add_manual(&classifier, "2024-02-01", "Office Rent", "0").is_err());
        assert!(store.is_empty());

        let id = store
            .add_manual(&classifier, "2024-02-01", "Office Rent", "-2000")
            .unwrap();
        let t = store.get(id).unwrap();
        assert_eq!(t.category, "Rent & Leasing");
        assert!(!t.approved);
    }

    #[test]
    fn test_groups_sorted_by_size() {
        let store = seeded();
        let groups = store.by_merchant();
        assert_eq!(groups[0].0, "Stripe");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "Figma");
        assert_eq!(store.by_category()[0].1.len(), 3);
    }

    #[test]
    fn test_status_counts() {
        let mut store = seeded();
        let a = store.all()[0].id;
        let b = store.all()[1].id;
        store.approve(a);
        store.toggle_excluded(b);
        let counts = store.status_counts();
        assert_eq!(counts, StatusCounts { pending: 1, approved: 1, excluded: 1 });
    }
}
