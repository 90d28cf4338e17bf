//! runway-core: merchant normalization, adaptive categorization, transaction
//! lifecycle and monthly KPI derivation for founder cash-flow review.

pub mod aggregate;
pub mod classifier;
pub mod dates;
pub mod export;
pub mod kpi;
pub mod merchant;
pub mod split;
pub mod store;
pub mod taxonomy;
pub mod transaction;

pub use aggregate::{MonthlyAggregate, category_breakdown, monthly_aggregates};
pub use classifier::{Classification, Classifier, Confidence, keyword_category};
pub use export::{to_csv_string, write_csv};
pub use kpi::{KpiSnapshot, compute_kpis};
pub use merchant::normalize_merchant;
pub use split::{REMAINDER_CATEGORY, SplitPart, split_transaction};
pub use store::{PendingRecord, StatusCounts, TransactionStore};
pub use taxonomy::{Group, Taxonomy};
pub use transaction::Transaction;
