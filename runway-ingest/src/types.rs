use serde::{Deserialize, Serialize};

/// Normalized output of the ingestion adapters (source-agnostic).
///
/// The date stays as source text; parsing happens downstream where the
/// aggregation needs it. Amounts follow the store convention: positive =
/// inflow, negative = outflow, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub date: String,
    pub description: String,
    pub amount: f64,
}
