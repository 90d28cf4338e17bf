//! runway-ingest: statement ingestion adapters (tabular rows, extracted
//! text, best-effort PDF text) feeding classified records into the store.

pub mod batch;
pub mod pdf;
pub mod tabular;
pub mod text;
pub mod types;

pub use batch::{CancelFlag, FailedFile, ImportReport, extract_records, import_files};
pub use tabular::{parse_csv, parse_rows};
pub use text::parse_text;
pub use types::ExtractedRecord;
