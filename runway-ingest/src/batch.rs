//! Multi-file batch import with per-file failure isolation.
//!
//! A failed file never aborts the batch: its reason is collected and the
//! next file proceeds. The cancel flag is checked between files only;
//! cancellation is batch-granularity, nothing finer.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use log::warn;
use runway_core::{Classifier, PendingRecord, TransactionStore};

use crate::types::ExtractedRecord;
use crate::{pdf, tabular, text};

/// Shared cancellation signal for an in-flight batch. Cancelling abandons
/// the remaining files; files already committed stay committed.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub name: String,
    pub reason: String,
}

/// Outcome of one batch, success and failure alike.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Transactions committed to the store across all files.
    pub imported: usize,
    pub succeeded_files: usize,
    pub failed: Vec<FailedFile>,
    pub cancelled: bool,
}

impl ImportReport {
    /// Human-readable summary distinguishing full, partial and failed
    /// imports.
    pub fn summary(&self) -> String {
        let failed = self.failed.len();
        if self.succeeded_files > 0 && failed == 0 {
            format!(
                "Successfully imported {} transactions from {} file{}!",
                self.imported,
                self.succeeded_files,
                plural(self.succeeded_files)
            )
        } else if self.succeeded_files > 0 {
            let names: Vec<&str> = self.failed.iter().map(|f| f.name.as_str()).collect();
            format!(
                "Imported {} transactions from {} file{}. {} file{} failed: {}",
                self.imported,
                self.succeeded_files,
                plural(self.succeeded_files),
                failed,
                plural(failed),
                names.join(", ")
            )
        } else {
            let details: Vec<String> = self
                .failed
                .iter()
                .map(|f| format!("{} ({})", f.name, f.reason))
                .collect();
            format!(
                "Could not import transactions. Failed files: {}",
                details.join(", ")
            )
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Run the adapter matching a file's extension.
pub fn extract_records(path: &Path) -> Result<Vec<ExtractedRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "csv" => {
            let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let records = tabular::parse_csv(file)?;
            if records.is_empty() {
                bail!("No valid transactions found");
            }
            Ok(records)
        }
        "pdf" => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let records = text::parse_text(&pdf::extract_text(&bytes))?;
            if records.is_empty() {
                bail!("Could not extract transactions from PDF");
            }
            Ok(records)
        }
        _ => bail!("Unsupported file type"),
    }
}

fn import_one(store: &mut TransactionStore, classifier: &Classifier, path: &Path) -> Result<usize> {
    let records = extract_records(path)?;
    let pending: Vec<PendingRecord> = records
        .into_iter()
        .map(|r| {
            let class = classifier.classify(&r.description, r.amount);
            PendingRecord::new(r.date, r.description, r.amount, class)
        })
        .collect();
    Ok(store.insert_batch(pending))
}

/// Import a batch of statement files. Every retained record is classified
/// and committed as pending; per-file failures end up on the report.
pub fn import_files(
    store: &mut TransactionStore,
    classifier: &Classifier,
    paths: &[PathBuf],
    cancel: &CancelFlag,
) -> ImportReport {
    let mut report = ImportReport::default();

    for path in paths {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unnamed>")
            .to_string();
        match import_one(store, classifier, path) {
            Ok(count) => {
                report.imported += count;
                report.succeeded_files += 1;
            }
            Err(err) => {
                warn!("import failed for {name}: {err}");
                report.failed.push(FailedFile {
                    name,
                    reason: err.to_string(),
                });
            }
        }
    }

    report
}
