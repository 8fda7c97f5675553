//! Session cache for composed PDFs.
//!
//! Entries are [`StoredPdf`] records keyed by a caller-chosen string. A store
//! has a byte budget; a write that would exceed it is refused with `Ok(false)`
//! and leaves the store unchanged. Entries never expire on their own.
//!
//! The size of an entry is the length of its JSON encoding, which is exactly
//! what [`DirectoryStore`] writes to disk.

mod directory;
mod memory;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

use crate::composer::MergedPdf;
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A cached merged PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPdf {
    /// Standard base64 of the PDF bytes
    pub base64: String,
    /// Pages in the PDF
    pub page_count: usize,
    /// Display name
    pub file_name: String,
    /// Unix time of the write, in milliseconds
    pub timestamp_ms: i64,
}

impl StoredPdf {
    /// Snapshot a merge result, stamped with the current time.
    pub fn from_merged(merged: &MergedPdf, file_name: impl Into<String>) -> Self {
        Self {
            base64: merged.to_base64(),
            page_count: merged.page_count,
            file_name: file_name.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Decode the PDF bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.base64.as_bytes())?)
    }

    /// Size this entry counts against a store budget.
    pub fn encoded_size(&self) -> Result<usize> {
        Ok(serde_json::to_vec(self)?.len())
    }
}

/// Key-value store for [`StoredPdf`] entries.
///
/// Implementations serialize writes, so concurrent writes to one key resolve
/// last-write-wins without interleaving.
pub trait PdfStore: Send + Sync {
    /// Write `entry` under `key`, replacing any previous entry.
    ///
    /// Returns `Ok(false)` when the write would exceed the budget.
    fn store(&self, key: &str, entry: &StoredPdf) -> Result<bool>;

    /// Read an entry.
    fn load(&self, key: &str) -> Result<Option<StoredPdf>>;

    /// Delete an entry. Returns whether it existed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Stored keys, sorted.
    fn keys(&self) -> Result<Vec<String>>;

    /// Delete every entry.
    fn clear(&self) -> Result<()>;

    /// Bytes currently counted against the budget.
    fn used_bytes(&self) -> Result<usize>;

    /// The budget in bytes.
    fn budget_bytes(&self) -> usize;
}

/// Whether replacing an entry of `existing` bytes with one of `incoming` bytes
/// keeps `used` within `budget`.
pub(crate) fn fits_budget(used: usize, existing: usize, incoming: usize, budget: usize) -> bool {
    used.saturating_sub(existing).saturating_add(incoming) <= budget
}

pub(crate) fn poisoned<T>(_: std::sync::PoisonError<T>) -> Error {
    Error::Storage("store lock poisoned".to_string())
}

pub(crate) fn log_rejection(key: &str, incoming: usize, used: usize, existing: usize, budget: usize) {
    log::warn!(
        "Refusing to cache '{}': {} bytes would bring the store to {} of {} bytes",
        key,
        incoming,
        used.saturating_sub(existing).saturating_add(incoming),
        budget
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_merged() {
        let merged = MergedPdf {
            bytes: b"%PDF-1.7".to_vec(),
            page_count: 3,
        };
        let entry = StoredPdf::from_merged(&merged, "contract.pdf");
        assert_eq!(entry.page_count, 3);
        assert_eq!(entry.file_name, "contract.pdf");
        assert!(entry.timestamp_ms > 0);
        assert_eq!(entry.decode().unwrap(), merged.bytes);
    }

    #[test]
    fn test_serializes_camel_case() {
        let entry = StoredPdf {
            base64: "AA==".to_string(),
            page_count: 1,
            file_name: "a.pdf".to_string(),
            timestamp_ms: 5,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["pageCount"], 1);
        assert_eq!(json["fileName"], "a.pdf");
        assert_eq!(json["timestampMs"], 5);
        assert_eq!(entry.encoded_size().unwrap(), serde_json::to_string(&entry).unwrap().len());
    }

    #[test]
    fn test_fits_budget() {
        assert!(fits_budget(0, 0, 10, 10));
        assert!(!fits_budget(5, 0, 6, 10));
        // Replacing a large entry frees its space first.
        assert!(fits_budget(10, 8, 8, 10));
    }
}
