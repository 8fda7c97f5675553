//! In-process store.

use super::{fits_budget, log_rejection, poisoned, PdfStore, StoredPdf};
use crate::config::StoreConfig;
use crate::error::Result;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    /// Key to JSON-encoded entry
    entries: BTreeMap<String, String>,
    used: usize,
}

/// A budgeted store held in memory.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    budget: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            budget: config.budget_bytes,
        }
    }
}

impl PdfStore for MemoryStore {
    fn store(&self, key: &str, entry: &StoredPdf) -> Result<bool> {
        let encoded = serde_json::to_string(entry)?;
        let mut inner = self.inner.lock().map_err(poisoned)?;
        let existing = inner.entries.get(key).map(String::len).unwrap_or(0);
        if !fits_budget(inner.used, existing, encoded.len(), self.budget) {
            log_rejection(key, encoded.len(), inner.used, existing, self.budget);
            return Ok(false);
        }
        inner.used = inner.used - existing + encoded.len();
        inner.entries.insert(key.to_string(), encoded);
        Ok(true)
    }

    fn load(&self, key: &str) -> Result<Option<StoredPdf>> {
        let inner = self.inner.lock().map_err(poisoned)?;
        match inner.entries.get(key) {
            Some(encoded) => Ok(Some(serde_json::from_str(encoded)?)),
            None => Ok(None),
        }
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.lock().map_err(poisoned)?;
        match inner.entries.remove(key) {
            Some(encoded) => {
                inner.used -= encoded.len();
                Ok(true)
            },
            None => Ok(false),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let inner = self.inner.lock().map_err(poisoned)?;
        Ok(inner.entries.keys().cloned().collect())
    }

    fn clear(&self) -> Result<()> {
        let mut inner = self.inner.lock().map_err(poisoned)?;
        inner.entries.clear();
        inner.used = 0;
        Ok(())
    }

    fn used_bytes(&self) -> Result<usize> {
        Ok(self.inner.lock().map_err(poisoned)?.used)
    }

    fn budget_bytes(&self) -> usize {
        self.budget
    }
}
