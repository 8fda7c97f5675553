//! File-backed store: one JSON file per entry.
//!
//! Keys are opaque, so file names are the URL-safe base64 of the key.

use super::{fits_budget, log_rejection, poisoned, PdfStore, StoredPdf};
use crate::config::StoreConfig;
use crate::error::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const ENTRY_EXTENSION: &str = "json";

/// A budgeted store persisted under a directory.
#[derive(Debug)]
pub struct DirectoryStore {
    dir: PathBuf,
    budget: usize,
    write_lock: Mutex<()>,
}

impl DirectoryStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>, config: StoreConfig) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::debug!("Opened PDF store at {}", dir.display());
        Ok(Self {
            dir,
            budget: config.budget_bytes,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", URL_SAFE_NO_PAD.encode(key.as_bytes()), ENTRY_EXTENSION))
    }

    /// Files this store owns, with their keys. Other files are left alone.
    fn entry_files(&self) -> Result<Vec<(String, PathBuf, u64)>> {
        let mut files = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let dir_entry = dir_entry?;
            let path = dir_entry.path();
            let Some(key) = entry_key(&path) else {
                log::debug!("Ignoring foreign file {} in store", path.display());
                continue;
            };
            files.push((key, path, dir_entry.metadata()?.len()));
        }
        Ok(files)
    }

    fn used(&self) -> Result<usize> {
        Ok(self.entry_files()?.iter().map(|(_, _, len)| *len as usize).sum())
    }
}

/// Key encoded in an entry file name, if `path` is one.
fn entry_key(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let key = String::from_utf8(URL_SAFE_NO_PAD.decode(stem).ok()?).ok()?;
    // Reject stems that decode but are not how this store names files.
    if URL_SAFE_NO_PAD.encode(key.as_bytes()) != stem {
        return None;
    }
    Some(key)
}

/// Write to a sibling temp file, then rename over the target.
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)
}

fn file_len(path: &Path) -> Result<usize> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len() as usize),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}

impl PdfStore for DirectoryStore {
    fn store(&self, key: &str, entry: &StoredPdf) -> Result<bool> {
        let encoded = serde_json::to_vec(entry)?;
        let _guard = self.write_lock.lock().map_err(poisoned)?;

        let path = self.entry_path(key);
        let used = self.used()?;
        let existing = file_len(&path)?;
        if !fits_budget(used, existing, encoded.len(), self.budget) {
            log_rejection(key, encoded.len(), used, existing, self.budget);
            return Ok(false);
        }
        atomic_write(&path, &encoded)?;
        Ok(true)
    }

    fn load(&self, key: &str) -> Result<Option<StoredPdf>> {
        match fs::read(self.entry_path(key)) {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entry_files()?.into_iter().map(|(key, _, _)| key).collect();
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().map_err(poisoned)?;
        for (_, path, _) in self.entry_files()? {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn used_bytes(&self) -> Result<usize> {
        self.used()
    }

    fn budget_bytes(&self) -> usize {
        self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn entry(name: &str) -> StoredPdf {
        StoredPdf {
            base64: "JVBERi0xLjc=".to_string(),
            page_count: 2,
            file_name: name.to_string(),
            timestamp_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path(), StoreConfig::default()).unwrap();
        assert!(store.store("session/42", &entry("a.pdf")).unwrap());
        assert_eq!(store.load("session/42").unwrap(), Some(entry("a.pdf")));
        assert_eq!(store.keys().unwrap(), vec!["session/42".to_string()]);
        assert_eq!(store.used_bytes().unwrap(), entry("a.pdf").encoded_size().unwrap());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path(), StoreConfig::default()).unwrap();
        store.store("k", &entry("a.pdf")).unwrap();
        store.store("k", &entry("b.pdf")).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_budget_refusal() {
        let dir = tempfile::tempdir().unwrap();
        let one = entry("a.pdf").encoded_size().unwrap();
        let store = DirectoryStore::open(dir.path(), StoreConfig::default().with_budget(one)).unwrap();
        assert!(store.store("a", &entry("a.pdf")).unwrap());
        assert!(!store.store("b", &entry("b.pdf")).unwrap());
        assert_eq!(store.load("b").unwrap(), None);
    }

    #[test]
    fn test_corrupt_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path(), StoreConfig::default()).unwrap();
        fs::write(store.entry_path("bad"), b"{not json").unwrap();
        assert!(matches!(store.load("bad"), Err(Error::Json(_))));
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path(), StoreConfig::default()).unwrap();
        store.store("a", &entry("a.pdf")).unwrap();
        store.store("b", &entry("b.pdf")).unwrap();
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_foreign_files_are_not_entries() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.json");
        fs::write(&notes, vec![b'x'; 100]).unwrap();
        fs::write(dir.path().join("readme.txt"), b"hello").unwrap();

        let one = entry("a.pdf").encoded_size().unwrap();
        let store = DirectoryStore::open(dir.path(), StoreConfig::default().with_budget(one)).unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert_eq!(store.used_bytes().unwrap(), 0);
        assert!(store.store("a", &entry("a.pdf")).unwrap());

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(notes.exists());
        assert!(dir.path().join("readme.txt").exists());
    }

    #[test]
    fn test_entry_key_from_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryStore::open(dir.path(), StoreConfig::default()).unwrap();
        assert_eq!(entry_key(&store.entry_path("session/42")), Some("session/42".to_string()));
        assert_eq!(entry_key(&dir.path().join("notes.json")), None);
        assert_eq!(entry_key(&dir.path().join("YQ.tmp")), None);
    }
}
