use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::Result;

/// Last processed block per listener, persisted as a JSON object.
///
/// The file is rewritten on every update so a restarted listener resumes
/// after the last block it finished.
#[derive(Debug)]
pub struct CursorStore {
    path: PathBuf,
    blocks: Mutex<BTreeMap<String, u64>>,
}

impl CursorStore {
    /// Opens the store at `path`, creating parent directories as needed.
    /// A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let blocks = if path.exists() {
            let content = fs::read_to_string(path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_owned(),
            blocks: Mutex::new(blocks),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<u64> {
        let blocks = self.blocks.lock().unwrap_or_else(PoisonError::into_inner);
        blocks.get(key).copied()
    }

    /// Records `block` as processed for `key` and flushes the file.
    pub fn set(&self, key: &str, block: u64) -> Result<()> {
        let mut blocks = self.blocks.lock().unwrap_or_else(PoisonError::into_inner);
        blocks.insert(key.to_owned(), block);

        // Written while the lock is held so concurrent updates cannot interleave
        let json = serde_json::to_string_pretty(&*blocks)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("cursors.json");

        let store = CursorStore::open(&path).unwrap();
        assert_eq!(store.get("InvoiceNFT_0xabc"), None);
        store.set("InvoiceNFT_0xabc", 120).unwrap();
        store.set("InvoiceNFT_0xabc", 220).unwrap();
        store.set("InvoicePool_0xdef", 7).unwrap();
        drop(store);

        let reopened = CursorStore::open(&path).unwrap();
        assert_eq!(reopened.get("InvoiceNFT_0xabc"), Some(220));
        assert_eq!(reopened.get("InvoicePool_0xdef"), Some(7));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cursors.json");
        fs::write(&path, "not json").unwrap();
        assert!(CursorStore::open(&path).is_err());
    }
}
