//! File-backed JSON store.
//!
//! # Responsibility
//! - Persist a whole collection to one JSON file.
//! - Load that file back into a fresh collection.
//!
//! # Invariants
//! - Saves go through a sibling temp file plus rename, so the target path
//!   holds either the previous document or the complete new one.
//! - Loads never mutate caller state; they return a new collection.

use super::document::{decode_collection, encode_collection};
use super::{StoreError, StoreResult};
use crate::repo::collection::InMemoryCollection;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// JSON file holding one collection document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes `collection` to the backing file.
    ///
    /// # Side effects
    /// - Creates missing parent directories.
    /// - Emits `store_save` events with duration and status.
    pub fn save(&self, collection: &InMemoryCollection) -> StoreResult<()> {
        let started_at = Instant::now();
        info!(
            "event=store_save module=store status=start records={}",
            collection.records().len()
        );

        match self.write_document(collection) {
            Ok(bytes) => {
                info!(
                    "event=store_save module=store status=ok duration_ms={} bytes={}",
                    started_at.elapsed().as_millis(),
                    bytes
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Reads and decodes the backing file into a new collection.
    ///
    /// # Side effects
    /// - Emits `store_load` events with duration and status.
    pub fn load(&self) -> StoreResult<InMemoryCollection> {
        let started_at = Instant::now();
        info!("event=store_load module=store status=start");

        let result = fs::read_to_string(&self.path)
            .map_err(|source| io_error(&self.path, source))
            .and_then(|text| decode_collection(&text));

        match result {
            Ok(collection) => {
                info!(
                    "event=store_load module=store status=ok duration_ms={} records={} policy={}",
                    started_at.elapsed().as_millis(),
                    collection.records().len(),
                    collection.id_policy().as_str()
                );
                Ok(collection)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn write_document(&self, collection: &InMemoryCollection) -> StoreResult<usize> {
        let text = encode_collection(collection)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
            }
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, text.as_bytes())
            .map_err(|source| io_error(&temp_path, source))?;
        if let Err(source) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_error(&self.path, source));
        }

        Ok(text.len())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "collection.json".to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileStore;
    use std::path::Path;

    #[test]
    fn temp_path_is_hidden_sibling() {
        let store = JsonFileStore::new("/data/contacts.json");
        assert_eq!(store.temp_path(), Path::new("/data/.contacts.json.tmp"));
    }
}
