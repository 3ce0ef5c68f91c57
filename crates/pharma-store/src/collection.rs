//! # JSON Collection Files
//!
//! One file per entity type, holding a single JSON array of records.
//!
//! ## Read-Modify-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    JsonCollection::mutate                               │
//! │                                                                         │
//! │  lock (per file) ──► read products.json ──► Vec<Product>                │
//! │                                                  │                      │
//! │                                          closure edits it               │
//! │                                                  │                      │
//! │                      products.json.tmp ◄── serialize                    │
//! │                            │                                            │
//! │                       fsync + rename ──► products.json   ──► unlock     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Writers to the same file inside this process never interleave
//! - Readers see either the old array or the new one, never half a file
//! - A file that fails to parse is reported as [`StoreError::Corrupt`] and
//!   never overwritten
//!
//! Two processes sharing a data directory still race; last writer wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};

/// A JSON array file of `T` records.
///
/// Clones share the same write lock.
#[derive(Debug)]
pub struct JsonCollection<T> {
    path: PathBuf,
    pretty: bool,
    lock: Arc<Mutex<()>>,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCollection<T> {
    fn clone(&self) -> Self {
        JsonCollection {
            path: self.path.clone(),
            pretty: self.pretty,
            lock: Arc::clone(&self.lock),
            _records: PhantomData,
        }
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        JsonCollection {
            path: path.into(),
            pretty,
            lock: Arc::new(Mutex::new(())),
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file as `[]` if it does not exist yet.
    pub async fn ensure_exists(&self) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Creating empty collection file");
                self.write_records(&[]).await
            }
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    /// Reads every record.
    ///
    /// A missing or blank file reads as an empty collection.
    pub async fn load(&self) -> StoreResult<Vec<T>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Collection file missing, reading as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt(&self.path, e))
    }

    /// Reads, lets `f` edit the records, and writes them back.
    ///
    /// Nothing is written when `f` returns an error.
    pub async fn mutate<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> StoreResult<R>,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let result = f(&mut records)?;
        self.write_records(&records).await?;
        Ok(result)
    }

    /// Checks that the file can be read and parsed.
    pub async fn is_readable(&self) -> bool {
        self.load().await.is_ok()
    }

    /// Temp file + fsync + rename. Callers hold the lock.
    async fn write_records(&self, records: &[T]) -> StoreResult<()> {
        let data = if self.pretty {
            serde_json::to_vec_pretty(records)?
        } else {
            serde_json::to_vec(records)?
        };

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StoreError::Internal(format!("{} has no file name", self.path.display())))?;
        let mut temp_name = file_name.to_os_string();
        temp_name.push(".tmp");
        let temp_path = self.path.with_file_name(temp_name);

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;
        file.write_all(&data)
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;
        file.sync_all()
            .await
            .map_err(|e| StoreError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), count = records.len(), "Collection written");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u32,
        label: String,
    }

    fn row(id: u32) -> Row {
        Row {
            id,
            label: format!("row {}", id),
        }
    }

    #[tokio::test]
    async fn test_ensure_exists_creates_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let coll = JsonCollection::<Row>::new(dir.path().join("rows.json"), false);

        coll.ensure_exists().await.unwrap();

        let text = std::fs::read_to_string(coll.path()).unwrap();
        assert_eq!(text, "[]");
        assert!(coll.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_exists_keeps_existing_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{"id":1,"label":"kept"}]"#).unwrap();

        let coll = JsonCollection::<Row>::new(&path, false);
        coll.ensure_exists().await.unwrap();

        assert_eq!(coll.load().await.unwrap()[0].label, "kept");
    }

    #[tokio::test]
    async fn test_missing_and_blank_files_read_empty() {
        let dir = tempfile::tempdir().unwrap();
        let coll = JsonCollection::<Row>::new(dir.path().join("absent.json"), false);
        assert!(coll.load().await.unwrap().is_empty());

        let blank = dir.path().join("blank.json");
        std::fs::write(&blank, "  \n").unwrap();
        let coll = JsonCollection::<Row>::new(blank, false);
        assert!(coll.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutate_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let coll = JsonCollection::<Row>::new(dir.path().join("rows.json"), true);
        coll.ensure_exists().await.unwrap();

        let len = coll
            .mutate(|rows| {
                rows.push(row(1));
                rows.push(row(2));
                Ok(rows.len())
            })
            .await
            .unwrap();

        assert_eq!(len, 2);
        assert_eq!(coll.load().await.unwrap(), vec![row(1), row(2)]);
        assert!(!dir.path().join("rows.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_mutation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let coll = JsonCollection::<Row>::new(dir.path().join("rows.json"), false);
        coll.mutate(|rows| {
            rows.push(row(1));
            Ok(())
        })
        .await
        .unwrap();

        let result: StoreResult<()> = coll
            .mutate(|rows| {
                rows.clear();
                Err(StoreError::not_found("Row", "9"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(coll.load().await.unwrap(), vec![row(1)]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, "{ not json").unwrap();
        let coll = JsonCollection::<Row>::new(&path, false);

        assert!(matches!(coll.load().await, Err(StoreError::Corrupt { .. })));

        let result = coll
            .mutate(|rows| {
                rows.push(row(1));
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
        assert!(!coll.is_readable().await);
    }

    #[tokio::test]
    async fn test_concurrent_mutations_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let coll = JsonCollection::<Row>::new(dir.path().join("rows.json"), false);
        coll.ensure_exists().await.unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let coll = coll.clone();
            handles.push(tokio::spawn(async move {
                coll.mutate(|rows| {
                    rows.push(row(i));
                    Ok(())
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(coll.load().await.unwrap().len(), 20);
    }
}
