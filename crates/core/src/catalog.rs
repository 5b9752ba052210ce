//! Catalog storage.
//!
//! The search engine only needs a full-scan read and an insert, so storage is
//! a small async trait. Two implementations ship here:
//! - [`InMemoryCatalog`] for tests and embedding
//! - [`JsonFileCatalog`] backing the CLI, one pretty-printed JSON array on disk

use crate::error::{Error, Result, ResultExt};
use crate::food::{FoodId, FoodRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Source of truth for the set of known foods.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Read every record, in catalog order.
    async fn read_all(&self) -> Result<Vec<FoodRecord>>;

    /// Insert a record and return it with its assigned id.
    ///
    /// Any id already on the record is ignored.
    async fn insert(&self, record: FoodRecord) -> Result<FoodRecord>;
}

fn next_id(records: &[FoodRecord]) -> FoodId {
    FoodId(records.iter().map(|r| r.id.0).max().unwrap_or(0) + 1)
}

/// Volatile catalog held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    records: RwLock<Vec<FoodRecord>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records, assigning ids 1..=n in order.
    pub fn with_records(records: impl IntoIterator<Item = FoodRecord>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.with_id(FoodId(i as u64 + 1)))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn read_all(&self) -> Result<Vec<FoodRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn insert(&self, record: FoodRecord) -> Result<FoodRecord> {
        record.validate()?;
        let mut records = self.records.write().await;
        let record = record.with_id(next_id(&records));
        records.push(record.clone());
        Ok(record)
    }
}

/// Catalog persisted as a JSON array of [`FoodRecord`].
///
/// A missing file reads as an empty catalog and is created on first insert.
#[derive(Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the whole file with `records`, assigning ids 1..=n.
    pub async fn overwrite(&self, records: Vec<FoodRecord>) -> Result<Vec<FoodRecord>> {
        let _guard = self.write_lock.lock().await;
        let records: Vec<FoodRecord> = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.with_id(FoodId(i as u64 + 1)))
            .collect();
        self.write(&records).await?;
        Ok(records)
    }

    async fn load(&self) -> Result<Vec<FoodRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Catalog file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(Error::catalog_unavailable(format!(
                    "Failed to read catalog {}: {}",
                    self.path.display(),
                    e
                ))
                .with_source(e));
            }
        };

        serde_json::from_str(&content).map_err(|e| Error::catalog_corrupt(&self.path).with_source(e))
    }

    /// Sibling file the catalog is staged in before being renamed into place.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Readers never take the write lock, so the file is replaced by rename
    /// and never seen half-written.
    async fn write(&self, records: &[FoodRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(records)?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, json)
            .await
            .map_err(Error::from)
            .context(format!("Writing catalog {}", staging.display()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(Error::from)
            .context(format!("Replacing catalog {}", self.path.display()))
    }
}

#[async_trait]
impl CatalogStore for JsonFileCatalog {
    async fn read_all(&self) -> Result<Vec<FoodRecord>> {
        self.load().await
    }

    async fn insert(&self, record: FoodRecord) -> Result<FoodRecord> {
        record.validate()?;
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let record = record.with_id(next_id(&records));
        records.push(record.clone());
        self.write(&records).await?;
        debug!(id = %record.id, name = %record.name, "Inserted catalog record");
        Ok(record)
    }
}
