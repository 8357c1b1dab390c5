use async_trait::async_trait;
use exam_core::model::ExamRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

use crate::blob;

/// Key the exam collection is stored under unless configured otherwise.
pub const DEFAULT_EXAMS_KEY: &str = "yks_exams";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Opaque key-value store holding whole serialized values.
///
/// Writes replace the previous value for the key; there is no partial
/// update and no transaction spanning several keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_blob(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn put_blob(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Repository contract for the exam collection.
#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// Load the saved collection.
    ///
    /// Returns an empty collection when nothing was saved yet or the saved
    /// state cannot be parsed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend itself fails.
    async fn load_exams(&self) -> Result<Vec<ExamRecord>, StorageError>;

    /// Persist the full collection, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    async fn save_exams(&self, exams: &[ExamRecord]) -> Result<(), StorageError>;
}

/// Stores the exam collection as a JSON blob under one key.
#[derive(Clone)]
pub struct BlobExamRepository {
    blobs: Arc<dyn BlobStore>,
    key: String,
}

impl BlobExamRepository {
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl ExamRepository for BlobExamRepository {
    async fn load_exams(&self) -> Result<Vec<ExamRecord>, StorageError> {
        let Some(raw) = self.blobs.get_blob(&self.key).await? else {
            debug!(key = %self.key, "no saved exams");
            return Ok(Vec::new());
        };

        match blob::decode(&raw) {
            Ok(exams) => {
                debug!(key = %self.key, count = exams.len(), "loaded exams");
                Ok(exams)
            }
            Err(err) => {
                warn!(key = %self.key, "saved exams are unreadable, starting empty: {err}");
                Ok(Vec::new())
            }
        }
    }

    async fn save_exams(&self, exams: &[ExamRecord]) -> Result<(), StorageError> {
        let encoded = blob::encode(exams)?;
        self.blobs.put_blob(&self.key, &encoded).await?;
        debug!(key = %self.key, count = exams.len(), "saved exams");
        Ok(())
    }
}

/// In-memory blob store for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get_blob(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put_blob(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub exams: Arc<dyn ExamRepository>,
}

impl Storage {
    /// Wire the exam repository on top of an arbitrary blob store.
    #[must_use]
    pub fn from_blobs(blobs: Arc<dyn BlobStore>, key: impl Into<String>) -> Self {
        let exams: Arc<dyn ExamRepository> = Arc::new(BlobExamRepository::new(blobs, key));
        Self { exams }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_blobs(Arc::new(InMemoryBlobStore::new()), DEFAULT_EXAMS_KEY)
    }
}
