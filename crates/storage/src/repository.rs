use async_trait::async_trait;
use lesson_core::model::LessonId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::codec::{PROGRESS_KEY, decode_ids, encode_ids};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key/value persistence, the desktop stand-in for browser local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Repository contract for the completion set.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load persisted ids. `Ok(None)` means nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for a malformed value, or other
    /// storage errors.
    async fn load_completed(&self) -> Result<Option<Vec<LessonId>>, StorageError>;

    /// Persist the ids, replacing the previous set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be stored.
    async fn save_completed(&self, ids: &[LessonId]) -> Result<(), StorageError>;

    /// Drop the persisted set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be removed.
    async fn clear_completed(&self) -> Result<(), StorageError>;
}

/// Keeps the completion set as a JSON array under `PROGRESS_KEY`.
#[derive(Clone)]
pub struct KvProgressRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl KvProgressRepository {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl ProgressRepository for KvProgressRepository {
    async fn load_completed(&self) -> Result<Option<Vec<LessonId>>, StorageError> {
        match self.kv.get(PROGRESS_KEY).await? {
            Some(raw) => decode_ids(&raw).map(Some),
            None => Ok(None),
        }
    }

    async fn save_completed(&self, ids: &[LessonId]) -> Result<(), StorageError> {
        let raw = encode_ids(ids)?;
        self.kv.set(PROGRESS_KEY, &raw).await
    }

    async fn clear_completed(&self) -> Result<(), StorageError> {
        self.kv.remove(PROGRESS_KEY).await
    }
}

/// Simple in-memory key/value store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_kv(Arc::new(InMemoryRepository::new()))
    }

    #[must_use]
    pub fn from_kv(kv: Arc<dyn KeyValueStore>) -> Self {
        let progress: Arc<dyn ProgressRepository> =
            Arc::new(KvProgressRepository::new(Arc::clone(&kv)));
        Self { kv, progress }
    }
}
