//! Persistence contract for catalog records.
//!
//! An [`EntityStore`] owns one collection of records of a single kind. It is
//! plain CRUD: relationship bookkeeping lives in
//! [`crate::relationship::RelationshipSync`], not here.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entity::Linked;
use crate::types::{new_entity_id, EntityId};

/// Errors raised by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The configured collection/table name is not a plain identifier.
    #[error("Invalid collection name '{0}'")]
    InvalidCollection(String),

    #[error("Store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wrap a driver error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// CRUD over one record collection.
#[async_trait]
pub trait EntityStore<T: Send + Sync + 'static>: Send + Sync {
    /// Every record, in insertion order.
    async fn find_all(&self) -> Result<Vec<T>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError>;

    /// Persist a new record. The store assigns the id; whatever id the
    /// caller put on `record` is ignored.
    async fn insert(&self, record: T) -> Result<T, StoreError>;

    /// Replace the record stored under `id` wholesale.
    ///
    /// Returns `false` if no record with that id exists.
    async fn replace(&self, id: &str, record: &T) -> Result<bool, StoreError>;

    /// Returns `false` if no record with that id exists.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Shared handle to a store, as held by services.
pub type DynStore<T> = Arc<dyn EntityStore<T>>;

/// In-process store keeping records in insertion order.
///
/// Cloning shares the underlying collection.
pub struct MemoryStore<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

#[async_trait]
impl<T: Linked> EntityStore<T> for MemoryStore<T> {
    async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, mut record: T) -> Result<T, StoreError> {
        let id: EntityId = new_entity_id();
        record.set_id(id);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn replace(&self, id: &str, record: &T) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => {
                let mut replacement = record.clone();
                replacement.set_id(id.to_string());
                *slot = replacement;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() < before)
    }
}
