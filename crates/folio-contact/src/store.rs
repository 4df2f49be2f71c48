//! Message storage.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use thiserror::Error;

use crate::message::{ContactMessage, StoredMessage};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("message store lock poisoned")]
    Poisoned,
    #[error("message store unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere accepted contact messages are kept.
pub trait MessageStore: Send + Sync {
    fn create(&self, message: ContactMessage) -> Result<StoredMessage, StoreError>;

    fn list(&self) -> Result<Vec<StoredMessage>, StoreError>;
}

/// In-memory store with sequential ids. Clones share the same messages.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Vec<StoredMessage>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for MemoryStore {
    fn create(&self, message: ContactMessage) -> Result<StoredMessage, StoreError> {
        let mut messages = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let stored = StoredMessage {
            id: messages.len() as u64 + 1,
            message,
            created_at: Utc::now(),
        };
        messages.push(stored.clone());
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<StoredMessage>, StoreError> {
        self.inner
            .read()
            .map(|messages| messages.clone())
            .map_err(|_| StoreError::Poisoned)
    }
}
