//! In-process document store

use super::DocumentStore;
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps documents in memory; used for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Value>>,
    unavailable: Option<String>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails as unreachable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            unavailable: Some(message.into()),
        }
    }

    pub fn with_document(mut self, key: impl Into<String>, document: Value) -> Self {
        self.documents.get_mut().insert(key.into(), document);
        self
    }

    fn check_available(&self) -> Result<(), StoreError> {
        match &self.unavailable {
            Some(message) => Err(StoreError::Unavailable {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.check_available()?;
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, document: Value) -> Result<(), StoreError> {
        self.check_available()?;
        self.documents.write().await.insert(key.to_string(), document);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory store".to_string()
    }
}
