//! Directory-backed document store

use super::DocumentStore;
use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Stores each document as `<root>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Get the default store directory
    pub fn default_dir() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("dialtone");
        path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn document_path(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in key.split('/').filter(|s| !s.is_empty() && *s != "..") {
            path.push(segment);
        }
        path.set_extension("json");
        path
    }
}

impl Default for FileDocumentStore {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.document_path(key);
        debug!("Reading document from {}", path.display());

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    async fn put(&self, key: &str, document: Value) -> Result<(), StoreError> {
        let path = self.document_path(key);

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&document).map_err(|e| StoreError::Malformed {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        fs::write(&path, content).await?;
        debug!("Wrote document to {}", path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file store at {}", self.root.display())
    }
}
