//! REST document store
//!
//! Documents live at `{base_url}/{key}`: `GET` reads, `PUT` writes and a
//! 404 means the document does not exist.

use super::DocumentStore;
use crate::error::StoreError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Store requests use a fixed timeout independent of tool calls
const STORE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn document_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key.trim_start_matches('/'))
    }

    fn unavailable(error: reqwest::Error) -> StoreError {
        StoreError::Unavailable {
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let url = self.document_url(key);
        debug!("Fetching document from {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(STORE_TIMEOUT)
            .send()
            .await
            .map_err(Self::unavailable)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable {
                message: format!("GET {} returned HTTP {}", url, status.as_u16()),
            });
        }

        let body = response.text().await.map_err(Self::unavailable)?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    async fn put(&self, key: &str, document: Value) -> Result<(), StoreError> {
        let url = self.document_url(key);
        debug!("Writing document to {}", url);

        let response = self
            .client
            .put(&url)
            .timeout(STORE_TIMEOUT)
            .json(&document)
            .send()
            .await
            .map_err(Self::unavailable)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::Unavailable {
                message: format!("PUT {} returned HTTP {}", url, response.status().as_u16()),
            })
        }
    }

    fn describe(&self) -> String {
        format!("http store at {}", self.base_url)
    }
}
