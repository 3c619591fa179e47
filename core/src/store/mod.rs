//! Configuration store adapter
//!
//! The agent configuration lives as a single JSON document under a fixed key
//! in an opaque document store. Loading never fails: every failure mode
//! resolves to the built-in default configuration.

pub mod file;
pub mod http;
pub mod memory;

pub use file::FileDocumentStore;
pub use http::HttpDocumentStore;
pub use memory::MemoryDocumentStore;

use crate::config::{validate_report, AgentConfiguration, ToolRejection, ValidationReport};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Key of the live configuration document
pub const CONFIG_DOCUMENT_KEY: &str = "configurations/current";

/// A keyed JSON document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` when it does not exist
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Create or replace a document
    async fn put(&self, key: &str, document: Value) -> Result<(), StoreError>;

    /// Short human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Store,
    Default { reason: String },
}

impl ConfigSource {
    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default { .. })
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Store => write!(f, "store"),
            ConfigSource::Default { reason } => write!(f, "default ({})", reason),
        }
    }
}

/// A loaded configuration with its provenance
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub configuration: AgentConfiguration,
    pub source: ConfigSource,
    pub rejected: Vec<ToolRejection>,
}

impl LoadOutcome {
    fn fallback(reason: String) -> Self {
        warn!("Using default configuration: {}", reason);
        Self {
            configuration: AgentConfiguration::default_configuration(),
            source: ConfigSource::Default { reason },
            rejected: Vec::new(),
        }
    }
}

/// Loads and saves the singleton agent configuration
#[derive(Clone)]
pub struct ConfigStore {
    store: Arc<dyn DocumentStore>,
}

impl ConfigStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn describe(&self) -> String {
        self.store.describe()
    }

    /// Load the configuration, falling back to the default on any failure
    pub async fn load(&self) -> AgentConfiguration {
        self.load_outcome().await.configuration
    }

    /// Load the configuration and report its source and dropped tools
    pub async fn load_outcome(&self) -> LoadOutcome {
        info!(
            "Loading configuration '{}' from {}",
            CONFIG_DOCUMENT_KEY,
            self.store.describe()
        );

        let raw = match self.store.get(CONFIG_DOCUMENT_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                return LoadOutcome::fallback(format!(
                    "document '{}' not found",
                    CONFIG_DOCUMENT_KEY
                ))
            }
            Err(e) => return LoadOutcome::fallback(e.to_string()),
        };

        match validate_report(&raw) {
            Ok(report) => {
                for rejection in &report.rejected {
                    warn!(
                        "Dropping tool '{}' ({}): {}",
                        rejection.tool_id,
                        rejection.tool_name.as_deref().unwrap_or("unnamed"),
                        rejection.reasons.join("; ")
                    );
                }
                info!(
                    "Loaded configuration with {} tools ({} dropped)",
                    report.configuration.tools.len(),
                    report.rejected.len()
                );
                LoadOutcome {
                    configuration: report.configuration,
                    source: ConfigSource::Store,
                    rejected: report.rejected,
                }
            }
            Err(errors) => LoadOutcome::fallback(
                StoreError::Rejected { errors }.to_string(),
            ),
        }
    }

    /// Save a configuration, stamping `updatedAt` with the current time
    pub async fn save(&self, configuration: &AgentConfiguration) -> Result<AgentConfiguration, StoreError> {
        let mut stamped = configuration.clone();
        stamped.updated_at = Some(Utc::now());

        let document = serde_json::to_value(&stamped).map_err(|e| StoreError::Malformed {
            key: CONFIG_DOCUMENT_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.put(CONFIG_DOCUMENT_KEY, document).await?;
        info!(
            "Saved configuration with {} tools to {}",
            stamped.tools.len(),
            self.store.describe()
        );
        Ok(stamped)
    }

    /// Save a raw document as edited
    ///
    /// The document is checked structurally first and refused when the agent
    /// could not load it. Individually invalid tools are kept in the stored
    /// document so they can be fixed later; they are reported back.
    pub async fn save_raw(&self, document: Value) -> Result<ValidationReport, StoreError> {
        let mut report =
            validate_report(&document).map_err(|errors| StoreError::Rejected { errors })?;

        let now = Utc::now();
        let mut document = document;
        if let Value::Object(map) = &mut document {
            map.insert(
                "updatedAt".to_string(),
                Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
        self.store.put(CONFIG_DOCUMENT_KEY, document).await?;
        report.configuration.updated_at = Some(now);

        info!(
            "Saved configuration with {} tools ({} invalid) to {}",
            report.configuration.tools.len() + report.rejected.len(),
            report.rejected.len(),
            self.store.describe()
        );
        Ok(report)
    }
}
