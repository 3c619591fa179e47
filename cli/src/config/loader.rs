//! CLI configuration loader for dialtone
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./dialtone.json or ./.dialtone/config.json
//! 3. XDG config: $XDG_CONFIG_HOME/dialtone/config.json or ~/.config/dialtone/config.json
//! 4. Environment variables only (no files)

use anyhow::{anyhow, Context, Result};
use dialtone_core::config::{
    ResolvedSettings, DEFAULT_SEARCH_ENDPOINT, DEFAULT_SEARCH_MAX_RESULTS, DEFAULT_TOOL_TIMEOUT_SECS,
};
use dialtone_core::store::{DocumentStore, FileDocumentStore, HttpDocumentStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const ENV_STORE_URL: &str = "DIALTONE_STORE_URL";
pub const ENV_STORE_DIR: &str = "DIALTONE_STORE_DIR";
pub const ENV_TOOL_TIMEOUT: &str = "DIALTONE_TOOL_TIMEOUT_SECS";
pub const ENV_SEARCH_URL: &str = "DIALTONE_SEARCH_URL";

/// Raw configuration file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    /// Base URL of a REST document store (can be "env:VAR_NAME")
    #[serde(default)]
    pub store_url: Option<String>,
    /// Directory of a file document store
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
    /// Per-call timeout for tool HTTP requests
    #[serde(default)]
    pub tool_timeout_secs: Option<u64>,
    /// Search provider endpoint for search_web
    #[serde(default)]
    pub search_url: Option<String>,
    #[serde(default)]
    pub search_max_results: Option<usize>,
}

/// Where configuration documents are kept
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    File(PathBuf),
    Http(String),
}

impl StoreBackend {
    pub fn open(&self) -> Arc<dyn DocumentStore> {
        match self {
            StoreBackend::File(dir) => Arc::new(FileDocumentStore::new(dir.clone())),
            StoreBackend::Http(url) => Arc::new(HttpDocumentStore::new(url.clone())),
        }
    }
}

/// Fully resolved CLI configuration
#[derive(Debug, Clone)]
pub struct ResolvedCliConfig {
    pub backend: StoreBackend,
    pub settings: ResolvedSettings,
}

impl ResolvedCliConfig {
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.backend.open()
    }
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    store_dir_override: Option<PathBuf>,
    store_url_override: Option<String>,
    timeout_override: Option<u64>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            store_dir_override: None,
            store_url_override: None,
            timeout_override: None,
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set store directory override
    pub fn with_store_dir_override(mut self, dir: PathBuf) -> Self {
        self.store_dir_override = Some(dir);
        self
    }

    /// Set store URL override
    pub fn with_store_url_override(mut self, url: String) -> Self {
        self.store_url_override = Some(url);
        self
    }

    /// Set tool timeout override
    pub fn with_timeout_override(mut self, secs: u64) -> Self {
        self.timeout_override = Some(secs);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ResolvedCliConfig> {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        // Step 2: Apply flag overrides; a store flag replaces both store fields
        if let Some(dir) = &self.store_dir_override {
            config.store_dir = Some(dir.clone());
            config.store_url = None;
        }
        if let Some(url) = &self.store_url_override {
            config.store_url = Some(url.clone());
            config.store_dir = None;
        }
        if let Some(secs) = self.timeout_override {
            config.tool_timeout_secs = Some(secs);
        }

        // Step 3: Resolve to final settings
        self.resolve_config(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        // 1. Current working directory
        if let Some(config) = self.try_load_cwd().await? {
            return Ok(config);
        }

        // 2. XDG config directory
        if let Some(config) = self.try_load_xdg().await? {
            return Ok(config);
        }

        // 3. Environment variables only
        self.try_load_env_only()
    }

    /// Try loading from current working directory
    async fn try_load_cwd(&self) -> Result<Option<RawConfig>> {
        let cwd = std::env::current_dir()?;

        let dialtone_json = cwd.join("dialtone.json");
        if dialtone_json.exists() {
            return Ok(Some(self.load_file(&dialtone_json).await?));
        }

        let dialtone_dir_config = cwd.join(".dialtone").join("config.json");
        if dialtone_dir_config.exists() {
            return Ok(Some(self.load_file(&dialtone_dir_config).await?));
        }

        Ok(None)
    }

    /// Try loading from XDG config directory
    async fn try_load_xdg(&self) -> Result<Option<RawConfig>> {
        if let Some(config_dir) = self.get_xdg_config_dir() {
            let config_path = config_dir.join("dialtone").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }
        Ok(None)
    }

    /// Build configuration from environment variables only
    fn try_load_env_only(&self) -> Result<RawConfig> {
        let tool_timeout_secs = match std::env::var(ENV_TOOL_TIMEOUT) {
            Ok(raw) => Some(raw.trim().parse::<u64>().with_context(|| {
                format!("{} must be a whole number of seconds, got '{}'", ENV_TOOL_TIMEOUT, raw)
            })?),
            Err(_) => None,
        };

        Ok(RawConfig {
            store_url: std::env::var(ENV_STORE_URL).ok(),
            store_dir: std::env::var(ENV_STORE_DIR).ok().map(PathBuf::from),
            tool_timeout_secs,
            search_url: std::env::var(ENV_SEARCH_URL).ok(),
            search_max_results: None,
        })
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        debug!("Loading CLI config from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get XDG config directory
    fn get_xdg_config_dir(&self) -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            Some(PathBuf::from(xdg_config))
        } else {
            dirs::home_dir().map(|home| home.join(".config"))
        }
    }

    /// Resolve raw config to the store backend and core settings
    fn resolve_config(&self, config: RawConfig) -> Result<ResolvedCliConfig> {
        let backend = match (config.store_url, config.store_dir) {
            (Some(url), _) => StoreBackend::Http(resolve_env_reference(&url)?),
            (None, Some(dir)) => StoreBackend::File(dir),
            (None, None) => StoreBackend::File(FileDocumentStore::default_dir()),
        };

        let settings = ResolvedSettings::new()
            .with_tool_timeout_secs(config.tool_timeout_secs.unwrap_or(DEFAULT_TOOL_TIMEOUT_SECS))
            .with_search_endpoint(
                config
                    .search_url
                    .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string()),
            )
            .with_search_max_results(
                config
                    .search_max_results
                    .unwrap_or(DEFAULT_SEARCH_MAX_RESULTS),
            );

        settings
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        debug!("Resolved store backend: {:?}", backend);
        Ok(ResolvedCliConfig { backend, settings })
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve an `env:VAR_NAME` reference, passing other values through
fn resolve_env_reference(value: &str) -> Result<String> {
    match value.strip_prefix("env:") {
        Some(var_name) => std::env::var(var_name)
            .with_context(|| format!("Environment variable not found: {}", var_name)),
        None => Ok(value.to_string()),
    }
}
