//! Site configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use comparo_cache::DurableStorage;
use comparo_catalog::search::{Sorter, DEFAULT_PREFERRED_BRANDS};
use comparo_consent::{ConsentConfig, ConsentStore};
use comparo_feed::{
    AffiliateFeedCache, FeedSource, FeedValidator, HttpSource, StaticFileSource,
    DEFAULT_FEED_PATH, DEFAULT_MARKERS, DEFAULT_MIN_LENGTH,
};
use serde::{Deserialize, Serialize};

use crate::service::DEFAULT_PER_PAGE;
use crate::source::{CatalogSource, HttpCatalogSource, JsonDirSource, StaticCatalogSource};
use crate::telemetry::TelemetryConfig;

/// Site configuration file (`comparo.toml` or `comparo.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Catalog backend and listing defaults.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Affiliate feed retrieval.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Consent gate.
    #[serde(default)]
    pub consent: ConsentConfig,

    /// Logging.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl SiteConfig {
    /// Load config from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file, in the format its extension names.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Build the consent store over the given client storage.
    pub fn consent_store<S: DurableStorage>(&self, storage: S) -> ConsentStore<S> {
        ConsentStore::new(storage).with_config(self.consent.clone())
    }
}

/// `[catalog]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Backend API base URL. Takes precedence over `data_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,

    /// Directory of exported `phones.json`, `boxes.json`, `plans.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Page size when a request gives none.
    pub per_page: usize,

    /// Brands ranked first by the popularity sort.
    pub preferred_brands: Vec<String>,

    /// Backend request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            data_dir: None,
            per_page: DEFAULT_PER_PAGE,
            preferred_brands: DEFAULT_PREFERRED_BRANDS
                .iter()
                .map(|b| b.to_string())
                .collect(),
            timeout_ms: 5_000,
        }
    }
}

impl CatalogConfig {
    pub fn sorter(&self) -> Sorter {
        Sorter::new(&self.preferred_brands)
    }

    /// The configured backend. With neither a URL nor a directory, an empty
    /// in-memory catalog.
    pub fn source(&self) -> Result<Arc<dyn CatalogSource>> {
        if let Some(url) = &self.backend_url {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_millis(self.timeout_ms))
                .build()
                .context("Failed to create catalog HTTP client")?;
            return Ok(Arc::new(HttpCatalogSource::new(client, url.clone())));
        }
        if let Some(dir) = &self.data_dir {
            return Ok(Arc::new(JsonDirSource::new(dir.clone())));
        }
        Ok(Arc::new(StaticCatalogSource::new()))
    }
}

/// `[feed]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Path of the feed, relative to `public_dir` or `base_url`.
    pub path: String,

    /// Directory the site's static assets are served from.
    pub public_dir: PathBuf,

    /// When set, fetch over HTTP from this origin instead of the disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    pub ttl_secs: u64,
    pub timeout_ms: u64,
    pub min_length: usize,
    pub markers: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_FEED_PATH.to_string(),
            public_dir: PathBuf::from("public"),
            base_url: None,
            ttl_secs: 30 * 60,
            timeout_ms: 10_000,
            min_length: DEFAULT_MIN_LENGTH,
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl FeedConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validator(&self) -> FeedValidator {
        FeedValidator::new(self.min_length, self.markers.iter().cloned())
    }

    pub fn source(&self) -> Arc<dyn FeedSource> {
        match &self.base_url {
            Some(base_url) => Arc::new(HttpSource::new(base_url, &self.path)),
            None => Arc::new(StaticFileSource::new(&self.public_dir, self.path.clone())),
        }
    }

    /// A feed cache wired to the configured source and limits.
    pub fn build_cache(&self) -> AffiliateFeedCache<Arc<dyn FeedSource>> {
        AffiliateFeedCache::new(self.source())
            .with_ttl(self.ttl())
            .with_timeout(self.timeout())
            .with_validator(self.validator())
    }
}
