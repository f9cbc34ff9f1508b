//! Fetcher configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the design content fetcher.
///
/// Every section has defaults, so an empty file is a valid configuration.
///
/// ```toml
/// [cache]
/// group = "db/design/static"
/// ttl_secs = 172800
///
/// [storage]
/// table_prefix = "ph7_"
/// query_timeout_ms = 2000
///
/// [site]
/// url = "https://example.com/"
/// static_url = "https://example.com/static/"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    /// Cache slot settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Site URLs and identity.
    #[serde(default)]
    pub site: SiteConfig,

    /// Advertising settings.
    #[serde(default)]
    pub ads: AdsConfig,
}

impl DesignConfig {
    /// Load config from a file. `.json` files are read as JSON, anything else
    /// as TOML.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            Self::from_toml(&content).with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content).with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// Cache slot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Group every design slot lives in.
    #[serde(default = "default_group")]
    pub group: String,

    /// Entry lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Whether "storage had nothing" is cached too.
    #[serde(default = "default_true")]
    pub cache_empty: bool,
}

impl CacheConfig {
    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            group: default_group(),
            ttl_secs: default_ttl_secs(),
            cache_empty: true,
        }
    }
}

fn default_group() -> String {
    "db/design/static".to_string()
}

fn default_ttl_secs() -> u64 {
    // Two days.
    172_800
}

fn default_true() -> bool {
    true
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Prefix prepended to every table name.
    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,

    /// Deadline for a single query, in milliseconds.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

impl StorageConfig {
    /// Prefixed table name.
    pub fn table(&self, name: &str) -> String {
        format!("{}{}", self.table_prefix, name)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            table_prefix: default_table_prefix(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

fn default_table_prefix() -> String {
    "ph7_".to_string()
}

fn default_query_timeout_ms() -> u64 {
    2_000
}

/// Site URLs and identity, used when rendering and expanding variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root URL, with trailing slash.
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Static asset URL, with trailing slash.
    #[serde(default = "default_static_url")]
    pub static_url: String,

    /// Site name.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Language used when the request doesn't name one.
    #[serde(default = "default_lang")]
    pub default_lang: String,

    /// Module name of the administrative area.
    #[serde(default = "default_admin_module")]
    pub admin_module: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            static_url: default_static_url(),
            name: default_site_name(),
            default_lang: default_lang(),
            admin_module: default_admin_module(),
        }
    }
}

fn default_site_url() -> String {
    "http://localhost/".to_string()
}

fn default_static_url() -> String {
    "http://localhost/static/".to_string()
}

fn default_site_name() -> String {
    "My Site".to_string()
}

fn default_lang() -> String {
    "en_US".to_string()
}

fn default_admin_module() -> String {
    "admin123".to_string()
}

/// Advertising settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdsConfig {
    /// When false, ads are neither fetched nor rendered.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Query parameter carrying the clicked ad id.
    #[serde(default = "default_click_param")]
    pub click_param: String,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            click_param: default_click_param(),
        }
    }
}

fn default_click_param() -> String {
    "ad_click".to_string()
}
