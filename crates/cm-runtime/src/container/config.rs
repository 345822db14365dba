//! # Market Configuration
//!
//! Unified configuration for the gateway and the lifecycle managers.
//!
//! ## Loading Order
//!
//! 1. Built-in defaults
//! 2. JSON file named by `CM_CONFIG` (optional)
//! 3. Environment overrides: `CM_STORAGE_TIMEOUT_MS`, `CM_DEFAULT_PAGE_LIMIT`,
//!    `CM_MAX_PAGE_LIMIT`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Complete market configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Browse pagination.
    pub pagination: PaginationConfig,
    /// Listing input limits.
    pub listings: ListingLimits,
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Deadline applied to every gateway call.
    pub timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { timeout_ms: 5_000 }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Browse pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size when the caller gives none.
    pub default_limit: usize,
    /// Larger requested page sizes are clamped to this.
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 200,
        }
    }
}

/// Listing input limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingLimits {
    pub max_images_per_listing: usize,
    pub max_title_len: usize,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self {
            max_images_per_listing: 10,
            max_title_len: 200,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("storage.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("pagination.default_limit ({default}) exceeds pagination.max_limit ({max})")]
    DefaultExceedsMax { default: usize, max: usize },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl MarketConfig {
    /// Reject configurations the managers cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.pagination.default_limit == 0 {
            return Err(ConfigError::ZeroLimit("pagination.default_limit"));
        }
        if self.pagination.max_limit == 0 {
            return Err(ConfigError::ZeroLimit("pagination.max_limit"));
        }
        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(ConfigError::DefaultExceedsMax {
                default: self.pagination.default_limit,
                max: self.pagination.max_limit,
            });
        }
        if self.listings.max_images_per_listing == 0 {
            return Err(ConfigError::ZeroLimit("listings.max_images_per_listing"));
        }
        if self.listings.max_title_len == 0 {
            return Err(ConfigError::ZeroLimit("listings.max_title_len"));
        }
        Ok(())
    }

    /// Parse a JSON document; missing sections keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Apply `CM_*` overrides. Unparseable values are ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, "CM_STORAGE_TIMEOUT_MS") {
            self.storage.timeout_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "CM_DEFAULT_PAGE_LIMIT") {
            self.pagination.default_limit = v;
        }
        if let Some(v) = parse_var(&lookup, "CM_MAX_PAGE_LIMIT") {
            self.pagination.max_limit = v;
        }
    }

    /// The listing manager's view of this configuration.
    pub fn listing_config(&self) -> cm_03_listings::ListingConfig {
        cm_03_listings::ListingConfig {
            max_title_len: self.listings.max_title_len,
            max_images_per_listing: self.listings.max_images_per_listing,
            default_page_limit: self.pagination.default_limit,
            max_page_limit: self.pagination.max_limit,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("{} is not a valid number ({:?}), ignoring", name, raw);
            None
        }
    }
}

/// Load configuration from `CM_CONFIG` and the environment, then validate.
pub fn load_config() -> Result<MarketConfig, ConfigError> {
    let mut config = match std::env::var("CM_CONFIG") {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            MarketConfig::from_file(Path::new(&path))?
        }
        Err(_) => MarketConfig::default(),
    };
    config.apply_env_overrides(|name| std::env::var(name).ok());
    config.validate()?;
    Ok(config)
}
