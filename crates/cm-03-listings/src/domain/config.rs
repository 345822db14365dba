//! Listing subsystem configuration.

use serde::{Deserialize, Serialize};

/// Limits applied by the listing lifecycle manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Maximum title length in characters, after trimming.
    pub max_title_len: usize,
    /// Maximum number of images attached to one listing.
    pub max_images_per_listing: usize,
    /// Page size used when `listActive` is called without a limit.
    pub default_page_limit: usize,
    /// Larger requested limits are clamped to this value.
    pub max_page_limit: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_title_len: 200,
            max_images_per_listing: 10,
            default_page_limit: 50,
            max_page_limit: 200,
        }
    }
}
