//! Caller-supplied inputs and operation outputs.

use serde::{Deserialize, Serialize};
use shared_types::{CategoryId, Condition, Listing, MarketError};

/// Raw listing input as received from the presentation layer.
///
/// Fields are optional so that missing values can be reported as
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewListing {
    pub category_id: Option<CategoryId>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Signed so that a negative price can be rejected explicitly.
    pub price_cents: Option<i64>,
    /// Defaults to `unknown`.
    pub condition: Option<Condition>,
    /// Defaults to 1.
    pub quantity: Option<u32>,
    /// Images in upload order.
    pub images: Vec<NewImage>,
}

/// An image reference supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewImage {
    /// Reference into the external image store.
    pub reference: String,
    /// Explicit position; defaults to upload order.
    pub position: Option<u32>,
    /// Explicit cover request.
    pub is_cover: bool,
}

impl NewImage {
    /// An image placed in upload order, not marked as cover.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            position: None,
            is_cover: false,
        }
    }

    /// Mark this image as the cover.
    pub fn cover(mut self) -> Self {
        self.is_cover = true;
        self
    }

    /// Place this image at an explicit position.
    pub fn at(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }
}

/// Public browse filters for active listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingFilter {
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub price_min_cents: Option<u64>,
    pub price_max_cents: Option<u64>,
    pub condition: Option<Condition>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Result of `create`.
///
/// A listing row is never rolled back once written. If attaching its images
/// fails afterwards, the listing is returned together with the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedListing {
    pub listing: Listing,
    pub image_failure: Option<MarketError>,
}

impl CreatedListing {
    /// True if the listing and every supplied image were stored.
    pub fn is_complete(&self) -> bool {
        self.image_failure.is_none()
    }
}
