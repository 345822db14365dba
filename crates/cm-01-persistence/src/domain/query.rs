//! Listing query specification.
//!
//! Adapters apply [`ListingQuery::matches`] so filter semantics are identical
//! whatever the backing store.

use shared_types::{CategoryId, Condition, Listing, ListingStatus, UserId};

/// Filter, ordering and pagination for `query_listings`.
///
/// Results are always ordered newest-created first, ties broken by the
/// higher id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Restrict to one moderation status.
    pub status: Option<ListingStatus>,
    /// Restrict to one seller.
    pub seller_id: Option<UserId>,
    /// Case-insensitive substring over title and description.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    /// Inclusive lower price bound.
    pub price_min_cents: Option<u64>,
    /// Inclusive upper price bound.
    pub price_max_cents: Option<u64>,
    pub condition: Option<Condition>,
    /// `None` means unbounded.
    pub limit: Option<usize>,
    pub offset: usize,
}

impl ListingQuery {
    /// All listings with the given status.
    pub fn with_status(status: ListingStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// All listings owned by the given seller.
    pub fn by_seller(seller_id: UserId) -> Self {
        Self {
            seller_id: Some(seller_id),
            ..Default::default()
        }
    }

    /// True if the listing passes every filter of this query.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(status) = self.status {
            if listing.status != status {
                return false;
            }
        }
        if let Some(seller_id) = self.seller_id {
            if listing.seller_id != seller_id {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if listing.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(min) = self.price_min_cents {
            if listing.price_cents < min {
                return false;
            }
        }
        if let Some(max) = self.price_max_cents {
            if listing.price_cents > max {
                return false;
            }
        }
        if let Some(condition) = self.condition {
            if listing.condition != condition {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                listing.title.to_lowercase().contains(&needle)
                    || listing
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}
