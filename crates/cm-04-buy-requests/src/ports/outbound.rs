//! # Outbound Ports
//!
//! Listing reads needed to validate a new buy request.

use async_trait::async_trait;
use shared_types::{Listing, ListingId, MarketResult};

/// Read access to listings, owned by the listing lifecycle manager.
#[async_trait]
pub trait ListingLookup: Send + Sync {
    /// The listing, or `None` if it does not exist.
    async fn find_listing(&self, listing_id: ListingId) -> MarketResult<Option<Listing>>;
}
