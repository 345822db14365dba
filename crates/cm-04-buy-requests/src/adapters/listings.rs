//! [`ListingLookup`] backed by the listing lifecycle manager.

use std::sync::Arc;

use async_trait::async_trait;
use cm_03_listings::ListingLifecycleApi;
use shared_types::{Listing, ListingId, MarketResult};

use crate::ports::ListingLookup;

/// Resolves listings through any [`ListingLifecycleApi`].
pub struct ListingManagerLookup<L: ListingLifecycleApi> {
    listings: Arc<L>,
}

impl<L: ListingLifecycleApi> ListingManagerLookup<L> {
    pub fn new(listings: Arc<L>) -> Self {
        Self { listings }
    }
}

#[async_trait]
impl<L: ListingLifecycleApi> ListingLookup for ListingManagerLookup<L> {
    async fn find_listing(&self, listing_id: ListingId) -> MarketResult<Option<Listing>> {
        self.listings.find_listing(listing_id).await
    }
}
