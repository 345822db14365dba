//! # Gateway Ports
//!
//! Storage operations consumed by the lifecycle managers, split per
//! collection. [`PersistenceGateway`] is the union every adapter provides.
//!
//! Every method either completes or fails with `MarketError::Storage`; no
//! method reports a lifecycle error kind except where documented.

use async_trait::async_trait;
use shared_types::{
    BuyRequest, BuyRequestId, BuyRequestStatus, BuyRequestView, ImageId, Listing, ListingId,
    ListingImage, ListingStatus, MarketResult, Timestamp, UserId, UserProfile,
};

use crate::domain::{
    BuyRequestInsert, ConditionalUpdate, ImageInsert, ImagePlacement, ListingInsert, ListingQuery,
    PendingInsert,
};

/// Listing collection.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Fetch a listing with its images attached.
    async fn get_listing(&self, id: ListingId) -> MarketResult<Option<Listing>>;

    /// Insert a new listing with status `pending` and return it.
    async fn insert_listing(&self, data: ListingInsert) -> MarketResult<Listing>;

    /// Move a listing from `expected` to `new`, stamping `updated_at`.
    ///
    /// The status check and the write happen atomically.
    async fn update_listing_status(
        &self,
        id: ListingId,
        expected: ListingStatus,
        new: ListingStatus,
        now: Timestamp,
    ) -> MarketResult<ConditionalUpdate<Listing>>;

    /// Listings matching the query, newest first, images attached.
    async fn query_listings(&self, query: &ListingQuery) -> MarketResult<Vec<Listing>>;
}

/// Image sub-collection, keyed by listing.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Images of a listing, in no particular order.
    async fn list_images(&self, listing_id: ListingId) -> MarketResult<Vec<ListingImage>>;

    /// Attach images to a listing and return the listing's full image set.
    ///
    /// If any inserted image is flagged as cover, every previous cover of the
    /// listing is cleared in the same step. Positions are assigned and the
    /// `max_images` cap is checked atomically with the write.
    ///
    /// # Errors
    /// - `NotFound` if the listing does not exist
    /// - `Validation` if the cap would be exceeded or a position is taken
    async fn insert_images(
        &self,
        listing_id: ListingId,
        images: Vec<ImageInsert>,
        max_images: usize,
    ) -> MarketResult<Vec<ListingImage>>;

    /// Make `image_id` the only cover of the listing.
    ///
    /// # Errors
    /// - `NotFound` if the image does not belong to the listing
    async fn set_cover_image(
        &self,
        listing_id: ListingId,
        image_id: ImageId,
    ) -> MarketResult<Vec<ListingImage>>;

    /// Assign new positions to images of the listing.
    ///
    /// Placements naming images of other listings are ignored.
    ///
    /// # Errors
    /// - `Validation` if a new position collides with an image left in place
    async fn reorder_images(
        &self,
        listing_id: ListingId,
        placements: &[ImagePlacement],
    ) -> MarketResult<Vec<ListingImage>>;
}

/// Buy-request collection.
#[async_trait]
pub trait BuyRequestStore: Send + Sync {
    async fn get_buy_request(&self, id: BuyRequestId) -> MarketResult<Option<BuyRequest>>;

    /// The pending request of `buyer_id` against `listing_id`, if any.
    async fn find_pending_buy_request(
        &self,
        listing_id: ListingId,
        buyer_id: UserId,
    ) -> MarketResult<Option<BuyRequest>>;

    /// Insert a pending request unless one already exists for the same
    /// (listing, buyer) pair. The check and the insert are atomic.
    async fn insert_buy_request(&self, data: BuyRequestInsert) -> MarketResult<PendingInsert>;

    /// Move a request from `expected` to `new`, stamping `updated_at`.
    async fn update_buy_request_status(
        &self,
        id: BuyRequestId,
        expected: BuyRequestStatus,
        new: BuyRequestStatus,
        now: Timestamp,
    ) -> MarketResult<ConditionalUpdate<BuyRequest>>;

    /// Requests addressed to a seller, newest first, joined with listing
    /// title/price and buyer name.
    async fn query_buy_requests_by_seller(
        &self,
        seller_id: UserId,
        status: Option<BuyRequestStatus>,
    ) -> MarketResult<Vec<BuyRequestView>>;

    /// Requests made by a buyer, newest first, joined with listing
    /// title/price and seller name.
    async fn query_buy_requests_by_buyer(
        &self,
        buyer_id: UserId,
    ) -> MarketResult<Vec<BuyRequestView>>;
}

/// Read access to user profiles for joined views.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: UserId) -> MarketResult<Option<UserProfile>>;
}

/// The full gateway consumed by the lifecycle managers.
pub trait PersistenceGateway: ListingStore + ImageStore + BuyRequestStore + UserDirectory {}

impl<T> PersistenceGateway for T where
    T: ListingStore + ImageStore + BuyRequestStore + UserDirectory
{
}
