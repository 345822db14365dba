//! Deadline Gateway Decorator
//!
//! Wraps any gateway so that every call completes or fails within a bounded
//! time. A call that overruns is surfaced as `MarketError::Storage`, the only
//! retryable error kind.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use shared_types::{
    BuyRequest, BuyRequestId, BuyRequestStatus, BuyRequestView, ImageId, Listing, ListingId,
    ListingImage, ListingStatus, MarketError, MarketResult, Timestamp, UserId, UserProfile,
};
use tracing::error;

use crate::domain::{
    BuyRequestInsert, ConditionalUpdate, ImageInsert, ImagePlacement, ListingInsert, ListingQuery,
    PendingInsert,
};
use crate::ports::{BuyRequestStore, ImageStore, ListingStore, UserDirectory};

/// Gateway decorator enforcing a per-call timeout.
pub struct DeadlineGateway<G> {
    inner: G,
    timeout: Duration,
}

impl<G> DeadlineGateway<G> {
    /// Wrap `inner`, bounding each call by `timeout`.
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// The wrapped gateway.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// The per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, op: &'static str, call: F) -> MarketResult<T>
    where
        F: Future<Output = MarketResult<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                error!(op, timeout_ms, "[cm-01] Persistence call timed out");
                Err(MarketError::Storage(format!(
                    "{} timed out after {}ms",
                    op, timeout_ms
                )))
            }
        }
    }
}

#[async_trait]
impl<G: ListingStore> ListingStore for DeadlineGateway<G> {
    async fn get_listing(&self, id: ListingId) -> MarketResult<Option<Listing>> {
        self.bounded("get_listing", self.inner.get_listing(id)).await
    }

    async fn insert_listing(&self, data: ListingInsert) -> MarketResult<Listing> {
        self.bounded("insert_listing", self.inner.insert_listing(data))
            .await
    }

    async fn update_listing_status(
        &self,
        id: ListingId,
        expected: ListingStatus,
        new: ListingStatus,
        now: Timestamp,
    ) -> MarketResult<ConditionalUpdate<Listing>> {
        self.bounded(
            "update_listing_status",
            self.inner.update_listing_status(id, expected, new, now),
        )
        .await
    }

    async fn query_listings(&self, query: &ListingQuery) -> MarketResult<Vec<Listing>> {
        self.bounded("query_listings", self.inner.query_listings(query))
            .await
    }
}

#[async_trait]
impl<G: ImageStore> ImageStore for DeadlineGateway<G> {
    async fn list_images(&self, listing_id: ListingId) -> MarketResult<Vec<ListingImage>> {
        self.bounded("list_images", self.inner.list_images(listing_id))
            .await
    }

    async fn insert_images(
        &self,
        listing_id: ListingId,
        images: Vec<ImageInsert>,
        max_images: usize,
    ) -> MarketResult<Vec<ListingImage>> {
        self.bounded(
            "insert_images",
            self.inner.insert_images(listing_id, images, max_images),
        )
        .await
    }

    async fn set_cover_image(
        &self,
        listing_id: ListingId,
        image_id: ImageId,
    ) -> MarketResult<Vec<ListingImage>> {
        self.bounded(
            "set_cover_image",
            self.inner.set_cover_image(listing_id, image_id),
        )
        .await
    }

    async fn reorder_images(
        &self,
        listing_id: ListingId,
        placements: &[ImagePlacement],
    ) -> MarketResult<Vec<ListingImage>> {
        self.bounded(
            "reorder_images",
            self.inner.reorder_images(listing_id, placements),
        )
        .await
    }
}

#[async_trait]
impl<G: BuyRequestStore> BuyRequestStore for DeadlineGateway<G> {
    async fn get_buy_request(&self, id: BuyRequestId) -> MarketResult<Option<BuyRequest>> {
        self.bounded("get_buy_request", self.inner.get_buy_request(id))
            .await
    }

    async fn find_pending_buy_request(
        &self,
        listing_id: ListingId,
        buyer_id: UserId,
    ) -> MarketResult<Option<BuyRequest>> {
        self.bounded(
            "find_pending_buy_request",
            self.inner.find_pending_buy_request(listing_id, buyer_id),
        )
        .await
    }

    async fn insert_buy_request(&self, data: BuyRequestInsert) -> MarketResult<PendingInsert> {
        self.bounded("insert_buy_request", self.inner.insert_buy_request(data))
            .await
    }

    async fn update_buy_request_status(
        &self,
        id: BuyRequestId,
        expected: BuyRequestStatus,
        new: BuyRequestStatus,
        now: Timestamp,
    ) -> MarketResult<ConditionalUpdate<BuyRequest>> {
        self.bounded(
            "update_buy_request_status",
            self.inner.update_buy_request_status(id, expected, new, now),
        )
        .await
    }

    async fn query_buy_requests_by_seller(
        &self,
        seller_id: UserId,
        status: Option<BuyRequestStatus>,
    ) -> MarketResult<Vec<BuyRequestView>> {
        self.bounded(
            "query_buy_requests_by_seller",
            self.inner.query_buy_requests_by_seller(seller_id, status),
        )
        .await
    }

    async fn query_buy_requests_by_buyer(
        &self,
        buyer_id: UserId,
    ) -> MarketResult<Vec<BuyRequestView>> {
        self.bounded(
            "query_buy_requests_by_buyer",
            self.inner.query_buy_requests_by_buyer(buyer_id),
        )
        .await
    }
}

#[async_trait]
impl<G: UserDirectory> UserDirectory for DeadlineGateway<G> {
    async fn get_user(&self, id: UserId) -> MarketResult<Option<UserProfile>> {
        self.bounded("get_user", self.inner.get_user(id)).await
    }
}
