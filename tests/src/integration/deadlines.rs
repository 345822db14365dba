//! # Storage Deadlines and Outages
//!
//! Every gateway call is bounded by `storage.timeout_ms`. Overruns and
//! outages must surface as `Storage` (503 at the boundary) and leave no
//! partial lifecycle transition behind.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use cm_01_persistence::{
        BuyRequestInsert, BuyRequestStore, ConditionalUpdate, ImageInsert, ImagePlacement,
        ImageStore, InMemoryGateway, ListingInsert, ListingQuery, ListingStore, PendingInsert,
        UserDirectory,
    };
    use cm_03_listings::{
        ListingConfig, ListingFilter, ListingLifecycleApi, ListingLifecycleService, NewImage,
        NewListing,
    };
    use cm_04_buy_requests::BuyRequestLifecycleApi;
    use cm_runtime::{ErrorResponse, MarketConfig};
    use shared_types::{
        BuyRequest, BuyRequestId, BuyRequestStatus, BuyRequestView, ErrorKind, ImageId, Listing,
        ListingId, ListingImage, ListingStatus, MarketError, MarketResult, Principal, Timestamp,
        UserId, UserProfile,
    };

    use crate::integration::harness::Market;

    fn market_with_timeout(timeout_ms: u64) -> Market {
        let mut config = MarketConfig::default();
        config.storage.timeout_ms = timeout_ms;
        Market::with_config(config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_times_out_as_storage() {
        let market = market_with_timeout(100);
        market
            .container
            .store()
            .set_latency(Some(Duration::from_millis(500)));

        let err = market
            .container
            .listings
            .list_active(&ListingFilter::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.is_retryable());
        assert_eq!(ErrorResponse::from(&err).status, 503);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_approve_leaves_listing_pending() {
        let market = market_with_timeout(100);
        let id = market.pending_listing("Scanner", 2000).await;
        let store = market.container.store();

        store.set_latency(Some(Duration::from_millis(250)));
        let err = market
            .container
            .listings
            .approve(&Market::admin(), id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);

        // Within the deadline again.
        store.set_latency(Some(Duration::from_millis(50)));
        let listing = market.container.listings.get_listing(id).await.unwrap();
        assert_eq!(listing.status, ListingStatus::Pending);

        store.set_latency(None);
        let approved = market
            .container
            .listings
            .approve(&Market::admin(), id)
            .await
            .unwrap();
        assert_eq!(approved.status, ListingStatus::Active);
    }

    #[tokio::test]
    async fn test_outage_blocks_buy_requests() {
        let market = Market::new();
        let id = market.active_listing("Microwave", 4000).await;
        let store = market.container.store();

        store.set_unavailable(true);
        let err = market
            .container
            .buy_requests
            .create(&Market::buyer(), id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);

        store.set_unavailable(false);
        assert_eq!(store.buy_request_count(), 0);
        market
            .container
            .buy_requests
            .create(&Market::buyer(), id)
            .await
            .unwrap();
    }

    // =============================================================================
    // PARTIAL CREATE: LISTING STORED, IMAGES NOT
    // =============================================================================

    /// Delegates to an in-memory gateway but refuses every image write.
    struct ImagelessGateway {
        inner: InMemoryGateway,
    }

    #[async_trait]
    impl ListingStore for ImagelessGateway {
        async fn get_listing(&self, id: ListingId) -> MarketResult<Option<Listing>> {
            self.inner.get_listing(id).await
        }

        async fn insert_listing(&self, data: ListingInsert) -> MarketResult<Listing> {
            self.inner.insert_listing(data).await
        }

        async fn update_listing_status(
            &self,
            id: ListingId,
            expected: ListingStatus,
            new: ListingStatus,
            now: Timestamp,
        ) -> MarketResult<ConditionalUpdate<Listing>> {
            self.inner
                .update_listing_status(id, expected, new, now)
                .await
        }

        async fn query_listings(&self, query: &ListingQuery) -> MarketResult<Vec<Listing>> {
            self.inner.query_listings(query).await
        }
    }

    #[async_trait]
    impl ImageStore for ImagelessGateway {
        async fn list_images(&self, listing_id: ListingId) -> MarketResult<Vec<ListingImage>> {
            self.inner.list_images(listing_id).await
        }

        async fn insert_images(
            &self,
            _listing_id: ListingId,
            _images: Vec<ImageInsert>,
            _max_images: usize,
        ) -> MarketResult<Vec<ListingImage>> {
            Err(MarketError::Storage("image table unavailable".into()))
        }

        async fn set_cover_image(
            &self,
            listing_id: ListingId,
            image_id: ImageId,
        ) -> MarketResult<Vec<ListingImage>> {
            self.inner.set_cover_image(listing_id, image_id).await
        }

        async fn reorder_images(
            &self,
            listing_id: ListingId,
            placements: &[ImagePlacement],
        ) -> MarketResult<Vec<ListingImage>> {
            self.inner.reorder_images(listing_id, placements).await
        }
    }

    #[async_trait]
    impl BuyRequestStore for ImagelessGateway {
        async fn get_buy_request(&self, id: BuyRequestId) -> MarketResult<Option<BuyRequest>> {
            self.inner.get_buy_request(id).await
        }

        async fn find_pending_buy_request(
            &self,
            listing_id: ListingId,
            buyer_id: UserId,
        ) -> MarketResult<Option<BuyRequest>> {
            self.inner.find_pending_buy_request(listing_id, buyer_id).await
        }

        async fn insert_buy_request(&self, data: BuyRequestInsert) -> MarketResult<PendingInsert> {
            self.inner.insert_buy_request(data).await
        }

        async fn update_buy_request_status(
            &self,
            id: BuyRequestId,
            expected: BuyRequestStatus,
            new: BuyRequestStatus,
            now: Timestamp,
        ) -> MarketResult<ConditionalUpdate<BuyRequest>> {
            self.inner
                .update_buy_request_status(id, expected, new, now)
                .await
        }

        async fn query_buy_requests_by_seller(
            &self,
            seller_id: UserId,
            status: Option<BuyRequestStatus>,
        ) -> MarketResult<Vec<BuyRequestView>> {
            self.inner.query_buy_requests_by_seller(seller_id, status).await
        }

        async fn query_buy_requests_by_buyer(
            &self,
            buyer_id: UserId,
        ) -> MarketResult<Vec<BuyRequestView>> {
            self.inner.query_buy_requests_by_buyer(buyer_id).await
        }
    }

    #[async_trait]
    impl UserDirectory for ImagelessGateway {
        async fn get_user(&self, id: UserId) -> MarketResult<Option<UserProfile>> {
            self.inner.get_user(id).await
        }
    }

    #[tokio::test]
    async fn test_image_failure_keeps_listing() {
        let gateway = Arc::new(ImagelessGateway {
            inner: InMemoryGateway::new(),
        });
        let listings = ListingLifecycleService::new(gateway.clone(), ListingConfig::default());

        let input = NewListing {
            title: Some("Camera".into()),
            price_cents: Some(15_000),
            images: vec![NewImage::new("camera.jpg")],
            ..Default::default()
        };
        let created = listings.create(&Principal::student(1), input).await.unwrap();

        assert!(!created.is_complete());
        assert_eq!(
            created.image_failure.as_ref().map(MarketError::kind),
            Some(ErrorKind::Storage)
        );
        assert!(created.listing.images.is_empty());

        let stored = listings.get_listing(created.listing.id).await.unwrap();
        assert_eq!(stored.status, ListingStatus::Pending);
        assert_eq!(gateway.inner.listing_count(), 1);
    }
}
