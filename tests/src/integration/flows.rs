//! # Integration Test Flows
//!
//! Listing moderation and buy-request negotiation driven through the fully
//! wired container (deadline gateway, both managers, listing lookup
//! adapter).
//!
//! ## Flows Tested
//!
//! 1. **Calculator sale**: create → approve → request → accept → late reject
//! 2. **Moderation**: double approve, terminal rejection, admin-only queue
//! 3. **Negotiation guards**: unavailable listings, own listings, duplicates
//! 4. **Images**: exclusive cover, cover-first ordering in browse results

#[cfg(test)]
mod tests {
    use cm_01_persistence::ImagePlacement;
    use cm_03_listings::{ListingFilter, ListingLifecycleApi, NewImage, NewListing};
    use cm_04_buy_requests::BuyRequestLifecycleApi;
    use cm_runtime::ErrorResponse;
    use shared_types::{
        BuyRequestStatus, Condition, ErrorKind, ListingId, ListingStatus, MarketError, UserId,
    };

    use crate::integration::harness::{Market, SELLER};

    // =============================================================================
    // CALCULATOR SALE
    // =============================================================================

    #[tokio::test]
    async fn test_calculator_sale() {
        let market = Market::new();
        let listings = &market.container.listings;
        let requests = &market.container.buy_requests;

        let input = NewListing {
            title: Some("Calculator".into()),
            price_cents: Some(2500),
            ..Default::default()
        };
        let created = listings.create(&Market::seller(), input).await.unwrap();
        assert_eq!(created.listing.status, ListingStatus::Pending);
        let listing_id = created.listing.id;

        let approved = listings.approve(&Market::admin(), listing_id).await.unwrap();
        assert_eq!(approved.status, ListingStatus::Active);

        let request = requests.create(&Market::buyer(), listing_id).await.unwrap();
        assert_eq!(request.status, BuyRequestStatus::Pending);
        assert_eq!(request.seller_id, UserId(SELLER));

        let accepted = requests
            .accept_request(&Market::seller(), request.id)
            .await
            .unwrap();
        assert_eq!(accepted.status, BuyRequestStatus::Accepted);

        let err = requests
            .reject_request(&Market::seller(), request.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(ErrorResponse::from(&err).status, 400);

        // The listing is untouched by the sale.
        let listing = listings.get_listing(listing_id).await.unwrap();
        assert_eq!(listing.status, ListingStatus::Active);
        assert_eq!(listing.quantity, 1);
    }

    // =============================================================================
    // MODERATION
    // =============================================================================

    #[tokio::test]
    async fn test_second_approve_fails() {
        let market = Market::new();
        let id = market.active_listing("Desk", 4000).await;

        let err = market
            .container
            .listings
            .approve(&Market::admin(), id)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            MarketError::InvalidState("only pending listings can be approved".into())
        );
    }

    #[tokio::test]
    async fn test_rejected_listing_is_terminal_and_hidden() {
        let market = Market::new();
        let listings = &market.container.listings;
        let id = market.pending_listing("Lamp", 1500).await;

        listings.reject(&Market::admin(), id).await.unwrap();

        assert_eq!(
            listings.approve(&Market::admin(), id).await.unwrap_err().kind(),
            ErrorKind::InvalidState
        );
        let active = listings.list_active(&ListingFilter::default()).await.unwrap();
        assert!(active.iter().all(|l| l.id != id));

        // The owner still sees it.
        let own = listings
            .list_by_seller(&Market::seller(), UserId(SELLER))
            .await
            .unwrap();
        assert_eq!(own[0].status, ListingStatus::Rejected);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_moderate() {
        let market = Market::new();
        let id = market.pending_listing("Chair", 900).await;

        let err = market
            .container
            .listings
            .approve(&Market::seller(), id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(ErrorResponse::from(&err).status, 403);

        let err = market
            .container
            .listings
            .list_pending(&Market::buyer())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_unknown_listing_is_not_found() {
        let market = Market::new();
        let err = market
            .container
            .listings
            .approve(&Market::admin(), ListingId(4242))
            .await
            .unwrap_err();
        assert_eq!(ErrorResponse::from(&err).status, 404);
    }

    // =============================================================================
    // NEGOTIATION GUARDS
    // =============================================================================

    #[tokio::test]
    async fn test_requests_on_unavailable_listings() {
        let market = Market::new();
        let requests = &market.container.buy_requests;

        let pending = market.pending_listing("Kettle", 1200).await;
        let err = requests.create(&Market::buyer(), pending).await.unwrap_err();
        assert_eq!(
            err,
            MarketError::InvalidState("listing is not available for purchase".into())
        );

        let rejected = market.pending_listing("Toaster", 1800).await;
        market
            .container
            .listings
            .reject(&Market::admin(), rejected)
            .await
            .unwrap();
        let err = requests.create(&Market::buyer(), rejected).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        assert_eq!(market.container.store().buy_request_count(), 0);
    }

    #[tokio::test]
    async fn test_seller_cannot_request_own_listing() {
        let market = Market::new();
        let id = market.active_listing("Bike", 9000).await;

        let err = market
            .container
            .buy_requests
            .create(&Market::seller(), id)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            MarketError::Validation("cannot request your own listing".into())
        );
    }

    #[tokio::test]
    async fn test_duplicate_pending_request_conflicts() {
        let market = Market::new();
        let requests = &market.container.buy_requests;
        let id = market.active_listing("Monitor", 6000).await;

        requests.create(&Market::buyer(), id).await.unwrap();
        let err = requests.create(&Market::buyer(), id).await.unwrap_err();
        assert_eq!(err, MarketError::Conflict("already has a pending request".into()));

        // Another buyer is unaffected.
        requests.create(&Market::other_buyer(), id).await.unwrap();
        assert_eq!(market.container.store().buy_request_count(), 2);
    }

    #[tokio::test]
    async fn test_non_seller_decisions_report_state_first() {
        let market = Market::new();
        let requests = &market.container.buy_requests;
        let id = market.active_listing("Headphones", 3000).await;
        let request = requests.create(&Market::buyer(), id).await.unwrap();

        let err = requests
            .accept_request(&Market::other_buyer(), request.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        requests
            .reject_request(&Market::seller(), request.id)
            .await
            .unwrap();

        for attempt in [
            requests.accept_request(&Market::other_buyer(), request.id).await,
            requests.reject_request(&Market::buyer(), request.id).await,
        ] {
            assert_eq!(attempt.unwrap_err().kind(), ErrorKind::InvalidState);
        }
    }

    #[tokio::test]
    async fn test_incoming_and_mine_views() {
        let market = Market::new();
        let requests = &market.container.buy_requests;
        let id = market.active_listing("Textbook", 3500).await;

        let first = requests.create(&Market::buyer(), id).await.unwrap();
        market.clock.advance(60_000);
        let second = requests.create(&Market::other_buyer(), id).await.unwrap();

        let incoming = requests.list_incoming(&Market::seller()).await.unwrap();
        let names: Vec<_> = incoming
            .iter()
            .map(|v| v.buyer_name.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["Olly Other", "Bea Buyer"]);
        assert!(incoming.iter().all(|v| v.listing_title.as_deref() == Some("Textbook")));

        requests
            .accept_request(&Market::seller(), second.id)
            .await
            .unwrap();
        let incoming = requests.list_incoming(&Market::seller()).await.unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].request.id, first.id);

        let mine = requests.list_mine(&Market::other_buyer()).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].request.status, BuyRequestStatus::Accepted);
        assert_eq!(mine[0].seller_name.as_deref(), Some("Sam Seller"));
        assert_eq!(mine[0].price_cents, Some(3500));
    }

    // =============================================================================
    // BROWSING AND IMAGES
    // =============================================================================

    #[tokio::test]
    async fn test_list_active_filters() {
        let market = Market::new();
        let listings = &market.container.listings;
        let cheap = market.active_listing("Desk lamp", 800).await;
        let pricey = market.active_listing("Standing desk", 25_000).await;
        market.active_listing("Chair", 5_000).await;
        market.pending_listing("Desk organiser", 500).await;

        let filter = ListingFilter {
            search: Some("desk".into()),
            ..Default::default()
        };
        let found = listings.list_active(&filter).await.unwrap();
        let ids: Vec<_> = found.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![pricey, cheap]);

        let filter = ListingFilter {
            search: Some("desk".into()),
            price_min_cents: Some(800),
            price_max_cents: Some(800),
            ..Default::default()
        };
        let found = listings.list_active(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, cheap);

        let page = ListingFilter {
            limit: Some(1),
            offset: Some(1),
            ..Default::default()
        };
        let found = listings.list_active(&page).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, pricey);
    }

    #[tokio::test]
    async fn test_listing_round_trips_through_browse() {
        let market = Market::new();
        let listings = &market.container.listings;
        let input = NewListing {
            title: Some("Graphing calculator".into()),
            description: Some("TI-84, with case".into()),
            price_cents: Some(4500),
            condition: Some(Condition::LikeNew),
            quantity: Some(2),
            images: vec![
                NewImage::new("front.jpg"),
                NewImage::new("back.jpg"),
                NewImage::new("case.jpg").cover(),
            ],
            ..Default::default()
        };
        let created = listings.create(&Market::seller(), input).await.unwrap();
        assert!(created.is_complete());
        let approved = listings
            .approve(&Market::admin(), created.listing.id)
            .await
            .unwrap();

        let active = listings.list_active(&ListingFilter::default()).await.unwrap();
        assert_eq!(active.len(), 1);
        let browsed = &active[0];
        assert_eq!(browsed, &approved);
        assert_eq!(browsed.condition, Condition::LikeNew);
        assert_eq!(browsed.quantity, 2);

        let refs: Vec<_> = browsed.images.iter().map(|i| i.reference.as_str()).collect();
        assert_eq!(refs, vec!["case.jpg", "front.jpg", "back.jpg"]);
    }

    #[tokio::test]
    async fn test_cover_stays_exclusive_across_operations() {
        let market = Market::new();
        let listings = &market.container.listings;
        let id = market.pending_listing("Guitar", 12_000).await;

        let images = listings
            .add_images(
                &Market::seller(),
                id,
                vec![NewImage::new("neck.jpg"), NewImage::new("body.jpg").cover()],
            )
            .await
            .unwrap();
        assert_eq!(images.iter().filter(|i| i.is_cover).count(), 1);
        assert_eq!(images[0].reference, "body.jpg");

        for image in images.clone() {
            let after = listings
                .set_cover_image(&Market::seller(), id, image.id)
                .await
                .unwrap();
            let covers: Vec<_> = after.iter().filter(|i| i.is_cover).collect();
            assert_eq!(covers.len(), 1);
            assert_eq!(covers[0].id, image.id);
        }

        let reversed: Vec<_> = images
            .iter()
            .rev()
            .enumerate()
            .map(|(position, image)| ImagePlacement {
                image_id: image.id,
                position: position as u32,
            })
            .collect();
        let reordered = listings
            .reorder_images(&Market::seller(), id, reversed)
            .await
            .unwrap();
        assert_eq!(reordered.iter().filter(|i| i.is_cover).count(), 1);
    }

    #[tokio::test]
    async fn test_cover_of_foreign_image_is_not_found() {
        let market = Market::new();
        let listings = &market.container.listings;
        let a = market.pending_listing("Mug", 300).await;
        let b = market.pending_listing("Plate", 400).await;
        let foreign = listings.get_listing(b).await.unwrap().images[0].id;

        let err = listings
            .set_cover_image(&Market::seller(), a, foreign)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
