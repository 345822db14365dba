//! # Concurrent Transition Tests
//!
//! Many tasks on a multi-thread runtime race on the same record. The
//! conditional updates in the gateway must let exactly one of them win, and
//! concurrent image uploads must never share a position or pass the cap.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use rand::Rng;
    use tokio::task::JoinSet;

    use cm_01_persistence::ImageStore;
    use cm_03_listings::{ListingLifecycleApi, NewImage};
    use cm_04_buy_requests::BuyRequestLifecycleApi;
    use cm_runtime::MarketConfig;
    use shared_types::{BuyRequestStatus, ErrorKind, ListingId, ListingStatus, Principal};

    use crate::integration::harness::Market;

    const CONTENDERS: usize = 16;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_moderation_has_one_winner() {
        let market = Market::new();
        let id = market.pending_listing("Bookshelf", 3000).await;

        let approvals: Vec<bool> = {
            let mut rng = rand::thread_rng();
            (0..CONTENDERS).map(|_| rng.gen_bool(0.5)).collect()
        };

        let mut tasks = JoinSet::new();
        for approve in approvals {
            let listings = market.container.listings.clone();
            tasks.spawn(async move {
                let admin = Market::admin();
                if approve {
                    listings.approve(&admin, id).await
                } else {
                    listings.reject(&admin, id).await
                }
            });
        }

        let mut winners = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined.expect("task panicked") {
                Ok(listing) => winners.push(listing.status),
                Err(e) => assert_eq!(e.kind(), ErrorKind::InvalidState),
            }
        }

        assert_eq!(winners.len(), 1);
        let stored = market.container.listings.get_listing(id).await.unwrap();
        assert_eq!(stored.status, winners[0]);
        assert_ne!(stored.status, ListingStatus::Pending);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_decisions_have_one_winner() {
        let market = Market::new();
        let id = market.active_listing("Rice cooker", 2000).await;
        let request = market
            .container
            .buy_requests
            .create(&Market::buyer(), id)
            .await
            .unwrap();

        let mut tasks = JoinSet::new();
        for n in 0..CONTENDERS {
            let requests = market.container.buy_requests.clone();
            tasks.spawn(async move {
                let seller = Market::seller();
                if n % 2 == 0 {
                    requests.accept_request(&seller, request.id).await
                } else {
                    requests.reject_request(&seller, request.id).await
                }
            });
        }

        let mut winners = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined.expect("task panicked") {
                Ok(decided) => winners.push(decided.status),
                Err(e) => assert_eq!(e.kind(), ErrorKind::InvalidState),
            }
        }

        assert_eq!(winners.len(), 1);
        assert!(matches!(
            winners[0],
            BuyRequestStatus::Accepted | BuyRequestStatus::Rejected
        ));
        let mine = market
            .container
            .buy_requests
            .list_mine(&Market::buyer())
            .await
            .unwrap();
        assert_eq!(mine[0].request.status, winners[0]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_requests_store_one() {
        let market = Market::new();
        let id = market.active_listing("Desk fan", 1500).await;

        let mut tasks = JoinSet::new();
        for _ in 0..CONTENDERS {
            let requests = market.container.buy_requests.clone();
            tasks.spawn(async move { requests.create(&Market::buyer(), id).await });
        }

        let mut created = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined.expect("task panicked") {
                Ok(_) => created += 1,
                Err(e) => assert_eq!(e.kind(), ErrorKind::Conflict),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(market.container.store().buy_request_count(), 1);
    }

    /// Every upload reads the same one-image snapshot before any of them
    /// writes.
    async fn contended_uploads(
        market: &Market,
        title: &str,
    ) -> (ListingId, Vec<Result<usize, ErrorKind>>) {
        let id = market.pending_listing(title, 1200).await;
        market
            .container
            .store()
            .set_latency(Some(Duration::from_millis(20)));

        let mut tasks = JoinSet::new();
        for n in 0..CONTENDERS {
            let listings = market.container.listings.clone();
            tasks.spawn(async move {
                let upload = vec![NewImage::new(format!("images/upload-{}.jpg", n))];
                listings.add_images(&Market::seller(), id, upload).await
            });
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            outcomes.push(
                joined
                    .expect("task panicked")
                    .map(|set| set.len())
                    .map_err(|e| e.kind()),
            );
        }
        market.container.store().set_latency(None);
        (id, outcomes)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_uploads_get_distinct_positions() {
        let market = Market::new();
        let (id, outcomes) = contended_uploads(&market, "Kettle").await;
        assert!(outcomes.iter().all(Result::is_ok));

        let images = market.container.store().list_images(id).await.unwrap();
        assert_eq!(images.len(), CONTENDERS + 1);
        let positions: HashSet<u32> = images.iter().map(|i| i.position).collect();
        assert_eq!(positions.len(), images.len());
        assert_eq!(images.iter().filter(|i| i.is_cover).count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_uploads_respect_image_cap() {
        let mut config = MarketConfig::default();
        config.listings.max_images_per_listing = 2;
        let market = Market::with_config(config);

        let (id, outcomes) = contended_uploads(&market, "Toaster").await;
        let accepted = outcomes.iter().filter(|o| o.is_ok()).count();
        assert_eq!(accepted, 1);
        assert!(outcomes
            .iter()
            .filter_map(|o| o.as_ref().err())
            .all(|kind| *kind == ErrorKind::Validation));

        let images = market.container.store().list_images(id).await.unwrap();
        assert_eq!(images.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_buyers_do_not_contend() {
        let market = Market::new();
        let id = market.active_listing("Printer", 5000).await;

        let mut tasks = JoinSet::new();
        for buyer in 10..10 + CONTENDERS as u64 {
            let requests = market.container.buy_requests.clone();
            tasks.spawn(async move { requests.create(&Principal::student(buyer), id).await });
        }

        while let Some(joined) = tasks.join_next().await {
            joined.expect("task panicked").unwrap();
        }
        assert_eq!(market.container.store().buy_request_count(), CONTENDERS);
    }
}
