//! # Subsystem Container
//!
//! Holds the gateway and both lifecycle managers.
//!
//! ## Thread Safety
//!
//! Every component is behind an `Arc` and is `Send + Sync`; the container
//! can be shared across request handlers as is.

use std::sync::Arc;

use cm_01_persistence::{DeadlineGateway, InMemoryGateway};
use cm_03_listings::ListingLifecycleService;
use cm_04_buy_requests::{BuyRequestLifecycleService, ListingManagerLookup};
use shared_types::{SystemTimeSource, TimeSource};
use tracing::info;

use crate::container::config::MarketConfig;

/// In-memory gateway bounded by the configured storage deadline.
pub type StorageGateway = DeadlineGateway<InMemoryGateway>;

/// Listing manager over the storage gateway.
pub type ListingService = ListingLifecycleService<StorageGateway>;

/// Buy-request manager over the storage gateway.
pub type BuyRequestService =
    BuyRequestLifecycleService<StorageGateway, ListingManagerLookup<ListingService>>;

/// Central container holding all subsystem instances.
pub struct MarketContainer {
    pub gateway: Arc<StorageGateway>,
    pub listings: Arc<ListingService>,
    pub buy_requests: Arc<BuyRequestService>,
}

impl MarketContainer {
    /// Wire every subsystem with the system clock.
    pub fn new(config: &MarketConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Wire every subsystem with an explicit clock.
    pub fn with_clock(config: &MarketConfig, clock: Arc<dyn TimeSource>) -> Self {
        let gateway = Arc::new(DeadlineGateway::new(
            InMemoryGateway::new(),
            config.storage.timeout(),
        ));
        info!(
            timeout_ms = config.storage.timeout_ms,
            "[cm-runtime] Persistence gateway ready"
        );

        let listings = Arc::new(ListingLifecycleService::with_clock(
            gateway.clone(),
            clock.clone(),
            config.listing_config(),
        ));
        let buy_requests = Arc::new(BuyRequestLifecycleService::with_clock(
            gateway.clone(),
            Arc::new(ListingManagerLookup::new(listings.clone())),
            clock,
        ));
        info!("[cm-runtime] Lifecycle managers ready");

        Self {
            gateway,
            listings,
            buy_requests,
        }
    }

    /// The raw in-memory store, for seeding users.
    pub fn store(&self) -> &InMemoryGateway {
        self.gateway.inner()
    }
}
