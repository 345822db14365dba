//! # Buy-Request Lifecycle Service
//!
//! Implements [`BuyRequestLifecycleApi`] over a [`PersistenceGateway`] and a
//! [`ListingLookup`].

use std::sync::Arc;

use async_trait::async_trait;
use cm_01_persistence::{BuyRequestInsert, ConditionalUpdate, PendingInsert, PersistenceGateway};
use cm_02_authorization::{ensure_request_seller, is_own_listing};
use shared_types::{
    BuyRequest, BuyRequestId, BuyRequestStatus, BuyRequestView, ListingId, MarketError,
    MarketResult, Principal, SystemTimeSource, TimeSource,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::domain::Decision;
use crate::ports::{BuyRequestLifecycleApi, ListingLookup};

const DUPLICATE_PENDING: &str = "already has a pending request";

/// The buy-request lifecycle manager.
pub struct BuyRequestLifecycleService<G: PersistenceGateway, L: ListingLookup> {
    gateway: Arc<G>,
    listings: Arc<L>,
    clock: Arc<dyn TimeSource>,
}

impl<G: PersistenceGateway, L: ListingLookup> BuyRequestLifecycleService<G, L> {
    /// Create a service with the system clock.
    pub fn new(gateway: Arc<G>, listings: Arc<L>) -> Self {
        Self::with_clock(gateway, listings, Arc::new(SystemTimeSource))
    }

    /// Create a service with an explicit clock.
    pub fn with_clock(gateway: Arc<G>, listings: Arc<L>, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            gateway,
            listings,
            clock,
        }
    }

    /// Shared seller decision: exists, seller, pending, conditional write.
    async fn decide(
        &self,
        principal: &Principal,
        request_id: BuyRequestId,
        decision: Decision,
    ) -> MarketResult<BuyRequest> {
        let request = self
            .gateway
            .get_buy_request(request_id)
            .await
            .map_err(log_storage)?
            .ok_or_else(|| MarketError::not_found("buy request", request_id))?;

        if request.status != BuyRequestStatus::Pending {
            debug!(
                request = %request_id,
                status = %request.status,
                "[cm-04] Request already decided"
            );
            return Err(already_decided(decision, request.status));
        }

        ensure_request_seller(principal, &request, decision.verb())?;

        let now = self.clock.now();
        match self
            .gateway
            .update_buy_request_status(
                request_id,
                BuyRequestStatus::Pending,
                decision.target(),
                now,
            )
            .await
            .map_err(log_storage)?
        {
            ConditionalUpdate::Applied(request) => {
                info!(
                    request = %request_id,
                    listing = %request.listing_id,
                    "[cm-04] Buy request {} -> {}", BuyRequestStatus::Pending, request.status
                );
                Ok(request)
            }
            ConditionalUpdate::Stale(current) => {
                debug!(
                    request = %request_id,
                    status = %current.status,
                    "[cm-04] Lost decision race"
                );
                Err(already_decided(decision, current.status))
            }
            ConditionalUpdate::Missing => Err(MarketError::not_found("buy request", request_id)),
        }
    }
}

#[async_trait]
impl<G: PersistenceGateway, L: ListingLookup> BuyRequestLifecycleApi
    for BuyRequestLifecycleService<G, L>
{
    #[instrument(
        skip(self, buyer),
        fields(correlation_id = %Uuid::new_v4(), buyer = %buyer.id)
    )]
    async fn create(&self, buyer: &Principal, listing_id: ListingId) -> MarketResult<BuyRequest> {
        let listing = self
            .listings
            .find_listing(listing_id)
            .await
            .map_err(log_storage)?
            .ok_or_else(|| MarketError::not_found("listing", listing_id))?;

        if !listing.is_purchasable() {
            debug!(
                listing = %listing_id,
                status = %listing.status,
                "[cm-04] Listing not purchasable"
            );
            return Err(MarketError::InvalidState(
                "listing is not available for purchase".to_string(),
            ));
        }

        if is_own_listing(buyer, &listing) {
            return Err(MarketError::Validation(
                "cannot request your own listing".to_string(),
            ));
        }

        if let Some(existing) = self
            .gateway
            .find_pending_buy_request(listing_id, buyer.id)
            .await
            .map_err(log_storage)?
        {
            debug!(existing = %existing.id, "[cm-04] Duplicate pending request");
            return Err(MarketError::Conflict(DUPLICATE_PENDING.to_string()));
        }

        let insert = BuyRequestInsert {
            listing_id,
            buyer_id: buyer.id,
            seller_id: listing.seller_id,
            created_at: self.clock.now(),
        };
        match self
            .gateway
            .insert_buy_request(insert)
            .await
            .map_err(log_storage)?
        {
            PendingInsert::Inserted(request) => {
                info!(
                    request = %request.id,
                    listing = %listing_id,
                    seller = %request.seller_id,
                    "[cm-04] Buy request created (pending)"
                );
                Ok(request)
            }
            // A concurrent create won between the check and the insert.
            PendingInsert::DuplicatePending(existing) => {
                debug!(existing = %existing.id, "[cm-04] Duplicate pending request");
                Err(MarketError::Conflict(DUPLICATE_PENDING.to_string()))
            }
        }
    }

    #[instrument(
        skip(self, principal),
        fields(correlation_id = %Uuid::new_v4(), principal = %principal.id)
    )]
    async fn accept_request(
        &self,
        principal: &Principal,
        request_id: BuyRequestId,
    ) -> MarketResult<BuyRequest> {
        self.decide(principal, request_id, Decision::Accept).await
    }

    #[instrument(
        skip(self, principal),
        fields(correlation_id = %Uuid::new_v4(), principal = %principal.id)
    )]
    async fn reject_request(
        &self,
        principal: &Principal,
        request_id: BuyRequestId,
    ) -> MarketResult<BuyRequest> {
        self.decide(principal, request_id, Decision::Reject).await
    }

    #[instrument(
        skip(self, seller),
        fields(correlation_id = %Uuid::new_v4(), seller = %seller.id)
    )]
    async fn list_incoming(&self, seller: &Principal) -> MarketResult<Vec<BuyRequestView>> {
        self.gateway
            .query_buy_requests_by_seller(seller.id, Some(BuyRequestStatus::Pending))
            .await
            .map_err(log_storage)
    }

    #[instrument(
        skip(self, buyer),
        fields(correlation_id = %Uuid::new_v4(), buyer = %buyer.id)
    )]
    async fn list_mine(&self, buyer: &Principal) -> MarketResult<Vec<BuyRequestView>> {
        self.gateway
            .query_buy_requests_by_buyer(buyer.id)
            .await
            .map_err(log_storage)
    }
}

fn already_decided(decision: Decision, current: BuyRequestStatus) -> MarketError {
    MarketError::InvalidState(format!(
        "cannot {} a request that is already {}",
        decision.verb(),
        current
    ))
}

fn log_storage(e: MarketError) -> MarketError {
    if let MarketError::Storage(ref message) = e {
        error!("[cm-04] Storage failure: {}", message);
    }
    e
}
