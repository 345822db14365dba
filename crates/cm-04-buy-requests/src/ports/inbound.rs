//! # Inbound Port - BuyRequestLifecycleApi
//!
//! | Method | Allowed Principal |
//! |--------|-------------------|
//! | `create` | any student except the listing's seller |
//! | `accept_request` / `reject_request` | the request's seller |
//! | `list_incoming` | the seller (own requests only) |
//! | `list_mine` | the buyer (own requests only) |

use async_trait::async_trait;
use shared_types::{BuyRequest, BuyRequestId, BuyRequestView, ListingId, MarketResult, Principal};

/// Primary API for buy-request negotiation.
#[async_trait]
pub trait BuyRequestLifecycleApi: Send + Sync {
    /// Register `buyer`'s intent to purchase an active listing.
    ///
    /// # Errors
    /// - `NotFound`: unknown listing
    /// - `InvalidState`: listing is not `active`
    /// - `Validation`: buyer owns the listing
    /// - `Conflict`: buyer already has a pending request for it
    async fn create(&self, buyer: &Principal, listing_id: ListingId) -> MarketResult<BuyRequest>;

    /// Accept a pending request.
    ///
    /// # Errors
    /// - `NotFound`: unknown request
    /// - `InvalidState`: request is no longer pending
    /// - `Authorization`: principal is not the request's seller
    async fn accept_request(
        &self,
        principal: &Principal,
        request_id: BuyRequestId,
    ) -> MarketResult<BuyRequest>;

    /// Reject a pending request. Same preconditions as `accept_request`.
    async fn reject_request(
        &self,
        principal: &Principal,
        request_id: BuyRequestId,
    ) -> MarketResult<BuyRequest>;

    /// Pending requests addressed to `seller`, newest first, with listing
    /// title/price and buyer name.
    async fn list_incoming(&self, seller: &Principal) -> MarketResult<Vec<BuyRequestView>>;

    /// Every request made by `buyer`, newest first, with listing
    /// title/price and seller name.
    async fn list_mine(&self, buyer: &Principal) -> MarketResult<Vec<BuyRequestView>>;
}
