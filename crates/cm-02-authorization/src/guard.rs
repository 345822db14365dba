//! # Guard Predicates
//!
//! Seller-only, buyer-only and admin-only checks over already-loaded records.

use shared_types::{BuyRequest, Listing, MarketError, MarketResult, Principal, UserId};
use tracing::warn;

/// True iff the principal has the admin capability.
pub fn can_approve_listing(principal: &Principal) -> bool {
    principal.is_admin()
}

/// True iff the principal is the seller recorded on the request.
pub fn can_act_on_request(principal: &Principal, request: &BuyRequest) -> bool {
    principal.id == request.seller_id
}

/// True iff the principal owns the listing.
pub fn is_own_listing(principal: &Principal, listing: &Listing) -> bool {
    principal.id == listing.seller_id
}

/// True iff the principal may read the listings of `seller_id`.
pub fn can_view_seller_listings(principal: &Principal, seller_id: UserId) -> bool {
    principal.id == seller_id
}

/// Require the admin capability.
pub fn ensure_admin(principal: &Principal, action: &str) -> MarketResult<()> {
    if can_approve_listing(principal) {
        return Ok(());
    }
    warn!(principal = %principal.id, action, "[cm-02] Admin capability required");
    Err(MarketError::Authorization(format!(
        "only admins can {}",
        action
    )))
}

/// Require the principal to be the seller of the request.
pub fn ensure_request_seller(
    principal: &Principal,
    request: &BuyRequest,
    action: &str,
) -> MarketResult<()> {
    if can_act_on_request(principal, request) {
        return Ok(());
    }
    warn!(
        principal = %principal.id,
        request = %request.id,
        action,
        "[cm-02] Principal is not the seller of this request"
    );
    Err(MarketError::Authorization(format!(
        "only the seller can {} this request",
        action
    )))
}

/// Require the principal to own the listing.
pub fn ensure_listing_owner(
    principal: &Principal,
    listing: &Listing,
    action: &str,
) -> MarketResult<()> {
    if is_own_listing(principal, listing) {
        return Ok(());
    }
    warn!(
        principal = %principal.id,
        listing = %listing.id,
        action,
        "[cm-02] Principal does not own this listing"
    );
    Err(MarketError::Authorization(format!(
        "only the owner can {} this listing",
        action
    )))
}

/// Require the principal to be reading its own seller scope.
pub fn ensure_seller_scope(principal: &Principal, seller_id: UserId) -> MarketResult<()> {
    if can_view_seller_listings(principal, seller_id) {
        return Ok(());
    }
    warn!(
        principal = %principal.id,
        seller = %seller_id,
        "[cm-02] Principal requested another seller's listings"
    );
    Err(MarketError::Authorization(
        "sellers can only list their own listings".to_string(),
    ))
}
