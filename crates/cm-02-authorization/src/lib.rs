//! # CM-02 Authorization Guard
//!
//! Pure permission predicates consulted by both lifecycle managers before any
//! state mutation.
//!
//! **Subsystem ID:** 2
//!
//! ## Authorization Matrix
//!
//! | Operation | Permitted Principal | Predicate |
//! |-----------|---------------------|-----------|
//! | approve / reject listing | admin | [`can_approve_listing`] |
//! | list pending listings | admin | [`can_approve_listing`] |
//! | list a seller's listings | that seller | [`can_view_seller_listings`] |
//! | image management | listing owner | [`is_own_listing`] |
//! | accept / reject buy request | request's seller | [`can_act_on_request`] |
//!
//! The predicates have no side effects and perform no I/O. The `ensure_*`
//! wrappers turn a negative answer into `MarketError::Authorization`, which
//! callers keep distinct from `NotFound` and `InvalidState`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod guard;

// Re-exports
pub use guard::{
    can_act_on_request, can_approve_listing, can_view_seller_listings, ensure_admin,
    ensure_listing_owner, ensure_request_seller, ensure_seller_scope, is_own_listing,
};
