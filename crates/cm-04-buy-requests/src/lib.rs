//! # CM-04 Buy-Request Lifecycle Manager
//!
//! Negotiation between a buyer and the seller of an active listing.
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Negotiation State Machine
//!
//! ```text
//! [PENDING] ──accept (seller)──→ [ACCEPTED]   (terminal)
//!     │
//!     └──────reject (seller)──→ [REJECTED]   (terminal)
//! ```
//!
//! Accepting a request does not touch the listing: it stays `active` and its
//! quantity is unchanged.
//!
//! ## Create Preconditions (in order)
//!
//! | Step | Failure |
//! |------|---------|
//! | listing exists | `NotFound` |
//! | listing is `active` | `InvalidState` |
//! | buyer is not the seller | `Validation` |
//! | no pending request for (listing, buyer) | `Conflict` |
//!
//! ## Accept / Reject Preconditions (in order)
//!
//! | Step | Failure |
//! |------|---------|
//! | request exists | `NotFound` |
//! | request is `pending` | `InvalidState` |
//! | principal is the request's seller | `Authorization` |
//! | conditional write applied | `InvalidState` |
//!
//! Existence before state before authorization, matching listing moderation.
//!
//! ## Module Structure
//!
//! ```text
//! cm-04-buy-requests/
//! ├── domain/          # Decision (accept / reject)
//! ├── ports/
//! │   ├── inbound.rs   # BuyRequestLifecycleApi
//! │   └── outbound.rs  # ListingLookup
//! ├── adapters/        # ListingLookup over the listing manager
//! └── service.rs       # BuyRequestLifecycleService
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::ListingManagerLookup;
pub use domain::Decision;
pub use ports::{BuyRequestLifecycleApi, ListingLookup};
pub use service::BuyRequestLifecycleService;
