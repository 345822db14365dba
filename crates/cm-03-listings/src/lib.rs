//! # CM-03 Listing Lifecycle Manager
//!
//! Owns listing creation, moderation transitions and image management.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Moderation State Machine
//!
//! ```text
//! [PENDING] ──approve (admin)──→ [ACTIVE]
//!     │
//!     └──────reject (admin)───→ [REJECTED]   (terminal, no re-review)
//! ```
//!
//! Both transitions are conditional updates: the gateway only writes if the
//! row is still `pending`, so a double approval or an approve/reject race
//! surfaces as `InvalidState` instead of a silent overwrite.
//!
//! ## Precondition Order
//!
//! | Step | Failure |
//! |------|---------|
//! | listing exists | `NotFound` |
//! | listing is pending | `InvalidState` |
//! | principal is admin | `Authorization` |
//! | conditional write applied | `InvalidState` |
//!
//! ## Image Invariants
//!
//! - At most one image per listing carries the cover flag.
//! - The first image becomes the cover unless another one is marked.
//! - Positions are unique per listing; reorders are trusted for contiguity.
//!
//! ## Module Structure
//!
//! ```text
//! cm-03-listings/
//! ├── domain/          # Input records, validation, image placement rules
//! ├── ports/           # ListingLifecycleApi
//! └── service.rs       # ListingLifecycleService
//! ```

#![warn(clippy::all)]

pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{CreatedListing, ListingConfig, ListingFilter, NewImage, NewListing};
pub use ports::ListingLifecycleApi;
pub use service::ListingLifecycleService;
