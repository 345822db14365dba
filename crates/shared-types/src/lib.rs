//! # Shared Types Crate
//!
//! This crate contains the marketplace entities, the authenticated principal
//! and the error taxonomy used by every lifecycle subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Listing, image and buy-request records are
//!   defined once here and crossed unchanged through the persistence boundary.
//! - **Typed Identity**: Every identifier is a newtype, so a `ListingId` can
//!   never be passed where a `BuyRequestId` is expected.
//! - **Tagged Errors**: Every failure carries an [`ErrorKind`] so callers can
//!   tell "doesn't exist", "wrong state" and "not allowed" apart.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::*;
