//! # Adapters
//!
//! Outbound port implementations.

pub mod listings;

pub use listings::ListingManagerLookup;
