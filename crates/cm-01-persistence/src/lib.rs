//! # CM-01 Persistence Gateway
//!
//! Abstract read/write operations over the Listing and BuyRequest
//! collections.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! The gateway is the only component that touches stored rows. Lifecycle
//! managers reach it through the [`PersistenceGateway`] port and never hold a
//! connection or pool of their own.
//!
//! ## Atomicity Guarantees
//!
//! | Operation | Guarantee |
//! |-----------|-----------|
//! | `update_listing_status` | applies only if the row still has the expected status |
//! | `update_buy_request_status` | applies only if the row still has the expected status |
//! | `insert_buy_request` | refuses a second pending request for the same (listing, buyer) |
//! | `set_cover_image` | old cover cleared and new cover set in one step |
//! | `insert_images` | cover flag stays exclusive; positions and the image cap checked under one lock |
//!
//! ## Module Structure
//!
//! ```text
//! cm-01-persistence/
//! ├── domain/          # Insert records, query spec, conditional outcomes
//! ├── ports/           # ListingStore, ImageStore, BuyRequestStore, UserDirectory
//! └── adapters/        # In-memory gateway, deadline decorator
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{DeadlineGateway, InMemoryGateway};
pub use domain::{
    assign_positions, BuyRequestInsert, ConditionalUpdate, ImageInsert, ImagePlacement,
    ListingInsert, ListingQuery, PendingInsert,
};
pub use ports::{BuyRequestStore, ImageStore, ListingStore, PersistenceGateway, UserDirectory};
