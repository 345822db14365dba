//! # Ports Module
//!
//! - **Inbound**: [`BuyRequestLifecycleApi`], driven by the presentation layer
//! - **Outbound**: [`ListingLookup`], the read of the target listing; the
//!   persistence gateway from `cm-01-persistence` covers everything else

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
