//! Validated records accepted by the gateway and the outcomes it reports.

use shared_types::{
    BuyRequest, CategoryId, Condition, ImageId, ListingId, Timestamp, UserId,
};

/// A validated listing ready to be inserted.
///
/// The gateway assigns the id and stores it with status `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingInsert {
    pub seller_id: UserId,
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: u64,
    pub condition: Condition,
    pub quantity: u32,
    pub created_at: Timestamp,
}

/// An image to attach to a listing, with its cover flag resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInsert {
    pub reference: String,
    /// Explicit position; `None` is assigned by the gateway at write time.
    pub position: Option<u32>,
    pub is_cover: bool,
}

/// New position for one image of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePlacement {
    pub image_id: ImageId,
    pub position: u32,
}

/// A buy request ready to be inserted with status `pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyRequestInsert {
    pub listing_id: ListingId,
    pub buyer_id: UserId,
    /// Copied from the listing at creation time.
    pub seller_id: UserId,
    pub created_at: Timestamp,
}

/// Outcome of a conditional status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalUpdate<T> {
    /// The row had the expected status and now carries the new one.
    Applied(T),
    /// The row exists but its status no longer matched; holds the current row.
    Stale(T),
    /// No row with that id.
    Missing,
}

/// Outcome of inserting a buy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingInsert {
    /// The request was stored.
    Inserted(BuyRequest),
    /// A pending request for the same (listing, buyer) already exists.
    DuplicatePending(BuyRequest),
}
