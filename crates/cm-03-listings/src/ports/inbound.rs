//! # Inbound Port - ListingLifecycleApi
//!
//! Primary driving port for listing creation, moderation and images.
//!
//! ## Authorization
//!
//! | Method | Allowed Principal |
//! |--------|-------------------|
//! | `create` | any student (becomes the seller) |
//! | `approve` / `reject` | admin |
//! | `list_pending` | admin |
//! | `list_by_seller` | the seller named |
//! | `add_images` / `set_cover_image` / `reorder_images` | listing owner |
//! | `get_listing` / `find_listing` / `list_active` | anyone |

use async_trait::async_trait;
use cm_01_persistence::ImagePlacement;
use shared_types::{ImageId, Listing, ListingId, ListingImage, MarketResult, Principal, UserId};

use crate::domain::{CreatedListing, ListingFilter, NewImage, NewListing};

/// Primary API for the listing lifecycle.
///
/// Every listing returned carries its images ordered cover first, then by
/// position ascending.
#[async_trait]
pub trait ListingLifecycleApi: Send + Sync {
    /// Create a `pending` listing owned by `seller`.
    ///
    /// # Errors
    /// - `Validation`: missing/blank title, missing or negative price,
    ///   zero quantity, too many images
    async fn create(&self, seller: &Principal, input: NewListing) -> MarketResult<CreatedListing>;

    /// Move a pending listing to `active`.
    ///
    /// # Errors
    /// - `NotFound`: unknown listing
    /// - `InvalidState`: listing is not pending
    /// - `Authorization`: principal is not an admin
    async fn approve(&self, principal: &Principal, listing_id: ListingId) -> MarketResult<Listing>;

    /// Move a pending listing to `rejected`. Same preconditions as `approve`.
    async fn reject(&self, principal: &Principal, listing_id: ListingId) -> MarketResult<Listing>;

    /// Single listing read; `None` if it does not exist.
    async fn find_listing(&self, listing_id: ListingId) -> MarketResult<Option<Listing>>;

    /// Single listing read.
    ///
    /// # Errors
    /// - `NotFound`: unknown listing
    async fn get_listing(&self, listing_id: ListingId) -> MarketResult<Listing>;

    /// Public browse view over `active` listings, newest first.
    async fn list_active(&self, filter: &ListingFilter) -> MarketResult<Vec<Listing>>;

    /// Moderation queue, newest first.
    async fn list_pending(&self, principal: &Principal) -> MarketResult<Vec<Listing>>;

    /// Every listing of `seller_id` in any status, newest first.
    async fn list_by_seller(
        &self,
        principal: &Principal,
        seller_id: UserId,
    ) -> MarketResult<Vec<Listing>>;

    /// Append images to a listing and return its full image set.
    async fn add_images(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        images: Vec<NewImage>,
    ) -> MarketResult<Vec<ListingImage>>;

    /// Make one image the exclusive cover.
    ///
    /// # Errors
    /// - `NotFound`: unknown listing, or image not attached to it
    async fn set_cover_image(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        image_id: ImageId,
    ) -> MarketResult<Vec<ListingImage>>;

    /// Reassign image positions in bulk.
    async fn reorder_images(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        placements: Vec<ImagePlacement>,
    ) -> MarketResult<Vec<ListingImage>>;
}
