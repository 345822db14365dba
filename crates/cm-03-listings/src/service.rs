//! # Listing Lifecycle Service
//!
//! Implements [`ListingLifecycleApi`] over a [`PersistenceGateway`].
//!
//! Each operation is a single read-check-write against the gateway. Status
//! transitions use the gateway's conditional update, so the manager never
//! holds a lock across awaits.

use std::sync::Arc;

use async_trait::async_trait;
use cm_01_persistence::{ConditionalUpdate, ImagePlacement, ListingQuery, PersistenceGateway};
use cm_02_authorization::{ensure_admin, ensure_listing_owner, ensure_seller_scope};
use shared_types::{
    sort_images_cover_first, ImageId, Listing, ListingId, ListingImage, ListingStatus,
    MarketError, MarketResult, Principal, SystemTimeSource, TimeSource, UserId,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::domain::{
    active_listings_query, plan_images, validate_new_listing, validate_placements,
    CreatedListing, ListingConfig, ListingFilter, NewImage, NewListing,
};
use crate::ports::ListingLifecycleApi;

/// The listing lifecycle manager.
pub struct ListingLifecycleService<G: PersistenceGateway> {
    gateway: Arc<G>,
    clock: Arc<dyn TimeSource>,
    config: ListingConfig,
}

impl<G: PersistenceGateway> ListingLifecycleService<G> {
    /// Create a service with the system clock.
    pub fn new(gateway: Arc<G>, config: ListingConfig) -> Self {
        Self::with_clock(gateway, Arc::new(SystemTimeSource), config)
    }

    /// Create a service with an explicit clock.
    pub fn with_clock(gateway: Arc<G>, clock: Arc<dyn TimeSource>, config: ListingConfig) -> Self {
        Self {
            gateway,
            clock,
            config,
        }
    }

    async fn load(&self, listing_id: ListingId) -> MarketResult<Listing> {
        self.gateway
            .get_listing(listing_id)
            .await?
            .map(hydrate)
            .ok_or_else(|| MarketError::not_found("listing", listing_id))
    }

    /// Shared moderation transition: exists, pending, admin, conditional write.
    async fn moderate(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        target: ListingStatus,
        action: &str,
        past: &str,
    ) -> MarketResult<Listing> {
        let listing = self.load(listing_id).await?;

        if listing.status != ListingStatus::Pending {
            debug!(
                listing = %listing_id,
                status = %listing.status,
                "[cm-03] Refusing to {} non-pending listing", action
            );
            return Err(MarketError::InvalidState(format!(
                "only pending listings can be {}",
                past
            )));
        }

        ensure_admin(principal, &format!("{} listings", action))?;

        let now = self.clock.now();
        match self
            .gateway
            .update_listing_status(listing_id, ListingStatus::Pending, target, now)
            .await
            .map_err(log_storage)?
        {
            ConditionalUpdate::Applied(listing) => {
                info!(
                    listing = %listing_id,
                    admin = %principal.id,
                    "[cm-03] Listing {} -> {}", ListingStatus::Pending, target
                );
                Ok(hydrate(listing))
            }
            ConditionalUpdate::Stale(current) => {
                debug!(
                    listing = %listing_id,
                    status = %current.status,
                    "[cm-03] Lost moderation race"
                );
                Err(MarketError::InvalidState(format!(
                    "only pending listings can be {}",
                    past
                )))
            }
            ConditionalUpdate::Missing => Err(MarketError::not_found("listing", listing_id)),
        }
    }

    async fn owned(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        action: &str,
    ) -> MarketResult<Listing> {
        let listing = self.load(listing_id).await?;
        ensure_listing_owner(principal, &listing, action)?;
        Ok(listing)
    }

    async fn query(&self, query: &ListingQuery) -> MarketResult<Vec<Listing>> {
        let rows = self.gateway.query_listings(query).await.map_err(log_storage)?;
        Ok(rows.into_iter().map(hydrate).collect())
    }
}

#[async_trait]
impl<G: PersistenceGateway> ListingLifecycleApi for ListingLifecycleService<G> {
    #[instrument(
        skip(self, seller, input),
        fields(correlation_id = %Uuid::new_v4(), seller = %seller.id)
    )]
    async fn create(&self, seller: &Principal, input: NewListing) -> MarketResult<CreatedListing> {
        let now = self.clock.now();
        let insert = validate_new_listing(&input, seller.id, now, &self.config)?;
        let images = if input.images.is_empty() {
            Vec::new()
        } else {
            plan_images(&[], &input.images, self.config.max_images_per_listing)?
        };

        let mut listing = self
            .gateway
            .insert_listing(insert)
            .await
            .map_err(log_storage)?;
        info!(listing = %listing.id, "[cm-03] Listing created (pending)");

        if images.is_empty() {
            return Ok(CreatedListing {
                listing,
                image_failure: None,
            });
        }

        // The listing row stays even if its images cannot be attached.
        match self
            .gateway
            .insert_images(listing.id, images, self.config.max_images_per_listing)
            .await
        {
            Ok(mut stored) => {
                sort_images_cover_first(&mut stored);
                listing.images = stored;
                Ok(CreatedListing {
                    listing,
                    image_failure: None,
                })
            }
            Err(e) => {
                error!(
                    listing = %listing.id,
                    error = %e,
                    "[cm-03] Listing stored but its images were not"
                );
                Ok(CreatedListing {
                    listing,
                    image_failure: Some(e),
                })
            }
        }
    }

    #[instrument(
        skip(self, principal),
        fields(correlation_id = %Uuid::new_v4(), principal = %principal.id)
    )]
    async fn approve(&self, principal: &Principal, listing_id: ListingId) -> MarketResult<Listing> {
        self.moderate(principal, listing_id, ListingStatus::Active, "approve", "approved")
            .await
    }

    #[instrument(
        skip(self, principal),
        fields(correlation_id = %Uuid::new_v4(), principal = %principal.id)
    )]
    async fn reject(&self, principal: &Principal, listing_id: ListingId) -> MarketResult<Listing> {
        self.moderate(principal, listing_id, ListingStatus::Rejected, "reject", "rejected")
            .await
    }

    async fn find_listing(&self, listing_id: ListingId) -> MarketResult<Option<Listing>> {
        Ok(self.gateway.get_listing(listing_id).await?.map(hydrate))
    }

    #[instrument(skip(self), fields(correlation_id = %Uuid::new_v4()))]
    async fn get_listing(&self, listing_id: ListingId) -> MarketResult<Listing> {
        self.load(listing_id).await
    }

    #[instrument(skip(self, filter), fields(correlation_id = %Uuid::new_v4()))]
    async fn list_active(&self, filter: &ListingFilter) -> MarketResult<Vec<Listing>> {
        let query = active_listings_query(filter, &self.config);
        let listings = self.query(&query).await?;
        debug!(
            count = listings.len(),
            limit = ?query.limit,
            offset = query.offset,
            "[cm-03] Active listings served"
        );
        Ok(listings)
    }

    #[instrument(
        skip(self, principal),
        fields(correlation_id = %Uuid::new_v4(), principal = %principal.id)
    )]
    async fn list_pending(&self, principal: &Principal) -> MarketResult<Vec<Listing>> {
        ensure_admin(principal, "view the moderation queue")?;
        self.query(&ListingQuery::with_status(ListingStatus::Pending))
            .await
    }

    #[instrument(
        skip(self, principal),
        fields(correlation_id = %Uuid::new_v4(), principal = %principal.id)
    )]
    async fn list_by_seller(
        &self,
        principal: &Principal,
        seller_id: UserId,
    ) -> MarketResult<Vec<Listing>> {
        ensure_seller_scope(principal, seller_id)?;
        self.query(&ListingQuery::by_seller(seller_id)).await
    }

    #[instrument(
        skip(self, principal, images),
        fields(correlation_id = %Uuid::new_v4(), principal = %principal.id, count = images.len())
    )]
    async fn add_images(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        images: Vec<NewImage>,
    ) -> MarketResult<Vec<ListingImage>> {
        let listing = self.owned(principal, listing_id, "add images to").await?;
        if images.is_empty() {
            return Err(MarketError::Validation("no images supplied".to_string()));
        }
        let plan = plan_images(&listing.images, &images, self.config.max_images_per_listing)?;

        let mut stored = self
            .gateway
            .insert_images(listing_id, plan, self.config.max_images_per_listing)
            .await
            .map_err(log_storage)?;
        sort_images_cover_first(&mut stored);
        info!(listing = %listing_id, total = stored.len(), "[cm-03] Images added");
        Ok(stored)
    }

    #[instrument(
        skip(self, principal),
        fields(correlation_id = %Uuid::new_v4(), principal = %principal.id)
    )]
    async fn set_cover_image(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        image_id: ImageId,
    ) -> MarketResult<Vec<ListingImage>> {
        self.owned(principal, listing_id, "change the cover of").await?;

        let mut stored = self
            .gateway
            .set_cover_image(listing_id, image_id)
            .await
            .map_err(log_storage)?;
        sort_images_cover_first(&mut stored);
        info!(listing = %listing_id, image = %image_id, "[cm-03] Cover image set");
        Ok(stored)
    }

    #[instrument(
        skip(self, principal, placements),
        fields(correlation_id = %Uuid::new_v4(), principal = %principal.id)
    )]
    async fn reorder_images(
        &self,
        principal: &Principal,
        listing_id: ListingId,
        placements: Vec<ImagePlacement>,
    ) -> MarketResult<Vec<ListingImage>> {
        self.owned(principal, listing_id, "reorder images of").await?;
        validate_placements(&placements)?;

        let mut stored = self
            .gateway
            .reorder_images(listing_id, &placements)
            .await
            .map_err(log_storage)?;
        sort_images_cover_first(&mut stored);
        debug!(listing = %listing_id, "[cm-03] Images reordered");
        Ok(stored)
    }
}

/// Order a listing's images cover first, then by position.
fn hydrate(mut listing: Listing) -> Listing {
    sort_images_cover_first(&mut listing.images);
    listing
}

fn log_storage(e: MarketError) -> MarketError {
    if let MarketError::Storage(ref message) = e {
        error!("[cm-03] Storage failure: {}", message);
    }
    e
}
