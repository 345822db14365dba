//! In-Memory Gateway Adapter
//!
//! Implements every gateway port over in-process tables guarded by a single
//! `RwLock`. Each operation takes the lock once, so conditional updates and
//! cover swaps are atomic with respect to concurrent callers.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    BuyRequest, BuyRequestId, BuyRequestStatus, BuyRequestView, ImageId, Listing, ListingId,
    ListingImage, ListingStatus, MarketError, MarketResult, Role, Timestamp, UserId, UserProfile,
};
use tracing::debug;

use crate::domain::{
    assign_positions, BuyRequestInsert, ConditionalUpdate, ImageInsert, ImagePlacement,
    ListingInsert, ListingQuery, PendingInsert,
};
use crate::ports::{BuyRequestStore, ImageStore, ListingStore, UserDirectory};

#[derive(Default)]
struct Tables {
    /// Listing rows; the `images` field is always empty here.
    listings: BTreeMap<ListingId, Listing>,
    images: HashMap<ListingId, Vec<ListingImage>>,
    buy_requests: BTreeMap<BuyRequestId, BuyRequest>,
    users: HashMap<UserId, UserProfile>,
    next_listing_id: u64,
    next_buy_request_id: u64,
}

impl Tables {
    fn hydrate(&self, listing: &Listing) -> Listing {
        let mut hydrated = listing.clone();
        hydrated.images = self.images.get(&listing.id).cloned().unwrap_or_default();
        hydrated
    }

    fn view(
        &self,
        request: &BuyRequest,
        counterparty: UserId,
        buyer_facing: bool,
    ) -> BuyRequestView {
        let listing = self.listings.get(&request.listing_id);
        let name = self.users.get(&counterparty).map(|u| u.display_name.clone());
        BuyRequestView {
            request: request.clone(),
            listing_title: listing.map(|l| l.title.clone()),
            price_cents: listing.map(|l| l.price_cents),
            buyer_name: if buyer_facing { None } else { name.clone() },
            seller_name: if buyer_facing { name } else { None },
        }
    }
}

/// Newest first; ties broken by the higher id.
fn newest_first<K: Ord + Copy>(created_at: Timestamp, id: K) -> std::cmp::Reverse<(Timestamp, K)> {
    std::cmp::Reverse((created_at, id))
}

/// In-memory persistence gateway.
///
/// Also exposes fault-injection knobs (`set_latency`, `set_unavailable`) used
/// to exercise the deadline and storage-error paths.
pub struct InMemoryGateway {
    tables: RwLock<Tables>,
    latency: RwLock<Option<Duration>>,
    unavailable: AtomicBool,
}

impl InMemoryGateway {
    /// Create an empty gateway.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                next_listing_id: 1,
                next_buy_request_id: 1,
                ..Default::default()
            }),
            latency: RwLock::new(None),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Register a user profile. Emails are stored lowercase.
    pub fn register_user(&self, id: UserId, display_name: &str, email: &str, role: Role) {
        self.tables.write().users.insert(
            id,
            UserProfile {
                id,
                display_name: display_name.to_string(),
                university_email: email.to_lowercase(),
                role,
            },
        );
    }

    /// Delay every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write() = latency;
    }

    /// Make every subsequent call fail with a storage error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored listings, regardless of status.
    pub fn listing_count(&self) -> usize {
        self.tables.read().listings.len()
    }

    /// Number of stored buy requests, regardless of status.
    pub fn buy_request_count(&self) -> usize {
        self.tables.read().buy_requests.len()
    }

    async fn ready(&self, op: &'static str) -> MarketResult<()> {
        let latency = *self.latency.read();
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            debug!("[cm-01] {} refused: store unavailable", op);
            return Err(MarketError::Storage(format!("{}: store unavailable", op)));
        }
        Ok(())
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingStore for InMemoryGateway {
    async fn get_listing(&self, id: ListingId) -> MarketResult<Option<Listing>> {
        self.ready("get_listing").await?;
        let tables = self.tables.read();
        Ok(tables.listings.get(&id).map(|l| tables.hydrate(l)))
    }

    async fn insert_listing(&self, data: ListingInsert) -> MarketResult<Listing> {
        self.ready("insert_listing").await?;
        let mut tables = self.tables.write();
        let id = ListingId(tables.next_listing_id);
        tables.next_listing_id += 1;

        let listing = Listing {
            id,
            seller_id: data.seller_id,
            category_id: data.category_id,
            title: data.title,
            description: data.description,
            price_cents: data.price_cents,
            condition: data.condition,
            quantity: data.quantity,
            status: ListingStatus::Pending,
            images: Vec::new(),
            created_at: data.created_at,
            updated_at: data.created_at,
        };
        tables.listings.insert(id, listing.clone());
        debug!("[cm-01] Inserted listing {} for seller {}", id, data.seller_id);
        Ok(listing)
    }

    async fn update_listing_status(
        &self,
        id: ListingId,
        expected: ListingStatus,
        new: ListingStatus,
        now: Timestamp,
    ) -> MarketResult<ConditionalUpdate<Listing>> {
        self.ready("update_listing_status").await?;
        let mut tables = self.tables.write();
        let Some(row) = tables.listings.get_mut(&id) else {
            return Ok(ConditionalUpdate::Missing);
        };
        if row.status != expected {
            debug!(
                "[cm-01] Listing {} status is {}, expected {}",
                id, row.status, expected
            );
            let current = row.clone();
            return Ok(ConditionalUpdate::Stale(tables.hydrate(&current)));
        }
        row.status = new;
        row.updated_at = now;
        let updated = row.clone();
        Ok(ConditionalUpdate::Applied(tables.hydrate(&updated)))
    }

    async fn query_listings(&self, query: &ListingQuery) -> MarketResult<Vec<Listing>> {
        self.ready("query_listings").await?;
        let tables = self.tables.read();
        let mut rows: Vec<&Listing> = tables
            .listings
            .values()
            .filter(|l| query.matches(l))
            .collect();
        rows.sort_by_key(|l| newest_first(l.created_at, l.id));

        Ok(rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|l| tables.hydrate(l))
            .collect())
    }
}

#[async_trait]
impl ImageStore for InMemoryGateway {
    async fn list_images(&self, listing_id: ListingId) -> MarketResult<Vec<ListingImage>> {
        self.ready("list_images").await?;
        Ok(self
            .tables
            .read()
            .images
            .get(&listing_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_images(
        &self,
        listing_id: ListingId,
        images: Vec<ImageInsert>,
        max_images: usize,
    ) -> MarketResult<Vec<ListingImage>> {
        self.ready("insert_images").await?;
        let mut tables = self.tables.write();
        if !tables.listings.contains_key(&listing_id) {
            return Err(MarketError::not_found("listing", listing_id));
        }

        let set = tables.images.entry(listing_id).or_default();
        let positions = assign_positions(set, &images, max_images)?;
        let mut cover_taken = false;
        if images.iter().any(|i| i.is_cover) {
            for existing in set.iter_mut() {
                existing.is_cover = false;
            }
        }
        for (insert, position) in images.into_iter().zip(positions) {
            let is_cover = insert.is_cover && !cover_taken;
            cover_taken |= is_cover;
            set.push(ListingImage {
                id: ImageId::new_v4(),
                listing_id,
                reference: insert.reference,
                position,
                is_cover,
            });
        }
        debug!("[cm-01] Listing {} now has {} images", listing_id, set.len());
        Ok(set.clone())
    }

    async fn set_cover_image(
        &self,
        listing_id: ListingId,
        image_id: ImageId,
    ) -> MarketResult<Vec<ListingImage>> {
        self.ready("set_cover_image").await?;
        let mut tables = self.tables.write();
        let set = tables
            .images
            .get_mut(&listing_id)
            .filter(|set| set.iter().any(|i| i.id == image_id))
            .ok_or_else(|| MarketError::not_found("image", image_id))?;

        for image in set.iter_mut() {
            image.is_cover = image.id == image_id;
        }
        Ok(set.clone())
    }

    async fn reorder_images(
        &self,
        listing_id: ListingId,
        placements: &[ImagePlacement],
    ) -> MarketResult<Vec<ListingImage>> {
        self.ready("reorder_images").await?;
        let mut tables = self.tables.write();
        let Some(set) = tables.images.get_mut(&listing_id) else {
            return Ok(Vec::new());
        };

        let moves: HashMap<ImageId, u32> = placements
            .iter()
            .filter(|p| set.iter().any(|i| i.id == p.image_id))
            .map(|p| (p.image_id, p.position))
            .collect();

        let mut seen = HashSet::new();
        for image in set.iter() {
            let position = moves.get(&image.id).copied().unwrap_or(image.position);
            if !seen.insert(position) {
                return Err(MarketError::Validation(format!(
                    "position {} is already used by another image of listing {}",
                    position, listing_id
                )));
            }
        }

        for image in set.iter_mut() {
            if let Some(position) = moves.get(&image.id) {
                image.position = *position;
            }
        }
        Ok(set.clone())
    }
}

#[async_trait]
impl BuyRequestStore for InMemoryGateway {
    async fn get_buy_request(&self, id: BuyRequestId) -> MarketResult<Option<BuyRequest>> {
        self.ready("get_buy_request").await?;
        Ok(self.tables.read().buy_requests.get(&id).cloned())
    }

    async fn find_pending_buy_request(
        &self,
        listing_id: ListingId,
        buyer_id: UserId,
    ) -> MarketResult<Option<BuyRequest>> {
        self.ready("find_pending_buy_request").await?;
        Ok(self
            .tables
            .read()
            .buy_requests
            .values()
            .find(|r| {
                r.listing_id == listing_id
                    && r.buyer_id == buyer_id
                    && r.status == BuyRequestStatus::Pending
            })
            .cloned())
    }

    async fn insert_buy_request(&self, data: BuyRequestInsert) -> MarketResult<PendingInsert> {
        self.ready("insert_buy_request").await?;
        let mut tables = self.tables.write();
        let duplicate = tables.buy_requests.values().find(|r| {
            r.listing_id == data.listing_id
                && r.buyer_id == data.buyer_id
                && r.status == BuyRequestStatus::Pending
        });
        if let Some(existing) = duplicate {
            return Ok(PendingInsert::DuplicatePending(existing.clone()));
        }

        let id = BuyRequestId(tables.next_buy_request_id);
        tables.next_buy_request_id += 1;
        let request = BuyRequest {
            id,
            listing_id: data.listing_id,
            buyer_id: data.buyer_id,
            seller_id: data.seller_id,
            status: BuyRequestStatus::Pending,
            created_at: data.created_at,
            updated_at: data.created_at,
        };
        tables.buy_requests.insert(id, request.clone());
        debug!(
            "[cm-01] Inserted buy request {} on listing {}",
            id, data.listing_id
        );
        Ok(PendingInsert::Inserted(request))
    }

    async fn update_buy_request_status(
        &self,
        id: BuyRequestId,
        expected: BuyRequestStatus,
        new: BuyRequestStatus,
        now: Timestamp,
    ) -> MarketResult<ConditionalUpdate<BuyRequest>> {
        self.ready("update_buy_request_status").await?;
        let mut tables = self.tables.write();
        let Some(row) = tables.buy_requests.get_mut(&id) else {
            return Ok(ConditionalUpdate::Missing);
        };
        if row.status != expected {
            return Ok(ConditionalUpdate::Stale(row.clone()));
        }
        row.status = new;
        row.updated_at = now;
        Ok(ConditionalUpdate::Applied(row.clone()))
    }

    async fn query_buy_requests_by_seller(
        &self,
        seller_id: UserId,
        status: Option<BuyRequestStatus>,
    ) -> MarketResult<Vec<BuyRequestView>> {
        self.ready("query_buy_requests_by_seller").await?;
        let tables = self.tables.read();
        let mut rows: Vec<&BuyRequest> = tables
            .buy_requests
            .values()
            .filter(|r| r.seller_id == seller_id && status.map_or(true, |s| r.status == s))
            .collect();
        rows.sort_by_key(|r| newest_first(r.created_at, r.id));
        Ok(rows
            .into_iter()
            .map(|r| tables.view(r, r.buyer_id, false))
            .collect())
    }

    async fn query_buy_requests_by_buyer(
        &self,
        buyer_id: UserId,
    ) -> MarketResult<Vec<BuyRequestView>> {
        self.ready("query_buy_requests_by_buyer").await?;
        let tables = self.tables.read();
        let mut rows: Vec<&BuyRequest> = tables
            .buy_requests
            .values()
            .filter(|r| r.buyer_id == buyer_id)
            .collect();
        rows.sort_by_key(|r| newest_first(r.created_at, r.id));
        Ok(rows
            .into_iter()
            .map(|r| tables.view(r, r.seller_id, true))
            .collect())
    }
}

#[async_trait]
impl UserDirectory for InMemoryGateway {
    async fn get_user(&self, id: UserId) -> MarketResult<Option<UserProfile>> {
        self.ready("get_user").await?;
        Ok(self.tables.read().users.get(&id).cloned())
    }
}
