//! # Core Domain Entities
//!
//! Defines the marketplace records shared across subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `UserId`, `Principal`, `Role`, `UserProfile`
//! - **Listings**: `Listing`, `ListingStatus`, `Condition`, `ListingImage`
//! - **Negotiation**: `BuyRequest`, `BuyRequestStatus`, `BuyRequestView`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::MarketError;
use crate::time::Timestamp;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Identifier of a registered user (buyer, seller or admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier of a listing, assigned by the persistence gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub u64);

/// Identifier of a buy request, assigned by the persistence gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuyRequestId(pub u64);

/// Identifier of a listing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

/// Identifier of an image attached to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub Uuid);

impl ImageId {
    /// Generate a fresh random image identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        })*
    };
}

display_id!(UserId, ListingId, BuyRequestId, CategoryId, ImageId);

/// Role attached to a principal by the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular account: may sell and buy.
    #[default]
    Student,
    /// Moderator: may approve and reject listings.
    Admin,
}

/// The authenticated actor performing an operation.
///
/// Resolved by the authentication layer; the lifecycle core never parses
/// credentials itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Account identifier.
    pub id: UserId,
    /// Account role.
    pub role: Role,
}

impl Principal {
    /// A principal with the `student` role.
    pub fn student(id: u64) -> Self {
        Self {
            id: UserId(id),
            role: Role::Student,
        }
    }

    /// A principal with the `admin` role.
    pub fn admin(id: u64) -> Self {
        Self {
            id: UserId(id),
            role: Role::Admin,
        }
    }

    /// True if the principal carries the admin capability.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Public profile of a user, used to decorate joined views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account identifier.
    pub id: UserId,
    /// Name shown to counterparties.
    pub display_name: String,
    /// University email, stored lowercase.
    pub university_email: String,
    /// Account role.
    pub role: Role,
}

// =============================================================================
// CLUSTER B: LISTINGS
// =============================================================================

/// Moderation status of a listing.
///
/// ```text
/// [PENDING] ──approve──→ [ACTIVE]
///     │
///     └──────reject────→ [REJECTED]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Awaiting moderation. Initial state.
    Pending,
    /// Approved and purchasable.
    Active,
    /// Rejected by a moderator. Terminal.
    Rejected,
}

impl ListingStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical condition of the item for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
    #[default]
    Unknown,
}

impl Condition {
    /// Wire name of the condition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like_new",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "like_new" => Ok(Self::LikeNew),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            "unknown" => Ok(Self::Unknown),
            other => Err(MarketError::Validation(format!(
                "unknown condition '{}'",
                other
            ))),
        }
    }
}

/// An image reference attached to a listing.
///
/// The reference points into an external image store; this crate never
/// touches image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingImage {
    /// Image identifier.
    pub id: ImageId,
    /// Owning listing.
    pub listing_id: ListingId,
    /// Opaque reference into the image store (URL or key).
    pub reference: String,
    /// Display position, unique per listing.
    pub position: u32,
    /// At most one image per listing carries the cover flag.
    pub is_cover: bool,
}

/// Sort images for display: the cover first, then by position ascending.
pub fn sort_images_cover_first(images: &mut [ListingImage]) {
    images.sort_by_key(|image| (!image.is_cover, image.position));
}

/// A sellable item post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Listing identifier, immutable.
    pub id: ListingId,
    /// Owning seller, immutable.
    pub seller_id: UserId,
    /// Optional category.
    pub category_id: Option<CategoryId>,
    /// Non-empty title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Asking price in cents.
    pub price_cents: u64,
    /// Item condition.
    pub condition: Condition,
    /// Units offered (single-unit model, never decremented).
    pub quantity: u32,
    /// Moderation status.
    pub status: ListingStatus,
    /// Images, cover first then by position.
    pub images: Vec<ListingImage>,
    /// Creation time (ms since epoch).
    pub created_at: Timestamp,
    /// Last status change (ms since epoch).
    pub updated_at: Timestamp,
}

impl Listing {
    /// True if buy requests may be created against this listing.
    pub fn is_purchasable(&self) -> bool {
        self.status == ListingStatus::Active
    }

    /// The cover image, if any.
    pub fn cover_image(&self) -> Option<&ListingImage> {
        self.images.iter().find(|image| image.is_cover)
    }
}

// =============================================================================
// CLUSTER C: NEGOTIATION
// =============================================================================

/// Negotiation status of a buy request.
///
/// ```text
/// [PENDING] ──accept──→ [ACCEPTED]
///     │
///     └──────reject───→ [REJECTED]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyRequestStatus {
    /// Awaiting the seller's answer.
    Pending,
    /// Accepted by the seller. Terminal.
    Accepted,
    /// Rejected by the seller. Terminal.
    Rejected,
}

impl BuyRequestStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// True once no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for BuyRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A buyer's intent to purchase an active listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyRequest {
    /// Request identifier.
    pub id: BuyRequestId,
    /// Target listing.
    pub listing_id: ListingId,
    /// Requesting buyer.
    pub buyer_id: UserId,
    /// Snapshot of the listing's seller at creation time. Not re-derived.
    pub seller_id: UserId,
    /// Negotiation status.
    pub status: BuyRequestStatus,
    /// Creation time (ms since epoch).
    pub created_at: Timestamp,
    /// Last status change (ms since epoch).
    pub updated_at: Timestamp,
}

/// A buy request joined with listing and counterparty details.
///
/// Joins are LEFT joins: a missing listing or user yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyRequestView {
    /// The request itself.
    #[serde(flatten)]
    pub request: BuyRequest,
    /// Title of the referenced listing.
    pub listing_title: Option<String>,
    /// Price of the referenced listing.
    pub price_cents: Option<u64>,
    /// Buyer's display name (filled for seller-facing views).
    pub buyer_name: Option<String>,
    /// Seller's display name (filled for buyer-facing views).
    pub seller_name: Option<String>,
}
