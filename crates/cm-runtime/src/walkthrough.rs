//! # Calculator Walkthrough
//!
//! A scripted sale exercising every lifecycle transition once:
//!
//! ```text
//! seller creates "Calculator" (pending)
//!   → admin approves (active)
//!   → buyer requests (pending)
//!   → seller accepts (accepted)
//!   → seller tries to reject (InvalidState, reported not raised)
//! ```

use serde::Serialize;
use shared_types::{
    BuyRequest, BuyRequestView, Listing, MarketError, MarketResult, Principal, Role, UserId,
};
use tracing::info;

use cm_03_listings::{ListingFilter, ListingLifecycleApi, NewImage, NewListing};
use cm_04_buy_requests::BuyRequestLifecycleApi;

use crate::boundary::ErrorResponse;
use crate::container::MarketContainer;

pub const SELLER_ID: u64 = 1;
pub const BUYER_ID: u64 = 2;
pub const ADMIN_ID: u64 = 100;

/// What a step produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum StepOutcome {
    Listing(Listing),
    Listings(Vec<Listing>),
    BuyRequest(BuyRequest),
    BuyRequests(Vec<BuyRequestView>),
    Error(ErrorResponse),
}

/// One printed step of the walkthrough.
#[derive(Debug, Clone, Serialize)]
pub struct WalkthroughStep {
    pub step: &'static str,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

impl WalkthroughStep {
    fn new(step: &'static str, outcome: StepOutcome) -> Self {
        info!(step, "[cm-runtime] Walkthrough step done");
        Self { step, outcome }
    }
}

fn reported<T>(result: MarketResult<T>, wrap: fn(T) -> StepOutcome) -> StepOutcome {
    match result {
        Ok(value) => wrap(value),
        Err(e) => StepOutcome::Error(ErrorResponse::from(&e)),
    }
}

/// Seed the three walkthrough users.
pub fn seed_users(container: &MarketContainer) {
    let store = container.store();
    store.register_user(UserId(SELLER_ID), "Sam Seller", "Sam@Campus.edu", Role::Student);
    store.register_user(UserId(BUYER_ID), "Bea Buyer", "bea@campus.edu", Role::Student);
    store.register_user(UserId(ADMIN_ID), "Ada Admin", "ada@campus.edu", Role::Admin);
}

/// Run the walkthrough. Only unexpected failures are returned as errors.
pub async fn run_walkthrough(container: &MarketContainer) -> MarketResult<Vec<WalkthroughStep>> {
    seed_users(container);
    let seller = Principal::student(SELLER_ID);
    let buyer = Principal::student(BUYER_ID);
    let admin = Principal::admin(ADMIN_ID);
    let mut steps = Vec::new();

    let input = NewListing {
        title: Some("Calculator".to_string()),
        description: Some("Graphing calculator, barely used".to_string()),
        price_cents: Some(2500),
        images: vec![NewImage::new("images/calculator-front.jpg")],
        ..Default::default()
    };
    let created = container.listings.create(&seller, input).await?;
    if let Some(e) = created.image_failure {
        return Err(e);
    }
    let listing_id = created.listing.id;
    steps.push(WalkthroughStep::new("create_listing", StepOutcome::Listing(created.listing)));

    let approved = container.listings.approve(&admin, listing_id).await?;
    steps.push(WalkthroughStep::new("approve_listing", StepOutcome::Listing(approved)));

    let active = container.listings.list_active(&ListingFilter::default()).await?;
    steps.push(WalkthroughStep::new("list_active", StepOutcome::Listings(active)));

    let request = container.buy_requests.create(&buyer, listing_id).await?;
    let request_id = request.id;
    steps.push(WalkthroughStep::new("create_buy_request", StepOutcome::BuyRequest(request)));

    let incoming = container.buy_requests.list_incoming(&seller).await?;
    steps.push(WalkthroughStep::new("list_incoming", StepOutcome::BuyRequests(incoming)));

    let accepted = container.buy_requests.accept_request(&seller, request_id).await?;
    steps.push(WalkthroughStep::new("accept_request", StepOutcome::BuyRequest(accepted)));

    let late_reject = container.buy_requests.reject_request(&seller, request_id).await;
    if late_reject.is_ok() {
        return Err(MarketError::InvalidState(
            "an accepted request was rejected".to_string(),
        ));
    }
    steps.push(WalkthroughStep::new(
        "reject_accepted_request",
        reported(late_reject, StepOutcome::BuyRequest),
    ));

    let mine = container.buy_requests.list_mine(&buyer).await?;
    steps.push(WalkthroughStep::new("list_mine", StepOutcome::BuyRequests(mine)));

    Ok(steps)
}
