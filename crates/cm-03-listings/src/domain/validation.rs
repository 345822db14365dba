//! Listing input validation and browse query construction.

use cm_01_persistence::{ListingInsert, ListingQuery};
use shared_types::{ListingStatus, MarketError, MarketResult, Timestamp, UserId};

use super::config::ListingConfig;
use super::input::{ListingFilter, NewListing};

/// Validate a raw listing input into a gateway insert.
///
/// # Errors
/// - `Validation` if the title is missing, blank or too long
/// - `Validation` if the price is missing or negative
/// - `Validation` if the quantity is zero
pub fn validate_new_listing(
    input: &NewListing,
    seller_id: UserId,
    now: Timestamp,
    config: &ListingConfig,
) -> MarketResult<ListingInsert> {
    let title = input
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| MarketError::Validation("title is required".to_string()))?;
    if title.chars().count() > config.max_title_len {
        return Err(MarketError::Validation(format!(
            "title exceeds {} characters",
            config.max_title_len
        )));
    }

    let price_cents = match input.price_cents {
        None => {
            return Err(MarketError::Validation(
                "price_cents is required".to_string(),
            ))
        }
        Some(p) if p < 0 => {
            return Err(MarketError::Validation(
                "price_cents must be non-negative".to_string(),
            ))
        }
        Some(p) => p as u64,
    };

    let quantity = input.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(MarketError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(ListingInsert {
        seller_id,
        category_id: input.category_id,
        title: title.to_string(),
        description,
        price_cents,
        condition: input.condition.unwrap_or_default(),
        quantity,
        created_at: now,
    })
}

/// Build the gateway query for the public browse view.
///
/// Always restricted to `active` listings; the limit defaults to
/// `default_page_limit` and is clamped to `max_page_limit`.
pub fn active_listings_query(filter: &ListingFilter, config: &ListingConfig) -> ListingQuery {
    let limit = filter
        .limit
        .unwrap_or(config.default_page_limit)
        .min(config.max_page_limit);

    ListingQuery {
        status: Some(ListingStatus::Active),
        seller_id: None,
        search: filter.search.clone(),
        category_id: filter.category_id,
        price_min_cents: filter.price_min_cents,
        price_max_cents: filter.price_max_cents,
        condition: filter.condition,
        limit: Some(limit),
        offset: filter.offset.unwrap_or(0),
    }
}
