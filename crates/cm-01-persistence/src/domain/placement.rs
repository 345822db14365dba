//! Image position assignment.
//!
//! Adapters call [`assign_positions`] while holding their write lock.

use std::collections::HashSet;

use shared_types::{ListingImage, MarketError, MarketResult};

use super::records::ImageInsert;

/// Final position of every insert, in input order.
///
/// Explicit positions are kept. The rest are appended in input order after
/// the highest position already in use, counting explicit positions of the
/// same batch.
///
/// # Errors
/// - `Validation` if the batch would exceed `max_images`
/// - `Validation` if an explicit position is already taken
pub fn assign_positions(
    existing: &[ListingImage],
    inserts: &[ImageInsert],
    max_images: usize,
) -> MarketResult<Vec<u32>> {
    if existing.len() + inserts.len() > max_images {
        return Err(MarketError::Validation(format!(
            "a listing can hold at most {} images",
            max_images
        )));
    }

    let mut used: HashSet<u32> = existing.iter().map(|i| i.position).collect();
    for position in inserts.iter().filter_map(|i| i.position) {
        if !used.insert(position) {
            return Err(MarketError::Validation(format!(
                "duplicate image position {}",
                position
            )));
        }
    }

    let mut next = used.iter().max().map_or(0, |max| max + 1);
    Ok(inserts
        .iter()
        .map(|insert| {
            insert.position.unwrap_or_else(|| {
                let position = next;
                next += 1;
                position
            })
        })
        .collect())
}
