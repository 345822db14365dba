//! Image placement rules.
//!
//! Resolves caller-supplied images into gateway inserts and keeps the cover
//! flag exclusive. Default positions are left for the gateway to assign under
//! its write lock.

use std::collections::HashSet;

use cm_01_persistence::{assign_positions, ImageInsert, ImagePlacement};
use shared_types::{ListingImage, MarketError, MarketResult};

use super::input::NewImage;

/// Resolve the cover flag for images appended to `existing`.
///
/// - The cap and explicit positions are checked against `existing` so a bad
///   request fails before any write. The gateway repeats both checks
///   atomically.
/// - The first image explicitly marked as cover wins; other marks are
///   dropped.
/// - With no mark and no existing cover, the first new image becomes cover.
pub fn plan_images(
    existing: &[ListingImage],
    new: &[NewImage],
    max_images: usize,
) -> MarketResult<Vec<ImageInsert>> {
    let explicit_cover = new.iter().position(|i| i.is_cover);
    let has_cover = existing.iter().any(|i| i.is_cover);

    let mut inserts = Vec::with_capacity(new.len());
    for (index, image) in new.iter().enumerate() {
        let reference = image.reference.trim();
        if reference.is_empty() {
            return Err(MarketError::Validation(
                "image reference is required".to_string(),
            ));
        }

        let is_cover = match explicit_cover {
            Some(cover) => cover == index,
            None => !has_cover && index == 0,
        };
        inserts.push(ImageInsert {
            reference: reference.to_string(),
            position: image.position,
            is_cover,
        });
    }

    assign_positions(existing, &inserts, max_images)?;
    Ok(inserts)
}

/// Reject reorders that assign one position to two images.
///
/// Contiguity is not checked; the caller's ordering is trusted.
pub fn validate_placements(placements: &[ImagePlacement]) -> MarketResult<()> {
    if placements.is_empty() {
        return Err(MarketError::Validation(
            "no image placements supplied".to_string(),
        ));
    }
    let mut positions = HashSet::new();
    let mut images = HashSet::new();
    for placement in placements {
        if !images.insert(placement.image_id) {
            return Err(MarketError::Validation(format!(
                "image {} placed twice",
                placement.image_id
            )));
        }
        if !positions.insert(placement.position) {
            return Err(MarketError::Validation(format!(
                "duplicate image position {}",
                placement.position
            )));
        }
    }
    Ok(())
}
