//! Discovery sections: a random sample of personalities and agencies.
//!
//! Each section is rendered as a two-column grid of cards, so:
//!
//! - a sample with fewer than `min_cards` profiles is hidden,
//! - profiles whose image resolves to nothing are skipped,
//! - the remaining cards are cut down to an even count.
//!
//! `min_cards` is checked against the raw sample, so a section can show
//! fewer than `min_cards` cards when some images are missing.

use serde::Serialize;
use vtuber_handbook_core::models::ProfileRecord;
use vtuber_handbook_core::store::CatalogStore;

use crate::handbook::Handbook;
use crate::images::image_uri;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryCard {
    pub name: String,
    pub display_title: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoverySection {
    pub title: String,
    pub cards: Vec<DiscoveryCard>,
}

pub const VTUBERS_TITLE: &str = "VTubers";
pub const AGENCIES_TITLE: &str = "Agencies";

/// Fresh discovery sections. Hidden sections are left out.
pub async fn discover<S: CatalogStore>(
    handbook: &Handbook<S>,
    min_cards: usize,
) -> Vec<DiscoverySection> {
    let vtubers = handbook.random_profiles(false).await;
    let agencies = handbook.agencies().await;

    [
        build_section(VTUBERS_TITLE, &vtubers, min_cards),
        build_section(AGENCIES_TITLE, &agencies, min_cards),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Turn sampled profiles into a section, or `None` when the sample is too
/// small or no pair of cards has images.
pub fn build_section(
    title: &str,
    profiles: &[ProfileRecord],
    min_cards: usize,
) -> Option<DiscoverySection> {
    if profiles.len() < min_cards.max(1) {
        return None;
    }

    let mut cards: Vec<DiscoveryCard> = profiles
        .iter()
        .filter_map(|p| {
            let image = image_uri(&p.image);
            (!image.is_empty()).then(|| DiscoveryCard {
                name: p.name.clone(),
                display_title: p.display_title.clone(),
                image,
            })
        })
        .collect();

    cards.truncate(cards.len() - cards.len() % 2);
    if cards.is_empty() {
        return None;
    }

    Some(DiscoverySection {
        title: title.to_string(),
        cards,
    })
}
