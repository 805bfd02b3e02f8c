//! Name list to record resolution.
//!
//! Turns an ordered list of names (fuzzy results, a bookmark list, ...) into
//! full [`ProfileRecord`]s in the same order. The store answers a
//! set-membership query in arbitrary order; the records are indexed by name
//! and the input list is projected through that index. Names without a
//! record are skipped and do not shift the positions of the others.

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{ProfileRecord, RankedProfile};
use crate::store::CatalogStore;

/// Resolve `names` into ranked profiles, preserving input order.
///
/// An empty list returns immediately without querying the store.
pub async fn resolve<S: CatalogStore + ?Sized>(
    store: &S,
    names: &[String],
) -> Result<Vec<RankedProfile>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let records = store.get_profiles_by_names(names).await?;
    Ok(order_by_names(names, records))
}

/// Project `names` through the unordered `records`.
///
/// `position` is the index in `names`. When a name repeats, only its first
/// occurrence is resolved.
pub fn order_by_names(names: &[String], records: Vec<ProfileRecord>) -> Vec<RankedProfile> {
    let mut by_name: HashMap<String, ProfileRecord> = records
        .into_iter()
        .map(|record| (record.name.clone(), record))
        .collect();

    names
        .iter()
        .enumerate()
        .filter_map(|(position, name)| {
            by_name
                .remove(name)
                .map(|profile| RankedProfile { position, profile })
        })
        .collect()
}
