//! Read-only access to the catalog.
//!
//! The [`CatalogStore`] trait covers every query the search and detail
//! pipeline needs against the three catalog tables (`basic_info`,
//! `character`, `ext_links`). Backends map raw rows into the typed records
//! of [`crate::models`] and report failures through [`CatalogError`].
//!
//! Implementations must be `Send + Sync` to work with async runtimes.
//!
//! [`CatalogError`]: crate::error::CatalogError

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{DetailRecord, ExternalLinksRecord, ProfileRecord};

/// Default number of rows returned by the discovery queries.
pub const DEFAULT_SAMPLE_LIMIT: usize = 20;

/// Abstract read-only catalog backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list_all_names`](CatalogStore::list_all_names) | Every profile name, storage order |
/// | [`get_profiles_by_names`](CatalogStore::get_profiles_by_names) | Set-membership fetch, unordered |
/// | [`get_random_profiles`](CatalogStore::get_random_profiles) | Fresh uniform sample per call |
/// | [`get_agency_profiles`](CatalogStore::get_agency_profiles) | Agencies someone is affiliated with |
/// | [`get_detail_and_links`](CatalogStore::get_detail_and_links) | Detail + links for one name |
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Whether a usable connection currently exists.
    async fn is_ready(&self) -> bool {
        true
    }

    async fn list_all_names(&self) -> Result<Vec<String>>;

    /// Profiles whose name is in `names`, in no particular order.
    ///
    /// Empty input yields an empty result without touching the backend.
    async fn get_profiles_by_names(&self, names: &[String]) -> Result<Vec<ProfileRecord>>;

    /// Up to `limit` profiles with the given agency flag, sampled anew on
    /// every call.
    async fn get_random_profiles(&self, is_agency: bool, limit: usize)
        -> Result<Vec<ProfileRecord>>;

    /// Up to `limit` agency profiles, in random order, whose name matches
    /// (case-insensitively) the `affiliation` of at least one other entity.
    async fn get_agency_profiles(&self, limit: usize) -> Result<Vec<ProfileRecord>>;

    /// The detail and link rows for `name`. Either may be absent.
    async fn get_detail_and_links(
        &self,
        name: &str,
    ) -> Result<(Option<DetailRecord>, Option<ExternalLinksRecord>)>;
}

#[async_trait]
impl<S: CatalogStore + ?Sized> CatalogStore for std::sync::Arc<S> {
    async fn is_ready(&self) -> bool {
        (**self).is_ready().await
    }

    async fn list_all_names(&self) -> Result<Vec<String>> {
        (**self).list_all_names().await
    }

    async fn get_profiles_by_names(&self, names: &[String]) -> Result<Vec<ProfileRecord>> {
        (**self).get_profiles_by_names(names).await
    }

    async fn get_random_profiles(
        &self,
        is_agency: bool,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>> {
        (**self).get_random_profiles(is_agency, limit).await
    }

    async fn get_agency_profiles(&self, limit: usize) -> Result<Vec<ProfileRecord>> {
        (**self).get_agency_profiles(limit).await
    }

    async fn get_detail_and_links(
        &self,
        name: &str,
    ) -> Result<(Option<DetailRecord>, Option<ExternalLinksRecord>)> {
        (**self).get_detail_and_links(name).await
    }
}
