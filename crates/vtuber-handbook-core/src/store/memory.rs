//! In-memory [`CatalogStore`] for tests and embedding without SQLite.
//!
//! Profiles keep insertion order, which plays the role of storage order.
//! Every trait call bumps a query counter so callers can assert that a code
//! path did or did not reach the store.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::error::Result;
use crate::models::{DetailRecord, ExternalLinksRecord, ProfileRecord};

use super::CatalogStore;

/// In-memory catalog.
#[derive(Default)]
pub struct InMemoryCatalog {
    profiles: Vec<ProfileRecord>,
    details: HashMap<String, DetailRecord>,
    links: HashMap<String, ExternalLinksRecord>,
    queries: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, profile: ProfileRecord) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn with_detail(mut self, detail: DetailRecord) -> Self {
        self.details.insert(detail.name.clone(), detail);
        self
    }

    pub fn with_links(mut self, links: ExternalLinksRecord) -> Self {
        self.links.insert(links.name.clone(), links);
        self
    }

    /// Number of store calls served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }

    fn sample(mut rows: Vec<ProfileRecord>, limit: usize) -> Vec<ProfileRecord> {
        rows.shuffle(&mut rand::thread_rng());
        rows.truncate(limit);
        rows
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_all_names(&self) -> Result<Vec<String>> {
        self.record_query();
        Ok(self.profiles.iter().map(|p| p.name.clone()).collect())
    }

    async fn get_profiles_by_names(&self, names: &[String]) -> Result<Vec<ProfileRecord>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.record_query();

        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        let mut rows: Vec<ProfileRecord> = self
            .profiles
            .iter()
            .filter(|p| wanted.contains(p.name.as_str()))
            .cloned()
            .collect();
        // Callers must not rely on storage order.
        rows.reverse();
        Ok(rows)
    }

    async fn get_random_profiles(
        &self,
        is_agency: bool,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>> {
        self.record_query();
        let rows = self
            .profiles
            .iter()
            .filter(|p| p.is_agency == is_agency)
            .cloned()
            .collect();
        Ok(Self::sample(rows, limit))
    }

    async fn get_agency_profiles(&self, limit: usize) -> Result<Vec<ProfileRecord>> {
        self.record_query();
        // ASCII folding matches SQLite's LOWER().
        let rows = self
            .profiles
            .iter()
            .filter(|p| p.is_agency)
            .filter(|p| {
                let agency = p.name.to_ascii_lowercase();
                self.details.values().any(|d| {
                    d.name != p.name
                        && d.affiliation()
                            .is_some_and(|a| a.to_ascii_lowercase() == agency)
                })
            })
            .cloned()
            .collect();
        Ok(Self::sample(rows, limit))
    }

    async fn get_detail_and_links(
        &self,
        name: &str,
    ) -> Result<(Option<DetailRecord>, Option<ExternalLinksRecord>)> {
        self.record_query();
        Ok((self.details.get(name).cloned(), self.links.get(name).cloned()))
    }
}
