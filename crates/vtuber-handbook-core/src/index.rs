//! The fuzzy-search corpus.
//!
//! [`NameIndex`] materializes every profile name from the store. It reads
//! the store on every call; nothing is cached between calls, so the
//! snapshot always reflects the store at call time.

use crate::error::Result;
use crate::fuzzy::FuzzyMatcher;
use crate::models::RankedProfile;
use crate::resolve::resolve;
use crate::store::CatalogStore;

pub struct NameIndex<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> NameIndex<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All names, in storage order.
    pub async fn names(&self) -> Result<Vec<String>> {
        self.store.list_all_names().await
    }

    /// Fuzzy-match `query` against a fresh snapshot and resolve the ranked
    /// names into records.
    pub async fn search(&self, matcher: &FuzzyMatcher, query: &str) -> Result<Vec<RankedProfile>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let corpus = self.names().await?;
        let ranked = matcher.search(&corpus, query);
        resolve(self.store, &ranked).await
    }
}
