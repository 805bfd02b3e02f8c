//! Non-fatal query layer.
//!
//! [`Handbook`] is what the CLI (or any other front end) talks to. It wraps
//! an injected [`CatalogStore`] and runs the search, resolution, discovery
//! and detail pipelines from `vtuber_handbook_core`.
//!
//! Every store failure stops here: it is logged at `warn` and the caller
//! gets an empty result. A closed catalog behaves the same way.

use serde::Serialize;
use tracing::{debug, warn};

use vtuber_handbook_core::detail::{self, DetailOptions, DetailPage, InlineRenderer};
use vtuber_handbook_core::error::Result;
use vtuber_handbook_core::fuzzy::FuzzyMatcher;
use vtuber_handbook_core::index::NameIndex;
use vtuber_handbook_core::models::{ProfileRecord, RankedProfile};
use vtuber_handbook_core::resolve::resolve;
use vtuber_handbook_core::store::CatalogStore;

use crate::config::Config;
use crate::images::image_uri;
use crate::markup::MarkdownInline;

/// A profile's detail page plus its rendered intro and credit.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileDetail {
    #[serde(flatten)]
    pub page: DetailPage,
    pub display_title: String,
    pub intro_html: String,
    pub credit_html: String,
    /// Displayable image source, or empty.
    pub image: String,
}

pub struct Handbook<S> {
    store: S,
    matcher: FuzzyMatcher,
    detail_options: DetailOptions,
    sample_limit: usize,
    renderer: Box<dyn InlineRenderer>,
}

impl<S: CatalogStore> Handbook<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            matcher: FuzzyMatcher::new(config.fuzzy_options()),
            detail_options: config.detail_options(),
            sample_limit: config.discovery.limit,
            renderer: Box::new(MarkdownInline),
        }
    }

    /// Swap the markup renderer used for detail values, intros and credits.
    pub fn with_renderer(mut self, renderer: impl InlineRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn detail_options(&self) -> DetailOptions {
        self.detail_options
    }

    pub async fn is_ready(&self) -> bool {
        self.store.is_ready().await
    }

    /// Every catalog name, in storage order.
    pub async fn names(&self) -> Vec<String> {
        non_fatal("list names", NameIndex::new(&self.store).names().await)
    }

    /// Fuzzy-search names and resolve hits in relevance order.
    pub async fn search(&self, query: &str) -> Vec<RankedProfile> {
        let results = non_fatal(
            "search",
            NameIndex::new(&self.store).search(&self.matcher, query).await,
        );
        debug!(query, hits = results.len(), "search finished");
        results
    }

    /// Resolve an ordered name list, such as the bookmark list.
    pub async fn resolve(&self, names: &[String]) -> Vec<RankedProfile> {
        non_fatal("resolve names", resolve(&self.store, names).await)
    }

    pub async fn random_profiles(&self, is_agency: bool) -> Vec<ProfileRecord> {
        non_fatal(
            "random profiles",
            self.store
                .get_random_profiles(is_agency, self.sample_limit)
                .await,
        )
    }

    pub async fn agencies(&self) -> Vec<ProfileRecord> {
        non_fatal(
            "agency profiles",
            self.store.get_agency_profiles(self.sample_limit).await,
        )
    }

    /// Detail page for `name`, sorted per `options`.
    pub async fn detail_with(&self, name: &str, options: DetailOptions) -> ProfileDetail {
        let page = non_fatal(
            "detail",
            detail::aggregate(&self.store, name, options, self.renderer.as_ref()).await,
        );
        let profile = non_fatal(
            "detail profile",
            self.store.get_profiles_by_names(&[name.to_string()]).await,
        )
        .into_iter()
        .find(|p| p.name == name);

        let mut detail = ProfileDetail {
            page,
            ..ProfileDetail::default()
        };
        if let Some(profile) = profile {
            detail.display_title = profile.display_title;
            detail.intro_html = self.renderer.render_inline(&profile.intro);
            detail.credit_html = self.renderer.render_inline(&profile.credit);
            detail.image = image_uri(&profile.image);
        }
        detail
    }

    /// Detail page for `name` with the configured sort order.
    pub async fn detail(&self, name: &str) -> ProfileDetail {
        self.detail_with(name, self.detail_options).await
    }
}

fn non_fatal<T: Default>(operation: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(operation, error = %e, "catalog query failed");
            T::default()
        }
    }
}
