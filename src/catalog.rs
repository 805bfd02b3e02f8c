//! Catalog lifecycle.
//!
//! [`CatalogHandle`] is the one owner of the dataset connection. The
//! application opens it once at start-up and closes it once at exit, and
//! passes it (or an `Arc` of it) to whatever needs to query.
//!
//! - `open` on an open handle is a no-op; there is never more than one
//!   connection.
//! - `close` on a closed handle is a no-op.
//! - Queries on a closed handle fail with [`CatalogError::NotReady`] instead
//!   of panicking.
//!
//! Queries hold a read lock for their whole duration, so `close` waits for
//! in-flight queries to finish before dropping the pool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use vtuber_handbook_core::error::{CatalogError, Result};
use vtuber_handbook_core::models::{
    DetailRecord, ExternalLinksRecord, ImageMode, ProfileRecord,
};
use vtuber_handbook_core::store::CatalogStore;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteCatalog;

pub struct CatalogHandle {
    path: PathBuf,
    image_mode: ImageMode,
    inner: RwLock<Option<SqliteCatalog>>,
}

impl CatalogHandle {
    /// A closed handle for the dataset at `path`.
    pub fn new(path: impl Into<PathBuf>, image_mode: ImageMode) -> Self {
        Self {
            path: path.into(),
            image_mode,
            inner: RwLock::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.catalog.path.clone(), config.image_mode())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the connection if it is not open yet.
    ///
    /// Returns whether the handle is ready afterwards. A failed open is
    /// logged and leaves the handle closed.
    pub async fn open(&self) -> bool {
        let mut inner = self.inner.write().await;
        if inner.is_some() {
            info!(path = %self.path.display(), "catalog already open");
            return true;
        }

        match db::connect(&self.path).await {
            Ok(pool) => {
                info!(path = %self.path.display(), "catalog opened");
                *inner = Some(SqliteCatalog::new(pool, self.image_mode));
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to open catalog");
                false
            }
        }
    }

    /// Close the connection if it is open.
    pub async fn close(&self) {
        let catalog = self.inner.write().await.take();
        match catalog {
            Some(catalog) => {
                catalog.close().await;
                info!(path = %self.path.display(), "catalog closed");
            }
            None => debug!("catalog was not open"),
        }
    }
}

#[async_trait]
impl CatalogStore for CatalogHandle {
    async fn is_ready(&self) -> bool {
        self.inner.read().await.is_some()
    }

    async fn list_all_names(&self) -> Result<Vec<String>> {
        match self.inner.read().await.as_ref() {
            Some(catalog) => catalog.list_all_names().await,
            None => Err(CatalogError::NotReady),
        }
    }

    async fn get_profiles_by_names(&self, names: &[String]) -> Result<Vec<ProfileRecord>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        match self.inner.read().await.as_ref() {
            Some(catalog) => catalog.get_profiles_by_names(names).await,
            None => Err(CatalogError::NotReady),
        }
    }

    async fn get_random_profiles(
        &self,
        is_agency: bool,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>> {
        match self.inner.read().await.as_ref() {
            Some(catalog) => catalog.get_random_profiles(is_agency, limit).await,
            None => Err(CatalogError::NotReady),
        }
    }

    async fn get_agency_profiles(&self, limit: usize) -> Result<Vec<ProfileRecord>> {
        match self.inner.read().await.as_ref() {
            Some(catalog) => catalog.get_agency_profiles(limit).await,
            None => Err(CatalogError::NotReady),
        }
    }

    async fn get_detail_and_links(
        &self,
        name: &str,
    ) -> Result<(Option<DetailRecord>, Option<ExternalLinksRecord>)> {
        match self.inner.read().await.as_ref() {
            Some(catalog) => catalog.get_detail_and_links(name).await,
            None => Err(CatalogError::NotReady),
        }
    }
}
